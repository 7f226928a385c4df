pub mod employee;
pub mod log;
pub mod organisation;
pub mod team;
pub mod user;

pub use employee::{
    Employee, EmployeeCreate, EmployeeDetail, EmployeeTeamDetail, EmployeeUpdate,
    EmployeeWithTeams, TeamRef,
};
pub use log::{LogFilter, LogListResponse, LogUser, LogView, LogWithUser};
pub use organisation::Organisation;
pub use team::{
    AssignRequest, MemberRef, Team, TeamCreate, TeamMemberRow, TeamUpdate, TeamWithMembers,
    UnassignRequest,
};
pub use user::{User, UserWithOrganisation};
