pub mod employee_repo;
pub mod log_repo;
pub mod organisation_repo;
pub mod team_repo;
pub mod user_repo;

pub use employee_repo::{EmployeeRepository, SqlxEmployeeRepository};
pub use log_repo::{LogRepository, SqlxLogRepository};
pub use organisation_repo::{OrganisationRepository, SqlxOrganisationRepository};
pub use team_repo::{SqlxTeamRepository, TeamRepository};
pub use user_repo::{SqlxUserRepository, UserRepository};
