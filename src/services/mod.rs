pub mod audit;
pub mod auth_service;
pub mod changes;
pub mod employee_service;
pub mod team_service;

pub use audit::{AuditService, LogAction};
pub use auth_service::AuthService;
pub use changes::ChangeSet;
pub use employee_service::EmployeeService;
pub use team_service::TeamService;
