pub mod auth_handlers;
pub mod employee_handlers;
pub mod health_handlers;
pub mod log_handlers;
pub mod team_handlers;

pub use health_handlers::{health_check, readiness_check};
