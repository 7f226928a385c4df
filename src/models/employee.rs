use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub organisation_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeCreate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Partial update; absent and empty fields leave the current value in place.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Team reference embedded in employee list responses.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TeamRef {
    pub id: i64,
    pub name: String,
}

/// Team membership detail embedded in the employee detail response.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EmployeeTeamDetail {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeWithTeams {
    #[serde(flatten)]
    pub employee: Employee,
    pub teams: Vec<TeamRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub employee: Employee,
    pub teams: Vec<EmployeeTeamDetail>,
}
