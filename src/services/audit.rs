use std::fmt;
use std::sync::Arc;

use crate::auth::AuthContext;
use crate::error::ApiError;
use crate::models::{LogFilter, LogListResponse, LogView};
use crate::repositories::LogRepository;

/// Enumerated audit action tags, serialized as snake_case strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogAction {
    OrganisationRegistered,
    UserLogin,
    UserLogout,
    EmployeeCreated,
    EmployeeUpdated,
    EmployeeDeleted,
    TeamCreated,
    TeamUpdated,
    TeamDeleted,
    EmployeeAssignedToTeam,
    EmployeeUnassignedFromTeam,
}

impl LogAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogAction::OrganisationRegistered => "organisation_registered",
            LogAction::UserLogin => "user_login",
            LogAction::UserLogout => "user_logout",
            LogAction::EmployeeCreated => "employee_created",
            LogAction::EmployeeUpdated => "employee_updated",
            LogAction::EmployeeDeleted => "employee_deleted",
            LogAction::TeamCreated => "team_created",
            LogAction::TeamUpdated => "team_updated",
            LogAction::TeamDeleted => "team_deleted",
            LogAction::EmployeeAssignedToTeam => "employee_assigned_to_team",
            LogAction::EmployeeUnassignedFromTeam => "employee_unassigned_from_team",
        }
    }
}

impl fmt::Display for LogAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Appends immutable audit rows and serves the scoped audit read path.
pub struct AuditService {
    log_repo: Arc<dyn LogRepository>,
}

impl AuditService {
    pub fn new(log_repo: Arc<dyn LogRepository>) -> Self {
        Self { log_repo }
    }

    /// Record one audit entry for a committed mutation.
    ///
    /// Best-effort: the primary mutation has already committed, so a failed
    /// audit write is logged server-side and does not fail the request.
    pub async fn record(
        &self,
        org_id: i64,
        user_id: i64,
        action: LogAction,
        meta: serde_json::Value,
    ) {
        if let Err(e) = self
            .log_repo
            .insert(org_id, user_id, action.as_str(), meta)
            .await
        {
            tracing::error!(
                error = %e,
                organisation_id = org_id,
                user_id = user_id,
                action = %action,
                "failed to write audit log entry"
            );
        }
    }

    pub async fn query(
        &self,
        actor: AuthContext,
        mut filter: LogFilter,
    ) -> Result<LogListResponse, ApiError> {
        // An empty action parameter means "no action filter".
        filter.action = filter.action.filter(|a| !a.is_empty());

        let limit = filter.limit.clamp(1, 1000);
        let offset = filter.offset.max(0);

        let (rows, total) = self.log_repo.query(actor.org_id, &filter).await?;
        let logs: Vec<LogView> = rows.into_iter().map(LogView::from).collect();

        Ok(LogListResponse {
            total,
            count: logs.len(),
            limit,
            offset,
            logs,
        })
    }
}
