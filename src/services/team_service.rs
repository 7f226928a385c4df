use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use crate::auth::AuthContext;
use crate::error::ApiError;
use crate::models::{MemberRef, Team, TeamCreate, TeamUpdate, TeamWithMembers};
use crate::repositories::{EmployeeRepository, TeamRepository};
use crate::services::audit::{AuditService, LogAction};
use crate::services::changes::{supplied, ChangeSet};
use crate::utils::validation::validate_team_name;

pub struct TeamService {
    team_repo: Arc<dyn TeamRepository>,
    employee_repo: Arc<dyn EmployeeRepository>,
    audit: Arc<AuditService>,
}

impl TeamService {
    pub fn new(
        team_repo: Arc<dyn TeamRepository>,
        employee_repo: Arc<dyn EmployeeRepository>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self {
            team_repo,
            employee_repo,
            audit,
        }
    }

    pub async fn list(&self, actor: AuthContext) -> Result<Vec<TeamWithMembers>, ApiError> {
        let teams = self.team_repo.list(actor.org_id).await?;
        let members = self.team_repo.members_for_org(actor.org_id).await?;

        let mut members_by_team: HashMap<i64, Vec<MemberRef>> = HashMap::new();
        for row in members {
            members_by_team
                .entry(row.team_id)
                .or_default()
                .push(row.into());
        }

        Ok(teams
            .into_iter()
            .map(|team| {
                let employees = members_by_team.remove(&team.id).unwrap_or_default();
                let employee_count = employees.len();
                TeamWithMembers {
                    team,
                    employees,
                    employee_count,
                }
            })
            .collect())
    }

    pub async fn get(&self, actor: AuthContext, id: i64) -> Result<TeamWithMembers, ApiError> {
        let team = self
            .team_repo
            .find_by_id(actor.org_id, id)
            .await?
            .ok_or_else(|| ApiError::not_found("Team not found"))?;

        let employees: Vec<MemberRef> = self
            .team_repo
            .members_for_team(actor.org_id, id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        let employee_count = employees.len();

        Ok(TeamWithMembers {
            team,
            employees,
            employee_count,
        })
    }

    pub async fn create(&self, actor: AuthContext, request: TeamCreate) -> Result<Team, ApiError> {
        let name =
            supplied(&request.name).ok_or_else(|| ApiError::validation("Team name is required"))?;
        validate_team_name(name)?;

        let description = request.description.as_deref().filter(|d| !d.is_empty());

        let team = self
            .team_repo
            .create(actor.org_id, name, description)
            .await?;

        self.audit
            .record(
                actor.org_id,
                actor.user_id,
                LogAction::TeamCreated,
                json!({
                    "team_id": team.id,
                    "name": team.name,
                }),
            )
            .await;

        Ok(team)
    }

    pub async fn update(
        &self,
        actor: AuthContext,
        id: i64,
        request: TeamUpdate,
    ) -> Result<Team, ApiError> {
        if let Some(name) = supplied(&request.name) {
            validate_team_name(name)?;
        }

        let current = self
            .team_repo
            .find_by_id(actor.org_id, id)
            .await?
            .ok_or_else(|| ApiError::not_found("Team not found"))?;

        let mut changes = ChangeSet::new();
        let name = changes.apply("name", &current.name, supplied(&request.name));
        let description = changes.apply_optional(
            "description",
            current.description.as_deref(),
            request
                .description
                .as_ref()
                .map(|inner| inner.as_deref()),
        );

        let team = self
            .team_repo
            .update(actor.org_id, id, &name, description.as_deref())
            .await?;

        self.audit
            .record(
                actor.org_id,
                actor.user_id,
                LogAction::TeamUpdated,
                json!({
                    "team_id": team.id,
                    "changes": changes.into_value(),
                }),
            )
            .await;

        Ok(team)
    }

    pub async fn delete(&self, actor: AuthContext, id: i64) -> Result<(), ApiError> {
        let team = self
            .team_repo
            .find_by_id(actor.org_id, id)
            .await?
            .ok_or_else(|| ApiError::not_found("Team not found"))?;

        let snapshot = json!({
            "id": team.id,
            "name": team.name,
            "description": team.description,
        });

        let deleted = self.team_repo.delete(actor.org_id, id).await?;
        if deleted == 0 {
            return Err(ApiError::not_found("Team not found"));
        }

        self.audit
            .record(actor.org_id, actor.user_id, LogAction::TeamDeleted, snapshot)
            .await;

        Ok(())
    }

    /// Assign a batch of employees to a team.
    ///
    /// The batch is all-or-nothing at the validation stage: if any id fails
    /// to resolve inside the tenant the whole request is rejected. Already
    /// assigned pairs are silently skipped; the returned count covers only
    /// newly created assignments, each of which gets its own audit entry.
    pub async fn assign_employees(
        &self,
        actor: AuthContext,
        team_id: i64,
        employee_ids: &[i64],
    ) -> Result<usize, ApiError> {
        if employee_ids.is_empty() {
            return Err(ApiError::validation(
                "Either employeeId or employeeIds array is required",
            ));
        }

        let team = self
            .team_repo
            .find_by_id(actor.org_id, team_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Team not found"))?;

        let employees = self
            .employee_repo
            .find_many(actor.org_id, employee_ids)
            .await?;

        if employees.len() != employee_ids.len() {
            return Err(ApiError::validation(
                "One or more employees not found or do not belong to your organisation",
            ));
        }

        let mut assigned = 0;
        for employee in &employees {
            let inserted = self.team_repo.assign(employee.id, team.id).await?;
            if !inserted {
                continue;
            }
            assigned += 1;

            self.audit
                .record(
                    actor.org_id,
                    actor.user_id,
                    LogAction::EmployeeAssignedToTeam,
                    json!({
                        "employee_id": employee.id,
                        "employee_name": format!("{} {}", employee.first_name, employee.last_name),
                        "team_id": team.id,
                        "team_name": team.name,
                    }),
                )
                .await;
        }

        Ok(assigned)
    }

    pub async fn unassign_employee(
        &self,
        actor: AuthContext,
        team_id: i64,
        employee_id: i64,
    ) -> Result<(), ApiError> {
        let team = self
            .team_repo
            .find_by_id(actor.org_id, team_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Team not found"))?;

        let employee = self
            .employee_repo
            .find_by_id(actor.org_id, employee_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Employee not found"))?;

        let deleted = self.team_repo.unassign(employee_id, team_id).await?;
        if deleted == 0 {
            return Err(ApiError::not_found(
                "Employee is not assigned to this team",
            ));
        }

        self.audit
            .record(
                actor.org_id,
                actor.user_id,
                LogAction::EmployeeUnassignedFromTeam,
                json!({
                    "employee_id": employee.id,
                    "employee_name": format!("{} {}", employee.first_name, employee.last_name),
                    "team_id": team.id,
                    "team_name": team.name,
                }),
            )
            .await;

        Ok(())
    }
}
