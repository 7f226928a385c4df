use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use crate::auth::AuthContext;
use crate::error::ApiError;
use crate::models::employee::EmployeeDetail;
use crate::models::{Employee, EmployeeCreate, EmployeeUpdate, EmployeeWithTeams, TeamRef};
use crate::repositories::EmployeeRepository;
use crate::services::audit::{AuditService, LogAction};
use crate::services::changes::{supplied, ChangeSet};
use crate::utils::validation::{validate_email, validate_person_name};

pub struct EmployeeService {
    employee_repo: Arc<dyn EmployeeRepository>,
    audit: Arc<AuditService>,
}

impl EmployeeService {
    pub fn new(employee_repo: Arc<dyn EmployeeRepository>, audit: Arc<AuditService>) -> Self {
        Self {
            employee_repo,
            audit,
        }
    }

    pub async fn list(&self, actor: AuthContext) -> Result<Vec<EmployeeWithTeams>, ApiError> {
        let employees = self.employee_repo.list(actor.org_id).await?;
        let refs = self.employee_repo.team_refs(actor.org_id).await?;

        let mut teams_by_employee: HashMap<i64, Vec<TeamRef>> = HashMap::new();
        for r in refs {
            teams_by_employee
                .entry(r.employee_id)
                .or_default()
                .push(TeamRef {
                    id: r.team_id,
                    name: r.team_name,
                });
        }

        Ok(employees
            .into_iter()
            .map(|employee| {
                let teams = teams_by_employee.remove(&employee.id).unwrap_or_default();
                EmployeeWithTeams { employee, teams }
            })
            .collect())
    }

    pub async fn get(&self, actor: AuthContext, id: i64) -> Result<EmployeeDetail, ApiError> {
        let employee = self
            .employee_repo
            .find_by_id(actor.org_id, id)
            .await?
            .ok_or_else(|| ApiError::not_found("Employee not found"))?;

        let teams = self
            .employee_repo
            .teams_for_employee(actor.org_id, id)
            .await?;

        Ok(EmployeeDetail { employee, teams })
    }

    pub async fn create(
        &self,
        actor: AuthContext,
        request: EmployeeCreate,
    ) -> Result<Employee, ApiError> {
        let first_name = supplied(&request.first_name)
            .ok_or_else(|| ApiError::validation("First name, last name, and email are required"))?;
        let last_name = supplied(&request.last_name)
            .ok_or_else(|| ApiError::validation("First name, last name, and email are required"))?;
        let email = supplied(&request.email)
            .ok_or_else(|| ApiError::validation("First name, last name, and email are required"))?;

        validate_person_name("First name", first_name)?;
        validate_person_name("Last name", last_name)?;
        validate_email(email)?;

        let employee = self
            .employee_repo
            .create(actor.org_id, first_name, last_name, email)
            .await?;

        self.audit
            .record(
                actor.org_id,
                actor.user_id,
                LogAction::EmployeeCreated,
                json!({
                    "employee_id": employee.id,
                    "first_name": employee.first_name,
                    "last_name": employee.last_name,
                    "email": employee.email,
                }),
            )
            .await;

        Ok(employee)
    }

    pub async fn update(
        &self,
        actor: AuthContext,
        id: i64,
        request: EmployeeUpdate,
    ) -> Result<Employee, ApiError> {
        if let Some(first_name) = supplied(&request.first_name) {
            validate_person_name("First name", first_name)?;
        }
        if let Some(last_name) = supplied(&request.last_name) {
            validate_person_name("Last name", last_name)?;
        }
        if let Some(email) = supplied(&request.email) {
            validate_email(email)?;
        }

        let current = self
            .employee_repo
            .find_by_id(actor.org_id, id)
            .await?
            .ok_or_else(|| ApiError::not_found("Employee not found"))?;

        let mut changes = ChangeSet::new();
        let first_name = changes.apply(
            "first_name",
            &current.first_name,
            supplied(&request.first_name),
        );
        let last_name = changes.apply(
            "last_name",
            &current.last_name,
            supplied(&request.last_name),
        );
        let email = changes.apply("email", &current.email, supplied(&request.email));

        let employee = self
            .employee_repo
            .update(actor.org_id, id, &first_name, &last_name, &email)
            .await?;

        self.audit
            .record(
                actor.org_id,
                actor.user_id,
                LogAction::EmployeeUpdated,
                json!({
                    "employee_id": employee.id,
                    "changes": changes.into_value(),
                }),
            )
            .await;

        Ok(employee)
    }

    pub async fn delete(&self, actor: AuthContext, id: i64) -> Result<(), ApiError> {
        // Snapshot before the delete; the row is gone afterwards and the
        // audit entry must outlive it.
        let employee = self
            .employee_repo
            .find_by_id(actor.org_id, id)
            .await?
            .ok_or_else(|| ApiError::not_found("Employee not found"))?;

        let snapshot = json!({
            "id": employee.id,
            "first_name": employee.first_name,
            "last_name": employee.last_name,
            "email": employee.email,
        });

        let deleted = self.employee_repo.delete(actor.org_id, id).await?;
        if deleted == 0 {
            return Err(ApiError::not_found("Employee not found"));
        }

        self.audit
            .record(
                actor.org_id,
                actor.user_id,
                LogAction::EmployeeDeleted,
                snapshot,
            )
            .await;

        Ok(())
    }
}
