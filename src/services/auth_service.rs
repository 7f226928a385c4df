use std::sync::Arc;

use serde_json::json;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{AuthContext, TokenService};
use crate::error::ApiError;
use crate::models::{Organisation, User, UserWithOrganisation};
use crate::repositories::{OrganisationRepository, UserRepository};
use crate::services::audit::{AuditService, LogAction};
use crate::utils::validation::{validate_email, validate_org_name, validate_password};

pub struct RegistrationResult {
    pub token: String,
    pub user: User,
    pub organisation: Organisation,
}

pub struct LoginResult {
    pub token: String,
    pub user: UserWithOrganisation,
}

pub struct AuthService {
    org_repo: Arc<dyn OrganisationRepository>,
    user_repo: Arc<dyn UserRepository>,
    audit: Arc<AuditService>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(
        org_repo: Arc<dyn OrganisationRepository>,
        user_repo: Arc<dyn UserRepository>,
        audit: Arc<AuditService>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            org_repo,
            user_repo,
            audit,
            tokens,
        }
    }

    /// Register a new organisation with its first user.
    ///
    /// The organisation and user rows are created in one transaction; the
    /// unique index on users.email closes the race between the pre-check
    /// and the insert.
    pub async fn register(
        &self,
        org_name: &str,
        email: &str,
        password: &str,
    ) -> Result<RegistrationResult, ApiError> {
        validate_org_name(org_name)?;
        validate_email(email)?;
        validate_password(password)?;

        if self.user_repo.find_by_email(email).await?.is_some() {
            return Err(ApiError::Duplicate(
                "A user with this email already exists".to_string(),
            ));
        }

        let password_hash = hash_password(password)?;

        let (organisation, user) = self
            .org_repo
            .create_with_owner(org_name, email, &password_hash)
            .await?;

        let token = self.tokens.issue(user.id, organisation.id)?;

        self.audit
            .record(
                organisation.id,
                user.id,
                LogAction::OrganisationRegistered,
                json!({
                    "organisation_name": organisation.name,
                    "email": user.email,
                }),
            )
            .await;

        Ok(RegistrationResult {
            token,
            user,
            organisation,
        })
    }

    /// Authenticate a user by email and password.
    ///
    /// Unknown email and wrong password return the identical error so the
    /// response does not reveal which accounts exist.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, ApiError> {
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::validation("Email and password are required"));
        }

        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| ApiError::authentication("Invalid email or password"))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(ApiError::authentication("Invalid email or password"));
        }

        let token = self.tokens.issue(user.id, user.organisation_id)?;

        self.audit
            .record(
                user.organisation_id,
                user.id,
                LogAction::UserLogin,
                json!({ "email": user.email }),
            )
            .await;

        Ok(LoginResult { token, user })
    }

    /// Record a logout for the acting user. No server-side session state
    /// exists to invalidate; the audit entry is the operation.
    pub async fn logout(&self, actor: AuthContext) {
        self.audit
            .record(actor.org_id, actor.user_id, LogAction::UserLogout, json!({}))
            .await;
    }
}
