use serde::{Deserialize, Deserializer};

use crate::error::ApiError;

/// Custom deserializer for comma-separated strings
fn deserialize_comma_separated<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.is_empty() {
        Ok(Vec::new())
    } else {
        Ok(s.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect())
    }
}

/// Application settings with environment variable support
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    // Database
    pub database_url: String,

    // HTTP
    pub listen_addr: String,
    #[serde(deserialize_with = "deserialize_comma_separated")]
    pub cors_allow_origins: Vec<String>,

    // Auth
    pub jwt_secret: String,
    pub token_expiry_hours: i64,

    // Logging
    pub log_level: String,
    pub log_format: String,
}

impl Settings {
    /// Create new settings instance from environment variables and .env file
    pub fn new() -> Result<Self, ApiError> {
        Self::new_with_env_file(true)
    }

    /// Create new settings instance with optional .env file loading
    pub fn new_with_env_file(load_env_file: bool) -> Result<Self, ApiError> {
        if load_env_file {
            dotenvy::dotenv().ok();
        }

        let builder = config::Config::builder()
            .set_default(
                "database_url",
                "postgresql://hr:hr@localhost:5432/hr_backend",
            )?
            .set_default("listen_addr", "0.0.0.0:5000")?
            .set_default(
                "cors_allow_origins",
                "http://localhost:3000,http://127.0.0.1:3000",
            )?
            .set_default("jwt_secret", "")?
            .set_default("token_expiry_hours", 8i64)?
            .set_default("log_level", "INFO")?
            .set_default("log_format", "json")?
            .add_source(config::Environment::default());

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApiError> {
        if self.jwt_secret.is_empty() {
            return Err(ApiError::internal(
                "JWT_SECRET must be set to a non-empty value",
            ));
        }
        if self.token_expiry_hours <= 0 {
            return Err(ApiError::internal(
                "TOKEN_EXPIRY_HOURS must be a positive number of hours",
            ));
        }
        Ok(())
    }
}
