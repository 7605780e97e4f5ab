//! Gateway configuration.

use thiserror::Error;

use common::{DatabaseConfig, Environment, JwtConfig, ServiceConfig, StatisticsConfig};
use domain::MIN_JWT_SECRET_LENGTH;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set")]
    MissingJwtSecret,

    #[error("JWT_SECRET must be at least {0} characters")]
    WeakJwtSecret(usize),

    #[error("JWT_TTL_MINUTES must be positive")]
    InvalidTokenTtl,
}

/// Everything the server needs, loaded from the environment.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub environment: Environment,
    pub server: ServiceConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub statistics: StatisticsConfig,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            environment: Environment::from_env(),
            server: ServiceConfig::from_env(),
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            statistics: StatisticsConfig::from_env(),
        }
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::MissingJwtSecret);
        }
        if self.jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::WeakJwtSecret(MIN_JWT_SECRET_LENGTH));
        }
        if self.jwt.ttl_minutes <= 0 {
            return Err(ConfigError::InvalidTokenTtl);
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Local,
            server: ServiceConfig::default(),
            database: DatabaseConfig::default(),
            jwt: JwtConfig::default(),
            statistics: StatisticsConfig::default(),
        }
    }
}
