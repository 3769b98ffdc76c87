use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub clients: ClientsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub enable_query_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Base64-encoded HMAC secret shared with the token-minting service.
    pub jwt_secret: String,
    /// Token lifetime in milliseconds.
    pub jwt_expiration_ms: u64,
    pub enable_cors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientsConfig {
    pub user_service_url: String,
    pub survey_service_url: String,
    /// Deadline for a single existence probe. On expiry the probe reports
    /// Unknown and the operation aborts.
    pub probe_timeout_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_ENABLE_QUERY_LOGGING") {
            self.database.enable_query_logging = v.parse().unwrap_or(self.database.enable_query_logging);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRATION") {
            self.security.jwt_expiration_ms = v.parse().unwrap_or(self.security.jwt_expiration_ms);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }

        // Downstream service overrides
        if let Ok(v) = env::var("USER_SERVICE_URL") {
            self.clients.user_service_url = v;
        }
        if let Ok(v) = env::var("SURVEY_SERVICE_URL") {
            self.clients.survey_service_url = v;
        }
        if let Ok(v) = env::var("CLIENT_PROBE_TIMEOUT_MS") {
            self.clients.probe_timeout_ms = v.parse().unwrap_or(self.clients.probe_timeout_ms);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
                enable_query_logging: true,
            },
            security: SecurityConfig {
                // Development-only key; every deployed environment sets JWT_SECRET
                jwt_secret: "ZGV2LW9ubHktc2VjcmV0LWtleS1jaGFuZ2UtbWU=".to_string(),
                jwt_expiration_ms: 24 * 60 * 60 * 1000,
                enable_cors: true,
            },
            clients: ClientsConfig {
                user_service_url: "http://localhost:8081".to_string(),
                survey_service_url: "http://localhost:8082".to_string(),
                probe_timeout_ms: 5_000,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
                enable_query_logging: true,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiration_ms: 4 * 60 * 60 * 1000,
                enable_cors: true,
            },
            clients: ClientsConfig {
                user_service_url: "http://user-service:8080".to_string(),
                survey_service_url: "http://survey-service:8080".to_string(),
                probe_timeout_ms: 3_000,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
                enable_query_logging: false,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiration_ms: 60 * 60 * 1000,
                enable_cors: false,
            },
            clients: ClientsConfig {
                user_service_url: "http://user-service:8080".to_string(),
                survey_service_url: "http://survey-service:8080".to_string(),
                probe_timeout_ms: 2_000,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(!config.security.jwt_secret.is_empty());
        assert_eq!(config.clients.probe_timeout_ms, 5_000);
        assert!(config.security.enable_cors);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.security.jwt_secret.is_empty());
        assert!(!config.database.enable_query_logging);
        assert_eq!(config.security.jwt_expiration_ms, 60 * 60 * 1000);
    }
}
