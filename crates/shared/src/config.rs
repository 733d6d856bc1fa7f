//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Runtime environment settings.
    #[serde(default)]
    pub app: AppSettings,
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Settlement calculation configuration.
    #[serde(default)]
    pub settlement: SettlementConfig,
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development: internal error detail is returned to clients.
    #[default]
    Development,
    /// Production: internal error detail is suppressed.
    Production,
}

/// Runtime environment settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppSettings {
    /// Current environment.
    #[serde(default)]
    pub environment: Environment,
}

impl AppSettings {
    /// Returns true when internal error details may be exposed to clients.
    #[must_use]
    pub fn expose_error_details(&self) -> bool {
        self.environment == Environment::Development
    }
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration as read from config sources.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    86400 // 1 day, the mobile client has no refresh flow
}

/// Settlement calculation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementConfig {
    /// Flat transport charge deducted from every settlement.
    #[serde(default = "default_transport_charge")]
    pub transport_charge: Decimal,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            transport_charge: default_transport_charge(),
        }
    }
}

fn default_transport_charge() -> Decimal {
    Decimal::ONE_HUNDRED
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TEALEAF").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test-nonexistent")),
                ("TEALEAF__DATABASE__URL", Some("postgres://localhost/tealeaf")),
                ("TEALEAF__JWT__SECRET", Some("secret")),
                ("TEALEAF__SERVER__PORT", Some("9090")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/tealeaf");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.jwt.secret, "secret");
                assert_eq!(config.jwt.access_token_expiry_secs, 86400);
                assert_eq!(config.settlement.transport_charge, dec!(100));
                assert!(config.app.expose_error_details());
            },
        );
    }

    #[test]
    fn test_production_and_transport_charge_override() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test-nonexistent")),
                ("TEALEAF__DATABASE__URL", Some("postgres://localhost/tealeaf")),
                ("TEALEAF__JWT__SECRET", Some("secret")),
                ("TEALEAF__APP__ENVIRONMENT", Some("production")),
                ("TEALEAF__SETTLEMENT__TRANSPORT_CHARGE", Some("150")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.app.environment, Environment::Production);
                assert!(!config.app.expose_error_details());
                assert_eq!(config.settlement.transport_charge, dec!(150));
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test-nonexistent")),
                ("TEALEAF__DATABASE__URL", None::<&str>),
                ("TEALEAF__JWT__SECRET", Some("secret")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
