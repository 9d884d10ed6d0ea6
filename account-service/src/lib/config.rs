use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    #[serde(default)]
    pub issuer: Option<String>,
}

/// Site-wide password hashing settings.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    /// Salt shared by every account; changing it invalidates all stored hashes
    pub salt: String,
}

fn default_max_connections() -> u32 {
    5
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, PASSWORD__SALT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::default().separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(source: &str) -> Result<Config, ConfigError> {
        ConfigBuilder::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_full_configuration() {
        let config = from_toml(
            r#"
            [database]
            url = "postgresql://localhost/accounts"
            max_connections = 12

            [server]
            http_port = 9000

            [jwt]
            secret = "secret"
            expiration_hours = 2
            issuer = "accounts"

            [password]
            salt = "site-salt"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.max_connections, 12);
        assert_eq!(config.server.http_port, 9000);
        assert_eq!(config.jwt.expiration_hours, 2);
        assert_eq!(config.jwt.issuer.as_deref(), Some("accounts"));
        assert_eq!(config.password.salt, "site-salt");
    }

    #[test]
    fn test_optional_fields_fall_back() {
        let config = from_toml(
            r#"
            [database]
            url = "postgresql://localhost/accounts"

            [server]
            http_port = 8080

            [jwt]
            secret = "secret"
            expiration_hours = 24

            [password]
            salt = "site-salt"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.max_connections, 5);
        assert!(config.jwt.issuer.is_none());
    }

    #[test]
    fn test_missing_salt_is_rejected() {
        let result = from_toml(
            r#"
            [database]
            url = "postgresql://localhost/accounts"

            [server]
            http_port = 8080

            [jwt]
            secret = "secret"
            expiration_hours = 24
            "#,
        );

        assert!(result.is_err());
    }
}
