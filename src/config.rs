//! Configuration module
//!
//! Application configuration loaded from a TOML file
//! (~/.config/carshare/config.toml by default, override with
//! the CARSHARE_CONFIG environment variable).

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
}

/// Database settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SeaORM connection URL
    pub url: String,
}

/// Authentication settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Tracing filter directive, e.g. "info" or "carshare=debug"
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://carshare.db?mode=rwc".to_string(),
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_hours: 24,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseSettings::default(),
            security: SecurityConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file. Missing sections fall back
    /// to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        toml::from_str(&raw).map_err(ConfigError::Parse)
    }
}

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Default config location: ~/.config/carshare/config.toml
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("carshare")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9090

            [database]
            url = "sqlite://test.db?mode=rwc"

            [security]
            jwt_secret = "s3cret"
            jwt_expiration_hours = 12

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.database.url, "sqlite://test.db?mode=rwc");
        assert_eq!(cfg.security.jwt_secret, "s3cret");
        assert_eq!(cfg.security.jwt_expiration_hours, 12);
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn missing_sections_use_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            port = 3000
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.security.jwt_expiration_hours, 24);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn empty_config_is_all_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert!(cfg.database.url.starts_with("sqlite://"));
    }
}
