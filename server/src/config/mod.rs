use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{LibraryServerError, Result};

/// How the submitted login password is compared with the stored credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordScheme {
    /// Stored value is compared verbatim with the submitted password.
    #[default]
    Plain,
    /// Stored value is the lowercase hex SHA-256 digest of the password.
    Sha256,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub library_file: PathBuf,
    pub admin_file: PathBuf,
    pub pages_dir: PathBuf,
    pub session_expiry_hours: u64,
    pub max_sessions: usize,
    pub session_sweep_secs: u64,
    pub log_capacity: usize,
    pub password_scheme: PasswordScheme,
    pub protect_library_writes: bool,
    /// Failed logins allowed per peer address per window; 0 disables.
    pub login_rate_limit: usize,
    pub login_rate_window_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            library_file: PathBuf::from("library_data.json"),
            admin_file: PathBuf::from("admin.json"),
            pages_dir: PathBuf::from("."),
            session_expiry_hours: 24,
            max_sessions: 1024,
            session_sweep_secs: 60,
            log_capacity: 1000,
            password_scheme: PasswordScheme::Plain,
            protect_library_writes: false,
            login_rate_limit: 10,
            login_rate_window_secs: 60,
        }
    }
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            LibraryServerError::Config(format!("Failed to read config file: {}", e))
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            LibraryServerError::Config(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Applies `SERVER_HOST`, `SERVER_PORT`, `SESSION_EXPIRY_HOURS`,
    /// `LIBRARY_FILE`, `ADMIN_FILE` and `PAGES_DIR` on top of the file values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.port = port;
        }
        if let Some(hours) = std::env::var("SESSION_EXPIRY_HOURS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.session_expiry_hours = hours;
        }
        if let Ok(path) = std::env::var("LIBRARY_FILE") {
            self.library_file = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("ADMIN_FILE") {
            self.admin_file = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("PAGES_DIR") {
            self.pages_dir = PathBuf::from(path);
        }
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_expiry_hours.saturating_mul(3600))
    }

    pub fn session_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session_sweep_secs.max(1))
    }

    pub fn login_rate_window(&self) -> Duration {
        Duration::from_secs(self.login_rate_window_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config_uses_defaults() {
        let toml_content = r#"
port = 8080
library_file = "data/links.json"
password_scheme = "sha256"
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.library_file, PathBuf::from("data/links.json"));
        assert_eq!(config.password_scheme, PasswordScheme::Sha256);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.session_expiry_hours, 24);
        assert_eq!(config.log_capacity, 1000);
        assert!(!config.protect_library_writes);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.password_scheme, PasswordScheme::Plain);
        assert_eq!(config.session_ttl(), Duration::from_secs(24 * 3600));
    }

    #[test]
    fn test_unknown_scheme_is_rejected() {
        let result = toml::from_str::<AppConfig>(r#"password_scheme = "md5""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_huge_expiry_saturates() {
        let config = AppConfig {
            session_expiry_hours: u64::MAX,
            ..AppConfig::default()
        };
        assert_eq!(config.session_ttl(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_sweep_interval_never_zero() {
        let config = AppConfig {
            session_sweep_secs: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.session_sweep_interval(), Duration::from_secs(1));
    }
}
