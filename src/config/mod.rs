//! Application configuration loaded from environment variables.

pub mod colors;

use std::env;
use std::path::PathBuf;

pub use colors::ColorTable;

/// Errors raised while assembling the startup configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable {name}: {source}")]
    MissingVar {
        name: &'static str,
        source: env::VarError,
    },

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Failed to read color table {path}: {source}")]
    ColorsIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed color table {path}: {source}")]
    ColorsFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Deployment mode. Development reloads templates before every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Development,
    Production,
}

impl RunMode {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Development),
            "prod" | "production" | "" => Ok(Self::Production),
            _ => Err(ConfigError::InvalidValue {
                name: "APP_ENV",
                value: value.to_string(),
            }),
        }
    }
}

/// Optional TLS material; both paths must be set to serve over HTTPS.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub run_mode: RunMode,
    pub host: String,
    pub port: u16,
    /// Prefix every route is mounted under. Empty, or `/`-led without a trailing `/`.
    pub base_path: String,
    pub templates_dir: PathBuf,
    pub colors_path: PathBuf,
    pub error_redirect_target: String,
    pub tls: Option<TlsConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_path = normalize_base_path(&env::var("BASE_PATH").unwrap_or_default());
        let error_redirect_target = env::var("ERROR_REDIRECT_TARGET")
            .unwrap_or_else(|_| format!("{base_path}/login"));

        let tls = match (env::var("TLS_CERT_PATH"), env::var("TLS_KEY_PATH")) {
            (Ok(cert), Ok(key)) => Some(TlsConfig {
                cert_path: cert.into(),
                key_path: key.into(),
            }),
            _ => None,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            jwt_secret: required("JWT_SECRET")?,
            run_mode: RunMode::parse(&env::var("APP_ENV").unwrap_or_default())?,
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BACKEND_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            base_path,
            templates_dir: env::var("TEMPLATES_DIR")
                .unwrap_or_else(|_| "templates".to_string())
                .into(),
            colors_path: env::var("COLORS_PATH")
                .unwrap_or_else(|_| "data/colors.json".to_string())
                .into(),
            error_redirect_target,
            tls,
        })
    }

    pub fn is_dev(&self) -> bool {
        self.run_mode == RunMode::Development
    }

    /// Path attribute for cookies issued by the pages.
    pub fn cookie_path(&self) -> String {
        if self.base_path.is_empty() {
            "/".to_string()
        } else {
            self.base_path.clone()
        }
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|source| ConfigError::MissingVar { name, source })
}

/// `"app/"` -> `"/app"`, `"/"` -> `""`.
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_path_normalization() {
        assert_eq!(normalize_base_path(""), "");
        assert_eq!(normalize_base_path("/"), "");
        assert_eq!(normalize_base_path("app"), "/app");
        assert_eq!(normalize_base_path("/app/"), "/app");
        assert_eq!(normalize_base_path(" /team/stats/ "), "/team/stats");
    }

    #[test]
    fn run_mode_parsing() {
        assert_eq!(RunMode::parse("dev").unwrap(), RunMode::Development);
        assert_eq!(RunMode::parse("Development").unwrap(), RunMode::Development);
        assert_eq!(RunMode::parse("").unwrap(), RunMode::Production);
        assert_eq!(RunMode::parse("prod").unwrap(), RunMode::Production);
        assert!(RunMode::parse("staging").is_err());
    }
}
