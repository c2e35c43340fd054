//! Configuration loading and management

pub mod logging;

use crate::core::actions::INVOICES_PATH;
use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Environment variable holding the database connection string
pub const DATABASE_URL_ENV: &str = "POSTGRES_URL";
/// Environment variable overriding the listen address
pub const BIND_ADDR_ENV: &str = "BIND_ADDR";

/// Transport security required of database connections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SslMode {
    Disable,
    Prefer,
    #[default]
    Require,
}

/// Database connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string; usually supplied through `POSTGRES_URL`
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub ssl_mode: SslMode,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    30
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            ssl_mode: SslMode::default(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

impl DatabaseConfig {
    /// The connection string, or an error naming the missing setting
    pub fn require_url(&self) -> Result<&str, ConfigError> {
        self.url.as_deref().ok_or_else(|| ConfigError::MissingField {
            field: "database.url".to_string(),
            context: format!("configuration (or set {})", DATABASE_URL_ENV),
        })
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Routes the actions revalidate and redirect to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutesConfig {
    /// Invoice list view
    #[serde(default = "default_invoices_route")]
    pub invoices: String,

    /// Where a successful sign-in lands
    #[serde(default = "default_after_login_route")]
    pub after_login: String,
}

fn default_invoices_route() -> String {
    INVOICES_PATH.to_string()
}

fn default_after_login_route() -> String {
    "/dashboard".to_string()
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            invoices: default_invoices_route(),
            after_login: default_after_login_route(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub routes: RoutesConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.to_string(),
            },
            _ => ConfigError::IoError {
                message: e.to_string(),
            },
        })?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Defaults overridden by the process environment
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `POSTGRES_URL` and `BIND_ADDR` when they are set
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(DATABASE_URL_ENV).filter(|v| !v.is_empty()) {
            self.database.url = Some(url);
        }
        if let Some(bind) = lookup(BIND_ADDR_ENV).filter(|v| !v.is_empty()) {
            self.server.bind = bind;
        }
        self
    }
}
