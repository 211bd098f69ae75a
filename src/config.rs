use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::messages::Locale;

/// A validation error in the configuration
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]: {}", self.field, self.message)
    }
}

/// Which identity backend the session store is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Identity database embedded in local storage, no server.
    #[default]
    Mock,
    /// Token-issuing HTTP service.
    Remote,
}

impl BackendKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mock" | "local" => Some(Self::Mock),
            "remote" | "http" => Some(Self::Remote),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Remote => "remote",
        }
    }
}

/// Settings for the remote backend and the feed client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendKind,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub locale: Locale,
    /// Directory for the persisted key-value storage. Defaults to
    /// `~/.linkus/storage`.
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,
    /// Path of the JSONL audit log. Defaults to `~/.linkus/audit.jsonl`.
    #[serde(default)]
    pub audit_log: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default paths
    /// Priority: project (.linkus/config.toml) > user (~/.linkus/config.toml)
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".linkus").join("config.toml");
            if user_config.exists() {
                let user = Self::load_from(&user_config)?;
                config.merge(user);
            }
        }

        let project_config = Path::new(".linkus").join("config.toml");
        if project_config.exists() {
            let project = Self::load_from(&project_config)?;
            config.merge(project);
        }

        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes priority).
    /// Scalar sections are taken wholesale from the other config; the
    /// optional paths only when set.
    pub fn merge(&mut self, other: Config) {
        self.backend = other.backend;
        self.remote = other.remote;
        self.locale = other.locale;
        if other.storage_dir.is_some() {
            self.storage_dir = other.storage_dir;
        }
        if other.audit_log.is_some() {
            self.audit_log = other.audit_log;
        }
    }

    /// Resolved storage directory.
    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".linkus")
                .join("storage")
        })
    }

    /// Resolved audit log path.
    pub fn audit_log(&self) -> PathBuf {
        self.audit_log.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".linkus")
                .join("audit.jsonl")
        })
    }

    /// Validate configuration and return any errors found
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.backend == BackendKind::Remote {
            if self.remote.base_url.is_empty() {
                errors.push(ValidationError {
                    field: "remote.base_url".to_string(),
                    message: "Required for the remote backend".to_string(),
                });
            } else if !self.remote.base_url.starts_with("http://")
                && !self.remote.base_url.starts_with("https://")
            {
                errors.push(ValidationError {
                    field: "remote.base_url".to_string(),
                    message: format!("Not an http(s) URL: '{}'", self.remote.base_url),
                });
            }
        }

        if self.remote.timeout_ms == 0 {
            errors.push(ValidationError {
                field: "remote.timeout_ms".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
