use crate::error::Result;
use crate::paths;
use crate::types::ReportingPeriod;
use crate::upload::ACCEPTED_EXTENSIONS;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_API_URL: &str = "http://localhost:8001/api";

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ConsoleConfig
// ---------------------------------------------------------------------------

/// Console settings stored in `.carebuddy/config.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Base URL of the CareBuddy backend, including the `/api` prefix.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub default_period: ReportingPeriod,
    /// Extensions the console expects for training documents. Others are
    /// uploaded anyway but logged.
    #[serde(default = "default_accepted_extensions")]
    pub accepted_extensions: Vec<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_accepted_extensions() -> Vec<String> {
    ACCEPTED_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            default_period: ReportingPeriod::default(),
            accepted_extensions: default_accepted_extensions(),
        }
    }
}

impl ConsoleConfig {
    /// Load the config under `root`, falling back to defaults when the file
    /// does not exist.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: ConsoleConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// The base URL without a trailing slash.
    pub fn api_base(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        let url = self.api_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("api_url '{}' must start with http:// or https://", self.api_url),
            });
        }

        if self.accepted_extensions.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "accepted_extensions is empty; every upload will be flagged".to_string(),
            });
        }

        for ext in &self.accepted_extensions {
            if ext.trim_start_matches('.').is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: "blank entry in accepted_extensions".to_string(),
                });
            }
        }

        warnings
    }
}
