//! CLI configuration loading and management.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Full configuration for the docreg CLI.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DocregConfig {
    /// Deployment-time registry provisioning.
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RegistryConfig {
    /// Principal installed as owner before a replay starts. When unset the
    /// script must run `initialize` itself.
    #[serde(default)]
    pub owner: Option<String>,
    /// Verifier addresses the owner provisions at startup.
    #[serde(default)]
    pub verifiers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "text".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl DocregConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: DocregConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the current config to a TOML file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply command-line overrides on top of file values.
    pub fn apply_overrides(&mut self, log_level: Option<String>, owner: Option<String>) {
        if let Some(level) = log_level {
            self.logging.level = level;
        }
        if let Some(owner) = owner {
            self.registry.owner = Some(owner);
        }
    }

    pub fn json_logs(&self) -> bool {
        self.logging.format.eq_ignore_ascii_case("json")
    }
}
