//! Global ritmo configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

static DEFAULT_API_URL: &str = "http://127.0.0.1:4300/api";

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn is_default_api_url(url: &String) -> bool {
    url == DEFAULT_API_URL
}

/// Global configuration at ~/.config/ritmo/config.toml
#[derive(Serialize, Deserialize, Clone)]
pub struct RitmoConfig {
    #[serde(default = "default_api_url", skip_serializing_if = "is_default_api_url")]
    pub api_url: String,

    pub user_id: String,
}

impl RitmoConfig {
    pub fn config_path() -> EngineResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| EngineError::Config("Could not determine config directory".into()))?
            .join("ritmo");

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> EngineResult<Self> {
        let path = Self::config_path()?;
        let content = std::fs::read_to_string(&path).map_err(|e| {
            EngineError::Config(format!("Could not read {}: {e}", path.display()))
        })?;

        toml::from_str(&content).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Save the current config to ~/.config/ritmo/config.toml
    pub fn save(&self) -> EngineResult<()> {
        let config_path = Self::config_path()?;

        let content =
            toml::to_string_pretty(self).map_err(|e| EngineError::Config(e.to_string()))?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                EngineError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(&config_path, content)
            .map_err(|e| EngineError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a starter config file with the options commented out.
    pub fn create_default_config(path: &std::path::Path) -> EngineResult<()> {
        let contents = format!(
            "\
# ritmo configuration

# Which profile the agenda belongs to:
# user_id = \"me\"

# Where the content API lives:
# api_url = \"{}\"
",
            DEFAULT_API_URL
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                EngineError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| EngineError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
