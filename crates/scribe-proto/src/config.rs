use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Env var that overrides `[server] base_url` without touching the config
/// file.  Mirrors how deployments point the client at a non-default backend.
pub const API_URL_ENV: &str = "SCRIBE_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub intake: IntakeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Backend base URL, without the `/api` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Where the intake pane looks for audio files to submit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    #[serde(default = "default_intake_dir")]
    pub dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            dir: default_intake_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            intake: IntakeConfig::default(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_intake_dir() -> PathBuf {
    dirs::audio_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Per-user data directory (log files live here).
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("scribe")
}

impl Config {
    /// Load the config, creating a default one on first run.  The
    /// `SCRIBE_API_URL` env var, when set and non-empty, overrides the file's
    /// base URL.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            let config = Self::default();
            config.save()?;
            config
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.server.base_url = url.trim().to_string();
            }
        }

        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("scribe")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.base_url, "http://localhost:5000");
        assert!(!config.intake.dir.as_os_str().is_empty());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config =
            toml::from_str("[server]\nbase_url = \"http://10.0.0.2:5000\"\n").unwrap();
        assert_eq!(config.server.base_url, "http://10.0.0.2:5000");
        assert_eq!(config.intake.dir, IntakeConfig::default().dir);
    }

    #[test]
    fn empty_toml_is_a_full_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.base_url, default_base_url());
    }
}
