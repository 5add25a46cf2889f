//! Configuration management for Helpdesk CLI
//!
//! Stores the API key and server URL in ~/.config/helpdesk/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const CONFIG_DIR: &str = "helpdesk";
const CONFIG_FILE: &str = "config.toml";

/// CLI Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse config file")
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory {:?}", dir))?;

        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Set API key
    pub fn set_api_key(&mut self, key: String) {
        self.api_key = Some(key);
    }

    /// Set the server URL
    pub fn set_base_url(&mut self, url: &str) {
        self.base_url = url.trim_end_matches('/').to_string();
    }

    /// API key with everything but the last four characters hidden
    pub fn masked_api_key(&self) -> Option<String> {
        let key = self.api_key.as_deref()?;
        let chars: Vec<char> = key.chars().collect();
        if chars.len() <= 4 {
            return Some("*".repeat(chars.len()));
        }
        let visible: String = chars[chars.len() - 4..].iter().collect();
        Some(format!("{}{}", "*".repeat(chars.len() - 4), visible))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = Config::default();
        config.set_api_key("secret-key".to_string());
        config.set_base_url("https://helpdesk.example.com/");

        let raw = toml::to_string_pretty(&config).unwrap();
        let parsed = Config::parse(&raw).unwrap();
        assert_eq!(parsed.base_url, "https://helpdesk.example.com");
        assert_eq!(parsed.api_key.as_deref(), Some("secret-key"));
    }

    #[test]
    fn test_masked_api_key() {
        let mut config = Config::default();
        assert_eq!(config.masked_api_key(), None);

        config.set_api_key("abc".to_string());
        assert_eq!(config.masked_api_key().as_deref(), Some("***"));

        config.set_api_key("sk-123456".to_string());
        assert_eq!(config.masked_api_key().as_deref(), Some("*****3456"));
    }
}
