//! Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default model, matching the hosted endpoint the assistants were built for
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default OpenAI-compatible base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Configuration for concourse
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model to use
    pub model: Option<String>,
    /// OpenAI-compatible base URL
    pub base_url: Option<String>,
    /// API key (alternative to the environment variable)
    pub api_key: Option<String>,
    /// Path to the session store database
    pub store_path: Option<String>,
}

impl Config {
    /// Get the config directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("concourse")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("CONCOURSE_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// Load config from file
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save config to file
    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::config_path();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let content = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, content)
    }

    /// Create a default config file if it doesn't exist
    pub fn init() -> std::io::Result<PathBuf> {
        let path = Self::config_path();
        if path.exists() {
            return Ok(path);
        }

        let default_config = Config {
            model: Some(DEFAULT_MODEL.to_string()),
            base_url: Some(DEFAULT_BASE_URL.to_string()),
            api_key: None,
            store_path: None,
        };

        default_config.save()?;
        Ok(path)
    }

    /// Resolve the API key: config first, then environment
    pub fn api_key(&self) -> Option<String> {
        if self.api_key.is_some() {
            return self.api_key.clone();
        }
        std::env::var("GOOGLE_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .ok()
    }

    /// Resolve the model identifier
    pub fn model(&self, override_: Option<&str>) -> String {
        override_
            .map(str::to_string)
            .or_else(|| self.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    /// Resolve the base URL
    pub fn base_url(&self, override_: Option<&str>) -> String {
        override_
            .map(str::to_string)
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Resolve the session store path: flag, then config, then environment,
    /// then the platform data directory.
    pub fn store_path(&self, override_: Option<&str>) -> PathBuf {
        if let Some(path) = override_ {
            return PathBuf::from(path);
        }
        if let Some(ref path) = self.store_path {
            return PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("CONCOURSE_STORE") {
            return PathBuf::from(path);
        }
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("concourse")
            .join("sessions.db")
    }
}

/// Generate example config content
pub fn example_config() -> &'static str {
    r#"# concourse configuration file
# Place at ~/.config/concourse/config.toml (Linux/Mac) or %APPDATA%\concourse\config.toml (Windows)

# Model to use
model = "gemini-2.5-flash"

# OpenAI-compatible chat completions base URL
base_url = "https://generativelanguage.googleapis.com/v1beta/openai"

# API key (optional - the GOOGLE_API_KEY / GEMINI_API_KEY environment
# variables are checked when this is unset)
# api_key = "..."

# Session store database (optional - defaults to the platform data dir;
# the CONCOURSE_STORE environment variable also works)
# store_path = "/path/to/sessions.db"
"#
}
