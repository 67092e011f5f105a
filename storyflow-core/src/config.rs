//! User settings
//!
//! A small YAML file under the user's config directory, with environment
//! variables taking precedence over whatever the file says.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ai::{AiMode, DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::db::SNAPSHOT_KEY;

/// Environment variable overriding the settings file location
pub const CONFIG_ENV: &str = "STORYFLOW_CONFIG";

/// Credential variables, highest precedence first
pub const API_KEY_ENVS: &[&str] = &["STORYFLOW_API_KEY", "GEMINI_API_KEY", "API_KEY"];

pub const MODEL_ENV: &str = "STORYFLOW_MODEL";
pub const SNAPSHOT_ENV: &str = "STORYFLOW_SNAPSHOT";

const APP_DIR: &str = "storyflow";

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Credential for the enrichment service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Local Claude CLI used when no credential is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claude_cli: Option<PathBuf>,

    /// Where the record snapshot lives
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,

    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            api_base: default_api_base(),
            claude_cli: None,
            snapshot_path: None,
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl Settings {
    /// Loads settings from the provided path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings file: {:?}", path.as_ref()))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {:?}", path.as_ref()))
    }

    /// Loads settings from the default location (defaults if the file is
    /// absent), then applies environment overrides
    pub fn load_default() -> Result<Self> {
        let path = config_path()?;
        let mut settings = if path.exists() {
            Self::load(&path)?
        } else {
            log::debug!("No settings file at {:?}, using defaults", path);
            Self::default()
        };
        settings.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(settings)
    }

    /// Save the settings to the specified path
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(&self)?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write settings to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Writes a default settings file if none exists. Returns true if a
    /// file was created.
    pub fn create_default<P: AsRef<Path>>(path: P) -> Result<bool> {
        if path.as_ref().exists() {
            return Ok(false);
        }
        Self::default().save(path)?;
        Ok(true)
    }

    /// Overlay values from the environment. `lookup` returns the value of a
    /// variable; empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = API_KEY_ENVS.iter().find_map(|name| get(*name)) {
            self.api_key = Some(key);
        }
        if let Some(model) = get(MODEL_ENV) {
            self.model = model;
        }
        if let Some(path) = get(SNAPSHOT_ENV) {
            self.snapshot_path = Some(PathBuf::from(path));
        }
    }

    /// Credential → Gemini, configured CLI → Claude CLI, otherwise disabled
    pub fn ai_mode(&self) -> AiMode {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            return AiMode::Gemini {
                api_key: key.to_string(),
                model: self.model.clone(),
                api_base: self.api_base.clone(),
            };
        }

        match &self.claude_cli {
            Some(path) => AiMode::ClaudeCli { path: path.clone() },
            None => AiMode::Disabled,
        }
    }

    /// Snapshot location: the configured path, or the default under the
    /// user's data directory
    pub fn snapshot_path(&self) -> Result<PathBuf> {
        match &self.snapshot_path {
            Some(path) => Ok(path.clone()),
            None => default_snapshot_path(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Credential with everything but the last four characters hidden
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key.as_deref().map(|key| {
            let chars: Vec<char> = key.chars().collect();
            let visible = chars.len().saturating_sub(4);
            let tail: String = chars[visible..].iter().collect();
            format!("{}{}", "*".repeat(visible.min(8)), tail)
        })
    }
}

/// Gets the path to the settings file
pub fn config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    let config_dir = dirs::config_dir().context("Failed to determine config directory")?;
    Ok(config_dir.join(APP_DIR).join("config.yaml"))
}

/// Default snapshot file under the user's data directory
pub fn default_snapshot_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().context("Failed to determine data directory")?;
    Ok(data_dir.join(APP_DIR).join(format!("{}.json", SNAPSHOT_KEY)))
}
