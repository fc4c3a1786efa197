use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::ShelfError;
use crate::generator::RetryPolicy;
use crate::shelf::SHELF_FILE;

/// File name of the settings file inside the config directory
pub const SETTINGS_FILE: &str = "settings.toml";

/// Where redditshelf keeps its files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfPaths {
    root: PathBuf,
}

impl ShelfPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Use `dir` when given, otherwise the platform config directory
    /// (`~/.config/redditshelf` on Linux).
    pub fn resolve(dir: Option<PathBuf>) -> std::result::Result<Self, ShelfError> {
        match dir {
            Some(dir) => Ok(Self::new(dir)),
            None => dirs::config_dir()
                .map(|base| Self::new(base.join("redditshelf")))
                .ok_or(ShelfError::NoConfigDir),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn shelf_file(&self) -> PathBuf {
        self.root.join(SHELF_FILE)
    }

    pub fn settings_file(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }
}

/// redditshelf settings loaded from settings.toml and the environment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub generator: GeneratorSettings,
    #[serde(default)]
    pub retry: RetrySettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Converter program, looked up on PATH
    pub program: String,
    /// Argument template; `{link}`, `{title}` and `{file}` are substituted
    pub args: Vec<String>,
    /// Seconds a single generation attempt may take
    pub timeout: u64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            program: "reddit2epub".to_string(),
            args: vec![
                "-i".to_string(),
                "{link}".to_string(),
                "-o".to_string(),
                "{file}".to_string(),
            ],
            timeout: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Total attempts per story, including the first
    pub attempts: u32,
    /// Delay before the first retry in milliseconds, doubled on each retry
    pub backoff_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff_ms: 2000,
        }
    }
}

impl Settings {
    /// Load settings from `path` and environment variables.
    /// Environment variables take precedence over file values; a missing file
    /// means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let mut settings = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            Settings::default()
        };

        settings.apply_env_overrides();

        Ok(settings)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("REDDITSHELF_GENERATOR") {
            self.generator.program = val;
        }
        if let Ok(val) = env::var("REDDITSHELF_TIMEOUT") {
            if let Ok(n) = val.parse() {
                self.generator.timeout = n;
            }
        }
        if let Ok(val) = env::var("REDDITSHELF_RETRIES") {
            if let Ok(n) = val.parse() {
                self.retry.attempts = n;
            }
        }
        if let Ok(val) = env::var("REDDITSHELF_BACKOFF_MS") {
            if let Ok(n) = val.parse() {
                self.retry.backoff_ms = n;
            }
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from_settings(&self.generator, &self.retry)
    }
}
