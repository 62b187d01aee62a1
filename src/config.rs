use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const API_URL_ENV: &str = "APPLYINTEL_API_BASE_URL";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub export_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: 10,
            export_dir: PathBuf::from("."),
        }
    }
}

/// On-disk shape; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    api_url: Option<String>,
    request_timeout_secs: Option<u64>,
    export_dir: Option<PathBuf>,
}

impl Config {
    /// Defaults, then the TOML file, then the environment.
    ///
    /// With `explicit` unset, a missing default file is fine.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|path| path.exists()),
        };
        let mut config = Config::default();
        if let Some(path) = path {
            config.merge_file(&path)?;
        }
        config.merge_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "applyintel")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn merge_file(&mut self, path: &Path) -> Result<()> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let file: FileConfig = toml::from_str(&raw)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        if let Some(url) = file.api_url {
            self.set_api_url(&url);
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout_secs = secs.max(1);
        }
        if let Some(dir) = file.export_dir {
            self.export_dir = dir;
        }
        Ok(())
    }

    fn merge_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.set_api_url(&url);
        }
    }

    pub fn set_api_url(&mut self, url: &str) {
        self.api_url = url.trim().trim_end_matches('/').to_string();
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
