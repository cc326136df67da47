use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_DEBOUNCE_MS, DEFAULT_FREE_CREDITS, DEFAULT_PAGE_SIZE,
};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection
    #[serde(default)]
    pub api: ApiConfig,

    /// UI configuration
    #[serde(default)]
    pub ui: UIConfig,

    /// Where client-side state (token, credits, language) is persisted
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Origin every endpoint path is appended to
    pub base_url: String,
    /// Per-request timeout in seconds; unset or 0 leaves reqwest's default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// UI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UIConfig {
    /// Quiet period before a search box fires its request
    pub debounce_ms: u64,
    /// Rows per page on paginated listings
    pub page_size: u32,
    /// Color theme ("dark" or "light")
    pub theme: String,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            page_size: DEFAULT_PAGE_SIZE,
            theme: "dark".to_string(),
        }
    }
}

impl UIConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Client-side persistence settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Explicit storage file; defaults to the platform data directory
    pub path: Option<PathBuf>,
    /// Skin diagnosis credits granted when none are stored yet
    pub free_credits: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            free_credits: DEFAULT_FREE_CREDITS,
        }
    }
}

/// Load configuration from multiple sources
///
/// Order (later wins): defaults, global config, local `.medihelp/config.toml`,
/// an explicit file, then `MEDIHELP_` environment variables.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let global_config = get_config_dir()?.join("config.toml");
    let local_config = PathBuf::from(".medihelp/config.toml");

    let mut files = vec![global_config, local_config];
    if let Some(path) = explicit {
        files.push(path.to_path_buf());
    }

    config_from_files(&files)
}

/// Layer the given TOML files (skipping missing ones) and the environment over defaults
pub fn config_from_files(files: &[PathBuf]) -> Result<Config> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    for file in files {
        if file.exists() {
            figment = figment.merge(Toml::file(file));
        }
    }

    // MEDIHELP_API__BASE_URL -> api.base_url
    figment = figment.merge(Env::prefixed("MEDIHELP_").split("__"));

    figment.extract().context("Failed to load configuration")
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "medihelp") {
        Ok(proj_dirs.config_dir().to_path_buf())
    } else {
        // Fallback to home directory
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        Ok(PathBuf::from(home).join(".config").join("medihelp"))
    }
}

/// Get the directory holding persisted client state
pub fn get_data_dir() -> Result<PathBuf> {
    match ProjectDirs::from("", "", "medihelp") {
        Some(proj_dirs) => Ok(proj_dirs.data_dir().to_path_buf()),
        None => get_config_dir(),
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(p) => p,
        None => get_config_dir()?.join("config.toml"),
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<PathBuf> {
    let config_file = get_config_dir()?.join("config.toml");

    if !config_file.exists() {
        save_config(&Config::default(), Some(config_file.clone()))?;
        tracing::info!(path = %config_file.display(), "created default configuration");
    }

    Ok(config_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_point_at_localhost() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.ui.debounce_ms, 500);
        assert_eq!(config.ui.page_size, 10);
        assert_eq!(config.storage.free_credits, 3);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"https://api.medihelp.test\"\n\n[ui]\ndebounce_ms = 250\n",
        )
        .unwrap();

        let config = config_from_files(&[path]).unwrap();
        assert_eq!(config.api.base_url, "https://api.medihelp.test");
        assert_eq!(config.ui.debounce_ms, 250);
        // Untouched keys keep their defaults
        assert_eq!(config.ui.page_size, 10);
        assert_eq!(config.api.timeout_secs, None);
    }

    #[test]
    fn test_missing_files_are_skipped() {
        let config = config_from_files(&[PathBuf::from("/nonexistent/medihelp.toml")]).unwrap();
        assert_eq!(config.api, ApiConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.ui.theme = "light".to_string();

        save_config(&config, Some(path.clone())).unwrap();
        let loaded = config_from_files(&[path]).unwrap();
        assert_eq!(loaded.ui.theme, "light");
    }

    #[test]
    fn test_timeout_only_when_positive() {
        let mut api = ApiConfig::default();
        assert_eq!(api.timeout(), None);

        api.timeout_secs = Some(0);
        assert_eq!(api.timeout(), None);

        api.timeout_secs = Some(15);
        assert_eq!(api.timeout(), Some(Duration::from_secs(15)));
    }
}
