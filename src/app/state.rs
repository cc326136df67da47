use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::{ApiClient, MediHelpApi};
use crate::app::{get_data_dir, Config};
use crate::session::Session;

/// Shared application state: configuration, session and backend client
///
/// Built once at startup and handed to whichever front end runs (terminal UI
/// or a one-shot command).
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub session: Session,
    pub api: Arc<dyn MediHelpApi>,
}

impl AppState {
    pub fn new(config: Config, session: Session, api: Arc<dyn MediHelpApi>) -> Self {
        Self {
            config,
            session,
            api,
        }
    }

    /// Open the session store and build the HTTP client from `config`
    ///
    /// `ephemeral` keeps the session in memory so nothing is written to disk.
    pub fn build(config: Config, ephemeral: bool) -> Result<Self> {
        let session = if ephemeral {
            Session::in_memory()
        } else {
            let path = session_path(&config)?;
            tracing::debug!(path = %path.display(), "opening session store");
            Session::open(&path, config.storage.free_credits)
                .with_context(|| format!("Failed to open session at {}", path.display()))?
        };
        let client =
            ApiClient::new(&config.api, session.clone()).context("Failed to build HTTP client")?;
        Ok(Self::new(config, session, Arc::new(client)))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Where the session file lives: the configured path or the data directory
pub fn session_path(config: &Config) -> Result<PathBuf> {
    match &config.storage.path {
        Some(path) => Ok(path.clone()),
        None => Ok(get_data_dir()?.join("session.toml")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_build_uses_configured_session_file() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage.path = Some(dir.path().join("session.toml"));

        let state = AppState::build(config.clone(), false).unwrap();
        state.session.set_token("abc").unwrap();

        let reopened = AppState::build(config, false).unwrap();
        assert_eq!(reopened.session.token().as_deref(), Some("abc"));
    }

    #[test]
    fn test_ephemeral_session_is_not_persisted() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage.path = Some(dir.path().join("session.toml"));

        let state = AppState::build(config, true).unwrap();
        state.session.set_token("abc").unwrap();
        assert!(!dir.path().join("session.toml").exists());
    }
}
