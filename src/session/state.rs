use std::path::Path;
use std::sync::Arc;

use super::storage::{FileStorage, MemoryStorage, Storage};
use crate::constants::{
    CREDITS_KEY, DEFAULT_FREE_CREDITS, DEFAULT_LANGUAGE, LANGUAGE_KEY, LANGUAGES, TOKEN_KEY,
};
use crate::utils::MediHelpError;

/// Client session: the bearer token plus the small amount of state that
/// outlives a single run (skin diagnosis credits, language preference)
///
/// Cloning is cheap and every clone shares the same storage.
#[derive(Clone)]
pub struct Session {
    storage: Arc<dyn Storage>,
    free_credits: u32,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the token
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("credits", &self.credits())
            .finish()
    }
}

impl Session {
    /// Create a session over an existing storage backend
    pub fn new(storage: Arc<dyn Storage>, free_credits: u32) -> Self {
        Self {
            storage,
            free_credits,
        }
    }

    /// Session that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), DEFAULT_FREE_CREDITS)
    }

    /// Session persisted to the file at `path`
    pub fn open(path: impl AsRef<Path>, free_credits: u32) -> Result<Self, MediHelpError> {
        let storage = FileStorage::open(path)?;
        Ok(Self::new(Arc::new(storage), free_credits))
    }

    /// Current bearer token, if logged in
    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Store a new bearer token (no format validation)
    pub fn set_token(&self, token: impl AsRef<str>) -> Result<(), MediHelpError> {
        self.storage.set(TOKEN_KEY, token.as_ref())?;
        tracing::debug!("session token stored");
        Ok(())
    }

    /// Drop the bearer token, returning it if one was present
    ///
    /// Only one of several concurrent callers observes `Some`.
    pub fn clear_token(&self) -> Result<Option<String>, MediHelpError> {
        let previous = self.storage.remove(TOKEN_KEY)?;
        if previous.is_some() {
            tracing::debug!("session token cleared");
        }
        Ok(previous)
    }

    /// Remaining free skin diagnosis credits
    pub fn credits(&self) -> u32 {
        self.storage
            .get(CREDITS_KEY)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(self.free_credits)
    }

    pub fn set_credits(&self, credits: u32) -> Result<(), MediHelpError> {
        self.storage.set(CREDITS_KEY, &credits.to_string())
    }

    /// Spend one credit, returning how many are left
    pub fn consume_credit(&self) -> Result<u32, MediHelpError> {
        let credits = self.credits();
        if credits == 0 {
            return Err(MediHelpError::ValidationError(
                "No free credits left".to_string(),
            ));
        }
        self.set_credits(credits - 1)?;
        Ok(credits - 1)
    }

    /// Preferred UI language code
    pub fn language(&self) -> String {
        self.storage
            .get(LANGUAGE_KEY)
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }

    /// Persist the preferred language; unknown codes are rejected
    pub fn set_language(&self, code: &str) -> Result<(), MediHelpError> {
        if !LANGUAGES.iter().any(|(known, _)| *known == code) {
            return Err(MediHelpError::ValidationError(format!(
                "Unsupported language: {}",
                code
            )));
        }
        self.storage.set(LANGUAGE_KEY, code)
    }
}
