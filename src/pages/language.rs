use crate::constants::LANGUAGES;
use crate::session::Session;
use crate::utils::MediHelpError;

/// Dropdown over the supported languages
#[derive(Debug, Clone, Default)]
pub struct LanguageSelector {
    open: bool,
    highlighted: usize,
}

impl LanguageSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open the list with the stored language highlighted
    pub fn open(&mut self, session: &Session) {
        let current = session.language();
        self.highlighted = LANGUAGES
            .iter()
            .position(|(code, _)| *code == current)
            .unwrap_or_default();
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn move_highlight(&mut self, down: bool) {
        if down {
            self.highlighted = (self.highlighted + 1) % LANGUAGES.len();
        } else {
            self.highlighted = (self.highlighted + LANGUAGES.len() - 1) % LANGUAGES.len();
        }
    }

    /// Persist the highlighted language and close the list
    pub fn choose(&mut self, session: &Session) -> Result<&'static str, MediHelpError> {
        let (code, name) = LANGUAGES[self.highlighted % LANGUAGES.len()];
        session.set_language(code)?;
        tracing::debug!(language = code, "language changed");
        self.open = false;
        Ok(name)
    }

    /// Display name of the stored language
    pub fn current_name(session: &Session) -> &'static str {
        let code = session.language();
        LANGUAGES
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, name)| *name)
            .unwrap_or("English")
    }
}
