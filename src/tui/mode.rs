use ratatui::style::Color;

/// Which part of the screen keystrokes go to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Keys act on the current page (move, open, page, delete)
    #[default]
    Normal,
    /// Typing into the focused form field
    Insert,
    /// Typing a `:` command
    Command,
    /// Choosing a destination from the navigation menu
    Menu,
    /// Choosing a language
    Language,
}

impl InputMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
            Self::Command => "COMMAND",
            Self::Menu => "MENU",
            Self::Language => "LANGUAGE",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Normal => Color::Green,
            Self::Insert => Color::Yellow,
            Self::Command => Color::Blue,
            Self::Menu => Color::Cyan,
            Self::Language => Color::Magenta,
        }
    }

    /// Key reminder shown in the status bar
    pub fn hints(&self) -> &'static str {
        match self {
            Self::Normal => "g: menu | i: edit | enter: open | r: reload | :help | q: quit",
            Self::Insert => "tab: next field | enter: submit | esc: done",
            Self::Command => "enter: run | esc: cancel",
            Self::Menu | Self::Language => "up/down: choose | enter: select | esc: close",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_normal() {
        assert_eq!(InputMode::default(), InputMode::Normal);
        assert_eq!(InputMode::Insert.display_name(), "INSERT");
    }
}
