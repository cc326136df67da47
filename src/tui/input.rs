use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a keystroke means while a form field has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Submit,
    Cancel,
    Insert(char),
    Delete,
    NextField,
    PreviousField,
    None,
}

/// Translate a key event for insert mode
pub fn insert_action(key: KeyEvent) -> InputAction {
    match key.code {
        KeyCode::Enter => InputAction::Submit,
        KeyCode::Esc => InputAction::Cancel,
        KeyCode::Tab | KeyCode::Down => InputAction::NextField,
        KeyCode::BackTab | KeyCode::Up => InputAction::PreviousField,
        KeyCode::Backspace => InputAction::Delete,
        KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => InputAction::None,
        KeyCode::Char(c) => InputAction::Insert(c),
        _ => InputAction::None,
    }
}
