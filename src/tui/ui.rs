use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

use super::app::App;
use super::input::{insert_action, InputAction};
use super::mode::InputMode;
use super::render::render_ui;
use crate::constants::UI_REFRESH_INTERVAL_MS;
use crate::router::Route;

/// Run the terminal UI, starting at `start`
pub async fn run_ui(mut app: App, start: Route) -> Result<()> {
    // Check if we have an interactive terminal
    if !crossterm::tty::IsTty::is_tty(&io::stdout()) {
        eprintln!("MediHelp+ requires an interactive terminal.");
        eprintln!("   Use a subcommand (medihelp --help) for scripted use.");
        return Err(anyhow::anyhow!("No interactive terminal available"));
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let res = run_app(&mut terminal, &mut app, start).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        tracing::error!(error = %err, "terminal UI failed");
    }
    res
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    start: Route,
) -> Result<()> {
    terminal.draw(|f| render_ui(f, app))?;
    app.open(start).await;

    while app.running {
        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(Duration::from_millis(UI_REFRESH_INTERVAL_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                // Show "Working..." while a page request is in flight
                app.busy = true;
                terminal.draw(|f| render_ui(f, app))?;
                handle_key(app, key).await;
                app.busy = false;
            }
        }

        app.poll_background().await;
    }

    Ok(())
}

/// Dispatch one key press according to the current input mode
pub async fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    match app.mode {
        InputMode::Normal => handle_normal(app, key).await,
        InputMode::Insert => match insert_action(key) {
            InputAction::Submit => app.submit().await,
            InputAction::Cancel => app.mode = InputMode::Normal,
            InputAction::Insert(c) => app.insert_char(c),
            InputAction::Delete => app.delete_char(),
            InputAction::NextField => app.next_field(),
            InputAction::PreviousField => app.previous_field(),
            InputAction::None => {}
        },
        InputMode::Command => match key.code {
            KeyCode::Enter => {
                let line = std::mem::take(&mut app.command);
                app.mode = InputMode::Normal;
                app.run_command(line.trim()).await;
            }
            KeyCode::Esc => {
                app.command.clear();
                app.mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                if app.command.pop().is_none() {
                    app.mode = InputMode::Normal;
                }
            }
            KeyCode::Char(c) => app.command.push(c),
            _ => {}
        },
        InputMode::Menu => match key.code {
            KeyCode::Up | KeyCode::Char('k') => app.move_menu(false),
            KeyCode::Down | KeyCode::Char('j') => app.move_menu(true),
            KeyCode::Enter => app.choose_menu_entry().await,
            KeyCode::Esc | KeyCode::Char('g') => app.mode = InputMode::Normal,
            _ => {}
        },
        InputMode::Language => match key.code {
            KeyCode::Up | KeyCode::Char('k') => app.language.move_highlight(false),
            KeyCode::Down | KeyCode::Char('j') => app.language.move_highlight(true),
            KeyCode::Enter => app.choose_language(),
            KeyCode::Esc => {
                app.language.close();
                app.mode = InputMode::Normal;
            }
            _ => {}
        },
    }
}

async fn handle_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char(':') => {
            app.command.clear();
            app.mode = InputMode::Command;
        }
        KeyCode::Char('i') => app.start_editing(),
        KeyCode::Char('g') => {
            app.show_sidebar = true;
            app.mode = InputMode::Menu;
        }
        KeyCode::Char('L') => app.run_command("lang").await,
        KeyCode::Char('T') => app.run_command("theme").await,
        KeyCode::Char('r') => app.reload().await,
        KeyCode::Esc => {
            app.clear_status();
            app.show_help = false;
        }
        KeyCode::Backspace => app.back().await,
        KeyCode::Enter => app.activate().await,
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(false),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(true),
        KeyCode::Left | KeyCode::Char('h') => app.turn_page(false).await,
        KeyCode::Right | KeyCode::Char('l') => {
            if app.current_route() == &Route::Home {
                app.page_key('l').await;
            } else {
                app.turn_page(true).await;
            }
        }
        KeyCode::Tab => app.show_sidebar = !app.show_sidebar,
        KeyCode::Char(c) => app.page_key(c).await,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMediHelpApi;
    use crate::app::{AppState, Config};
    use crate::session::Session;
    use std::sync::Arc;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_command_line_navigation() {
        let state = AppState::new(
            Config::default(),
            Session::in_memory(),
            Arc::new(MockMediHelpApi::new()),
        );
        let mut app = App::new(state);

        handle_key(&mut app, press(KeyCode::Char(':'))).await;
        for c in "go /about".chars() {
            handle_key(&mut app, press(KeyCode::Char(c))).await;
        }
        handle_key(&mut app, press(KeyCode::Enter)).await;

        assert_eq!(app.current_route(), &Route::About);
        assert_eq!(app.mode, InputMode::Normal);
    }

    #[tokio::test]
    async fn test_menu_selection_and_ctrl_c() {
        let state = AppState::new(
            Config::default(),
            Session::in_memory(),
            Arc::new(MockMediHelpApi::new()),
        );
        let mut app = App::new(state);

        handle_key(&mut app, press(KeyCode::Char('g'))).await;
        assert_eq!(app.mode, InputMode::Menu);
        // Second entry is a protected page; without a token it lands on login
        handle_key(&mut app, press(KeyCode::Down)).await;
        handle_key(&mut app, press(KeyCode::Enter)).await;
        assert_eq!(app.current_route(), &Route::Login);

        handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)).await;
        assert!(!app.running);
    }
}
