use anyhow::Result;
use colored::Colorize;

use crate::app::{get_config_dir, init_config, session_path, AppState};
use crate::pages::LanguageSelector;

use super::Commands;

/// Handle subcommands that never touch the network
///
/// Returns `true` when the command was fully handled here.
pub fn handle_command(command: &Commands, state: &AppState) -> Result<bool> {
    match command {
        Commands::Init => {
            println!("Initializing MediHelp+ configuration...");
            let path = init_config()?;
            println!("Configuration ready at {}", path.display().to_string().green());
            Ok(true)
        }
        Commands::Status => {
            show_status(state)?;
            Ok(true)
        }
        Commands::Logout => {
            if state.session.clear_token()?.is_some() {
                println!("{}", "Logged out.".green());
            } else {
                println!("Not logged in.");
            }
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Show configuration and stored session state
fn show_status(state: &AppState) -> Result<()> {
    println!("MediHelp+ v{} Status:", env!("CARGO_PKG_VERSION"));
    println!();

    println!("  Backend: {}", state.config.api.base_url.cyan());

    let config_path = get_config_dir()?.join("config.toml");
    if config_path.exists() {
        println!("  [OK] Configuration: {}", config_path.display());
    } else {
        println!("  [WARNING] Configuration: Not found (using defaults)");
    }

    println!("  Session file: {}", session_path(&state.config)?.display());
    if state.session.is_authenticated() {
        println!("  [OK] Logged in");
    } else {
        println!("  [WARNING] Not logged in (run `medihelp login`)");
    }
    println!("  Free credits: {}", state.session.credits());
    println!(
        "  Language: {}",
        LanguageSelector::current_name(&state.session)
    );

    println!();
    Ok(())
}
