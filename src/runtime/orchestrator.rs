use anyhow::{Context, Result};

use super::non_interactive::{format_result, NonInteractiveRunner};
use crate::{
    app::{load_config, AppState, Config},
    cli::{handle_command, Cli, Commands},
    router::Route,
    tui::{run_ui, App},
};

/// Main runtime orchestrator
pub struct Orchestrator {
    cli: Cli,
    config: Config,
}

impl Orchestrator {
    /// Create a new orchestrator from CLI args
    pub fn new(cli: Cli) -> Result<Self> {
        let config = resolve_config(&cli)?;
        Ok(Self { cli, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the requested command, or the terminal UI when there is none
    ///
    /// Returns `false` when a one-shot command reported errors.
    pub async fn run(self) -> Result<bool> {
        let state = AppState::build(self.config.clone(), self.cli.ephemeral)?;
        tracing::debug!(base_url = %self.config.api.base_url, "starting");

        match &self.cli.command {
            None => {
                run_ui(App::new(state), Route::Home).await?;
                Ok(true)
            }
            Some(Commands::Ui { path }) => {
                let start = path.as_deref().map(Route::parse).unwrap_or(Route::Home);
                run_ui(App::new(state), start).await?;
                Ok(true)
            }
            Some(command) => {
                if handle_command(command, &state)? {
                    return Ok(true);
                }
                let runner = NonInteractiveRunner::new(state);
                let result = runner.execute(command).await?;
                println!("{}", format_result(&result, self.cli.output_format));
                Ok(result.is_success())
            }
        }
    }
}

/// Layered configuration with the command line applied last
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = load_config(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.trim_end_matches('/').to_string();
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_base_url_flag_beats_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nbase_url = \"http://from-file:9000\"").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let cli = Cli::parse_from(["medihelp", "--config", &path, "status"]);
        let orchestrator = Orchestrator::new(cli).unwrap();
        assert_eq!(orchestrator.config().api.base_url, "http://from-file:9000");

        let cli = Cli::parse_from([
            "medihelp",
            "--config",
            &path,
            "--base-url",
            "http://override:1/",
            "status",
        ]);
        let orchestrator = Orchestrator::new(cli).unwrap();
        assert_eq!(orchestrator.config().api.base_url, "http://override:1");
    }
}
