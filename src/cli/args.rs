use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "medihelp")]
#[command(version)]
#[command(about = "Terminal client for the MediHelp+ health information service", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend origin (overrides the configured api.base_url)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Keep the session in memory instead of the session file
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Output format for one-shot commands
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub output_format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize configuration
    Init,
    /// Show configuration and session status
    Status,
    /// Log in and store the access token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "MEDIHELP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long, default_value = "")]
        phone: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date_of_birth: String,
        #[arg(long, env = "MEDIHELP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored token
    Logout,
    /// List the symptom catalog
    Symptoms,
    /// Run a symptom check for the given symptom ids
    Check {
        #[arg(required = true)]
        symptoms: Vec<i64>,
    },
    /// Show past health checks
    History,
    /// List or search first aid guides
    FirstAid {
        #[arg(short, long)]
        query: Option<String>,
    },
    /// List published articles
    Articles,
    /// List published videos
    Videos,
    /// Describe how you feel and get AI guidance
    Chat { message: String },
    /// Upload a skin photo for diagnosis (uses one free credit)
    Skin { image: PathBuf },
    /// List doctor profiles
    Doctors {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show one doctor profile
    Doctor { id: i64 },
    /// Delete a doctor profile
    DeleteDoctor {
        id: i64,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// List availability slots
    Availability {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        doctor: Option<i64>,
    },
    /// Open the terminal UI at a path (default)
    Ui { path: Option<String> },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON structured output
    Json,
    /// Markdown formatted output
    Markdown,
}
