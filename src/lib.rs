pub mod api;
pub mod app;
pub mod cli;
pub mod constants;
pub mod fetch;
pub mod pages;
pub mod router;
pub mod runtime;
pub mod session;
pub mod tui;
pub mod utils;

pub use api::{ApiClient, ApiError, MediHelpApi};
pub use app::{load_config, AppState, Config};
pub use router::{Navigator, Route};
pub use session::Session;
pub use tui::run_ui;
pub use utils::MediHelpError;
