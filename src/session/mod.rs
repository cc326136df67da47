/// Session management module - Gateway

mod state;
mod storage;

pub use state::Session;
pub use storage::{FileStorage, MemoryStorage, Storage};
