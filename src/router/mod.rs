// Gateway module for client-side routing - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod navigator;
mod route;

// Public re-exports - the ONLY way to access routing functionality
pub use navigator::{guard, Navigator, Resolution};
pub use route::Route;
