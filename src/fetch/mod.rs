// Gateway module for remote data helpers - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod debounce;
mod pagination;
mod resource;

// Public re-exports - the ONLY way to access fetch functionality
pub use debounce::Debouncer;
pub use pagination::{PageControl, Pagination};
pub use resource::{PagedResource, Resource, Settled, Ticket};
