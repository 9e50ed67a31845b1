// src/search/mod.rs
// =============================================================================
// Paginated search over the GitHub user directory.
// =============================================================================

mod controller;

pub use controller::{PageRequest, SearchController};
