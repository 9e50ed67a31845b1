// src/repos/mod.rs
// =============================================================================
// Lazily fetched repository lists for expanded user rows.
// =============================================================================

mod cache;

pub use cache::{RepoRequest, RepositoryCache, RowView};
