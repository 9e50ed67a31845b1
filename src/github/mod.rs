// src/github/mod.rs
// =============================================================================
// This module handles everything that goes over the wire to GitHub.
//
// Currently implements:
// - Searching users, one page at a time
// - Listing a user's public repositories
// - Optional token authentication
//
// Rust concepts:
// - Modules: Organizing related functionality
// - Public API: What other parts of the app can use
// =============================================================================

mod client;
mod error;
mod models;

pub use client::GithubClient;
pub use error::Error;
pub use models::{Repository, SearchPage, User, UserId};

/// Public GitHub REST API root.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Page size used by the search when none is configured.
pub const DEFAULT_PER_PAGE: u32 = 5;
