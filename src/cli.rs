// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Three subcommands:
// - search: one-shot search, prints users as a table or JSON
// - repos: one-shot listing of a user's repositories
// - interactive: the shell (also what runs when no subcommand is given)
//
// The flags on `Cli` itself are global, so they can go before or after the
// subcommand: `github-user-search --per-page 10 search rust`.
// =============================================================================

use clap::{Parser, Subcommand};
use url::Url;

use crate::github::{DEFAULT_API_BASE, DEFAULT_PER_PAGE};

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "github-user-search",
    version,
    about = "Search GitHub users and browse their public repositories",
    long_about = "github-user-search looks up GitHub users page by page and lets you expand \
                  any of them to see their most recently updated public repositories. \
                  Set GITHUB_TOKEN (or put it in a .env file) for higher rate limits."
)]
pub struct Cli {
    /// Base URL of the GitHub REST API
    #[arg(long, global = true, default_value = DEFAULT_API_BASE)]
    pub api_base: Url,

    /// Users per search page (1-100)
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_PER_PAGE,
        value_parser = clap::value_parser!(u32).range(1..=100)
    )]
    pub per_page: u32,

    /// Per-request timeout in seconds (default: none)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Search users and print the results
    ///
    /// Example: github-user-search search octocat --pages 2
    Search {
        /// Search query (GitHub user search syntax)
        query: String,

        /// Load up to this many pages, stopping early when results run out
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List a user's public repositories, most recently updated first
    ///
    /// Example: github-user-search repos octocat
    Repos {
        /// GitHub login
        username: String,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Interactive shell: search, page through results, expand users
    Interactive,
}
