// src/config.rs
// =============================================================================
// Runtime configuration: CLI flags plus the optional GITHUB_TOKEN.
//
// The token comes from the process environment, after loading a .env file if
// one exists. An empty value counts as unset. Missing is fine: requests go out
// unauthenticated and GitHub applies its lower anonymous rate limit.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

use crate::cli::Cli;
use crate::github::GithubClient;

/// Environment variable holding the API token.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: Url,
    pub token: Option<String>,
    pub per_page: u32,
    pub timeout: Option<Duration>,
}

impl Config {
    /// Builds the configuration from parsed flags and the environment.
    pub fn load(cli: &Cli) -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!(error = %e, "ignoring unreadable .env file");
            }
        }
        Self::from_parts(cli, std::env::var(TOKEN_ENV).ok())
    }

    fn from_parts(cli: &Cli, token: Option<String>) -> Self {
        Config {
            api_base: cli.api_base.clone(),
            token: token.filter(|t| !t.trim().is_empty()),
            per_page: cli.per_page,
            timeout: cli.timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn client(&self) -> Result<GithubClient> {
        if self.token.is_none() {
            tracing::info!("{TOKEN_ENV} not set, using unauthenticated requests");
        }
        GithubClient::new(self.api_base.clone(), self.token.as_deref(), self.timeout)
            .context("Failed to build GitHub client")
    }
}
