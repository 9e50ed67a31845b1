// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (stderr, so stdout stays clean for --json)
// 2. Parse command-line arguments using clap and load the configuration
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 1 = no users found, 2 = error)
//
// Everything runs on a single-threaded tokio runtime. The shell gets its
// concurrency from interleaving futures, not from threads.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod app;           // src/app/ - explorer state, rendering, interactive shell
mod cli;           // src/cli.rs - command-line parsing
mod config;        // src/config.rs - flags + GITHUB_TOKEN
mod github;        // src/github/ - GitHub REST API client
mod repos;         // src/repos/ - per-user repository cache
mod search;        // src/search/ - paginated search state machine

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::json;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use app::{run_fetch, Explorer};
use cli::{Cli, Commands};
use config::Config;
use github::GithubClient;

/// Environment variable controlling the log filter, e.g. `debug`.
const LOG_ENV: &str = "GITHUB_USER_SEARCH_LOG";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = Config::load(&cli);
    let client = config.client()?;

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Search { query, pages, json } => {
            handle_search(client, config.per_page, &query, pages, json).await
        }
        Commands::Repos { username, json } => handle_repos(&client, &username, json).await,
        Commands::Interactive => {
            app::shell::run(client, config.per_page).await?;
            Ok(0)
        }
    }
}

async fn handle_search(
    client: GithubClient,
    per_page: u32,
    query: &str,
    pages: u32,
    json: bool,
) -> Result<i32> {
    let explorer = collect_search(&client, per_page, query, pages).await?;
    let (report, code) = search_report(&explorer, json)?;
    print!("{report}");
    Ok(code)
}

// Runs one search session, loading pages one after another until `pages`
// are loaded, the results run out, or a page fails. Pages loaded before a
// failure stay in the session.
async fn collect_search(
    client: &GithubClient,
    per_page: u32,
    query: &str,
    pages: u32,
) -> Result<Explorer> {
    let mut explorer = Explorer::new(per_page);
    let Some(mut fetch) = explorer.submit(query) else {
        bail!("search query must not be blank");
    };

    loop {
        explorer.apply(run_fetch(client.clone(), fetch).await);

        let search = explorer.search();
        if let Some(e) = search.error() {
            warn!(query, pages_loaded = search.pages_loaded(), error = %e, "search stopped early");
            break;
        }
        if search.pages_loaded() >= pages as usize {
            break;
        }
        match explorer.load_more() {
            Some(next) => fetch = next,
            None => break,
        }
    }

    Ok(explorer)
}

// Formats a finished session and picks the exit code:
// 2 if a page failed, 1 if no users were found, 0 otherwise.
fn search_report(explorer: &Explorer, json: bool) -> Result<(String, i32)> {
    let search = explorer.search();
    let users = explorer.users();

    let report = if json {
        let output = json!({
            "query": search.query(),
            "total_count": search.total_count(),
            "pages_loaded": search.pages_loaded(),
            "has_more": search.has_more(),
            "error": search.error().map(|e| e.to_string()),
            "users": users,
        });
        format!("{}\n", serde_json::to_string_pretty(&output)?)
    } else {
        app::render::session(explorer)
    };

    let code = if search.error().is_some() {
        2
    } else if users.is_empty() {
        1
    } else {
        0
    };
    Ok((report, code))
}

async fn handle_repos(client: &GithubClient, username: &str, json: bool) -> Result<i32> {
    let repos = client
        .get_user_repositories(username)
        .await
        .with_context(|| format!("Failed to fetch repositories for {username}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&repos)?);
    } else {
        print!("{}", app::render::repositories(username, &repos));
    }
    Ok(0)
}
