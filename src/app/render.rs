// src/app/render.rs
// =============================================================================
// Text output for the terminal.
//
// Everything renders into a String first; the callers decide where it goes.
// That keeps the formatting testable without capturing stdout.
// =============================================================================

use std::fmt::Write;

use crate::github::{Repository, User};
use crate::repos::RowView;

use super::Explorer;

const DESCRIPTION_WIDTH: usize = 70;

/// Renders the whole screen: status line, user rows, expanded repositories
/// and the load-more hint.
pub fn session(explorer: &Explorer) -> String {
    let mut out = String::new();
    let search = explorer.search();

    if let Some(e) = search.error() {
        let _ = writeln!(out, "❌ Error: {e}");
    }

    let query = match search.query() {
        Some(q) => q,
        None => {
            out.push_str("🔍 Search for GitHub users to get started\n");
            return out;
        }
    };

    if search.is_loading() {
        let _ = writeln!(out, "⏳ Searching for \"{query}\"...");
        return out;
    }

    let users = explorer.users();
    if users.is_empty() {
        if search.error().is_none() {
            let _ = writeln!(out, "👤 No users found for \"{query}\"");
        }
        return out;
    }

    let _ = write!(out, "Showing users for \"{query}\"");
    if search.pages_loaded() > 1 {
        let _ = write!(out, " (Page {} loaded)", search.pages_loaded());
    }
    if let Some(total) = search.total_count() {
        let _ = write!(out, " - {total} total");
    }
    out.push('\n');

    for (i, user) in users.iter().enumerate() {
        user_row(&mut out, i + 1, user, explorer);
    }

    if search.is_validating() {
        out.push_str("\n⏳ Loading more users...\n");
    } else if search.has_more() {
        out.push_str("\nType `more` to load the next page.\n");
    }

    out
}

fn user_row(out: &mut String, number: usize, user: &User, explorer: &Explorer) {
    let repos = explorer.repos();
    let view = repos.view(user.id);
    let marker = if view == RowView::Collapsed { "▸" } else { "▾" };
    let loading = if repos.is_loading(user.id) { "  ⏳" } else { "" };

    let _ = writeln!(out, "  [{number:>2}] {marker} {}{loading}", user.login);

    match view {
        RowView::Collapsed => {}
        RowView::Loading if repos.cached(user.id).is_some() => {
            let _ = writeln!(out, "         Refreshing repositories for {}...", user.login);
        }
        RowView::Loading => {
            let _ = writeln!(out, "         Loading repositories for {}...", user.login);
        }
        RowView::Empty | RowView::Loaded([]) => {
            let _ = writeln!(out, "         No public repositories found for {}", user.login);
            if let RowView::Loaded(_) = view {
                let _ = writeln!(out, "         (`refresh {number}` to reload)");
            }
        }
        RowView::Loaded(list) => {
            let _ = writeln!(
                out,
                "         {} repositories (`refresh {number}` to reload)",
                list.len()
            );
            for repo in list {
                repository_line(out, "         ", repo);
            }
        }
    }
}

/// Renders a plain repository listing, as printed by the `repos` command.
pub fn repositories(login: &str, list: &[Repository]) -> String {
    let mut out = String::new();
    if list.is_empty() {
        let _ = writeln!(out, "No public repositories found for {login}");
        return out;
    }

    let _ = writeln!(out, "{} repositories for {login}", list.len());
    for repo in list {
        repository_line(&mut out, "  ", repo);
    }
    out
}

fn repository_line(out: &mut String, indent: &str, repo: &Repository) {
    let language = repo
        .language
        .as_deref()
        .map(|l| format!(" [{l}]"))
        .unwrap_or_default();
    let _ = writeln!(
        out,
        "{indent}⭐ {:>5}  {}{language}  Updated {}",
        repo.stargazers_count,
        repo.name,
        repo.updated_at.format("%Y-%m-%d"),
    );
    let description = repo.description.as_deref().unwrap_or("No description");
    let _ = writeln!(out, "{indent}          {}", truncate(description, DESCRIPTION_WIDTH));
    let _ = writeln!(out, "{indent}          {}", repo.html_url);
}

// Cuts on a char boundary so multi-byte descriptions don't panic.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{cut}...")
}
