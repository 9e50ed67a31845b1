// src/app/mod.rs
// =============================================================================
// Ties the search controller and the repository cache together.
//
// The controllers never touch the network. They return Fetch values; the
// front-end runs them with `run_fetch` whenever it likes (one at a time for
// the one-shot commands, several at once in the shell) and feeds each
// Completion back through `Explorer::apply`.
//
// Submodules:
// - render: turns the current state into text
// - shell: the interactive event loop
// =============================================================================

pub mod render;
pub mod shell;

use crate::github::{Error, GithubClient, Repository, SearchPage, User};
use crate::repos::{RepoRequest, RepositoryCache, RowView};
use crate::search::{PageRequest, SearchController};

/// Network work requested by the explorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch {
    Page(PageRequest),
    Repos(RepoRequest),
}

/// A finished fetch, ready to be applied.
#[derive(Debug)]
pub enum Completion {
    Page(PageRequest, Result<SearchPage, Error>),
    Repos(RepoRequest, Result<Vec<Repository>, Error>),
}

/// Runs one fetch to completion. Never fails: errors travel inside the
/// Completion so the owning controller decides what to do with them.
pub async fn run_fetch(client: GithubClient, fetch: Fetch) -> Completion {
    match fetch {
        Fetch::Page(request) => {
            let result = client
                .search_users(&request.query, request.page, request.per_page)
                .await;
            Completion::Page(request, result)
        }
        Fetch::Repos(request) => {
            let result = client.get_user_repositories(&request.login).await;
            Completion::Repos(request, result)
        }
    }
}

/// State of one user-search screen: the search session plus the per-user
/// repository rows.
#[derive(Debug)]
pub struct Explorer {
    search: SearchController,
    repos: RepositoryCache,
}

impl Explorer {
    pub fn new(per_page: u32) -> Self {
        Explorer {
            search: SearchController::new(per_page),
            repos: RepositoryCache::new(),
        }
    }

    /// Starts a search for `query`. Expanded rows are collapsed before the
    /// first page is requested. Blank queries do nothing, and neither does a
    /// submit while the first page of the current search is in flight.
    pub fn submit(&mut self, query: &str) -> Option<Fetch> {
        if query.trim().is_empty() || self.search.is_loading() {
            return None;
        }
        self.repos.collapse_all();
        self.search.submit(query).map(Fetch::Page)
    }

    pub fn load_more(&mut self) -> Option<Fetch> {
        self.search.load_more().map(Fetch::Page)
    }

    /// Back to the start screen. Repository caches survive.
    pub fn clear(&mut self) {
        self.search.reset();
        self.repos.collapse_all();
    }

    /// The query text was edited. Emptying it returns to the start screen,
    /// like `clear`.
    pub fn input_changed(&mut self, text: &str) {
        if text.trim().is_empty() {
            self.repos.collapse_all();
        }
        self.search.input_changed(text);
    }

    /// Expands or collapses the row at `index` (0-based).
    ///
    /// `Err` means there is no such row.
    pub fn toggle(&mut self, index: usize) -> Result<Option<Fetch>, usize> {
        let user = self.user_at(index).ok_or(index)?;
        Ok(self.repos.toggle(&user).map(Fetch::Repos))
    }

    /// Reloads the repositories of the row at `index` (0-based).
    ///
    /// Only an expanded row whose list has loaded can be refreshed.
    pub fn refresh(&mut self, index: usize) -> Result<Option<Fetch>, usize> {
        let user = self.user_at(index).ok_or(index)?;
        if !matches!(self.repos.view(user.id), RowView::Loaded(_)) {
            return Ok(None);
        }
        Ok(self.repos.refresh(&user).map(Fetch::Repos))
    }

    /// What the row at `index` (0-based) currently shows.
    pub fn row_view(&self, index: usize) -> Option<RowView<'_>> {
        let id = self.search.users().nth(index)?.id;
        Some(self.repos.view(id))
    }

    pub fn apply(&mut self, completion: Completion) -> bool {
        match completion {
            Completion::Page(request, result) => self.search.complete(&request, result),
            Completion::Repos(request, result) => self.repos.complete(&request, result),
        }
    }

    pub fn users(&self) -> Vec<&User> {
        self.search.users().collect()
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn repos(&self) -> &RepositoryCache {
        &self.repos
    }

    fn user_at(&self, index: usize) -> Option<User> {
        self.search.users().nth(index).cloned()
    }
}
