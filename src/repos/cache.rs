// src/repos/cache.rs
// =============================================================================
// Per-user repository cache and expand/collapse state.
//
// Expanding a user row fetches that user's repositories once; collapsing and
// re-expanding reuses the cached list. Only an explicit refresh fetches again.
//
// All per-user state lives in one map keyed by user id, so the rule "at most
// one fetch per user in flight" is a single flag check.
//
// Failures are not surfaced as errors: they are logged, and the row keeps
// whatever it showed before (the empty state if nothing was ever loaded).
// One user's failure never touches another user's entry.
// =============================================================================

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::github::{Error, Repository, User, UserId};

/// A repository fetch the cache wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRequest {
    pub user_id: UserId,
    pub login: String,
}

/// What a user row should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowView<'a> {
    Collapsed,
    Loading,
    /// A cached list exists (possibly empty); a refresh can be offered.
    Loaded(&'a [Repository]),
    /// Nothing loaded: the only fetch so far failed.
    Empty,
}

#[derive(Debug, Default)]
struct Entry {
    loading: bool,
    repos: Option<Vec<Repository>>,
}

#[derive(Debug, Default)]
pub struct RepositoryCache {
    expanded: HashSet<UserId>,
    entries: HashMap<UserId, Entry>,
}

impl RepositoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the expansion of `user`'s row.
    ///
    /// Returns a fetch request when the row opens and nothing is cached or in
    /// flight for this user.
    pub fn toggle(&mut self, user: &User) -> Option<RepoRequest> {
        if self.expanded.remove(&user.id) {
            return None;
        }
        self.expanded.insert(user.id);

        let entry = self.entries.entry(user.id).or_default();
        if entry.repos.is_some() || entry.loading {
            debug!(login = %user.login, "expanding from cache");
            return None;
        }
        entry.loading = true;
        Some(RepoRequest {
            user_id: user.id,
            login: user.login.clone(),
        })
    }

    /// Fetches `user`'s repositories again, whatever is cached.
    ///
    /// Returns `None` only when a fetch for this user is already in flight.
    pub fn refresh(&mut self, user: &User) -> Option<RepoRequest> {
        let entry = self.entries.entry(user.id).or_default();
        if entry.loading {
            return None;
        }
        entry.loading = true;
        Some(RepoRequest {
            user_id: user.id,
            login: user.login.clone(),
        })
    }

    /// Applies the outcome of `request`. Returns `false` if no fetch was in
    /// flight for that user.
    pub fn complete(&mut self, request: &RepoRequest, result: Result<Vec<Repository>, Error>) -> bool {
        let Some(entry) = self.entries.get_mut(&request.user_id) else {
            return false;
        };
        if !entry.loading {
            return false;
        }

        entry.loading = false;
        match result {
            Ok(repos) => entry.repos = Some(repos),
            Err(e) => {
                // A previously loaded list stays; only a success overwrites it.
                warn!(login = %request.login, error = %e, "failed to fetch repositories");
            }
        }
        true
    }

    /// Collapses every row. Cached lists are kept.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn is_expanded(&self, id: UserId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn is_loading(&self, id: UserId) -> bool {
        self.entries.get(&id).is_some_and(|e| e.loading)
    }

    pub fn cached(&self, id: UserId) -> Option<&[Repository]> {
        self.entries.get(&id).and_then(|e| e.repos.as_deref())
    }

    pub fn view(&self, id: UserId) -> RowView<'_> {
        if !self.is_expanded(id) {
            return RowView::Collapsed;
        }
        match self.entries.get(&id) {
            Some(e) if e.loading => RowView::Loading,
            Some(Entry { repos: Some(repos), .. }) => RowView::Loaded(repos.as_slice()),
            _ => RowView::Empty,
        }
    }
}
