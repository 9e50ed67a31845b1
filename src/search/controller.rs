// src/search/controller.rs
// =============================================================================
// Paginated user search as an explicit state machine.
//
// The controller does no I/O. It hands out PageRequests, somebody else runs
// them against the API, and the results come back through `complete`. This
// keeps the sequencing rules checkable in plain unit tests:
//
// - pages of one session are fetched strictly one after another, because
//   page N+1 only exists if page N came back full
// - "load more" while a fetch is in flight does nothing (it is not queued)
// - a new query throws the whole session away; late results for the old
//   session are recognized by their session id and dropped
//
//   Idle --submit--> LoadingFirstPage --ok--> Ready --load_more--> LoadingNextPage
//                          |                   ^                        |
//                          +------err----> Errored <-------err----------+
// =============================================================================

use tracing::{debug, info};

use crate::github::{Error, SearchPage, User};

/// Identifies one search session. Never reused within a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId(u64);

/// A page fetch the controller wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    session: SessionId,
    pub query: String,
    pub page: u32,
    pub per_page: u32,
}

/// Externally visible state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    LoadingFirstPage,
    Ready,
    LoadingNextPage,
    Errored,
}

#[derive(Debug)]
struct Session {
    id: SessionId,
    query: String,
    pages: Vec<SearchPage>,
    // The in-flight page, when set, is always `pages.len() + 1`.
    in_flight: bool,
    error: Option<Error>,
}

impl Session {
    fn next_page(&self) -> Option<u32> {
        match self.pages.last() {
            Some(last) if last.has_more => Some(self.pages.len() as u32 + 1),
            Some(_) => None,
            // Only an errored session can be left without pages; retry page 1.
            None if self.error.is_some() => Some(1),
            None => None,
        }
    }
}

/// Holds the pages fetched so far for the current query.
#[derive(Debug)]
pub struct SearchController {
    per_page: u32,
    next_id: u64,
    session: Option<Session>,
}

impl SearchController {
    pub fn new(per_page: u32) -> Self {
        SearchController {
            per_page,
            next_id: 0,
            session: None,
        }
    }

    /// Starts a new session for `query` and returns the page 1 request.
    ///
    /// A blank query is ignored and returns `None`; the current session is
    /// left untouched.
    pub fn submit(&mut self, query: &str) -> Option<PageRequest> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let id = SessionId(self.next_id);
        self.next_id += 1;
        info!(query, session = id.0, "starting search session");

        self.session = Some(Session {
            id,
            query: query.to_string(),
            pages: Vec::new(),
            in_flight: true,
            error: None,
        });

        Some(PageRequest {
            session: id,
            query: query.to_string(),
            page: 1,
            per_page: self.per_page,
        })
    }

    /// Returns the next page request, or `None` when a fetch is already in
    /// flight or there is nothing more to load.
    pub fn load_more(&mut self) -> Option<PageRequest> {
        let session = self.session.as_mut()?;
        if session.in_flight {
            debug!("load more ignored: fetch already in flight");
            return None;
        }
        let page = session.next_page()?;
        session.in_flight = true;

        Some(PageRequest {
            session: session.id,
            query: session.query.clone(),
            page,
            per_page: self.per_page,
        })
    }

    /// Discards the session and returns to [`SearchState::Idle`].
    pub fn reset(&mut self) {
        self.session = None;
    }

    /// Reacts to an edit of the query text: clearing it resets the search.
    pub fn input_changed(&mut self, text: &str) {
        if text.trim().is_empty() {
            self.reset();
        }
    }

    /// Applies the outcome of `request`.
    ///
    /// Returns `false` when the result was stale (superseded session, or not
    /// the page currently in flight) and got dropped.
    pub fn complete(&mut self, request: &PageRequest, result: Result<SearchPage, Error>) -> bool {
        let Some(session) = self.session.as_mut() else {
            debug!(page = request.page, "dropping result: no active session");
            return false;
        };
        if session.id != request.session
            || !session.in_flight
            || request.page as usize != session.pages.len() + 1
        {
            debug!(page = request.page, "dropping stale search result");
            return false;
        }

        session.in_flight = false;
        match result {
            Ok(page) => {
                session.pages.push(page);
                session.error = None;
            }
            Err(e) => {
                session.error = Some(e);
            }
        }
        true
    }

    pub fn state(&self) -> SearchState {
        match &self.session {
            None => SearchState::Idle,
            Some(s) if s.in_flight && s.pages.is_empty() => SearchState::LoadingFirstPage,
            Some(s) if s.in_flight => SearchState::LoadingNextPage,
            Some(s) if s.error.is_some() => SearchState::Errored,
            Some(_) => SearchState::Ready,
        }
    }

    /// All users fetched so far, pages concatenated in fetch order.
    ///
    /// Users repeated across pages are kept as-is.
    pub fn users(&self) -> impl Iterator<Item = &User> + '_ {
        self.session
            .iter()
            .flat_map(|s| s.pages.iter())
            .flat_map(|p| p.users.iter())
    }

    pub fn has_more(&self) -> bool {
        self.session
            .as_ref()
            .and_then(|s| s.pages.last())
            .is_some_and(|p| p.has_more)
    }

    /// True only while the first page of the session is in flight.
    pub fn is_loading(&self) -> bool {
        self.state() == SearchState::LoadingFirstPage
    }

    /// True while any page fetch is in flight.
    pub fn is_validating(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.in_flight)
    }

    pub fn error(&self) -> Option<&Error> {
        self.session.as_ref().and_then(|s| s.error.as_ref())
    }

    pub fn query(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.query.as_str())
    }

    pub fn pages_loaded(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.pages.len())
    }

    /// Server-reported total of the latest page.
    pub fn total_count(&self) -> Option<u64> {
        self.session
            .as_ref()
            .and_then(|s| s.pages.last())
            .map(|p| p.total_count)
    }
}
