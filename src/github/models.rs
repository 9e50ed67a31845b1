// src/github/models.rs
// =============================================================================
// Data types returned by the GitHub REST API.
//
// Only the fields we display are declared. serde ignores everything else in
// the response (e.g. the `type` field on search items).
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a user within a search session.
pub type UserId = u64;

/// A single user item from the search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub login: String,
    pub avatar_url: String,
}

/// A public repository from `/users/{username}/repos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub stargazers_count: u64,
    pub language: Option<String>,
    pub html_url: String,
}

/// Raw body of `/search/users`.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub items: Vec<User>,
    pub total_count: u64,
}

/// One page of a user search plus its continuation flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchPage {
    pub users: Vec<User>,
    pub total_count: u64,
    /// True iff the page came back full. The API gives no page count, so a
    /// short page is the only end-of-results signal.
    pub has_more: bool,
}

impl SearchPage {
    pub(crate) fn from_response(response: SearchResponse, per_page: u32) -> Self {
        let has_more = response.items.len() == per_page as usize;
        SearchPage {
            users: response.items,
            total_count: response.total_count,
            has_more,
        }
    }
}
