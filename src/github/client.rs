// src/github/client.rs
// =============================================================================
// This module talks to the GitHub REST API.
//
// Two operations:
// - search_users: one page of `/search/users`
// - get_user_repositories: first page of `/users/{username}/repos`,
//   most recently updated first
//
// Both are a single GET. There is no retry, backoff or caching here; the
// search controller and the repository cache decide when to call us.
//
// Rust concepts:
// - async fn: network I/O without blocking the event loop
// - Result<T, Error>: typed errors the caller can match on
// - Clone: reqwest::Client is reference counted, so cloning is cheap
// =============================================================================

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::error::Error;
use super::models::{Repository, SearchPage, SearchResponse};

const ACCEPT_V3: &str = "application/vnd.github.v3+json";

/// Thin wrapper around a preconfigured reqwest client.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: Client,
    base: Url,
}

impl GithubClient {
    /// Creates a client for `base` (e.g. `https://api.github.com`).
    ///
    /// When `token` is set every request carries `Authorization: token <token>`.
    /// Without it requests go out unauthenticated and are subject to the
    /// server's stricter rate limits.
    pub fn new(base: Url, token: Option<&str>, timeout: Option<Duration>) -> Result<Self, Error> {
        if base.cannot_be_a_base() {
            return Err(Error::InvalidConfig(format!("not a base URL: {base}")));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_V3));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("github-user-search/", env!("CARGO_PKG_VERSION"))),
        );

        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("token {token}"))
                .map_err(|_| Error::InvalidConfig("token contains invalid characters".into()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;

        Ok(GithubClient { http, base })
    }

    /// Searches users by `query`, returning page `page` (1-based) of size `per_page`.
    ///
    /// `has_more` on the result is true exactly when the page is full.
    #[instrument(skip(self))]
    pub async fn search_users(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<SearchPage, Error> {
        let mut url = self.endpoint(&["search", "users"]);
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string());

        let response: SearchResponse = self.get_json(url).await?;
        debug!(
            items = response.items.len(),
            total_count = response.total_count,
            "search page received"
        );

        Ok(SearchPage::from_response(response, per_page))
    }

    /// Lists `username`'s public repositories, most recently updated first.
    #[instrument(skip(self))]
    pub async fn get_user_repositories(&self, username: &str) -> Result<Vec<Repository>, Error> {
        let mut url = self.endpoint(&["users", username, "repos"]);
        url.query_pairs_mut()
            .append_pair("sort", "updated")
            .append_pair("direction", "desc")
            .append_pair("page", "1");

        let repos: Vec<Repository> = self.get_json(url).await?;
        debug!(count = repos.len(), "repositories received");

        Ok(repos)
    }

    // Appends escaped path segments to the base URL, keeping any base path
    // (GitHub Enterprise serves the API under /api/v3).
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::from_status(response.status()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why read the body as text and then parse it?
//    - serde_json gives us a typed error for malformed JSON
//    - That error maps to Error::Deserialization via #[from]
//
// 2. What is path_segments_mut()?
//    - A way to append path pieces to a Url with proper escaping
//    - A login can never break out of its segment, even with odd characters
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, token: Option<&str>) -> GithubClient {
        let base = Url::parse(&server.uri()).unwrap();
        GithubClient::new(base, token, None).unwrap()
    }

    fn octocat_items(count: u64) -> Vec<serde_json::Value> {
        (1..=count)
            .map(|id| {
                json!({
                    "id": id,
                    "login": format!("octocat{id}"),
                    "avatar_url": format!("https://github.com/images/{id}.gif"),
                    "type": "User"
                })
            })
            .collect()
    }

    #[tokio::test]
    async fn search_short_page_has_no_more() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/users"))
            .and(query_param("q", "octocat"))
            .and(query_param("per_page", "5"))
            .and(query_param("page", "1"))
            .and(header("accept", ACCEPT_V3))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": octocat_items(3),
                "total_count": 100
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let page = client.search_users("octocat", 1, 5).await.unwrap();

        assert_eq!(page.users.len(), 3);
        assert_eq!(page.users[0].login, "octocat1");
        assert_eq!(page.total_count, 100);
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn search_full_page_has_more() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/users"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": octocat_items(5),
                "total_count": 12
            })))
            .mount(&server)
            .await;

        let page = client_for(&server, None)
            .search_users("octocat", 2, 5)
            .await
            .unwrap();
        assert!(page.has_more);
    }

    #[tokio::test]
    async fn search_empty_page_has_no_more() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [],
                "total_count": 0
            })))
            .mount(&server)
            .await;

        let page = client_for(&server, None)
            .search_users("nobody-at-all", 1, 5)
            .await
            .unwrap();
        assert!(page.users.is_empty());
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn token_is_sent_as_authorization_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/users"))
            .and(header("authorization", "token s3cret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [],
                "total_count": 0
            })))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server, Some("s3cret"))
            .search_users("x", 1, 5)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn no_token_means_no_authorization_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [],
                "total_count": 0
            })))
            .mount(&server)
            .await;

        client_for(&server, None).search_users("x", 1, 5).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.get("authorization").is_none());
        assert!(requests[0].headers.get("user-agent").is_some());
    }

    #[tokio::test]
    async fn error_status_carries_status_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/users"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = client_for(&server, None)
            .search_users("octocat", 1, 5)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Api(ref text) if text == "Forbidden"));
    }

    #[tokio::test]
    async fn malformed_body_is_deserialization_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server, None)
            .search_users("octocat", 1, 5)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Deserialization(_)));
    }

    #[tokio::test]
    async fn repositories_request_is_sorted_by_update() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/repos"))
            .and(query_param("sort", "updated"))
            .and(query_param("direction", "desc"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": 101,
                    "name": "Hello-World",
                    "description": "My first repository",
                    "updated_at": "2025-06-17T07:00:17Z",
                    "stargazers_count": 80,
                    "language": "TypeScript",
                    "html_url": "https://github.com/octocat/Hello-World"
                },
                {
                    "id": 102,
                    "name": "Spoon-Knife",
                    "description": null,
                    "updated_at": "2025-06-16T07:00:17Z",
                    "stargazers_count": 150,
                    "language": null,
                    "html_url": "https://github.com/octocat/Spoon-Knife"
                }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let repos = client_for(&server, None)
            .get_user_repositories("octocat")
            .await
            .unwrap();
        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0].name, "Hello-World");
        assert_eq!(repos[1].stargazers_count, 150);
    }

    #[tokio::test]
    async fn repositories_not_found_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/ghost/repos"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server, None)
            .get_user_repositories("ghost")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "GitHub API error: Not Found");
    }

    #[test]
    fn endpoint_keeps_base_path_and_escapes_segments() {
        let base = Url::parse("https://ghe.example.com/api/v3/").unwrap();
        let client = GithubClient::new(base, None, None).unwrap();
        let url = client.endpoint(&["users", "a b", "repos"]);
        assert_eq!(url.as_str(), "https://ghe.example.com/api/v3/users/a%20b/repos");
    }

    #[test]
    fn token_with_newline_is_rejected() {
        let base = Url::parse("https://api.github.com").unwrap();
        let err = GithubClient::new(base, Some("bad\ntoken"), None).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
