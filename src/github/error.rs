// src/github/error.rs
// =============================================================================
// Error type for GitHub API calls.
//
// Every HTTP-level failure (non-2xx status or a network error) is one generic
// kind carrying a short message. There is no special handling for rate limits
// or 404s: callers only need to know that the call failed and why.
// =============================================================================

/// Errors returned by [`super::GithubClient`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Non-successful response or transport failure.
    ///
    /// Holds the response's status text (e.g. "Not Found"), or the transport
    /// error message when no response arrived.
    #[error("GitHub API error: {0}")]
    Api(String),

    /// The response body was not the JSON shape we expect.
    #[error("Failed to deserialize GitHub response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The client could not be built from its configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Api(e.to_string())
    }
}

impl Error {
    /// Builds an [`Error::Api`] from an HTTP status.
    pub(crate) fn from_status(status: reqwest::StatusCode) -> Self {
        let text = status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_u16().to_string());
        Error::Api(text)
    }
}
