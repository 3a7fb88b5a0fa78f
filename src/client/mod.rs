//! Client for the remote OCL `$match` HTTP endpoint.
//!
//! The matching service is injected behind [`MatchBackend`] so the matcher
//! pipeline can be exercised without a network (see [`MockMatchBackend`]).
//!
//! Requests carry no timeout: a hung endpoint blocks the run. This mirrors
//! upstream behavior and is a known robustness gap.

mod error;
mod types;

#[cfg(any(test, feature = "mock"))]
mod mock;

#[cfg(test)]
mod tests;

pub use error::ClientError;
pub use types::{ApiCandidate, JsonRow, MatchParams, MatchRequest, RowMatches, SearchMeta};

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockMatchBackend, MockReply};

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use tracing::debug;

/// The matching capability consumed by the matcher pipeline.
#[async_trait]
pub trait MatchBackend: Send + Sync {
    /// Submits one chunk of rows and returns one [`RowMatches`] per row, in
    /// submission order.
    async fn match_chunk(
        &self,
        request: &MatchRequest,
        params: &MatchParams,
    ) -> Result<Vec<RowMatches>, ClientError>;
}

/// reqwest-backed [`MatchBackend`] for a live OCL API.
pub struct HttpMatchClient {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl std::fmt::Debug for HttpMatchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMatchClient")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "*******"))
            .finish()
    }
}

impl HttpMatchClient {
    /// Builds a client for `{base_url}{endpoint}` with an optional API token.
    pub fn new(
        base_url: &str,
        endpoint: &str,
        token: Option<String>,
    ) -> Result<Self, ClientError> {
        if base_url.trim().is_empty() {
            return Err(ClientError::InvalidConfig {
                reason: "base URL cannot be empty".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .build()
            .map_err(|source| ClientError::Transport { source })?;

        Ok(Self {
            client,
            url: format!("{base_url}{endpoint}"),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MatchBackend for HttpMatchClient {
    async fn match_chunk(
        &self,
        request: &MatchRequest,
        params: &MatchParams,
    ) -> Result<Vec<RowMatches>, ClientError> {
        debug!(
            url = %self.url,
            rows = request.rows.len(),
            limit = params.limit,
            "Submitting match chunk"
        );

        let mut http_request = self.client.post(&self.url).query(params).json(request);
        if let Some(ref token) = self.token {
            http_request = http_request.header(AUTHORIZATION, format!("Token {token}"));
        }

        let response = http_request
            .send()
            .await
            .map_err(|source| ClientError::Transport { source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|source| ClientError::Decode { source })
    }
}
