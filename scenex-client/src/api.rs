//! HTTP client for the modelling backend.
//!
//! The [`ScenarioApi`] trait is the seam the gateway talks through;
//! [`ApiClient`] is the reqwest-backed production implementation with
//! bearer authentication from the session token store.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use scenex_contracts::build::{
    BuildScenarioRequest, BuildScenarioResponse,
};
use scenex_contracts::listing::{ListScenariosQuery, ScenarioSummary};
use scenex_contracts::routes::v1;

use crate::error::SubmitError;
use crate::session::SessionContext;

/// Default per-request timeout, overridable per client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Backend operations the engine depends on.
#[async_trait]
pub trait ScenarioApi: Send + Sync {
    /// POST the canonical build payload.
    async fn submit_build(
        &self,
        payload: &BuildScenarioRequest,
    ) -> Result<BuildScenarioResponse, SubmitError>;

    /// GET record-shaped scenario listings.
    async fn list_scenarios(
        &self,
        query: &ListScenariosQuery,
    ) -> Result<Vec<ScenarioSummary>, SubmitError>;
}

/// API client with authentication support.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SessionContext,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("has_token", &self.session.token().is_some())
            .finish()
    }
}

impl ApiClient {
    /// Create a new API client with the default timeout.
    pub fn new(base_url: impl Into<String>, session: SessionContext) -> Self {
        Self::with_timeout(base_url, session, DEFAULT_TIMEOUT)
    }

    /// Create a new API client with a caller-configured timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        session: SessionContext,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        let base_url = base_url.into();
        log::info!(
            "[ApiClient] Creating new API client with base URL: {}",
            base_url
        );

        ApiClient {
            client,
            base_url,
            session,
        }
    }

    /// Build a full URL from a route path.
    pub fn build_url(&self, path: impl AsRef<str>) -> String {
        let p = path.as_ref();
        if p.starts_with("http://") || p.starts_with("https://") {
            return p.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            p.trim_start_matches('/')
        )
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn bearer_token(&self) -> Result<String, SubmitError> {
        // Fail fast before any network call.
        self.session.token().ok_or(SubmitError::Auth)
    }
}

#[async_trait]
impl ScenarioApi for ApiClient {
    async fn submit_build(
        &self,
        payload: &BuildScenarioRequest,
    ) -> Result<BuildScenarioResponse, SubmitError> {
        let token = self.bearer_token()?;
        let url = self.build_url(v1::scenarios::BUILD);
        log::debug!("POST request to: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(payload)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => response
                .json::<BuildScenarioResponse>()
                .await
                .map_err(|_| SubmitError::InvalidResponse),
            status => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                Err(SubmitError::Http {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }

    async fn list_scenarios(
        &self,
        query: &ListScenariosQuery,
    ) -> Result<Vec<ScenarioSummary>, SubmitError> {
        let token = self.bearer_token()?;
        let url = self.build_url(v1::scenarios::LIST);
        log::debug!("GET request to: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&query.to_pairs())
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => response
                .json::<Vec<ScenarioSummary>>()
                .await
                .map_err(|_| SubmitError::InvalidResponse),
            status => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                Err(SubmitError::Http {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_joins_base_and_path() {
        let session = SessionContext::new();
        let client = ApiClient::new("https://models.example.com/", session);
        assert_eq!(
            client.build_url(v1::scenarios::BUILD),
            "https://models.example.com/api/v1/models/scenario"
        );
        // Absolute URLs pass through untouched
        assert_eq!(
            client.build_url("https://elsewhere.example.com/x"),
            "https://elsewhere.example.com/x"
        );
    }

    #[tokio::test]
    async fn requests_without_token_fail_fast() {
        let session = SessionContext::new();
        // Port 9 (discard) would hang if a connection were attempted;
        // the auth check must fire before any network activity.
        let client = ApiClient::with_timeout(
            "http://127.0.0.1:9",
            session,
            Duration::from_millis(50),
        );
        let result = client
            .list_scenarios(&ListScenariosQuery::default())
            .await;
        assert!(matches!(result, Err(SubmitError::Auth)));
    }
}
