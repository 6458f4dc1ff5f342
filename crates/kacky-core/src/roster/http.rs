use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::debug;

use super::errors::FetchError;
use super::source::RosterSource;
use super::types::ServerSnapshot;
use super::wire::decode_roster;
use crate::config::ApiConfig;
use crate::session::Credential;

/// Roster source backed by the dashboard HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpRosterSource {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpRosterSource {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("kacky/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Network {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoint: dashboard_endpoint(api_url),
            timeout,
        })
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self, FetchError> {
        Self::new(api.url(), Duration::from_secs(api.timeout_secs()))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn classify(&self, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            FetchError::Network {
                message: error.to_string(),
            }
        }
    }
}

fn dashboard_endpoint(api_url: &str) -> String {
    format!("{}/dashboard", api_url.trim_end_matches('/'))
}

impl RosterSource for HttpRosterSource {
    async fn fetch_roster(
        &self,
        credential: &Credential,
    ) -> Result<Vec<ServerSnapshot>, FetchError> {
        let mut request = self.client.get(&self.endpoint);
        if let Some(token) = credential.token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();

        debug!(
            event = "core.roster.http_response",
            endpoint = %self.endpoint,
            status = status.as_u16(),
        );

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchError::Unauthorized {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        decode_roster(&body)
    }
}
