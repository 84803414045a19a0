//! Shared HTTP plumbing for the platform clients.

use std::time::Duration;

use reqwest::{Client, Response};

use crate::config::HttpConfig;
use crate::{BridgeError, Result};

/// Content type of JSON:API request bodies.
pub const JSON_API_CONTENT_TYPE: &str = "application/vnd.api+json";

/// Upper bound on followed listing pages.
pub(crate) const MAX_LISTING_PAGES: usize = 100;

/// Build the HTTP client shared by every platform client.
pub fn build_client(config: &HttpConfig) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|e| BridgeError::Http(format!("failed to create HTTP client: {}", e)))
}

/// Pass successful responses through; turn anything else into [`BridgeError::Api`].
///
/// The upstream body becomes the error message unchanged.
pub async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("remote request failed")
            .to_string()
    } else {
        body
    };

    Err(BridgeError::Api {
        status: status.as_u16(),
        message,
    })
}
