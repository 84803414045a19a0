//! OAuth2 authorization-code clients for both platforms.

use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::config::{BoxConfig, DataManagementConfig};
use crate::platform::http::check_response;
use crate::{BridgeError, Result};

use super::credentials::{OAuthToken, TokenResponse};

/// `state` value sent with Box authorization requests.
pub const BOX_OAUTH_STATE: &str = "dmbridge";

/// Three-legged OAuth2 client for one platform.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    authorize_endpoint: String,
    token_endpoint: String,
    refresh_endpoint: String,
    scope: Vec<String>,
    state: Option<String>,
}

impl OAuthClient {
    /// Client for the data-management platform, requesting the internal scope.
    pub fn data_management(http: Client, config: &DataManagementConfig) -> Self {
        let base = config.base_url.trim_end_matches('/');
        Self {
            http,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.callback_url.clone(),
            authorize_endpoint: format!("{base}/authentication/v1/authorize"),
            token_endpoint: format!("{base}/authentication/v1/gettoken"),
            refresh_endpoint: format!("{base}/authentication/v1/refreshtoken"),
            scope: config.scope_internal.clone(),
            state: None,
        }
    }

    /// Client for the Box platform.
    pub fn box_platform(http: Client, config: &BoxConfig) -> Self {
        Self {
            http,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.callback_url.clone(),
            authorize_endpoint: format!(
                "{}/authorize",
                config.auth_base_url.trim_end_matches('/')
            ),
            token_endpoint: config.token_url.clone(),
            refresh_endpoint: config.token_url.clone(),
            scope: Vec::new(),
            state: Some(BOX_OAUTH_STATE.to_string()),
        }
    }

    /// URL the browser is sent to for granting access.
    pub fn authorize_url(&self) -> Result<String> {
        let mut url = Url::parse(&self.authorize_endpoint)
            .map_err(|e| BridgeError::Config(format!("invalid authorize endpoint: {e}")))?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.client_id)
                .append_pair("redirect_uri", &self.redirect_uri);
            if !self.scope.is_empty() {
                query.append_pair("scope", &self.scope.join(" "));
            }
            if let Some(state) = &self.state {
                query.append_pair("state", state);
            }
        }
        Ok(url.into())
    }

    /// Exchange an authorization code for a token.
    pub async fn exchange_code(&self, code: &str) -> Result<OAuthToken> {
        let response = self
            .http
            .post(&self.token_endpoint)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await?;

        let token: TokenResponse = check_response(response).await?.json().await?;
        info!(endpoint = %self.token_endpoint, "Authorization code exchanged");
        Ok(token.into())
    }

    /// Refresh `token`, optionally narrowing it to `scope`.
    pub async fn refresh(&self, token: &OAuthToken, scope: &[String]) -> Result<OAuthToken> {
        let refresh_token = token
            .refresh_token
            .as_deref()
            .ok_or_else(|| BridgeError::Unauthorized("no refresh token issued".to_string()))?;

        let scope = scope.join(" ");
        let mut form = vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];
        if !scope.is_empty() {
            form.push(("scope", scope.as_str()));
        }

        let response = self
            .http
            .post(&self.refresh_endpoint)
            .form(&form)
            .send()
            .await?;

        let token: TokenResponse = check_response(response).await?.json().await?;
        debug!(scope = %scope, "Token refreshed");
        Ok(token.into())
    }
}
