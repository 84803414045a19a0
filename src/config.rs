//! Configuration module for dmbridge.

use serde::Deserialize;
use std::path::Path;

use crate::{BridgeError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Whether to serve the browser UI from `static_path`.
    #[serde(default)]
    pub serve_static: bool,
    /// Path to static files directory.
    #[serde(default = "default_static_path")]
    pub static_path: String,
    /// Idle lifetime of a browser session in seconds.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_static_path() -> String {
    "www".to_string()
}

fn default_session_ttl() -> u64 {
    3600 // 1 hour
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            serve_static: false,
            static_path: default_static_path(),
            session_ttl_secs: default_session_ttl(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/dmbridge.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Outbound HTTP client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Total request timeout in seconds. Covers full file downloads and uploads.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// User agent sent to both platforms.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_timeout() -> u64 {
    300
}

fn default_user_agent() -> String {
    format!("dmbridge/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Data-management platform configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DataManagementConfig {
    /// OAuth client id.
    #[serde(default)]
    pub client_id: String,
    /// OAuth client secret.
    #[serde(default)]
    pub client_secret: String,
    /// OAuth redirect URI registered for this application.
    #[serde(default = "default_dm_callback_url")]
    pub callback_url: String,
    /// API base URL.
    #[serde(default = "default_dm_base_url")]
    pub base_url: String,
    /// Scopes of the server-side (full access) token.
    #[serde(default = "default_scope_internal")]
    pub scope_internal: Vec<String>,
    /// Scopes of the token handed to the browser.
    #[serde(default = "default_scope_public")]
    pub scope_public: Vec<String>,
}

fn default_dm_callback_url() -> String {
    "http://localhost:3000/api/forge/callback/oauth".to_string()
}

fn default_dm_base_url() -> String {
    "https://developer.api.autodesk.com".to_string()
}

fn default_scope_internal() -> Vec<String> {
    [
        "data:read",
        "data:write",
        "data:create",
        "data:search",
        "bucket:read",
        "bucket:create",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_scope_public() -> Vec<String> {
    vec!["viewables:read".to_string()]
}

impl Default for DataManagementConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            callback_url: default_dm_callback_url(),
            base_url: default_dm_base_url(),
            scope_internal: default_scope_internal(),
            scope_public: default_scope_public(),
        }
    }
}

/// Box platform configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BoxConfig {
    /// OAuth client id.
    #[serde(default)]
    pub client_id: String,
    /// OAuth client secret.
    #[serde(default)]
    pub client_secret: String,
    /// OAuth redirect URI registered for this application.
    #[serde(default = "default_box_callback_url")]
    pub callback_url: String,
    /// Content API base URL.
    #[serde(default = "default_box_api_base_url")]
    pub api_base_url: String,
    /// Upload API base URL.
    #[serde(default = "default_box_upload_base_url")]
    pub upload_base_url: String,
    /// Authorization endpoint base URL.
    #[serde(default = "default_box_auth_base_url")]
    pub auth_base_url: String,
    /// Token endpoint.
    #[serde(default = "default_box_token_url")]
    pub token_url: String,
}

fn default_box_callback_url() -> String {
    "http://localhost:3000/api/box/callback/oauth".to_string()
}

fn default_box_api_base_url() -> String {
    "https://api.box.com/2.0".to_string()
}

fn default_box_upload_base_url() -> String {
    "https://upload.box.com/api/2.0".to_string()
}

fn default_box_auth_base_url() -> String {
    "https://account.box.com/api/oauth2".to_string()
}

fn default_box_token_url() -> String {
    "https://api.box.com/oauth2/token".to_string()
}

impl Default for BoxConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            callback_url: default_box_callback_url(),
            api_base_url: default_box_api_base_url(),
            upload_base_url: default_box_upload_base_url(),
            auth_base_url: default_box_auth_base_url(),
            token_url: default_box_token_url(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Outbound HTTP configuration.
    #[serde(default)]
    pub http: HttpConfig,
    /// Data-management platform configuration.
    #[serde(default)]
    pub data_management: DataManagementConfig,
    /// Box platform configuration.
    #[serde(default, rename = "box")]
    pub box_platform: BoxConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(BridgeError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| BridgeError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `DMBRIDGE_DM_CLIENT_ID`, `DMBRIDGE_DM_CLIENT_SECRET`
    /// - `DMBRIDGE_BOX_CLIENT_ID`, `DMBRIDGE_BOX_CLIENT_SECRET`
    ///
    /// Empty values are ignored.
    pub fn apply_env_overrides(&mut self) {
        override_from_env("DMBRIDGE_DM_CLIENT_ID", &mut self.data_management.client_id);
        override_from_env(
            "DMBRIDGE_DM_CLIENT_SECRET",
            &mut self.data_management.client_secret,
        );
        override_from_env("DMBRIDGE_BOX_CLIENT_ID", &mut self.box_platform.client_id);
        override_from_env(
            "DMBRIDGE_BOX_CLIENT_SECRET",
            &mut self.box_platform.client_secret,
        );
    }

    /// Validate the configuration.
    ///
    /// Both platforms need a client id and secret for the OAuth flows.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("data_management.client_id", &self.data_management.client_id),
            (
                "data_management.client_secret",
                &self.data_management.client_secret,
            ),
            ("box.client_id", &self.box_platform.client_id),
            ("box.client_secret", &self.box_platform.client_secret),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(BridgeError::Validation(format!(
                "missing credentials: {}. Set them in config.toml or via DMBRIDGE_* environment variables.",
                missing.join(", ")
            )));
        }
        Ok(())
    }
}

fn override_from_env(key: &str, target: &mut String) {
    if let Ok(value) = std::env::var(key) {
        if !value.is_empty() {
            *target = value;
        }
    }
}
