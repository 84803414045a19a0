//! HTTP server: binds the listener, mounts the routers and runs the idle
//! session sweep alongside.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::compression::CompressionLayer;
use tracing::{debug, error, info, warn};

use crate::auth::SessionStore;
use crate::config::ServerConfig;
use crate::{BridgeError, Result};

use super::handlers::AppState;
use super::router::{create_health_router, create_router, create_static_router};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

pub struct WebServer {
    addr: SocketAddr,
    app_state: Arc<AppState>,
    config: ServerConfig,
}

impl WebServer {
    pub fn new(config: &ServerConfig, app_state: AppState) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| BridgeError::Config(format!("invalid server address: {e}")))?;

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            config: config.clone(),
        })
    }

    /// Configured listen address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn spawn_session_sweep(sessions: SessionStore) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
            // First tick fires immediately
            interval.tick().await;

            loop {
                interval.tick().await;
                match sessions.cleanup_expired().await {
                    0 => debug!("No idle sessions to drop"),
                    n => {
                        let remaining = sessions.len().await;
                        info!(dropped = n, remaining, "Dropped idle sessions");
                    }
                }
            }
        })
    }

    fn build_router(&self) -> Router {
        let mut router = create_router(self.app_state.clone(), &self.config.cors_origins)
            .merge(create_health_router());

        if self.config.serve_static {
            match create_static_router(&self.config.static_path) {
                Some(ui) => router = router.merge(ui),
                None => warn!(path = %self.config.static_path, "Browser UI not served"),
            }
        }

        router.layer(CompressionLayer::new())
    }

    async fn bind(&self) -> Result<(TcpListener, SocketAddr)> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        info!("Listening on http://{}", local_addr);
        Ok((listener, local_addr))
    }

    /// Serve until Ctrl+C.
    pub async fn run(self) -> Result<()> {
        let router = self.build_router();
        let (listener, _) = self.bind().await?;
        let sweep = Self::spawn_session_sweep(self.app_state.sessions.clone());

        let served = axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await;
        sweep.abort();
        info!("Server stopped");
        Ok(served?)
    }

    /// Serve in the background and return the bound address.
    ///
    /// Binding to port 0 picks a free port, which is what tests want.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let router = self.build_router();
        let (listener, local_addr) = self.bind().await?;
        Self::spawn_session_sweep(self.app_state.sessions.clone());

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => {
            error!("Cannot listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn create_test_config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Use random port
            ..ServerConfig::default()
        }
    }

    #[test]
    fn test_web_server_new() {
        let state = AppState::from_config(&Config::default()).unwrap();
        let server = WebServer::new(&create_test_config(), state).unwrap();
        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
    }

    #[test]
    fn test_web_server_invalid_address() {
        let state = AppState::from_config(&Config::default()).unwrap();
        let config = ServerConfig {
            host: "not an address".to_string(),
            ..create_test_config()
        };
        assert!(matches!(
            WebServer::new(&config, state),
            Err(BridgeError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_web_server_run() {
        let state = AppState::from_config(&Config::default()).unwrap();
        let server = WebServer::new(&create_test_config(), state).unwrap();
        let addr = server.run_with_addr().await.unwrap();

        let client = reqwest::Client::new();
        let resp = client
            .get(format!("http://{}/health", addr))
            .send()
            .await
            .unwrap();

        assert!(resp.status().is_success());
        assert_eq!(resp.text().await.unwrap(), "OK");

        let resp = client
            .get(format!("http://{}/box/isAuthorized", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.text().await.unwrap(), "false");
    }
}
