//! Web surface of dmbridge.
//!
//! Serves the browser UI, the OAuth sign-in flows for both platforms, the
//! tree listings, and the two transfer endpoints.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::{AppState, OAuthClients};
pub use router::create_router;
pub use server::WebServer;
