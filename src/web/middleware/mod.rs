//! Middleware for the web API.

pub mod cors;
pub mod session;

pub use cors::create_cors_layer;
pub use session::{removal_cookie, session_cookie, session_id, CurrentSession};
