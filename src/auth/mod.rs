//! Authentication module for dmbridge.
//!
//! Holds the per-platform OAuth2 clients, the in-memory browser session
//! store, and the [`CredentialProvider`] interface the transfer core reads
//! credentials through.

mod credentials;
mod oauth;
mod session;

pub use credentials::{Credential, CredentialProvider, OAuthToken, TransferCredentials};
pub use oauth::{OAuthClient, BOX_OAUTH_STATE};
pub use session::{
    Session, SessionCredentials, SessionStore, DEFAULT_SESSION_TTL_SECS, SESSION_COOKIE,
};
