//! dmbridge - file transfer bridge between a CAD/BIM data-management
//! platform and Box.
//!
//! Users sign in to both platforms in the browser, browse both folder trees
//! and copy single files across. The interesting part lives in
//! [`transfer`]: resolving the source, allocating destination storage,
//! moving the bytes and deciding between a new item and a new version.

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod platform;
pub mod transfer;
pub mod tree;
pub mod web;

pub use auth::{Credential, CredentialProvider, SessionStore, TransferCredentials};
pub use config::Config;
pub use error::{BridgeError, Result};
pub use transfer::{
    Direction, TransferError, TransferOrchestrator, TransferOutcome, TransferRequest,
    TransferResult,
};
