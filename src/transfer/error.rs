//! Failure taxonomy of a single transfer.

use thiserror::Error;

use crate::BridgeError;

/// Message reported when a data-management version has no storage link.
pub const NO_STORAGE_MESSAGE: &str = "No storage defined, cannot transfer.";

/// Why a transfer stopped.
///
/// Every variant displays the underlying message unchanged.
#[derive(Error, Debug)]
pub enum TransferError {
    /// The session lacks credentials for one side of the transfer.
    #[error("{0}")]
    Unauthorized(String),

    /// The source or destination id could not be parsed.
    #[error("{0}")]
    InvalidReference(BridgeError),

    /// Source metadata could not be fetched.
    #[error("{0}")]
    SourceNotFound(BridgeError),

    /// The source version exists but carries no storage link.
    #[error("{}", NO_STORAGE_MESSAGE)]
    NoStorageDefined,

    /// A project's root folder could not be looked up.
    #[error("{0}")]
    ContainerResolutionFailed(BridgeError),

    /// The destination refused to allocate a storage slot.
    #[error("{0}")]
    StorageAllocationFailed(BridgeError),

    /// Source bytes could not be downloaded.
    #[error("{0}")]
    DownloadFailed(BridgeError),

    /// Bytes could not be uploaded to the destination.
    #[error("{0}")]
    UploadFailed(BridgeError),

    /// The destination container could not be listed.
    #[error("{0}")]
    ContentListingFailed(BridgeError),

    /// Bytes are uploaded but no item or version references them.
    #[error("{0}")]
    ItemOrVersionCreationFailed(BridgeError),
}

impl TransferError {
    /// Underlying platform error, if any.
    pub fn source_error(&self) -> Option<&BridgeError> {
        match self {
            TransferError::Unauthorized(_) | TransferError::NoStorageDefined => None,
            TransferError::InvalidReference(e)
            | TransferError::SourceNotFound(e)
            | TransferError::ContainerResolutionFailed(e)
            | TransferError::StorageAllocationFailed(e)
            | TransferError::DownloadFailed(e)
            | TransferError::UploadFailed(e)
            | TransferError::ContentListingFailed(e)
            | TransferError::ItemOrVersionCreationFailed(e) => Some(e),
        }
    }

    /// HTTP status to report for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            TransferError::Unauthorized(_) => 401,
            TransferError::InvalidReference(_) => 400,
            other => other
                .source_error()
                .and_then(BridgeError::upstream_status)
                .unwrap_or(500),
        }
    }
}
