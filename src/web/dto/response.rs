//! Response DTOs for the web API.

use serde::Serialize;

/// Successful transfer.
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    /// Always `"OK"`.
    pub result: &'static str,
    /// Name of the transferred file.
    pub file: String,
}

impl TransferResponse {
    pub fn ok(file: impl Into<String>) -> Self {
        Self {
            result: "OK",
            file: file.into(),
        }
    }
}
