//! Request DTOs for the web API.

use serde::Deserialize;

/// Body of both transfer endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequestBody {
    /// Source tree-node id.
    pub source_file_id: String,
    /// Destination tree-node id.
    pub destination_container_id: String,
}

/// `?id=` of the tree endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeQuery {
    #[serde(default = "default_tree_id")]
    pub id: String,
}

fn default_tree_id() -> String {
    crate::tree::ROOT_NODE_ID.to_string()
}

/// `?code=` of the OAuth callbacks.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
