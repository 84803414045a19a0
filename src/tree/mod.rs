//! Tree-widget nodes built from platform listings.

use serde::Serialize;

use crate::platform::{BoxEntry, ListingEntry};

/// Id the tree widget sends for its invisible root.
pub const ROOT_NODE_ID: &str = "#";

/// One node of the browser tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub children: bool,
    /// Viewer derivative id, when the entry has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// Nodes for a data-management listing, in listing order.
pub fn from_dm_listing(entries: &[ListingEntry], can_have_children: bool) -> Vec<TreeNode> {
    entries
        .iter()
        .map(|entry| TreeNode {
            id: entry.self_href().to_string(),
            text: entry.display_name().unwrap_or_default().to_string(),
            kind: entry.kind.clone(),
            children: can_have_children,
            data: entry.derivative_id().map(str::to_string),
        })
        .collect()
}

/// Nodes for a Box folder listing; only folders expand.
pub fn from_box_entries(entries: &[BoxEntry]) -> Vec<TreeNode> {
    entries
        .iter()
        .map(|entry| TreeNode {
            id: entry.id.clone(),
            text: entry.name.clone(),
            kind: entry.kind.clone(),
            children: entry.is_folder(),
            data: None,
        })
        .collect()
}
