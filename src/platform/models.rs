//! Wire models shared by the platform clients and their callers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{href}` link object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResourceLinks {
    #[serde(rename = "self")]
    pub self_link: Option<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryAttributes {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// One JSON:API resource of a data-management listing (hub, project, folder,
/// item or version).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ListingEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(default)]
    pub attributes: EntryAttributes,
    #[serde(default)]
    pub links: ResourceLinks,
    #[serde(default)]
    pub relationships: Option<Value>,
}

impl ListingEntry {
    /// Minimal entry, mostly useful for tests and fakes.
    pub fn new(kind: &str, id: &str, display_name: &str) -> Self {
        Self {
            kind: kind.to_string(),
            id: id.to_string(),
            attributes: EntryAttributes {
                display_name: Some(display_name.to_string()),
                name: None,
            },
            ..Self::default()
        }
    }

    /// `displayName`, falling back to `name`.
    pub fn display_name(&self) -> Option<&str> {
        self.attributes
            .display_name
            .as_deref()
            .or(self.attributes.name.as_deref())
    }

    /// `links.self.href`, falling back to the id.
    pub fn self_href(&self) -> &str {
        self.links
            .self_link
            .as_ref()
            .map(|l| l.href.as_str())
            .unwrap_or(&self.id)
    }

    /// Viewer derivative id (`relationships.derivatives.data.id`).
    pub fn derivative_id(&self) -> Option<&str> {
        self.relationships
            .as_ref()?
            .pointer("/derivatives/data/id")?
            .as_str()
    }
}

/// Metadata of a data-management version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub display_name: String,
    /// Download location of the version's bytes, if storage is attached.
    pub storage_link: Option<String>,
}

/// A data-management project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    pub project_id: String,
    pub root_folder_id: String,
}

/// Version produced by an item or version creation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedVersion {
    pub version_id: String,
}

/// Signed-in data-management user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub name: String,
    pub picture: Option<String>,
}

/// A Box file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BoxFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
}

/// One entry of a Box folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BoxEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
}

impl BoxEntry {
    pub fn is_folder(&self) -> bool {
        self.kind == "folder"
    }
}
