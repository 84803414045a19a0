//! References, storage slots and results exchanged by the transfer pipeline.

use std::fmt;

use serde::Serialize;

use crate::{BridgeError, Result};

use super::error::TransferError;
use super::mime::file_extension;

/// Which way a file moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Data-management version → Box folder.
    ToBox,
    /// Box file → data-management folder or project.
    ToDataManagement,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::ToBox => f.write_str("data-management → box"),
            Direction::ToDataManagement => f.write_str("box → data-management"),
        }
    }
}

/// A path-like platform identifier such as
/// `/data/v1/projects/{project}/versions/{version}`, reduced to its last
/// three segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath {
    /// Id of the enclosing resource (`{project}` above), if present.
    pub parent_id: Option<String>,
    /// Collection name of the leaf (`versions` above).
    pub kind: String,
    /// Leaf id (`{version}` above).
    pub id: String,
}

impl ResourcePath {
    /// Parse an identifier as sent by the browser.
    ///
    /// The identifier is URL-decoded once as a whole, then every segment is
    /// decoded again so ids that were escaped inside the href come out raw.
    pub fn parse(raw: &str) -> Result<Self> {
        let decoded = urlencoding::decode(raw)
            .map_err(|e| BridgeError::InvalidReference(format!("{raw}: {e}")))?;

        let segments: Vec<String> = decoded
            .trim_end_matches('/')
            .split('/')
            .map(|s| {
                urlencoding::decode(s)
                    .map(|d| d.into_owned())
                    .unwrap_or_else(|_| s.to_string())
            })
            .collect();

        let n = segments.len();
        if n < 2 || segments[n - 1].is_empty() || segments[n - 2].is_empty() {
            return Err(BridgeError::InvalidReference(format!(
                "'{raw}' is not a resource path"
            )));
        }

        let parent_id = (n >= 3)
            .then(|| segments[n - 3].clone())
            .filter(|p| !p.is_empty());

        Ok(Self {
            parent_id,
            kind: segments[n - 2].clone(),
            id: segments[n - 1].clone(),
        })
    }

    fn require_parent(&self) -> Result<&str> {
        self.parent_id.as_deref().ok_or_else(|| {
            BridgeError::InvalidReference(format!("{} '{}' has no parent", self.kind, self.id))
        })
    }
}

/// A data-management version addressed by project and version id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionReference {
    /// Project owning the version.
    pub project_id: String,
    /// Version id.
    pub version_id: String,
}

impl VersionReference {
    /// Parse `/data/v1/projects/{project}/versions/{version}`.
    pub fn parse(raw: &str) -> Result<Self> {
        let path = ResourcePath::parse(raw)?;
        Ok(Self {
            project_id: path.require_parent()?.to_string(),
            version_id: path.id,
        })
    }
}

/// Destination container on the data-management platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerReference {
    /// A folder inside a project.
    Folder {
        /// Project owning the folder.
        project_id: String,
        /// Folder id.
        folder_id: String,
    },
    /// A top-level project; its root folder must be looked up first.
    Project {
        /// Hub owning the project.
        hub_id: String,
        /// Project id.
        project_id: String,
    },
}

impl ContainerReference {
    /// Parse a folder (`.../projects/{p}/folders/{f}`) or project
    /// (`.../hubs/{h}/projects/{p}`) tree-node id.
    pub fn parse(raw: &str) -> Result<Self> {
        let path = ResourcePath::parse(raw)?;
        let parent = path.require_parent()?.to_string();
        match path.kind.as_str() {
            "folders" => Ok(ContainerReference::Folder {
                project_id: parent,
                folder_id: path.id,
            }),
            "projects" => Ok(ContainerReference::Project {
                hub_id: parent,
                project_id: path.id,
            }),
            other => Err(BridgeError::InvalidReference(format!(
                "cannot transfer into '{other}'"
            ))),
        }
    }

    /// Id of the referenced folder or project.
    pub fn container_id(&self) -> &str {
        match self {
            ContainerReference::Folder { folder_id, .. } => folder_id,
            ContainerReference::Project { project_id, .. } => project_id,
        }
    }

    /// Id of the enclosing project or hub.
    pub fn parent_container_id(&self) -> &str {
        match self {
            ContainerReference::Folder { project_id, .. } => project_id,
            ContainerReference::Project { hub_id, .. } => hub_id,
        }
    }

    /// Project the container belongs to.
    pub fn project_id(&self) -> &str {
        match self {
            ContainerReference::Folder { project_id, .. } => project_id,
            ContainerReference::Project { project_id, .. } => project_id,
        }
    }
}

/// Box folder id as sent by the tree widget; `#` is the root folder.
pub fn box_folder_id(raw: &str) -> &str {
    match raw {
        "#" | "" => "0",
        id => id,
    }
}

/// A resolved source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReference {
    /// Platform-specific file or version id.
    pub platform_file_id: String,
    /// Name shown to users; also the name used on the destination.
    pub display_name: String,
    /// Size in bytes, when the platform reports it.
    pub byte_size: Option<u64>,
    /// Final extension of `display_name`.
    pub extension: Option<String>,
}

impl FileReference {
    /// Build a reference, deriving the extension from the name.
    pub fn new(platform_file_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        let extension = file_extension(&display_name).map(str::to_string);
        Self {
            platform_file_id: platform_file_id.into(),
            display_name,
            byte_size: None,
            extension,
        }
    }

    /// Attach a byte size.
    pub fn with_size(mut self, byte_size: u64) -> Self {
        self.byte_size = Some(byte_size);
        self
    }
}

/// Write-once object-storage location allocated on the data-management platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSlot {
    /// Full storage object id as returned by the allocation call.
    pub object_id: String,
    /// Bucket key.
    pub bucket_key: String,
    /// Object name inside the bucket.
    pub object_name: String,
}

impl StorageSlot {
    /// Parse `urn:adsk.objects:os.object:BUCKET_KEY/OBJECT_NAME`.
    pub fn parse(object_id: &str) -> Result<Self> {
        let (head, object_name) = object_id.rsplit_once('/').ok_or_else(|| {
            BridgeError::InvalidReference(format!("storage id '{object_id}' has no object name"))
        })?;
        let bucket_key = head.rsplit(':').next().unwrap_or(head);

        if bucket_key.is_empty() || object_name.is_empty() {
            return Err(BridgeError::InvalidReference(format!(
                "storage id '{object_id}' is incomplete"
            )));
        }

        Ok(Self {
            object_id: object_id.to_string(),
            bucket_key: bucket_key.to_string(),
            object_name: object_name.to_string(),
        })
    }
}

/// What the destination ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferAction {
    /// A new data-management item (with its first version).
    CreatedItem,
    /// A new version of an existing data-management item.
    CreatedVersion,
    /// A new Box file.
    UploadedFile,
}

/// Successful transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Name of the transferred file.
    pub file_name: String,
    /// What was created on the destination.
    pub action: TransferAction,
    /// Id of the created version or file.
    pub created_id: Option<String>,
}

/// Status of a [`TransferResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransferStatus {
    /// Transfer completed.
    Ok,
    /// Transfer failed.
    Error,
}

/// Result descriptor returned once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResult {
    /// Outcome status.
    pub status: TransferStatus,
    /// Transferred file name (success only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Failure message, unchanged from the failing step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// HTTP status to answer with: 200, or the failing step's status.
    #[serde(skip)]
    pub status_code: u16,
}

impl TransferResult {
    /// Successful result.
    pub fn ok(file_name: impl Into<String>) -> Self {
        Self {
            status: TransferStatus::Ok,
            file_name: Some(file_name.into()),
            error_message: None,
            status_code: 200,
        }
    }

    /// Failed result.
    pub fn error(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status: TransferStatus::Error,
            file_name: None,
            error_message: Some(message.into()),
            status_code,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == TransferStatus::Ok
    }
}

impl From<&TransferError> for TransferResult {
    fn from(err: &TransferError) -> Self {
        Self::error(err.status_code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_storage_object_id() {
        let slot = StorageSlot::parse("urn:adsk.objects:os.object:BUCKET1/OBJ1").unwrap();
        assert_eq!(slot.bucket_key, "BUCKET1");
        assert_eq!(slot.object_name, "OBJ1");
        assert_eq!(slot.object_id, "urn:adsk.objects:os.object:BUCKET1/OBJ1");
    }

    #[test]
    fn test_parse_storage_object_id_realistic() {
        let slot =
            StorageSlot::parse("urn:adsk.objects:os.object:wip.dm.prod/2a6d61f2-49df.dwg").unwrap();
        assert_eq!(slot.bucket_key, "wip.dm.prod");
        assert_eq!(slot.object_name, "2a6d61f2-49df.dwg");
    }

    #[test]
    fn test_parse_storage_object_id_invalid() {
        assert!(StorageSlot::parse("no-slash-here").is_err());
        assert!(StorageSlot::parse("urn:adsk.objects:os.object:BUCKET/").is_err());
        assert!(StorageSlot::parse("urn:adsk.objects:os.object:/OBJ").is_err());
    }

    #[test]
    fn test_parse_version_reference() {
        let r = VersionReference::parse("/data/v1/projects/a.proj/versions/ver1").unwrap();
        assert_eq!(r.project_id, "a.proj");
        assert_eq!(r.version_id, "ver1");
    }

    #[test]
    fn test_parse_version_reference_encoded() {
        // Browser sends encodeURIComponent(href); the href itself escapes the URN
        let raw = urlencoding::encode(
            "https://developer.api.autodesk.com/data/v1/projects/b.p1/versions/urn%3Aadsk.wipprod%3Afs.file%3Avf.X%3Fversion%3D2",
        )
        .into_owned();
        let r = VersionReference::parse(&raw).unwrap();
        assert_eq!(r.project_id, "b.p1");
        assert_eq!(r.version_id, "urn:adsk.wipprod:fs.file:vf.X?version=2");
    }

    #[test]
    fn test_parse_reference_too_short() {
        assert!(ResourcePath::parse("justanid").is_err());
        assert!(VersionReference::parse("versions/ver1").is_err());
    }

    #[test]
    fn test_parse_folder_container() {
        let c = ContainerReference::parse("/data/v1/projects/a.p/folders/urn:folder").unwrap();
        assert_eq!(
            c,
            ContainerReference::Folder {
                project_id: "a.p".to_string(),
                folder_id: "urn:folder".to_string()
            }
        );
        assert_eq!(c.container_id(), "urn:folder");
        assert_eq!(c.parent_container_id(), "a.p");
        assert_eq!(c.project_id(), "a.p");
    }

    #[test]
    fn test_parse_project_container() {
        let c = ContainerReference::parse("/project/v1/hubs/a.hub/projects/a.p").unwrap();
        assert_eq!(
            c,
            ContainerReference::Project {
                hub_id: "a.hub".to_string(),
                project_id: "a.p".to_string()
            }
        );
        assert_eq!(c.container_id(), "a.p");
        assert_eq!(c.parent_container_id(), "a.hub");
    }

    #[test]
    fn test_parse_container_rejects_items() {
        let result = ContainerReference::parse("/data/v1/projects/a.p/items/i1");
        assert!(matches!(result, Err(BridgeError::InvalidReference(_))));
    }

    #[test]
    fn test_box_folder_id_root() {
        assert_eq!(box_folder_id("#"), "0");
        assert_eq!(box_folder_id(""), "0");
        assert_eq!(box_folder_id("12345"), "12345");
    }

    #[test]
    fn test_file_reference_extension() {
        let f = FileReference::new("1", "drawing.dwg").with_size(42);
        assert_eq!(f.extension.as_deref(), Some("dwg"));
        assert_eq!(f.byte_size, Some(42));

        let f = FileReference::new("2", "README");
        assert_eq!(f.extension, None);
    }

    #[test]
    fn test_transfer_result_serialization() {
        let ok = serde_json::to_value(TransferResult::ok("a.dwg")).unwrap();
        assert_eq!(ok, serde_json::json!({"status": "OK", "fileName": "a.dwg"}));

        let err = serde_json::to_value(TransferResult::error(502, "boom")).unwrap();
        assert_eq!(
            err,
            serde_json::json!({"status": "ERROR", "errorMessage": "boom"})
        );
    }

    #[test]
    fn test_transfer_result_from_error_keeps_status() {
        let err = TransferError::StorageAllocationFailed(BridgeError::Api {
            status: 403,
            message: "Forbidden".to_string(),
        });
        let result = TransferResult::from(&err);
        assert!(!result.is_ok());
        assert_eq!(result.status_code, 403);
        assert_eq!(result.error_message.as_deref(), Some("Forbidden"));

        let result = TransferResult::from(&TransferError::Unauthorized("Please login first".into()));
        assert_eq!(result.status_code, 401);
        assert!(TransferResult::ok("a.dwg").is_ok());
    }
}
