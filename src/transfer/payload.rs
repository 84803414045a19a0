//! JSON:API payloads for storage allocation, item creation and version creation.
//!
//! Everything here is pure: same inputs, same payload.

use serde::Serialize;

/// Extension type given to Inventor assemblies uploaded as `*.iam.zip`.
pub const COMPOSITE_DESIGN_TYPE: &str = "versions:autodesk.a360:CompositeDesign";

/// Suffix that triggers the composite-design rewrite.
const COMPOSITE_SUFFIX: &str = ".iam.zip";

/// Trailing part removed from composite-design names.
const ZIP_SUFFIX_LEN: usize = ".zip".len();

/// Project-id prefix of the personal/team hub family.
const CORE_PROJECT_PREFIX: &str = "a.";

/// Metadata-schema variant of a destination project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFamily {
    /// Projects whose id starts with `a.`.
    Core,
    /// Every other project (BIM 360 / construction hubs).
    Bim360,
}

impl ProjectFamily {
    /// Select the family from a project id.
    pub fn from_project_id(project_id: &str) -> Self {
        if project_id.starts_with(CORE_PROJECT_PREFIX) {
            ProjectFamily::Core
        } else {
            ProjectFamily::Bim360
        }
    }

    /// Extension type of items.
    pub fn items_type(self) -> &'static str {
        match self {
            ProjectFamily::Core => "items:autodesk.core:File",
            ProjectFamily::Bim360 => "items:autodesk.bim360:File",
        }
    }

    /// Extension type of versions.
    pub fn versions_type(self) -> &'static str {
        match self {
            ProjectFamily::Core => "versions:autodesk.core:File",
            ProjectFamily::Bim360 => "versions:autodesk.bim360:File",
        }
    }
}

/// Name and extension type actually stored for `file_name`.
///
/// `*.iam.zip` loses its trailing `.zip` and becomes a composite design;
/// every other name passes through with `default_type`.
pub fn stored_name_and_type(file_name: &str, default_type: &str) -> (String, String) {
    if file_name.ends_with(COMPOSITE_SUFFIX) {
        (
            file_name[..file_name.len() - ZIP_SUFFIX_LEN].to_string(),
            COMPOSITE_DESIGN_TYPE.to_string(),
        )
    } else {
        (file_name.to_string(), default_type.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonApiVersion {
    pub version: String,
}

impl Default for JsonApiVersion {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
        }
    }
}

/// `{type, version}` extension block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extension {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
}

impl Extension {
    fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            version: "1.0".to_string(),
        }
    }
}

/// `{type, id}` resource identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

/// `{data: {type, id}}` relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    pub data: ResourceIdentifier,
}

impl Relationship {
    fn to(kind: &str, id: impl Into<String>) -> Self {
        Self {
            data: ResourceIdentifier {
                kind: kind.to_string(),
                id: id.into(),
            },
        }
    }
}

// ============================================================================
// Storage
// ============================================================================

/// Body of the storage allocation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageSpec {
    pub data: StorageData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageData {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: NameAttributes,
    pub relationships: StorageRelationships,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameAttributes {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageRelationships {
    pub target: Relationship,
}

/// Request a storage object named `file_name` inside `folder_id`.
pub fn storage_spec(file_name: &str, folder_id: &str) -> StorageSpec {
    StorageSpec {
        data: StorageData {
            kind: "objects".to_string(),
            attributes: NameAttributes {
                name: file_name.to_string(),
            },
            relationships: StorageRelationships {
                target: Relationship::to("folders", folder_id),
            },
        },
    }
}

// ============================================================================
// Versions
// ============================================================================

/// `{name, extension}` attributes of a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionAttributes {
    pub name: String,
    pub extension: Extension,
}

/// Body of the version creation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionSpec {
    pub jsonapi: JsonApiVersion,
    pub data: VersionData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionData {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: VersionAttributes,
    pub relationships: VersionRelationships,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionRelationships {
    pub item: Relationship,
    pub storage: Relationship,
}

impl VersionSpec {
    /// Item the version is attached to.
    pub fn item_id(&self) -> &str {
        &self.data.relationships.item.data.id
    }

    /// Storage object the version points at.
    pub fn storage_id(&self) -> &str {
        &self.data.relationships.storage.data.id
    }
}

/// New version of `item_id` backed by `object_id`.
pub fn version_spec(file_name: &str, project_id: &str, item_id: &str, object_id: &str) -> VersionSpec {
    let family = ProjectFamily::from_project_id(project_id);
    let (name, versions_type) = stored_name_and_type(file_name, family.versions_type());

    VersionSpec {
        jsonapi: JsonApiVersion::default(),
        data: VersionData {
            kind: "versions".to_string(),
            attributes: VersionAttributes {
                name,
                extension: Extension::new(versions_type),
            },
            relationships: VersionRelationships {
                item: Relationship::to("items", item_id),
                storage: Relationship::to("objects", object_id),
            },
        },
    }
}

// ============================================================================
// Items
// ============================================================================

/// Body of the item creation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSpec {
    pub jsonapi: JsonApiVersion,
    pub data: ItemData,
    /// The initial version, created together with the item.
    pub included: [IncludedVersion; 1],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemData {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: ItemAttributes,
    pub relationships: ItemRelationships,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemAttributes {
    pub display_name: String,
    pub extension: Extension,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRelationships {
    pub tip: Relationship,
    pub parent: Relationship,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncludedVersion {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub attributes: VersionAttributes,
    pub relationships: IncludedVersionRelationships,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncludedVersionRelationships {
    pub storage: Relationship,
}

impl ItemSpec {
    /// Folder the item is created in.
    pub fn parent_id(&self) -> &str {
        &self.data.relationships.parent.data.id
    }

    /// The embedded initial version.
    pub fn initial_version(&self) -> &IncludedVersion {
        &self.included[0]
    }
}

/// New item in `folder_id` whose first version is backed by `object_id`.
pub fn item_spec(file_name: &str, project_id: &str, folder_id: &str, object_id: &str) -> ItemSpec {
    // Local id tying the tip relationship to the included version.
    const TIP_ID: &str = "1";

    let family = ProjectFamily::from_project_id(project_id);
    let (display_name, items_type) = stored_name_and_type(file_name, family.items_type());
    let (version_name, versions_type) = stored_name_and_type(file_name, family.versions_type());

    ItemSpec {
        jsonapi: JsonApiVersion::default(),
        data: ItemData {
            kind: "items".to_string(),
            attributes: ItemAttributes {
                display_name,
                extension: Extension::new(items_type),
            },
            relationships: ItemRelationships {
                tip: Relationship::to("versions", TIP_ID),
                parent: Relationship::to("folders", folder_id),
            },
        },
        included: [IncludedVersion {
            kind: "versions".to_string(),
            id: TIP_ID.to_string(),
            attributes: VersionAttributes {
                name: version_name,
                extension: Extension::new(versions_type),
            },
            relationships: IncludedVersionRelationships {
                storage: Relationship::to("objects", object_id),
            },
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const OBJECT_ID: &str = "urn:adsk.objects:os.object:bucket/obj.dwg";

    #[test]
    fn test_project_family_dispatch() {
        assert_eq!(ProjectFamily::from_project_id("a.123"), ProjectFamily::Core);
        assert_eq!(ProjectFamily::from_project_id("b.456"), ProjectFamily::Bim360);
        assert_eq!(ProjectFamily::from_project_id("xyz"), ProjectFamily::Bim360);
        assert_eq!(ProjectFamily::from_project_id("A.123"), ProjectFamily::Bim360);

        assert_eq!(ProjectFamily::Core.items_type(), "items:autodesk.core:File");
        assert_eq!(
            ProjectFamily::Bim360.versions_type(),
            "versions:autodesk.bim360:File"
        );
    }

    #[test]
    fn test_stored_name_and_type_plain() {
        for name in ["drawing.dwg", "part.ipt", "assembly.iam", "archive.zip", "x.iam.zip.bak"] {
            let (stored, kind) = stored_name_and_type(name, "items:autodesk.core:File");
            assert_eq!(stored, name);
            assert_eq!(kind, "items:autodesk.core:File");
        }
    }

    #[test]
    fn test_stored_name_and_type_composite() {
        let (stored, kind) = stored_name_and_type("engine.iam.zip", "items:autodesk.core:File");
        assert_eq!(stored, "engine.iam");
        assert_eq!(kind, COMPOSITE_DESIGN_TYPE);
    }

    #[test]
    fn test_storage_spec_wire_format() {
        let spec = storage_spec("drawing.dwg", "urn:folder");
        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            json!({
                "data": {
                    "type": "objects",
                    "attributes": {"name": "drawing.dwg"},
                    "relationships": {
                        "target": {"data": {"type": "folders", "id": "urn:folder"}}
                    }
                }
            })
        );
    }

    #[test]
    fn test_item_spec_wire_format() {
        let spec = item_spec("drawing.dwg", "a.proj", "urn:folder", OBJECT_ID);
        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            json!({
                "jsonapi": {"version": "1.0"},
                "data": {
                    "type": "items",
                    "attributes": {
                        "displayName": "drawing.dwg",
                        "extension": {"type": "items:autodesk.core:File", "version": "1.0"}
                    },
                    "relationships": {
                        "tip": {"data": {"type": "versions", "id": "1"}},
                        "parent": {"data": {"type": "folders", "id": "urn:folder"}}
                    }
                },
                "included": [{
                    "type": "versions",
                    "id": "1",
                    "attributes": {
                        "name": "drawing.dwg",
                        "extension": {"type": "versions:autodesk.core:File", "version": "1.0"}
                    },
                    "relationships": {
                        "storage": {"data": {"type": "objects", "id": OBJECT_ID}}
                    }
                }]
            })
        );
        assert_eq!(spec.parent_id(), "urn:folder");
    }

    #[test]
    fn test_item_spec_bim360_family() {
        let spec = item_spec("drawing.dwg", "b.proj", "urn:folder", OBJECT_ID);
        assert_eq!(spec.data.attributes.extension.kind, "items:autodesk.bim360:File");
        assert_eq!(
            spec.initial_version().attributes.extension.kind,
            "versions:autodesk.bim360:File"
        );
    }

    #[test]
    fn test_item_spec_composite_design() {
        let spec = item_spec("engine.iam.zip", "b.proj", "urn:folder", OBJECT_ID);

        assert_eq!(spec.data.attributes.display_name, "engine.iam");
        assert_eq!(spec.data.attributes.extension.kind, COMPOSITE_DESIGN_TYPE);
        assert_eq!(spec.initial_version().attributes.name, "engine.iam");
        assert_eq!(
            spec.initial_version().attributes.extension.kind,
            COMPOSITE_DESIGN_TYPE
        );
    }

    #[test]
    fn test_version_spec_wire_format() {
        let spec = version_spec("drawing.dwg", "b.proj", "urn:item", OBJECT_ID);
        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            json!({
                "jsonapi": {"version": "1.0"},
                "data": {
                    "type": "versions",
                    "attributes": {
                        "name": "drawing.dwg",
                        "extension": {"type": "versions:autodesk.bim360:File", "version": "1.0"}
                    },
                    "relationships": {
                        "item": {"data": {"type": "items", "id": "urn:item"}},
                        "storage": {"data": {"type": "objects", "id": OBJECT_ID}}
                    }
                }
            })
        );
        assert_eq!(spec.item_id(), "urn:item");
        assert_eq!(spec.storage_id(), OBJECT_ID);
    }

    #[test]
    fn test_version_spec_composite_design() {
        let spec = version_spec("engine.iam.zip", "a.proj", "urn:item", OBJECT_ID);
        assert_eq!(spec.data.attributes.name, "engine.iam");
        assert_eq!(spec.data.attributes.extension.kind, COMPOSITE_DESIGN_TYPE);
    }

    #[test]
    fn test_builders_are_deterministic() {
        assert_eq!(
            item_spec("a.dwg", "a.p", "f", OBJECT_ID),
            item_spec("a.dwg", "a.p", "f", OBJECT_ID)
        );
        assert_eq!(
            version_spec("a.dwg", "a.p", "i", OBJECT_ID),
            version_spec("a.dwg", "a.p", "i", OBJECT_ID)
        );
    }
}
