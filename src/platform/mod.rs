//! Remote platform clients.
//!
//! The transfer core only sees the traits below; the `Http*` types are the
//! production implementations on top of a shared `reqwest::Client`.

mod box_api;
mod dm;
pub mod http;
mod models;
mod storage;

use async_trait::async_trait;
use bytes::Bytes;

use crate::auth::Credential;
use crate::transfer::{ItemSpec, StorageSlot, StorageSpec, VersionSpec};
use crate::Result;

pub use box_api::HttpBoxClient;
pub use dm::HttpDataManagementClient;
pub use models::{
    BoxEntry, BoxFile, CreatedVersion, EntryAttributes, Link, ListingEntry, ProjectInfo,
    ResourceLinks, UserProfile, VersionInfo,
};
pub use storage::HttpStorageTransfer;

/// Read/write access to the data-management metadata API.
#[async_trait]
pub trait DataManagementClient: Send + Sync {
    /// Metadata of one version.
    async fn get_version(
        &self,
        credential: &Credential,
        project_id: &str,
        version_id: &str,
    ) -> Result<VersionInfo>;

    /// A project and its root folder.
    async fn get_project(
        &self,
        credential: &Credential,
        hub_id: &str,
        project_id: &str,
    ) -> Result<ProjectInfo>;

    /// All entries of a folder, in platform order.
    async fn list_folder_contents(
        &self,
        credential: &Credential,
        project_id: &str,
        folder_id: &str,
    ) -> Result<Vec<ListingEntry>>;

    /// Allocate a storage object; returns its object id.
    async fn allocate_storage(
        &self,
        credential: &Credential,
        project_id: &str,
        spec: &StorageSpec,
    ) -> Result<String>;

    /// Create an item together with its first version.
    async fn create_item(
        &self,
        credential: &Credential,
        project_id: &str,
        spec: &ItemSpec,
    ) -> Result<CreatedVersion>;

    /// Add a version to an existing item.
    async fn create_version(
        &self,
        credential: &Credential,
        project_id: &str,
        spec: &VersionSpec,
    ) -> Result<CreatedVersion>;

    /// Hubs visible to the user.
    async fn list_hubs(&self, credential: &Credential) -> Result<Vec<ListingEntry>>;

    /// Projects of a hub.
    async fn list_hub_projects(
        &self,
        credential: &Credential,
        hub_id: &str,
    ) -> Result<Vec<ListingEntry>>;

    /// Versions of an item.
    async fn list_item_versions(
        &self,
        credential: &Credential,
        project_id: &str,
        item_id: &str,
    ) -> Result<Vec<ListingEntry>>;

    /// The signed-in user.
    async fn get_user_profile(&self, credential: &Credential) -> Result<UserProfile>;
}

/// Read access to the Box content API.
#[async_trait]
pub trait BoxClient: Send + Sync {
    /// Metadata of one file.
    async fn get_file(&self, credential: &Credential, file_id: &str) -> Result<BoxFile>;

    /// All entries of a folder, in platform order.
    async fn list_folder_items(
        &self,
        credential: &Credential,
        folder_id: &str,
    ) -> Result<Vec<BoxEntry>>;

    /// Download location of a file's content.
    fn content_url(&self, file_id: &str) -> String;
}

/// Where uploaded bytes go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadTarget {
    /// A pre-allocated data-management storage slot.
    Slot(StorageSlot),
    /// A new file in a Box folder.
    BoxFile {
        folder_id: String,
        file_name: String,
    },
}

/// Binary transfer against both platforms' object stores.
#[async_trait]
pub trait StorageTransferClient: Send + Sync {
    /// Fetch the full payload at `url`.
    async fn download_bytes(&self, url: &str, credential: &Credential) -> Result<Bytes>;

    /// Upload `bytes` to `target`.
    ///
    /// Returns the id the destination assigned, when it reports one.
    async fn upload_bytes(
        &self,
        target: &UploadTarget,
        bytes: Bytes,
        content_type: &str,
        credential: &Credential,
    ) -> Result<Option<String>>;
}
