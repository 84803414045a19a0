//! Moves one file between the data-management platform and Box.
//!
//! Each transfer is a strictly sequential chain of remote calls. Nothing is
//! cached between requests and nothing is retried; a failure after storage
//! allocation is reported to the [`OrphanHandler`] and then surfaced as is.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::auth::TransferCredentials;
use crate::platform::{
    BoxClient, DataManagementClient, ListingEntry, StorageTransferClient, UploadTarget,
};

use super::error::TransferError;
use super::mime::{content_type, without_extension};
use super::payload::{item_spec, storage_spec, version_spec};
use super::types::{
    box_folder_id, ContainerReference, Direction, FileReference, StorageSlot, TransferAction,
    TransferOutcome, TransferResult, VersionReference,
};

/// Receives storage slots left allocated by a failed transfer.
pub trait OrphanHandler: Send + Sync {
    /// Called once per orphaned slot, after the failing step.
    fn storage_orphaned(&self, slot: &StorageSlot, error: &TransferError);
}

/// Default [`OrphanHandler`]: logs the slot and moves on.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOrphans;

impl OrphanHandler for LogOrphans {
    fn storage_orphaned(&self, slot: &StorageSlot, error: &TransferError) {
        warn!(
            bucket_key = %slot.bucket_key,
            object_name = %slot.object_name,
            error = %error,
            "Storage slot left without an item or version"
        );
    }
}

/// One transfer as requested by the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub direction: Direction,
    /// Source tree-node id (DM version href or Box file id).
    pub source_file_id: String,
    /// Destination tree-node id (Box folder id, DM folder or project href).
    pub destination_container_id: String,
}

/// Destination folder after project → root-folder resolution.
#[derive(Debug)]
struct ResolvedFolder {
    project_id: String,
    folder_id: String,
}

/// Coordinates the platform clients for one transfer at a time.
#[derive(Clone)]
pub struct TransferOrchestrator {
    dm: Arc<dyn DataManagementClient>,
    boxes: Arc<dyn BoxClient>,
    storage: Arc<dyn StorageTransferClient>,
    orphans: Arc<dyn OrphanHandler>,
}

impl TransferOrchestrator {
    /// Create an orchestrator that logs orphaned slots.
    pub fn new(
        dm: Arc<dyn DataManagementClient>,
        boxes: Arc<dyn BoxClient>,
        storage: Arc<dyn StorageTransferClient>,
    ) -> Self {
        Self {
            dm,
            boxes,
            storage,
            orphans: Arc::new(LogOrphans),
        }
    }

    /// Replace the orphan handler.
    pub fn with_orphan_handler(mut self, orphans: Arc<dyn OrphanHandler>) -> Self {
        self.orphans = orphans;
        self
    }

    /// Run `request` and fold the outcome into a [`TransferResult`].
    pub async fn transfer(
        &self,
        request: &TransferRequest,
        credentials: &TransferCredentials,
    ) -> TransferResult {
        match self.transfer_file(request, credentials).await {
            Ok(outcome) => TransferResult::ok(outcome.file_name),
            Err(e) => TransferResult::from(&e),
        }
    }

    /// Run `request`.
    pub async fn transfer_file(
        &self,
        request: &TransferRequest,
        credentials: &TransferCredentials,
    ) -> Result<TransferOutcome, TransferError> {
        debug!(
            direction = %request.direction,
            source = %request.source_file_id,
            destination = %request.destination_container_id,
            "Transfer requested"
        );

        let result = match request.direction {
            Direction::ToBox => self.send_to_box(request, credentials).await,
            Direction::ToDataManagement => self.send_to_data_management(request, credentials).await,
        };

        match &result {
            Ok(outcome) => info!(
                direction = %request.direction,
                file_name = %outcome.file_name,
                action = ?outcome.action,
                "Transfer completed"
            ),
            Err(e) => error!(
                direction = %request.direction,
                status = e.status_code(),
                error = %e,
                "Transfer failed"
            ),
        }
        result
    }

    async fn send_to_box(
        &self,
        request: &TransferRequest,
        credentials: &TransferCredentials,
    ) -> Result<TransferOutcome, TransferError> {
        let version = VersionReference::parse(&request.source_file_id)
            .map_err(TransferError::InvalidReference)?;

        let info = self
            .dm
            .get_version(&credentials.source, &version.project_id, &version.version_id)
            .await
            .map_err(TransferError::SourceNotFound)?;
        let storage_link = info.storage_link.ok_or(TransferError::NoStorageDefined)?;
        let file = FileReference::new(version.version_id, info.display_name);

        let folder_id = box_folder_id(&request.destination_container_id).to_string();
        debug!(file_name = %file.display_name, folder_id = %folder_id, "Downloading version");

        let bytes = self
            .storage
            .download_bytes(&storage_link, &credentials.source)
            .await
            .map_err(TransferError::DownloadFailed)?;

        let target = UploadTarget::BoxFile {
            folder_id,
            file_name: file.display_name.clone(),
        };
        let created_id = self
            .storage
            .upload_bytes(
                &target,
                bytes,
                &content_type(&file.display_name),
                &credentials.destination,
            )
            .await
            .map_err(TransferError::UploadFailed)?;

        Ok(TransferOutcome {
            file_name: file.display_name,
            action: TransferAction::UploadedFile,
            created_id,
        })
    }

    async fn send_to_data_management(
        &self,
        request: &TransferRequest,
        credentials: &TransferCredentials,
    ) -> Result<TransferOutcome, TransferError> {
        let container = ContainerReference::parse(&request.destination_container_id)
            .map_err(TransferError::InvalidReference)?;
        let source_id = request.source_file_id.trim();

        let box_file = self
            .boxes
            .get_file(&credentials.source, source_id)
            .await
            .map_err(TransferError::SourceNotFound)?;
        let mut file = FileReference::new(box_file.id, box_file.name);
        if let Some(size) = box_file.size {
            file = file.with_size(size);
        }

        let folder = self.resolve_folder(&container, credentials).await?;

        let object_id = self
            .dm
            .allocate_storage(
                &credentials.destination,
                &folder.project_id,
                &storage_spec(&file.display_name, &folder.folder_id),
            )
            .await
            .map_err(TransferError::StorageAllocationFailed)?;
        let slot = StorageSlot::parse(&object_id).map_err(TransferError::StorageAllocationFailed)?;
        debug!(
            bucket_key = %slot.bucket_key,
            object_name = %slot.object_name,
            "Storage allocated"
        );

        match self.fill_slot(&file, &folder, &slot, credentials).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.orphans.storage_orphaned(&slot, &e);
                Err(e)
            }
        }
    }

    /// Folder the file lands in; projects resolve to their root folder.
    async fn resolve_folder(
        &self,
        container: &ContainerReference,
        credentials: &TransferCredentials,
    ) -> Result<ResolvedFolder, TransferError> {
        match container {
            ContainerReference::Folder {
                project_id,
                folder_id,
            } => Ok(ResolvedFolder {
                project_id: project_id.clone(),
                folder_id: folder_id.clone(),
            }),
            ContainerReference::Project { hub_id, project_id } => {
                let project = self
                    .dm
                    .get_project(&credentials.destination, hub_id, project_id)
                    .await
                    .map_err(TransferError::ContainerResolutionFailed)?;
                debug!(project_id = %project_id, folder_id = %project.root_folder_id, "Project root resolved");
                Ok(ResolvedFolder {
                    project_id: project_id.clone(),
                    folder_id: project.root_folder_id,
                })
            }
        }
    }

    /// Everything after allocation: bytes in, then item or version on top.
    async fn fill_slot(
        &self,
        file: &FileReference,
        folder: &ResolvedFolder,
        slot: &StorageSlot,
        credentials: &TransferCredentials,
    ) -> Result<TransferOutcome, TransferError> {
        let bytes = self
            .storage
            .download_bytes(
                &self.boxes.content_url(&file.platform_file_id),
                &credentials.source,
            )
            .await
            .map_err(TransferError::DownloadFailed)?;

        self.storage
            .upload_bytes(
                &UploadTarget::Slot(slot.clone()),
                bytes,
                &content_type(&file.display_name),
                &credentials.destination,
            )
            .await
            .map_err(TransferError::UploadFailed)?;

        let entries = self
            .dm
            .list_folder_contents(&credentials.destination, &folder.project_id, &folder.folder_id)
            .await
            .map_err(TransferError::ContentListingFailed)?;

        let (action, created) = match find_existing_item(&entries, &file.display_name) {
            Some(existing) => {
                debug!(item_id = %existing.id, file_name = %file.display_name, "Adding version");
                let spec = version_spec(
                    &file.display_name,
                    &folder.project_id,
                    &existing.id,
                    &slot.object_id,
                );
                let created = self
                    .dm
                    .create_version(&credentials.destination, &folder.project_id, &spec)
                    .await;
                (TransferAction::CreatedVersion, created)
            }
            None => {
                debug!(folder_id = %folder.folder_id, file_name = %file.display_name, "Creating item");
                let spec = item_spec(
                    &file.display_name,
                    &folder.project_id,
                    &folder.folder_id,
                    &slot.object_id,
                );
                let created = self
                    .dm
                    .create_item(&credentials.destination, &folder.project_id, &spec)
                    .await;
                (TransferAction::CreatedItem, created)
            }
        };
        let created = created.map_err(TransferError::ItemOrVersionCreationFailed)?;

        Ok(TransferOutcome {
            file_name: file.display_name.clone(),
            action,
            created_id: Some(created.version_id),
        })
    }
}

/// First entry whose display name equals `file_name`, or `file_name`
/// without its final extension.
///
/// The second rule also matches unrelated entries that happen to be named
/// like the stripped file name (`report` for `report.pdf`).
pub fn find_existing_item<'a>(
    entries: &'a [ListingEntry],
    file_name: &str,
) -> Option<&'a ListingEntry> {
    let stripped = without_extension(file_name);
    entries.iter().find(|entry| {
        entry
            .attributes
            .display_name
            .as_deref()
            .is_some_and(|name| name == file_name || name == stripped)
    })
}
