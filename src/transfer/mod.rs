//! Cross-platform file transfer.
//!
//! - [`types`]: references, storage slots and results
//! - [`payload`]: JSON:API payloads for storage, items and versions
//! - [`mime`]: upload content types
//! - [`TransferOrchestrator`]: the transfer pipeline itself

mod error;
pub mod mime;
mod orchestrator;
pub mod payload;
mod types;

pub use error::{TransferError, NO_STORAGE_MESSAGE};
pub use orchestrator::{
    find_existing_item, LogOrphans, OrphanHandler, TransferOrchestrator, TransferRequest,
};
pub use payload::{
    item_spec, storage_spec, version_spec, ItemSpec, ProjectFamily, StorageSpec, VersionSpec,
    COMPOSITE_DESIGN_TYPE,
};
pub use types::{
    box_folder_id, ContainerReference, Direction, FileReference, ResourcePath, StorageSlot,
    TransferAction, TransferOutcome, TransferResult, TransferStatus, VersionReference,
};
