//! Test helpers for integration tests.
//!
//! Provides in-memory platform clients that record every call, plus helpers
//! for building an [`AppState`] and a signed-in session on top of them.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use dmbridge::auth::{Credential, OAuthToken, SessionStore};
use dmbridge::config::Config;
use dmbridge::platform::{
    BoxClient, BoxEntry, BoxFile, CreatedVersion, DataManagementClient, ListingEntry,
    ProjectInfo, StorageTransferClient, UploadTarget, UserProfile, VersionInfo,
};
use dmbridge::transfer::{ItemSpec, OrphanHandler, StorageSlot, StorageSpec, TransferError, VersionSpec};
use dmbridge::web::{AppState, OAuthClients};
use dmbridge::{BridgeError, Result};

/// Storage link returned for the default source version.
pub const STORAGE_LINK: &str = "https://dm.test/oss/v2/buckets/src/objects/drawing.dwg";

/// Ordered record of remote calls.
#[derive(Debug, Default)]
pub struct CallLog {
    calls: Mutex<Vec<String>>,
}

impl CallLog {
    pub fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == name).count()
    }

    pub fn total(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn names(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn api_error(status: u16, message: &str) -> BridgeError {
    BridgeError::Api {
        status,
        message: message.to_string(),
    }
}

/// Scripted data-management platform.
pub struct MockDataManagement {
    pub log: Arc<CallLog>,
    /// Response of `get_version`; `None` answers 404.
    pub version: Mutex<Option<VersionInfo>>,
    pub root_folder_id: String,
    /// Contents of every folder.
    pub contents: Mutex<Vec<ListingEntry>>,
    pub allocation_error: Mutex<Option<(u16, String)>>,
    pub creation_error: Mutex<Option<(u16, String)>>,
    pub storage_specs: Mutex<Vec<(String, StorageSpec)>>,
    pub item_specs: Mutex<Vec<(String, ItemSpec)>>,
    pub version_specs: Mutex<Vec<(String, VersionSpec)>>,
    sequence: AtomicUsize,
}

impl MockDataManagement {
    pub fn new(log: Arc<CallLog>) -> Self {
        Self {
            log,
            version: Mutex::new(Some(VersionInfo {
                display_name: "drawing.dwg".to_string(),
                storage_link: Some(STORAGE_LINK.to_string()),
            })),
            root_folder_id: "urn:root".to_string(),
            contents: Mutex::new(Vec::new()),
            allocation_error: Mutex::new(None),
            creation_error: Mutex::new(None),
            storage_specs: Mutex::new(Vec::new()),
            item_specs: Mutex::new(Vec::new()),
            version_specs: Mutex::new(Vec::new()),
            sequence: AtomicUsize::new(0),
        }
    }

    fn next(&self) -> usize {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn creation_result(&self, kind: &str) -> Result<CreatedVersion> {
        if let Some((status, message)) = self.creation_error.lock().unwrap().clone() {
            return Err(api_error(status, &message));
        }
        Ok(CreatedVersion {
            version_id: format!("urn:{kind}?version={}", self.next()),
        })
    }
}

#[async_trait]
impl DataManagementClient for MockDataManagement {
    async fn get_version(
        &self,
        _credential: &Credential,
        _project_id: &str,
        _version_id: &str,
    ) -> Result<VersionInfo> {
        self.log.record("get_version");
        self.version
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| api_error(404, "The version was not found"))
    }

    async fn get_project(
        &self,
        _credential: &Credential,
        _hub_id: &str,
        project_id: &str,
    ) -> Result<ProjectInfo> {
        self.log.record("get_project");
        Ok(ProjectInfo {
            project_id: project_id.to_string(),
            root_folder_id: self.root_folder_id.clone(),
        })
    }

    async fn list_folder_contents(
        &self,
        _credential: &Credential,
        _project_id: &str,
        _folder_id: &str,
    ) -> Result<Vec<ListingEntry>> {
        self.log.record("list_folder_contents");
        Ok(self.contents.lock().unwrap().clone())
    }

    async fn allocate_storage(
        &self,
        _credential: &Credential,
        project_id: &str,
        spec: &StorageSpec,
    ) -> Result<String> {
        self.log.record("allocate_storage");
        if let Some((status, message)) = self.allocation_error.lock().unwrap().clone() {
            return Err(api_error(status, &message));
        }
        self.storage_specs
            .lock()
            .unwrap()
            .push((project_id.to_string(), spec.clone()));
        Ok(format!(
            "urn:adsk.objects:os.object:wip.dm.prod/object-{}.bin",
            self.next()
        ))
    }

    async fn create_item(
        &self,
        _credential: &Credential,
        project_id: &str,
        spec: &ItemSpec,
    ) -> Result<CreatedVersion> {
        self.log.record("create_item");
        self.item_specs
            .lock()
            .unwrap()
            .push((project_id.to_string(), spec.clone()));
        self.creation_result("item")
    }

    async fn create_version(
        &self,
        _credential: &Credential,
        project_id: &str,
        spec: &VersionSpec,
    ) -> Result<CreatedVersion> {
        self.log.record("create_version");
        self.version_specs
            .lock()
            .unwrap()
            .push((project_id.to_string(), spec.clone()));
        self.creation_result("version")
    }

    async fn list_hubs(&self, _credential: &Credential) -> Result<Vec<ListingEntry>> {
        self.log.record("list_hubs");
        Ok(vec![ListingEntry::new("hubs", "a.hub", "My Hub")])
    }

    async fn list_hub_projects(
        &self,
        _credential: &Credential,
        _hub_id: &str,
    ) -> Result<Vec<ListingEntry>> {
        self.log.record("list_hub_projects");
        Ok(vec![ListingEntry::new("projects", "a.p", "Project")])
    }

    async fn list_item_versions(
        &self,
        _credential: &Credential,
        _project_id: &str,
        _item_id: &str,
    ) -> Result<Vec<ListingEntry>> {
        self.log.record("list_item_versions");
        Ok(vec![ListingEntry::new("versions", "urn:v1", "drawing.dwg")])
    }

    async fn get_user_profile(&self, _credential: &Credential) -> Result<UserProfile> {
        self.log.record("get_user_profile");
        Ok(UserProfile {
            name: "Ada Lovelace".to_string(),
            picture: None,
        })
    }
}

/// Scripted Box platform.
pub struct MockBox {
    pub log: Arc<CallLog>,
    /// Response of `get_file`; `None` answers 404.
    pub file: Mutex<Option<BoxFile>>,
    pub entries: Mutex<Vec<BoxEntry>>,
}

impl MockBox {
    pub fn new(log: Arc<CallLog>) -> Self {
        Self {
            log,
            file: Mutex::new(Some(BoxFile {
                id: "1001".to_string(),
                name: "drawing.dwg".to_string(),
                size: Some(7),
            })),
            entries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl BoxClient for MockBox {
    async fn get_file(&self, _credential: &Credential, _file_id: &str) -> Result<BoxFile> {
        self.log.record("get_file");
        self.file
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| api_error(404, "not_found"))
    }

    async fn list_folder_items(
        &self,
        _credential: &Credential,
        _folder_id: &str,
    ) -> Result<Vec<BoxEntry>> {
        self.log.record("list_folder_items");
        Ok(self.entries.lock().unwrap().clone())
    }

    fn content_url(&self, file_id: &str) -> String {
        format!("https://box.test/files/{file_id}/content")
    }
}

/// Scripted object stores of both platforms.
pub struct MockStorage {
    pub log: Arc<CallLog>,
    pub upload_error: Mutex<Option<(u16, String)>>,
    pub downloads: Mutex<Vec<(String, String)>>,
    pub uploads: Mutex<Vec<(UploadTarget, String, String)>>,
}

impl MockStorage {
    pub fn new(log: Arc<CallLog>) -> Self {
        Self {
            log,
            upload_error: Mutex::new(None),
            downloads: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl StorageTransferClient for MockStorage {
    async fn download_bytes(&self, url: &str, credential: &Credential) -> Result<Bytes> {
        self.log.record("download_bytes");
        self.downloads
            .lock()
            .unwrap()
            .push((url.to_string(), credential.access_token().to_string()));
        Ok(Bytes::from_static(b"payload"))
    }

    async fn upload_bytes(
        &self,
        target: &UploadTarget,
        _bytes: Bytes,
        content_type: &str,
        credential: &Credential,
    ) -> Result<Option<String>> {
        self.log.record("upload_bytes");
        if let Some((status, message)) = self.upload_error.lock().unwrap().clone() {
            return Err(api_error(status, &message));
        }
        self.uploads.lock().unwrap().push((
            target.clone(),
            content_type.to_string(),
            credential.access_token().to_string(),
        ));
        Ok(Some("uploaded".to_string()))
    }
}

/// Orphan handler that remembers every slot it was told about.
#[derive(Default)]
pub struct RecordingOrphans {
    pub slots: Mutex<Vec<(StorageSlot, String)>>,
}

impl OrphanHandler for RecordingOrphans {
    fn storage_orphaned(&self, slot: &StorageSlot, error: &TransferError) {
        self.slots
            .lock()
            .unwrap()
            .push((slot.clone(), error.to_string()));
    }
}

/// All mocks sharing one call log.
pub struct Platforms {
    pub log: Arc<CallLog>,
    pub dm: Arc<MockDataManagement>,
    pub boxes: Arc<MockBox>,
    pub storage: Arc<MockStorage>,
    pub orphans: Arc<RecordingOrphans>,
}

impl Platforms {
    pub fn new() -> Self {
        let log = Arc::new(CallLog::default());
        Self {
            dm: Arc::new(MockDataManagement::new(log.clone())),
            boxes: Arc::new(MockBox::new(log.clone())),
            storage: Arc::new(MockStorage::new(log.clone())),
            orphans: Arc::new(RecordingOrphans::default()),
            log,
        }
    }

    /// Application state wired to the mocks.
    pub fn app_state(&self, sessions: SessionStore) -> AppState {
        let config = Config::default();
        let oauth = OAuthClients::from_config(reqwest::Client::new(), &config);
        AppState::new(
            sessions,
            self.dm.clone(),
            self.boxes.clone(),
            self.storage.clone(),
            oauth,
        )
        .with_orphan_handler(self.orphans.clone())
    }
}

/// Create a session holding valid tokens for the requested platforms.
pub async fn signed_in_session(store: &SessionStore, dm: bool, boxed: bool) -> String {
    store
        .update(None, |session| {
            if dm {
                session.dm_internal = Some(OAuthToken::new("dm-internal", None, 3600));
                session.dm_public = Some(OAuthToken::new("dm-public", None, 3600));
            }
            if boxed {
                session.box_token = Some(OAuthToken::new("box-token", None, 3600));
            }
        })
        .await
}

/// `Cookie` header value for session `id`.
pub fn session_cookie(id: &str) -> String {
    format!("dmbridge_session={id}")
}
