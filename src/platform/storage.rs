//! Binary download and upload against both object stores.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use urlencoding::encode;

use crate::auth::Credential;
use crate::transfer::StorageSlot;
use crate::Result;

use super::http::check_response;
use super::{StorageTransferClient, UploadTarget};

#[derive(Debug, Deserialize)]
struct BoxUploadResponse {
    #[serde(default)]
    entries: Vec<BoxUploadEntry>,
}

#[derive(Debug, Deserialize)]
struct BoxUploadEntry {
    id: String,
}

/// [`StorageTransferClient`] over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpStorageTransfer {
    http: Client,
    dm_base_url: String,
    box_upload_base_url: String,
}

impl HttpStorageTransfer {
    pub fn new(http: Client, dm_base_url: &str, box_upload_base_url: &str) -> Self {
        Self {
            http,
            dm_base_url: dm_base_url.trim_end_matches('/').to_string(),
            box_upload_base_url: box_upload_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn object_url(&self, slot: &StorageSlot) -> String {
        format!(
            "{}/oss/v2/buckets/{}/objects/{}",
            self.dm_base_url,
            encode(&slot.bucket_key),
            encode(&slot.object_name)
        )
    }

    async fn put_object(
        &self,
        slot: &StorageSlot,
        bytes: Bytes,
        content_type: &str,
        credential: &Credential,
    ) -> Result<Option<String>> {
        let response = self
            .http
            .put(self.object_url(slot))
            .bearer_auth(credential.access_token())
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;
        check_response(response).await?;

        debug!(bucket_key = %slot.bucket_key, object_name = %slot.object_name, "Object uploaded");
        Ok(Some(slot.object_id.clone()))
    }

    async fn post_box_file(
        &self,
        folder_id: &str,
        file_name: &str,
        bytes: Bytes,
        content_type: &str,
        credential: &Credential,
    ) -> Result<Option<String>> {
        let attributes = json!({
            "name": file_name,
            "parent": {"id": folder_id},
        });
        let length = bytes.len() as u64;
        let file = Part::stream_with_length(Body::from(bytes), length)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = Form::new()
            .text("attributes", attributes.to_string())
            .part("file", file);

        let response = self
            .http
            .post(format!("{}/files/content", self.box_upload_base_url))
            .bearer_auth(credential.access_token())
            .multipart(form)
            .send()
            .await?;
        let body: BoxUploadResponse = check_response(response).await?.json().await?;

        let file_id = body.entries.into_iter().next().map(|e| e.id);
        debug!(folder_id, file_name, file_id = ?file_id, "Box file uploaded");
        Ok(file_id)
    }
}

#[async_trait]
impl StorageTransferClient for HttpStorageTransfer {
    async fn download_bytes(&self, url: &str, credential: &Credential) -> Result<Bytes> {
        let response = self
            .http
            .get(url)
            .bearer_auth(credential.access_token())
            .send()
            .await?;
        let bytes = check_response(response).await?.bytes().await?;
        debug!(url, size = bytes.len(), "Downloaded");
        Ok(bytes)
    }

    async fn upload_bytes(
        &self,
        target: &UploadTarget,
        bytes: Bytes,
        content_type: &str,
        credential: &Credential,
    ) -> Result<Option<String>> {
        match target {
            UploadTarget::Slot(slot) => self.put_object(slot, bytes, content_type, credential).await,
            UploadTarget::BoxFile {
                folder_id,
                file_name,
            } => {
                self.post_box_file(folder_id, file_name, bytes, content_type, credential)
                    .await
            }
        }
    }
}
