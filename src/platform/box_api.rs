//! Box content API client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use urlencoding::encode;

use crate::auth::Credential;
use crate::{BridgeError, Result};

use super::http::{check_response, MAX_LISTING_PAGES};
use super::models::{BoxEntry, BoxFile};
use super::BoxClient;

/// Entries requested per folder page.
const PAGE_LIMIT: usize = 1000;

#[derive(Debug, Deserialize)]
struct ItemsPage {
    #[serde(default)]
    entries: Vec<BoxEntry>,
    #[serde(default)]
    total_count: usize,
}

/// [`BoxClient`] over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpBoxClient {
    http: Client,
    api_base_url: String,
}

impl HttpBoxClient {
    /// Create a client rooted at `api_base_url` (e.g. `https://api.box.com/2.0`).
    pub fn new(http: Client, api_base_url: &str) -> Self {
        Self {
            http,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BoxClient for HttpBoxClient {
    async fn get_file(&self, credential: &Credential, file_id: &str) -> Result<BoxFile> {
        let url = format!("{}/files/{}", self.api_base_url, encode(file_id));
        let response = self
            .http
            .get(&url)
            .query(&[("fields", "id,name,size")])
            .bearer_auth(credential.access_token())
            .send()
            .await?;
        Ok(check_response(response).await?.json().await?)
    }

    async fn list_folder_items(
        &self,
        credential: &Credential,
        folder_id: &str,
    ) -> Result<Vec<BoxEntry>> {
        let url = format!("{}/folders/{}/items", self.api_base_url, encode(folder_id));
        let mut entries: Vec<BoxEntry> = Vec::new();

        for page in 0..MAX_LISTING_PAGES {
            let offset = entries.len().to_string();
            let limit = PAGE_LIMIT.to_string();
            let response = self
                .http
                .get(&url)
                .query(&[
                    ("fields", "id,name,type"),
                    ("limit", limit.as_str()),
                    ("offset", offset.as_str()),
                ])
                .bearer_auth(credential.access_token())
                .send()
                .await?;
            let body: ItemsPage = check_response(response).await?.json().await?;

            let received = body.entries.len();
            entries.extend(body.entries);
            if received == 0 || entries.len() >= body.total_count {
                debug!(folder_id, count = entries.len(), pages = page + 1, "Box folder listed");
                return Ok(entries);
            }
        }

        warn!(folder_id, "Box listing still paging after {} pages", MAX_LISTING_PAGES);
        Err(BridgeError::Validation(format!(
            "listing of Box folder {folder_id} exceeds {MAX_LISTING_PAGES} pages"
        )))
    }

    fn content_url(&self, file_id: &str) -> String {
        format!("{}/files/{}/content", self.api_base_url, encode(file_id))
    }
}
