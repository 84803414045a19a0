//! Data-management REST client.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use urlencoding::encode;

use crate::auth::Credential;
use crate::transfer::{ItemSpec, StorageSpec, VersionSpec};
use crate::{BridgeError, Result};

use super::http::{check_response, JSON_API_CONTENT_TYPE, MAX_LISTING_PAGES};
use super::models::{CreatedVersion, Link, ListingEntry, ProjectInfo, UserProfile, VersionInfo};
use super::DataManagementClient;

#[derive(Debug, Deserialize)]
struct Document<T> {
    data: T,
    #[serde(default)]
    included: Vec<Resource>,
}

#[derive(Debug, Deserialize)]
struct ListingPage {
    #[serde(default)]
    data: Vec<ListingEntry>,
    #[serde(default)]
    links: Option<PageLinks>,
}

#[derive(Debug, Default, Deserialize)]
struct PageLinks {
    #[serde(default)]
    next: Option<Link>,
}

/// Any JSON:API resource, kept loose for pointer lookups.
#[derive(Debug, Deserialize)]
struct Resource {
    id: String,
    #[serde(default)]
    attributes: Value,
    #[serde(default)]
    relationships: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileBody {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    profile_images: Option<Value>,
}

/// [`DataManagementClient`] over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpDataManagementClient {
    http: Client,
    base_url: String,
}

impl HttpDataManagementClient {
    /// Create a client rooted at `base_url` (e.g. `https://developer.api.autodesk.com`).
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, credential: &Credential) -> Result<T> {
        let response = self
            .http
            .get(url)
            .bearer_auth(credential.access_token())
            .send()
            .await?;
        Ok(check_response(response).await?.json().await?)
    }

    fn post_json_api<B: Serialize + ?Sized>(
        &self,
        url: &str,
        credential: &Credential,
        body: &B,
    ) -> Result<RequestBuilder> {
        let body = serde_json::to_vec(body)
            .map_err(|e| BridgeError::Validation(format!("unserializable request body: {e}")))?;
        Ok(self
            .http
            .post(url)
            .bearer_auth(credential.access_token())
            .header(CONTENT_TYPE, JSON_API_CONTENT_TYPE)
            .body(body))
    }

    /// Follow `links.next` until the listing is exhausted.
    ///
    /// A listing still pointing at a next page after `MAX_LISTING_PAGES` is an
    /// error; callers decide create-or-version from it, so a partial list is
    /// never returned.
    async fn get_all(&self, first_url: String, credential: &Credential) -> Result<Vec<ListingEntry>> {
        let mut entries = Vec::new();
        let mut next = Some(first_url);
        let mut pages = 0;

        while let Some(url) = next.take() {
            if pages == MAX_LISTING_PAGES {
                warn!(url = %url, "Listing still paging after {} pages", MAX_LISTING_PAGES);
                return Err(BridgeError::Validation(format!(
                    "listing exceeds {MAX_LISTING_PAGES} pages"
                )));
            }
            let page: ListingPage = self.get_json(&url, credential).await?;
            entries.extend(page.data);
            next = page
                .links
                .and_then(|l| l.next)
                .map(|l| l.href)
                .filter(|href| !href.is_empty());
            pages += 1;
        }

        debug!(count = entries.len(), pages, "Listing fetched");
        Ok(entries)
    }
}

#[async_trait]
impl DataManagementClient for HttpDataManagementClient {
    async fn get_version(
        &self,
        credential: &Credential,
        project_id: &str,
        version_id: &str,
    ) -> Result<VersionInfo> {
        let url = self.url(&format!(
            "/data/v1/projects/{}/versions/{}",
            encode(project_id),
            encode(version_id)
        ));
        let doc: Document<Resource> = self.get_json(&url, credential).await?;

        let display_name = doc
            .data
            .attributes
            .get("name")
            .or_else(|| doc.data.attributes.get("displayName"))
            .and_then(Value::as_str)
            .ok_or_else(|| BridgeError::Validation(format!("version {version_id} has no name")))?
            .to_string();
        let storage_link = doc
            .data
            .relationships
            .pointer("/storage/meta/link/href")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(VersionInfo {
            display_name,
            storage_link,
        })
    }

    async fn get_project(
        &self,
        credential: &Credential,
        hub_id: &str,
        project_id: &str,
    ) -> Result<ProjectInfo> {
        let url = self.url(&format!(
            "/project/v1/hubs/{}/projects/{}",
            encode(hub_id),
            encode(project_id)
        ));
        let doc: Document<Resource> = self.get_json(&url, credential).await?;

        let root_folder_id = doc
            .data
            .relationships
            .pointer("/rootFolder/data/id")
            .and_then(Value::as_str)
            .ok_or_else(|| BridgeError::NotFound(format!("root folder of project {project_id}")))?
            .to_string();

        Ok(ProjectInfo {
            project_id: doc.data.id,
            root_folder_id,
        })
    }

    async fn list_folder_contents(
        &self,
        credential: &Credential,
        project_id: &str,
        folder_id: &str,
    ) -> Result<Vec<ListingEntry>> {
        let url = self.url(&format!(
            "/data/v1/projects/{}/folders/{}/contents",
            encode(project_id),
            encode(folder_id)
        ));
        self.get_all(url, credential).await
    }

    async fn allocate_storage(
        &self,
        credential: &Credential,
        project_id: &str,
        spec: &StorageSpec,
    ) -> Result<String> {
        let url = self.url(&format!("/data/v1/projects/{}/storage", encode(project_id)));
        let response = self.post_json_api(&url, credential, spec)?.send().await?;
        let doc: Document<Resource> = check_response(response).await?.json().await?;
        Ok(doc.data.id)
    }

    async fn create_item(
        &self,
        credential: &Credential,
        project_id: &str,
        spec: &ItemSpec,
    ) -> Result<CreatedVersion> {
        let url = self.url(&format!("/data/v1/projects/{}/items", encode(project_id)));
        let response = self.post_json_api(&url, credential, spec)?.send().await?;
        let doc: Document<Resource> = check_response(response).await?.json().await?;

        // The created tip version comes back as the first included resource
        let version_id = doc
            .included
            .into_iter()
            .next()
            .map(|v| v.id)
            .unwrap_or(doc.data.id);
        Ok(CreatedVersion { version_id })
    }

    async fn create_version(
        &self,
        credential: &Credential,
        project_id: &str,
        spec: &VersionSpec,
    ) -> Result<CreatedVersion> {
        let url = self.url(&format!("/data/v1/projects/{}/versions", encode(project_id)));
        let response = self.post_json_api(&url, credential, spec)?.send().await?;
        let doc: Document<Resource> = check_response(response).await?.json().await?;
        Ok(CreatedVersion {
            version_id: doc.data.id,
        })
    }

    async fn list_hubs(&self, credential: &Credential) -> Result<Vec<ListingEntry>> {
        self.get_all(self.url("/project/v1/hubs"), credential).await
    }

    async fn list_hub_projects(
        &self,
        credential: &Credential,
        hub_id: &str,
    ) -> Result<Vec<ListingEntry>> {
        let url = self.url(&format!("/project/v1/hubs/{}/projects", encode(hub_id)));
        self.get_all(url, credential).await
    }

    async fn list_item_versions(
        &self,
        credential: &Credential,
        project_id: &str,
        item_id: &str,
    ) -> Result<Vec<ListingEntry>> {
        let url = self.url(&format!(
            "/data/v1/projects/{}/items/{}/versions",
            encode(project_id),
            encode(item_id)
        ));
        self.get_all(url, credential).await
    }

    async fn get_user_profile(&self, credential: &Credential) -> Result<UserProfile> {
        let body: ProfileBody = self
            .get_json(&self.url("/userprofile/v1/users/@me"), credential)
            .await?;

        let picture = body
            .profile_images
            .as_ref()
            .and_then(|images| images.get("sizeX20"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(UserProfile {
            name: format!("{} {}", body.first_name, body.last_name)
                .trim()
                .to_string(),
            picture,
        })
    }
}
