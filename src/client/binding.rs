use super::error::{ClientError, ClientResult};
use super::types::ContentPayload;
use crate::repo_store::{ObjectSummary, RepositoryInfo, UnfileMode, VersioningState};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

/// Capability interface a session needs from its transport.
///
/// Session and harness logic depend on this trait only, so the concrete
/// protocol client behind it can be swapped without touching them.
#[async_trait]
pub trait RepositoryBinding: Send + Sync {
    /// Repositories visible at the endpoint.
    async fn repositories(&self) -> ClientResult<Vec<RepositoryInfo>>;

    /// Resolve an object by id.
    async fn object(&self, id: &str) -> ClientResult<ObjectSummary>;

    /// Immediate children of a folder.
    async fn children(&self, folder_id: &str) -> ClientResult<Vec<ObjectSummary>>;

    /// Materialize a folder from a property set.
    async fn create_folder(
        &self,
        parent_id: &str,
        properties: &HashMap<String, Value>,
    ) -> ClientResult<ObjectSummary>;

    /// Materialize a document from a property set and content payload.
    async fn create_document(
        &self,
        parent_id: &str,
        properties: &HashMap<String, Value>,
        content: &ContentPayload,
        versioning: VersioningState,
    ) -> ClientResult<ObjectSummary>;

    /// Delete a single object.
    async fn delete(&self, id: &str, all_versions: bool) -> ClientResult<()>;

    /// Recursively delete a folder; returns the ids the server could not
    /// delete.
    async fn delete_tree(
        &self,
        folder_id: &str,
        all_versions: bool,
        unfile: UnfileMode,
        continue_on_failure: bool,
    ) -> ClientResult<Vec<String>>;

    /// Content bytes of a document's latest version.
    async fn content(&self, id: &str) -> ClientResult<Vec<u8>>;

    /// Place or release a retention hold.
    async fn set_retention(&self, id: &str, hold: bool) -> ClientResult<()>;

    /// Release the transport resources held by this binding. Calls made
    /// after closing fail with [`ClientError::BindingClosed`].
    fn close(&self);
}

#[derive(Deserialize)]
struct DeleteTreeResponse {
    not_deleted_ids: Vec<String>,
}

/// REST binding over the repository's JSON endpoint.
pub struct RestBinding {
    endpoint_url: String,
    /// Connection pool; `None` once the binding has been closed
    client: Mutex<Option<reqwest::Client>>,
}

impl RestBinding {
    pub fn new(endpoint_url: &str) -> Self {
        Self {
            endpoint_url: endpoint_url.trim_end_matches('/').to_string(),
            client: Mutex::new(Some(reqwest::Client::new())),
        }
    }

    fn http(&self) -> ClientResult<reqwest::Client> {
        self.client
            .lock()
            .unwrap()
            .clone()
            .ok_or(ClientError::BindingClosed)
    }

    fn object_url(&self, id: &str, suffix: &str) -> String {
        format!("{}/objects/{}{}", self.endpoint_url, id, suffix)
    }

    /// Unwrap the `{"data": ...}` / `{"error": ...}` response envelope.
    async fn parse_envelope<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        let body: Value = response.json().await?;

        if !status.is_success() {
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown server error")
                .to_string();
            return Err(if status == reqwest::StatusCode::NOT_FOUND {
                ClientError::NotFound(message)
            } else {
                ClientError::Remote(message)
            });
        }

        let data = body
            .get("data")
            .cloned()
            .ok_or_else(|| ClientError::Remote("response is missing its data envelope".to_string()))?;
        Ok(serde_json::from_value(data)?)
    }
}

#[async_trait]
impl RepositoryBinding for RestBinding {
    async fn repositories(&self) -> ClientResult<Vec<RepositoryInfo>> {
        let url = format!("{}/repositories", self.endpoint_url);
        let response = self.http()?.get(url).send().await?;
        Self::parse_envelope(response).await
    }

    async fn object(&self, id: &str) -> ClientResult<ObjectSummary> {
        let response = self.http()?.get(self.object_url(id, "")).send().await?;
        Self::parse_envelope(response).await
    }

    async fn children(&self, folder_id: &str) -> ClientResult<Vec<ObjectSummary>> {
        let response = self
            .http()?
            .get(self.object_url(folder_id, "/children"))
            .send()
            .await?;
        Self::parse_envelope(response).await
    }

    async fn create_folder(
        &self,
        parent_id: &str,
        properties: &HashMap<String, Value>,
    ) -> ClientResult<ObjectSummary> {
        let response = self
            .http()?
            .post(self.object_url(parent_id, "/folders"))
            .json(&json!({ "properties": properties }))
            .send()
            .await?;
        Self::parse_envelope(response).await
    }

    async fn create_document(
        &self,
        parent_id: &str,
        properties: &HashMap<String, Value>,
        content: &ContentPayload,
        versioning: VersioningState,
    ) -> ClientResult<ObjectSummary> {
        let body = json!({
            "properties": properties,
            "content": general_purpose::STANDARD.encode(&content.content),
            "mime_type": content.mime_type,
            "file_name": content.file_name,
            "versioning_state": versioning,
        });
        let response = self
            .http()?
            .post(self.object_url(parent_id, "/documents"))
            .json(&body)
            .send()
            .await?;
        Self::parse_envelope(response).await
    }

    async fn delete(&self, id: &str, all_versions: bool) -> ClientResult<()> {
        let response = self
            .http()?
            .delete(self.object_url(id, ""))
            .query(&[("all_versions", all_versions)])
            .send()
            .await?;
        Self::parse_envelope::<Value>(response).await.map(|_| ())
    }

    async fn delete_tree(
        &self,
        folder_id: &str,
        all_versions: bool,
        unfile: UnfileMode,
        continue_on_failure: bool,
    ) -> ClientResult<Vec<String>> {
        let body = json!({
            "all_versions": all_versions,
            "unfile_mode": unfile,
            "continue_on_failure": continue_on_failure,
        });
        let response = self
            .http()?
            .post(self.object_url(folder_id, "/delete-tree"))
            .json(&body)
            .send()
            .await?;
        let parsed: DeleteTreeResponse = Self::parse_envelope(response).await?;
        Ok(parsed.not_deleted_ids)
    }

    async fn content(&self, id: &str) -> ClientResult<Vec<u8>> {
        let response = self
            .http()?
            .get(self.object_url(id, "/content"))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown server error")
                .to_string();
            return Err(if status == reqwest::StatusCode::NOT_FOUND {
                ClientError::NotFound(message)
            } else {
                ClientError::Remote(message)
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn set_retention(&self, id: &str, hold: bool) -> ClientResult<()> {
        let response = self
            .http()?
            .post(self.object_url(id, "/retention"))
            .json(&json!({ "hold": hold }))
            .send()
            .await?;
        Self::parse_envelope::<Value>(response).await.map(|_| ())
    }

    fn close(&self) {
        let mut client = self.client.lock().unwrap();
        if client.take().is_some() {
            log::debug!("Closed REST binding for {}", self.endpoint_url);
        }
    }
}
