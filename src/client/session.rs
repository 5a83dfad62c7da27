use super::binding::{RepositoryBinding, RestBinding};
use super::error::{ClientError, ClientResult};
use super::types::{BindingType, ContentPayload, SessionParams};
use crate::repo_store::{ObjectSummary, RepositoryInfo, UnfileMode, VersioningState};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Produces connected sessions from session parameters.
pub struct SessionFactory;

impl SessionFactory {
    pub fn new() -> Self {
        Self
    }

    /// Query the repositories visible under the given parameters.
    pub async fn repositories(&self, params: &SessionParams) -> ClientResult<Vec<Repository>> {
        let binding = Self::binding(params)?;
        let infos = binding.repositories().await?;
        Ok(infos
            .into_iter()
            .map(|info| Repository {
                info,
                binding: binding.clone(),
            })
            .collect())
    }

    /// Open a session against the single repository at the endpoint.
    ///
    /// Exactly one repository must be visible; anything else points at a
    /// misconfigured endpoint and fails with a descriptive error rather
    /// than silently picking the first entry.
    pub async fn create_session(&self, params: &SessionParams) -> ClientResult<Session> {
        let mut repositories = self.repositories(params).await?;
        if repositories.len() != 1 {
            return Err(ClientError::Repository(format!(
                "expected exactly one repository at {}, found {}",
                params.endpoint_url()?,
                repositories.len()
            )));
        }
        Ok(repositories.remove(0).create_session())
    }

    fn binding(params: &SessionParams) -> ClientResult<Arc<RestBinding>> {
        let endpoint_url = params.endpoint_url()?;
        match params.binding_type()? {
            BindingType::Rest => Ok(Arc::new(RestBinding::new(endpoint_url))),
        }
    }
}

impl Default for SessionFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// A discovered repository, ready to open sessions against.
pub struct Repository {
    info: RepositoryInfo,
    binding: Arc<RestBinding>,
}

impl Repository {
    pub fn id(&self) -> &str {
        &self.info.id
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn root_folder_id(&self) -> &str {
        &self.info.root_folder_id
    }

    /// Open a session bound to this repository.
    pub fn create_session(&self) -> Session {
        Session {
            info: self.info.clone(),
            binding: self.binding.clone(),
        }
    }
}

/// A connected handle to one repository.
///
/// All object operations are thin pass-throughs to the underlying
/// transport binding. Sessions are cheap; the harness opens a fresh one
/// per operation batch rather than reusing them across tests.
pub struct Session {
    info: RepositoryInfo,
    binding: Arc<dyn RepositoryBinding>,
}

impl Session {
    pub fn repository_id(&self) -> &str {
        &self.info.id
    }

    /// The repository's root folder.
    pub async fn root_folder(&self) -> ClientResult<ObjectSummary> {
        self.binding.object(&self.info.root_folder_id).await
    }

    /// Resolve an object by its repository-assigned identifier.
    pub async fn object(&self, id: &str) -> ClientResult<ObjectSummary> {
        self.binding.object(id).await
    }

    /// Immediate children of a folder.
    pub async fn children(&self, folder_id: &str) -> ClientResult<Vec<ObjectSummary>> {
        self.binding.children(folder_id).await
    }

    /// Materialize a folder from a property set.
    pub async fn create_folder(
        &self,
        parent_id: &str,
        properties: &HashMap<String, Value>,
    ) -> ClientResult<ObjectSummary> {
        self.binding.create_folder(parent_id, properties).await
    }

    /// Materialize a document from a property set and content payload.
    pub async fn create_document(
        &self,
        parent_id: &str,
        properties: &HashMap<String, Value>,
        content: &ContentPayload,
        versioning: VersioningState,
    ) -> ClientResult<ObjectSummary> {
        self.binding
            .create_document(parent_id, properties, content, versioning)
            .await
    }

    /// Delete a single object.
    pub async fn delete(&self, id: &str, all_versions: bool) -> ClientResult<()> {
        self.binding.delete(id, all_versions).await
    }

    /// Recursively delete a folder; returns the ids the server could not
    /// delete.
    pub async fn delete_tree(
        &self,
        folder_id: &str,
        all_versions: bool,
        unfile: UnfileMode,
        continue_on_failure: bool,
    ) -> ClientResult<Vec<String>> {
        self.binding
            .delete_tree(folder_id, all_versions, unfile, continue_on_failure)
            .await
    }

    /// Content bytes of a document's latest version.
    pub async fn content(&self, id: &str) -> ClientResult<Vec<u8>> {
        self.binding.content(id).await
    }

    /// Place or release a retention hold on an object.
    pub async fn set_retention(&self, id: &str, hold: bool) -> ClientResult<()> {
        self.binding.set_retention(id, hold).await
    }

    /// Close the session's underlying transport binding.
    pub fn close_binding(&self) {
        self.binding.close();
    }
}
