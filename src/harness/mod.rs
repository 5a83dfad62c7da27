//! Test-suite scaffolding around the embedded repository server.
//!
//! [`RepoTestServer`] owns the server lifecycle for a suite: started once
//! before the first test, stopped once after the last. [`RepoTestSupport`]
//! carries the per-test conveniences on top of the session layer: driving
//! the repository to a known-empty state, creating folders and text
//! documents, and reading content back. Tests are expected to run
//! sequentially against one server; nothing here isolates concurrent
//! suites from each other.

use crate::client::{ClientError, ContentPayload, Session, SessionFactory, SessionParams};
use crate::config::ServerConfig;
use crate::constants;
use crate::error::{DocRepoError, DocRepoResult};
use crate::message::Exchange;
use crate::repo_node::{DocRepoHttpServer, RepoNode};
use crate::repo_store::{ObjectSummary, UnfileMode, VersioningState};
use log::{error, info};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tokio::task::JoinHandle;

/// How often and how long to poll the endpoint before declaring startup
/// failed.
const READINESS_ATTEMPTS: usize = 50;
const READINESS_DELAY: Duration = Duration::from_millis(100);

/// An embedded repository server scoped to a test suite.
///
/// `start` brings the server up and returns only once the endpoint
/// answers repository-discovery requests; a server that never becomes
/// ready fails the whole suite. `stop` is best-effort.
pub struct RepoTestServer {
    config: ServerConfig,
    join: JoinHandle<()>,
}

impl RepoTestServer {
    /// Start an embedded server for the given configuration.
    pub async fn start(config: ServerConfig) -> DocRepoResult<Self> {
        let node = RepoNode::new(config.clone())?;
        let server = DocRepoHttpServer::new(node, &config.bind_address)?;
        let join = tokio::spawn(async move {
            if let Err(e) = server.run().await {
                error!("Embedded repository server exited: {}", e);
            }
        });

        let endpoint_url = config.endpoint_url();
        wait_until_ready(&endpoint_url).await?;
        info!("Embedded repository server ready at {}", endpoint_url);

        Ok(Self { config, join })
    }

    /// URL of the REST binding endpoint of this server.
    pub fn endpoint_url(&self) -> String {
        self.config.endpoint_url()
    }

    /// Per-test support helpers bound to this server's endpoint.
    pub fn support(&self) -> RepoTestSupport {
        RepoTestSupport::new(&self.endpoint_url())
    }

    /// Shut the server down. Best-effort; already-completed tests are
    /// unaffected by shutdown problems.
    pub async fn stop(self) {
        info!("Stopping embedded repository server");
        self.join.abort();
        let _ = self.join.await;
    }
}

/// Poll repository discovery until the server answers.
async fn wait_until_ready(endpoint_url: &str) -> DocRepoResult<()> {
    let factory = SessionFactory::new();
    let params = SessionParams::for_endpoint(endpoint_url);
    for _ in 0..READINESS_ATTEMPTS {
        if factory.repositories(&params).await.is_ok() {
            return Ok(());
        }
        tokio::time::sleep(READINESS_DELAY).await;
    }
    Err(DocRepoError::Http(format!(
        "repository endpoint {} did not become ready",
        endpoint_url
    )))
}

/// Per-test conveniences over the session layer.
pub struct RepoTestSupport {
    endpoint_url: String,
}

impl RepoTestSupport {
    pub fn new(endpoint_url: &str) -> Self {
        Self {
            endpoint_url: endpoint_url.to_string(),
        }
    }

    fn session_params(&self) -> SessionParams {
        SessionParams::for_endpoint(&self.endpoint_url)
    }

    /// Open a fresh session against the configured endpoint.
    pub async fn create_session(&self) -> DocRepoResult<Session> {
        Ok(SessionFactory::new()
            .create_session(&self.session_params())
            .await?)
    }

    /// Per-test setup: cleanup runs first, before any framework setup a
    /// test adds on top.
    pub async fn set_up(&self) -> DocRepoResult<()> {
        self.delete_all_content().await
    }

    /// Drive the repository to a known-empty state.
    ///
    /// Folders under the root are removed with a recursive delete-tree;
    /// anything the server reports as not deleted fails the cleanup
    /// outright, since an unclean repository must never silently proceed
    /// to the next test. Non-folder children are deleted directly with
    /// cascading version deletion. The session's transport binding is
    /// closed at the end.
    pub async fn delete_all_content(&self) -> DocRepoResult<()> {
        let session = self.create_session().await?;
        let root = session.root_folder().await?;

        for child in session.children(&root.id).await? {
            if child.object_type_id == constants::FOLDER_TYPE_ID {
                let not_deleted = session
                    .delete_tree(&child.id, true, UnfileMode::Delete, true)
                    .await?;
                if !not_deleted.is_empty() {
                    return Err(DocRepoError::Cleanup(format!(
                        "repository still holds undeletable objects: {:?}",
                        not_deleted
                    )));
                }
            } else {
                session.delete(&child.id, true).await?;
            }
        }

        session.close_binding();
        Ok(())
    }

    /// Create a folder under the root folder.
    pub async fn create_folder_with_name(&self, name: &str) -> DocRepoResult<ObjectSummary> {
        let session = self.create_session().await?;
        let root = session.root_folder().await?;
        Ok(session
            .create_folder(&root.id, &folder_properties(name))
            .await?)
    }

    /// Create a folder under the given parent folder.
    pub async fn create_child_folder_with_name(
        &self,
        parent_id: &str,
        name: &str,
    ) -> DocRepoResult<ObjectSummary> {
        let session = self.create_session().await?;
        Ok(session
            .create_folder(parent_id, &folder_properties(name))
            .await?)
    }

    /// Create a `text/plain; charset=UTF-8` document under the given
    /// folder and return its repository-assigned identifier.
    pub async fn create_text_document(
        &self,
        folder_id: &str,
        content: &str,
        file_name: &str,
    ) -> DocRepoResult<String> {
        let session = self.create_session().await?;
        let payload = ContentPayload::new(
            file_name,
            constants::TEXT_PLAIN_UTF8,
            content.as_bytes().to_vec(),
        );
        let summary = session
            .create_document(
                folder_id,
                &document_properties(file_name),
                &payload,
                VersioningState::None,
            )
            .await?;
        Ok(summary.id)
    }

    /// Resolve an object by its repository-assigned identifier.
    pub async fn object_by_id(&self, id: &str) -> DocRepoResult<ObjectSummary> {
        let session = self.create_session().await?;
        Ok(session.object(id).await?)
    }

    /// Read a document's content stream back as text.
    ///
    /// The exact text is preserved, newlines included; non-UTF-8 content
    /// is an error.
    pub async fn document_content_as_string(&self, id: &str) -> DocRepoResult<String> {
        let session = self.create_session().await?;
        let object = session.object(id).await?;
        if !object.is_document() {
            return Err(ClientError::Content(format!("object {} is not a document", id)).into());
        }
        let bytes = session.content(id).await?;
        Ok(String::from_utf8(bytes)
            .map_err(|e| ClientError::Content(format!("document content is not valid UTF-8: {}", e)))?)
    }

    /// Build an in-memory exchange, setting `body` as the inbound
    /// message's payload when supplied.
    pub fn create_exchange_with_body(&self, body: Option<&str>) -> Exchange {
        let mut exchange = Exchange::new();
        if let Some(body) = body {
            exchange.in_message_mut().set_body(json!(body));
        }
        exchange
    }
}

fn folder_properties(name: &str) -> HashMap<String, Value> {
    let mut properties = HashMap::new();
    properties.insert(
        constants::PROP_OBJECT_TYPE_ID.to_string(),
        json!(constants::FOLDER_TYPE_ID),
    );
    properties.insert(constants::PROP_NAME.to_string(), json!(name));
    properties
}

fn document_properties(name: &str) -> HashMap<String, Value> {
    let mut properties = HashMap::new();
    properties.insert(
        constants::PROP_OBJECT_TYPE_ID.to_string(),
        json!(constants::DOCUMENT_TYPE_ID),
    );
    properties.insert(constants::PROP_NAME.to_string(), json!(name));
    properties
}
