use crate::config::ServerConfig;
use crate::constants;
use crate::error::{DocRepoError, DocRepoResult};
use crate::repo_store::{
    ContentStream, ObjectId, ObjectSummary, RepoStore, RepositoryInfo, UnfileMode, VersioningState,
};
use log::{debug, info};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// A repository node: one in-memory repository plus the configuration the
/// embedded HTTP server mounts it with.
///
/// The node owns the store and is shared behind a lock by the HTTP
/// workers; all its operations take `&self`/`&mut self` and are
/// synchronous.
pub struct RepoNode {
    store: RepoStore,
    node_id: String,
    /// Server configuration this node was created with
    pub config: ServerConfig,
}

impl RepoNode {
    /// Create a node hosting a single empty repository.
    pub fn new(config: ServerConfig) -> DocRepoResult<Self> {
        let store = RepoStore::new(&config.repository_name);
        let node = Self {
            store,
            node_id: Uuid::new_v4().to_string(),
            config,
        };
        info!(
            "Repository node {} created, repository {:?}",
            node.node_id, node.config.repository_name
        );
        Ok(node)
    }

    /// Identifier of this node instance.
    pub fn get_node_id(&self) -> String {
        self.node_id.clone()
    }

    /// Discovery description of the hosted repository.
    pub fn repository_info(&self) -> RepositoryInfo {
        self.store.repository_info()
    }

    /// Resolve an object by id.
    pub fn object(&self, id: &str) -> DocRepoResult<ObjectSummary> {
        self.store.object(id).map(|o| o.summary())
    }

    /// Immediate children of a folder, ordered by name.
    pub fn children(&self, folder_id: &str) -> DocRepoResult<Vec<ObjectSummary>> {
        Ok(self
            .store
            .children(folder_id)?
            .into_iter()
            .map(|o| o.summary())
            .collect())
    }

    /// Create a folder from a property set.
    ///
    /// The set must carry the folder object-type id and a name, the
    /// minimal properties a client sends to materialize a folder.
    pub fn create_folder(
        &mut self,
        parent_id: &str,
        properties: &HashMap<String, Value>,
    ) -> DocRepoResult<ObjectSummary> {
        let type_id = required_property(properties, constants::PROP_OBJECT_TYPE_ID)?;
        if type_id != constants::FOLDER_TYPE_ID {
            return Err(DocRepoError::Repository(format!(
                "object-type id {:?} does not denote a folder",
                type_id
            )));
        }
        let name = required_property(properties, constants::PROP_NAME)?.to_string();

        let summary = self.store.create_folder(parent_id, &name)?;
        debug!("Created folder {:?} ({})", summary.name, summary.id);
        Ok(summary)
    }

    /// Create a document from a property set and a content stream.
    pub fn create_document(
        &mut self,
        parent_id: &str,
        properties: &HashMap<String, Value>,
        content: ContentStream,
        versioning: VersioningState,
    ) -> DocRepoResult<ObjectSummary> {
        let type_id = required_property(properties, constants::PROP_OBJECT_TYPE_ID)?;
        if type_id != constants::DOCUMENT_TYPE_ID {
            return Err(DocRepoError::Repository(format!(
                "object-type id {:?} does not denote a document",
                type_id
            )));
        }
        let name = required_property(properties, constants::PROP_NAME)?.to_string();

        let summary = self
            .store
            .create_document(parent_id, &name, content, versioning)?;
        debug!("Created document {:?} ({})", summary.name, summary.id);
        Ok(summary)
    }

    /// Delete a single object.
    pub fn delete(&mut self, id: &str, all_versions: bool) -> DocRepoResult<()> {
        self.store.delete(id, all_versions)?;
        debug!("Deleted object {}", id);
        Ok(())
    }

    /// Recursively delete a folder, reporting what survived.
    pub fn delete_tree(
        &mut self,
        folder_id: &str,
        all_versions: bool,
        unfile: UnfileMode,
        continue_on_failure: bool,
    ) -> DocRepoResult<Vec<ObjectId>> {
        let not_deleted =
            self.store
                .delete_tree(folder_id, all_versions, unfile, continue_on_failure)?;
        if not_deleted.is_empty() {
            debug!("Deleted tree under {}", folder_id);
        } else {
            info!(
                "Delete-tree under {} left {} object(s) in place",
                folder_id,
                not_deleted.len()
            );
        }
        Ok(not_deleted)
    }

    /// Content stream of a document's latest version.
    pub fn content(&self, id: &str) -> DocRepoResult<ContentStream> {
        self.store.content(id).cloned()
    }

    /// Place or release a retention hold.
    pub fn set_retention(&mut self, id: &str, hold: bool) -> DocRepoResult<()> {
        self.store.set_retention(id, hold)?;
        info!(
            "Retention hold {} for object {}",
            if hold { "placed" } else { "released" },
            id
        );
        Ok(())
    }
}

fn required_property<'a>(
    properties: &'a HashMap<String, Value>,
    key: &str,
) -> DocRepoResult<&'a str> {
    properties
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| DocRepoError::Repository(format!("missing required property {}", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn folder_properties(name: &str) -> HashMap<String, Value> {
        let mut properties = HashMap::new();
        properties.insert(
            constants::PROP_OBJECT_TYPE_ID.to_string(),
            json!(constants::FOLDER_TYPE_ID),
        );
        properties.insert(constants::PROP_NAME.to_string(), json!(name));
        properties
    }

    #[test]
    fn create_folder_requires_folder_type_id() {
        let mut node = RepoNode::new(ServerConfig::default()).unwrap();
        let root = node.repository_info().root_folder_id;

        let mut properties = folder_properties("reports");
        properties.insert(
            constants::PROP_OBJECT_TYPE_ID.to_string(),
            json!(constants::DOCUMENT_TYPE_ID),
        );
        assert!(node.create_folder(&root, &properties).is_err());
    }

    #[test]
    fn create_folder_requires_name_property() {
        let mut node = RepoNode::new(ServerConfig::default()).unwrap();
        let root = node.repository_info().root_folder_id;

        let mut properties = folder_properties("reports");
        properties.remove(constants::PROP_NAME);
        assert!(node.create_folder(&root, &properties).is_err());
    }

    #[test]
    fn create_folder_from_property_set() {
        let mut node = RepoNode::new(ServerConfig::default()).unwrap();
        let root = node.repository_info().root_folder_id;

        let folder = node.create_folder(&root, &folder_properties("reports")).unwrap();
        assert_eq!(folder.name, "reports");
        assert!(folder.is_folder());
        assert_eq!(node.children(&root).unwrap().len(), 1);
    }
}
