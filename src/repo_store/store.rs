use super::object::{
    ContentStream, DocumentVersion, ObjectId, ObjectSummary, ObjectType, RepoObject, UnfileMode,
    VersioningState,
};
use crate::error::{DocRepoError, DocRepoResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Discovery-level description of a repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub id: String,
    pub name: String,
    pub root_folder_id: ObjectId,
    pub product_name: String,
    pub product_version: String,
}

/// In-memory content repository.
///
/// Holds a single tree of folders and documents under one root folder.
/// All operations are synchronous; the HTTP layer serializes access
/// through the node's lock.
pub struct RepoStore {
    repository_id: String,
    repository_name: String,
    root_id: ObjectId,
    objects: HashMap<ObjectId, RepoObject>,
}

impl RepoStore {
    /// Create an empty repository with a fresh root folder.
    pub fn new(repository_name: &str) -> Self {
        let root_id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let root = RepoObject {
            id: root_id.clone(),
            parent_id: None,
            name: "/".to_string(),
            object_type: ObjectType::Folder,
            created_at: now,
            modified_at: now,
            retention_hold: false,
            versions: Vec::new(),
        };

        let mut objects = HashMap::new();
        objects.insert(root_id.clone(), root);

        Self {
            repository_id: Uuid::new_v4().to_string(),
            repository_name: repository_name.to_string(),
            root_id,
            objects,
        }
    }

    /// Identifier of the root folder.
    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    /// Discovery description of this repository.
    pub fn repository_info(&self) -> RepositoryInfo {
        RepositoryInfo {
            id: self.repository_id.clone(),
            name: self.repository_name.clone(),
            root_folder_id: self.root_id.clone(),
            product_name: "DocRepo In-Memory Server".to_string(),
            product_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Number of objects currently held, the root folder included.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Look up an object by its repository-assigned identifier.
    pub fn object(&self, id: &str) -> DocRepoResult<&RepoObject> {
        self.objects
            .get(id)
            .ok_or_else(|| DocRepoError::NotFound(format!("no object with id {}", id)))
    }

    /// Immediate children of a folder, ordered by name.
    pub fn children(&self, folder_id: &str) -> DocRepoResult<Vec<&RepoObject>> {
        let folder = self.object(folder_id)?;
        if folder.object_type != ObjectType::Folder {
            return Err(DocRepoError::Repository(format!(
                "object {} is not a folder",
                folder_id
            )));
        }

        let mut children: Vec<&RepoObject> = self
            .objects
            .values()
            .filter(|o| o.parent_id.as_deref() == Some(folder_id))
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    /// Create a folder under `parent_id`.
    pub fn create_folder(&mut self, parent_id: &str, name: &str) -> DocRepoResult<ObjectSummary> {
        self.check_new_child(parent_id, name)?;

        let now = Utc::now();
        let folder = RepoObject {
            id: Uuid::new_v4().to_string(),
            parent_id: Some(parent_id.to_string()),
            name: name.to_string(),
            object_type: ObjectType::Folder,
            created_at: now,
            modified_at: now,
            retention_hold: false,
            versions: Vec::new(),
        };

        let summary = folder.summary();
        self.objects.insert(folder.id.clone(), folder);
        Ok(summary)
    }

    /// Create a document under `parent_id` with an attached content stream.
    pub fn create_document(
        &mut self,
        parent_id: &str,
        name: &str,
        content: ContentStream,
        versioning: VersioningState,
    ) -> DocRepoResult<ObjectSummary> {
        self.check_new_child(parent_id, name)?;

        let now = Utc::now();
        let label = match versioning {
            VersioningState::None | VersioningState::Major => "1.0",
            VersioningState::Minor => "0.1",
        };
        let document = RepoObject {
            id: Uuid::new_v4().to_string(),
            parent_id: Some(parent_id.to_string()),
            name: name.to_string(),
            object_type: ObjectType::Document,
            created_at: now,
            modified_at: now,
            retention_hold: false,
            versions: vec![DocumentVersion {
                label: label.to_string(),
                content,
                created_at: now,
            }],
        };

        let summary = document.summary();
        self.objects.insert(document.id.clone(), document);
        Ok(summary)
    }

    /// Delete a single object.
    ///
    /// Folders must be empty; use [`RepoStore::delete_tree`] otherwise.
    /// For documents, `all_versions` cascades over the whole version
    /// series; otherwise only the latest version is removed and the
    /// document survives while older versions remain.
    pub fn delete(&mut self, id: &str, all_versions: bool) -> DocRepoResult<()> {
        if id == self.root_id {
            return Err(DocRepoError::Repository(
                "the root folder cannot be deleted".to_string(),
            ));
        }
        let object = self.object(id)?;
        if object.retention_hold {
            return Err(DocRepoError::Conflict(format!(
                "object {} is under a retention hold",
                id
            )));
        }

        match object.object_type {
            ObjectType::Folder => {
                if !self.children(id)?.is_empty() {
                    return Err(DocRepoError::Repository(format!(
                        "folder {} is not empty; use delete-tree",
                        id
                    )));
                }
                self.objects.remove(id);
            }
            ObjectType::Document => {
                if all_versions {
                    self.objects.remove(id);
                } else {
                    let object = self.objects.get_mut(id).ok_or_else(|| {
                        DocRepoError::NotFound(format!("no object with id {}", id))
                    })?;
                    object.versions.pop();
                    if object.versions.is_empty() {
                        self.objects.remove(id);
                    } else {
                        object.modified_at = Utc::now();
                    }
                }
            }
        }
        Ok(())
    }

    /// Recursively delete a folder and its descendants.
    ///
    /// Returns the identifiers the store could not delete. Objects under
    /// a retention hold survive, and so does every ancestor folder that
    /// still has surviving children. With `continue_on_failure` unset the
    /// walk stops at the first failure; deletions already performed are
    /// not rolled back.
    pub fn delete_tree(
        &mut self,
        folder_id: &str,
        all_versions: bool,
        _unfile: UnfileMode,
        continue_on_failure: bool,
    ) -> DocRepoResult<Vec<ObjectId>> {
        if folder_id == self.root_id {
            return Err(DocRepoError::Repository(
                "the root folder cannot be deleted".to_string(),
            ));
        }
        let target = self.object(folder_id)?;
        if target.object_type != ObjectType::Folder {
            return Err(DocRepoError::Repository(format!(
                "object {} is not a folder",
                folder_id
            )));
        }

        let mut ordered = Vec::new();
        self.collect_post_order(folder_id, &mut ordered);

        let mut not_deleted = Vec::new();
        for id in ordered {
            let object = match self.objects.get(&id) {
                Some(o) => o,
                None => continue,
            };

            let survives = if object.retention_hold {
                true
            } else if object.object_type == ObjectType::Folder {
                // A failed descendant keeps its ancestor folders alive.
                self.objects
                    .values()
                    .any(|o| o.parent_id.as_deref() == Some(id.as_str()))
            } else if !all_versions {
                let object = self
                    .objects
                    .get_mut(&id)
                    .ok_or_else(|| DocRepoError::NotFound(format!("no object with id {}", id)))?;
                object.versions.pop();
                !object.versions.is_empty()
            } else {
                false
            };

            if survives {
                not_deleted.push(id);
                if !continue_on_failure {
                    return Ok(not_deleted);
                }
            } else {
                self.objects.remove(&id);
            }
        }
        Ok(not_deleted)
    }

    /// Content stream of a document's latest version.
    pub fn content(&self, id: &str) -> DocRepoResult<&ContentStream> {
        let object = self.object(id)?;
        if object.object_type != ObjectType::Document {
            return Err(DocRepoError::Repository(format!(
                "object {} is not a document",
                id
            )));
        }
        object
            .latest_version()
            .map(|v| &v.content)
            .ok_or_else(|| DocRepoError::NotFound(format!("document {} has no content", id)))
    }

    /// Place or release a retention hold on an object.
    ///
    /// Held objects cannot be deleted, directly or through delete-tree.
    pub fn set_retention(&mut self, id: &str, hold: bool) -> DocRepoResult<()> {
        if id == self.root_id {
            return Err(DocRepoError::Repository(
                "the root folder cannot carry a retention hold".to_string(),
            ));
        }
        let object = self
            .objects
            .get_mut(id)
            .ok_or_else(|| DocRepoError::NotFound(format!("no object with id {}", id)))?;
        object.retention_hold = hold;
        object.modified_at = Utc::now();
        Ok(())
    }

    fn check_new_child(&self, parent_id: &str, name: &str) -> DocRepoResult<()> {
        let parent = self.object(parent_id)?;
        if parent.object_type != ObjectType::Folder {
            return Err(DocRepoError::Repository(format!(
                "cannot create children under document {}",
                parent_id
            )));
        }
        if name.is_empty() {
            return Err(DocRepoError::Repository(
                "object name must not be empty".to_string(),
            ));
        }
        let taken = self
            .objects
            .values()
            .any(|o| o.parent_id.as_deref() == Some(parent_id) && o.name == name);
        if taken {
            return Err(DocRepoError::Repository(format!(
                "an object named {:?} already exists in folder {}",
                name, parent_id
            )));
        }
        Ok(())
    }

    /// Collect a subtree bottom-up so children are visited before their
    /// parent folder.
    fn collect_post_order(&self, id: &str, out: &mut Vec<ObjectId>) {
        let child_ids: Vec<ObjectId> = self
            .objects
            .values()
            .filter(|o| o.parent_id.as_deref() == Some(id))
            .map(|o| o.id.clone())
            .collect();
        for child_id in child_ids {
            self.collect_post_order(&child_id, out);
        }
        out.push(id.to_string());
    }
}
