use crate::constants;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned to repository objects (a UUID string).
pub type ObjectId = String;

/// The two shapes a repository item can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    Folder,
    Document,
}

impl ObjectType {
    /// The object-type identifier used on the wire and in property sets.
    pub fn type_id(&self) -> &'static str {
        match self {
            ObjectType::Folder => constants::FOLDER_TYPE_ID,
            ObjectType::Document => constants::DOCUMENT_TYPE_ID,
        }
    }

    /// Resolve a wire object-type identifier back to an [`ObjectType`].
    pub fn from_type_id(type_id: &str) -> Option<Self> {
        match type_id {
            constants::FOLDER_TYPE_ID => Some(ObjectType::Folder),
            constants::DOCUMENT_TYPE_ID => Some(ObjectType::Document),
            _ => None,
        }
    }
}

/// Versioning state requested when a document is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersioningState {
    /// Unversioned document
    None,
    /// Start a version series at a major version
    Major,
    /// Start a version series at a minor version
    Minor,
}

/// How a recursive delete treats items that cannot be outright deleted.
///
/// The store has no multi-filing, so both modes behave identically; the
/// mode is carried on the wire for protocol fidelity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnfileMode {
    Delete,
    Unfile,
}

/// A named, typed byte stream attached to a document.
#[derive(Debug, Clone)]
pub struct ContentStream {
    pub file_name: String,
    pub mime_type: String,
    pub content: Bytes,
}

impl ContentStream {
    pub fn new(file_name: &str, mime_type: &str, content: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            content: content.into(),
        }
    }

    pub fn length(&self) -> u64 {
        self.content.len() as u64
    }
}

/// One entry in a document's version series.
#[derive(Debug, Clone)]
pub struct DocumentVersion {
    pub label: String,
    pub content: ContentStream,
    pub created_at: DateTime<Utc>,
}

/// A repository item: a folder or a document with its version series.
#[derive(Debug, Clone)]
pub struct RepoObject {
    pub id: ObjectId,
    /// `None` only for the root folder
    pub parent_id: Option<ObjectId>,
    pub name: String,
    pub object_type: ObjectType,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    /// Objects under a retention hold cannot be deleted
    pub retention_hold: bool,
    /// Version series, newest last; empty for folders
    pub versions: Vec<DocumentVersion>,
}

impl RepoObject {
    /// Latest entry of the version series, if any.
    pub fn latest_version(&self) -> Option<&DocumentVersion> {
        self.versions.last()
    }

    /// Wire-facing summary of this object.
    pub fn summary(&self) -> ObjectSummary {
        ObjectSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            object_type_id: self.object_type.type_id().to_string(),
            parent_id: self.parent_id.clone(),
            created_at: self.created_at,
            modified_at: self.modified_at,
            version_label: self.latest_version().map(|v| v.label.clone()),
            content_length: self.latest_version().map(|v| v.content.length()),
            content_mime_type: self.latest_version().map(|v| v.content.mime_type.clone()),
        }
    }
}

/// Serialized view of a repository object, shared by the HTTP surface and
/// the client session layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub id: ObjectId,
    pub name: String,
    pub object_type_id: String,
    pub parent_id: Option<ObjectId>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    #[serde(default)]
    pub version_label: Option<String>,
    #[serde(default)]
    pub content_length: Option<u64>,
    #[serde(default)]
    pub content_mime_type: Option<String>,
}

impl ObjectSummary {
    pub fn is_folder(&self) -> bool {
        self.object_type_id == constants::FOLDER_TYPE_ID
    }

    pub fn is_document(&self) -> bool {
        self.object_type_id == constants::DOCUMENT_TYPE_ID
    }
}
