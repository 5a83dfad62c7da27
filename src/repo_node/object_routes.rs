use super::http_server::AppState;
use crate::error::DocRepoError;
use crate::repo_store::{ContentStream, UnfileMode, VersioningState};
use actix_web::{web, HttpResponse, Responder};
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Create a folder from a property set.
#[derive(Deserialize)]
pub struct CreateFolderRequest {
    properties: HashMap<String, Value>,
}

/// Create a document from a property set plus its content stream.
#[derive(Deserialize)]
pub struct CreateDocumentRequest {
    properties: HashMap<String, Value>,
    /// Content bytes, base64-encoded
    content: String,
    mime_type: String,
    file_name: String,
    #[serde(default = "default_versioning_state")]
    versioning_state: VersioningState,
}

fn default_versioning_state() -> VersioningState {
    VersioningState::None
}

#[derive(Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    all_versions: bool,
}

/// Recursive delete over a folder and its descendants.
#[derive(Deserialize)]
pub struct DeleteTreeRequest {
    #[serde(default)]
    all_versions: bool,
    unfile_mode: UnfileMode,
    #[serde(default)]
    continue_on_failure: bool,
}

#[derive(Deserialize)]
pub struct RetentionRequest {
    hold: bool,
}

/// Map a node error onto the HTTP error envelope.
fn error_response(err: &DocRepoError) -> HttpResponse {
    let body = json!({"error": err.to_string()});
    match err {
        DocRepoError::NotFound(_) => HttpResponse::NotFound().json(body),
        DocRepoError::Repository(_) => HttpResponse::BadRequest().json(body),
        DocRepoError::Conflict(_) => HttpResponse::Conflict().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

/// Resolve an object by its repository-assigned identifier.
pub async fn get_object(path: web::Path<String>, state: web::Data<AppState>) -> impl Responder {
    let id = path.into_inner();
    let node = state.node.lock().await;

    match node.object(&id) {
        Ok(summary) => HttpResponse::Ok().json(json!({"data": summary})),
        Err(e) => error_response(&e),
    }
}

/// List the immediate children of a folder.
pub async fn list_children(path: web::Path<String>, state: web::Data<AppState>) -> impl Responder {
    let id = path.into_inner();
    let node = state.node.lock().await;

    match node.children(&id) {
        Ok(children) => HttpResponse::Ok().json(json!({"data": children})),
        Err(e) => error_response(&e),
    }
}

/// Materialize a new folder under the addressed parent.
pub async fn create_folder(
    path: web::Path<String>,
    request: web::Json<CreateFolderRequest>,
    state: web::Data<AppState>,
) -> impl Responder {
    let parent_id = path.into_inner();
    let mut node = state.node.lock().await;

    match node.create_folder(&parent_id, &request.properties) {
        Ok(summary) => {
            log::info!("Created folder {:?} under {}", summary.name, parent_id);
            HttpResponse::Created().json(json!({"data": summary}))
        }
        Err(e) => {
            log::error!("Folder creation under {} failed: {}", parent_id, e);
            error_response(&e)
        }
    }
}

/// Materialize a new document with its content stream under the
/// addressed parent.
pub async fn create_document(
    path: web::Path<String>,
    request: web::Json<CreateDocumentRequest>,
    state: web::Data<AppState>,
) -> impl Responder {
    let parent_id = path.into_inner();

    let bytes = match general_purpose::STANDARD.decode(&request.content) {
        Ok(bytes) => bytes,
        Err(e) => {
            return HttpResponse::BadRequest()
                .json(json!({"error": format!("Failed to decode content: {}", e)}));
        }
    };
    let stream = ContentStream::new(&request.file_name, &request.mime_type, bytes);

    let mut node = state.node.lock().await;
    match node.create_document(
        &parent_id,
        &request.properties,
        stream,
        request.versioning_state,
    ) {
        Ok(summary) => {
            log::info!("Created document {:?} under {}", summary.name, parent_id);
            HttpResponse::Created().json(json!({"data": summary}))
        }
        Err(e) => {
            log::error!("Document creation under {} failed: {}", parent_id, e);
            error_response(&e)
        }
    }
}

/// Serve a document's content bytes with its stored MIME type.
pub async fn get_content(path: web::Path<String>, state: web::Data<AppState>) -> impl Responder {
    let id = path.into_inner();
    let node = state.node.lock().await;

    match node.content(&id) {
        Ok(stream) => HttpResponse::Ok()
            .content_type(stream.mime_type.clone())
            .body(stream.content),
        Err(e) => error_response(&e),
    }
}

/// Delete a single object.
pub async fn delete_object(
    path: web::Path<String>,
    query: web::Query<DeleteQuery>,
    state: web::Data<AppState>,
) -> impl Responder {
    let id = path.into_inner();
    let mut node = state.node.lock().await;

    match node.delete(&id, query.all_versions) {
        Ok(()) => HttpResponse::Ok().json(json!({"data": {"id": id}})),
        Err(e) => {
            log::error!("Deletion of {} failed: {}", id, e);
            error_response(&e)
        }
    }
}

/// Recursively delete a folder, reporting the identifiers that survived.
pub async fn delete_tree(
    path: web::Path<String>,
    request: web::Json<DeleteTreeRequest>,
    state: web::Data<AppState>,
) -> impl Responder {
    let folder_id = path.into_inner();
    let mut node = state.node.lock().await;

    match node.delete_tree(
        &folder_id,
        request.all_versions,
        request.unfile_mode,
        request.continue_on_failure,
    ) {
        Ok(not_deleted) => {
            HttpResponse::Ok().json(json!({"data": {"not_deleted_ids": not_deleted}}))
        }
        Err(e) => {
            log::error!("Delete-tree under {} failed: {}", folder_id, e);
            error_response(&e)
        }
    }
}

/// Place or release a retention hold on an object.
pub async fn set_retention(
    path: web::Path<String>,
    request: web::Json<RetentionRequest>,
    state: web::Data<AppState>,
) -> impl Responder {
    let id = path.into_inner();
    let mut node = state.node.lock().await;

    match node.set_retention(&id, request.hold) {
        Ok(()) => HttpResponse::Ok().json(json!({"data": {"id": id, "hold": request.hold}})),
        Err(e) => error_response(&e),
    }
}
