//! Tests against the raw REST surface, without the session layer in
//! between.

use base64::{engine::general_purpose, Engine as _};
use docrepo::harness::RepoTestServer;
use docrepo::ServerConfig;
use serde_json::{json, Value};
use std::net::TcpListener;

fn free_port_config() -> ServerConfig {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    ServerConfig::with_port(addr.port())
}

async fn start_server() -> (RepoTestServer, String) {
    let server = RepoTestServer::start(free_port_config())
        .await
        .expect("server start");
    let endpoint = server.endpoint_url();
    (server, endpoint)
}

async fn root_folder_id(client: &reqwest::Client, endpoint: &str) -> String {
    let body: Value = client
        .get(format!("{}/repositories", endpoint))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["data"][0]["root_folder_id"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn discovery_lists_the_single_repository() {
    let (server, endpoint) = start_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/repositories", endpoint))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let body: Value = response.json().await.unwrap();
    let repositories = body["data"].as_array().unwrap();
    assert_eq!(repositories.len(), 1);
    assert!(repositories[0]["id"].as_str().is_some());
    assert!(repositories[0]["root_folder_id"].as_str().is_some());

    server.stop().await;
}

#[tokio::test]
async fn unknown_object_returns_404_with_error_envelope() {
    let (server, endpoint) = start_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/objects/nope", endpoint))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("nope"));

    server.stop().await;
}

#[tokio::test]
async fn folder_creation_and_children_listing() {
    let (server, endpoint) = start_server().await;
    let client = reqwest::Client::new();
    let root = root_folder_id(&client, &endpoint).await;

    let response = client
        .post(format!("{}/objects/{}/folders", endpoint, root))
        .json(&json!({
            "properties": {
                "cmis:objectTypeId": "cmis:folder",
                "cmis:name": "reports"
            }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    let body: Value = client
        .get(format!("{}/objects/{}/children", endpoint, root))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let children = body["data"].as_array().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0]["name"], "reports");
    assert_eq!(children[0]["object_type_id"], "cmis:folder");

    server.stop().await;
}

#[tokio::test]
async fn folder_route_rejects_document_type_id() {
    let (server, endpoint) = start_server().await;
    let client = reqwest::Client::new();
    let root = root_folder_id(&client, &endpoint).await;

    let response = client
        .post(format!("{}/objects/{}/folders", endpoint, root))
        .json(&json!({
            "properties": {
                "cmis:objectTypeId": "cmis:document",
                "cmis:name": "not-a-folder"
            }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    server.stop().await;
}

#[tokio::test]
async fn content_is_served_raw_with_its_mime_type() {
    let (server, endpoint) = start_server().await;
    let client = reqwest::Client::new();
    let root = root_folder_id(&client, &endpoint).await;

    let created: Value = client
        .post(format!("{}/objects/{}/documents", endpoint, root))
        .json(&json!({
            "properties": {
                "cmis:objectTypeId": "cmis:document",
                "cmis:name": "hello.txt"
            },
            "content": general_purpose::STANDARD.encode("hello world"),
            "mime_type": "text/plain; charset=UTF-8",
            "file_name": "hello.txt",
            "versioning_state": "none"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let doc_id = created["data"]["id"].as_str().unwrap().to_string();

    let response = client
        .get(format!("{}/objects/{}/content", endpoint, doc_id))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .unwrap(),
        "text/plain; charset=UTF-8"
    );
    assert_eq!(response.text().await.unwrap(), "hello world");

    server.stop().await;
}

#[tokio::test]
async fn delete_tree_reports_objects_under_retention() {
    let (server, endpoint) = start_server().await;
    let client = reqwest::Client::new();
    let root = root_folder_id(&client, &endpoint).await;

    let folder: Value = client
        .post(format!("{}/objects/{}/folders", endpoint, root))
        .json(&json!({
            "properties": {
                "cmis:objectTypeId": "cmis:folder",
                "cmis:name": "held"
            }
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let folder_id = folder["data"]["id"].as_str().unwrap().to_string();

    let doc: Value = client
        .post(format!("{}/objects/{}/documents", endpoint, folder_id))
        .json(&json!({
            "properties": {
                "cmis:objectTypeId": "cmis:document",
                "cmis:name": "keep.txt"
            },
            "content": general_purpose::STANDARD.encode("keep me"),
            "mime_type": "text/plain; charset=UTF-8",
            "file_name": "keep.txt"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let doc_id = doc["data"]["id"].as_str().unwrap().to_string();

    let response = client
        .post(format!("{}/objects/{}/retention", endpoint, doc_id))
        .json(&json!({"hold": true}))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let body: Value = client
        .post(format!("{}/objects/{}/delete-tree", endpoint, folder_id))
        .json(&json!({
            "all_versions": true,
            "unfile_mode": "delete",
            "continue_on_failure": true
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let not_deleted = body["data"]["not_deleted_ids"].as_array().unwrap();
    assert!(not_deleted.iter().any(|v| v.as_str() == Some(doc_id.as_str())));
    assert!(not_deleted
        .iter()
        .any(|v| v.as_str() == Some(folder_id.as_str())));

    server.stop().await;
}

#[tokio::test]
async fn direct_delete_accepts_all_versions_query() {
    let (server, endpoint) = start_server().await;
    let client = reqwest::Client::new();
    let root = root_folder_id(&client, &endpoint).await;

    let doc: Value = client
        .post(format!("{}/objects/{}/documents", endpoint, root))
        .json(&json!({
            "properties": {
                "cmis:objectTypeId": "cmis:document",
                "cmis:name": "gone.txt"
            },
            "content": general_purpose::STANDARD.encode("gone"),
            "mime_type": "text/plain; charset=UTF-8",
            "file_name": "gone.txt"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let doc_id = doc["data"]["id"].as_str().unwrap().to_string();

    let response = client
        .delete(format!("{}/objects/{}?all_versions=true", endpoint, doc_id))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let response = client
        .get(format!("{}/objects/{}", endpoint, doc_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

    server.stop().await;
}
