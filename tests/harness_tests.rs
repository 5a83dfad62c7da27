use docrepo::harness::RepoTestServer;
use docrepo::{DocRepoError, RepoTestSupport, ServerConfig, SessionFactory, SessionParams};
use serde_json::json;
use std::net::TcpListener;

/// Pick an available local port for an embedded server.
fn free_port_config() -> ServerConfig {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    ServerConfig::with_port(addr.port())
}

async fn start_server() -> RepoTestServer {
    RepoTestServer::start(free_port_config())
        .await
        .expect("server start")
}

#[tokio::test]
async fn endpoint_answers_discovery_between_start_and_stop() {
    let server = start_server().await;

    let params = SessionParams::for_endpoint(&server.endpoint_url());
    let repositories = SessionFactory::new()
        .repositories(&params)
        .await
        .expect("discovery");
    assert_eq!(repositories.len(), 1);
    assert!(!repositories[0].root_folder_id().is_empty());

    server.stop().await;
}

#[tokio::test]
async fn cleanup_leaves_root_empty() {
    let server = start_server().await;
    let support = server.support();

    let folder = support.create_folder_with_name("archive").await.unwrap();
    support
        .create_text_document(&folder.id, "nested", "nested.txt")
        .await
        .unwrap();
    let session = support.create_session().await.unwrap();
    let root = session.root_folder().await.unwrap();
    support
        .create_text_document(&root.id, "loose", "loose.txt")
        .await
        .unwrap();

    support.set_up().await.unwrap();

    let session = support.create_session().await.unwrap();
    let root = session.root_folder().await.unwrap();
    assert!(session.children(&root.id).await.unwrap().is_empty());

    server.stop().await;
}

#[tokio::test]
async fn cleanup_is_idempotent() {
    let server = start_server().await;
    let support = server.support();

    support.create_folder_with_name("once").await.unwrap();

    support.delete_all_content().await.unwrap();
    // second run is a no-op over an empty root
    support.delete_all_content().await.unwrap();

    let session = support.create_session().await.unwrap();
    let root = session.root_folder().await.unwrap();
    assert!(session.children(&root.id).await.unwrap().is_empty());

    server.stop().await;
}

#[tokio::test]
async fn text_document_round_trips() {
    let server = start_server().await;
    let support = server.support();
    support.set_up().await.unwrap();

    let folder = support.create_folder_with_name("inbox").await.unwrap();
    let id = support
        .create_text_document(&folder.id, "hello world", "hello.txt")
        .await
        .unwrap();

    assert_eq!(
        support.document_content_as_string(&id).await.unwrap(),
        "hello world"
    );

    server.stop().await;
}

#[tokio::test]
async fn multi_line_content_is_preserved_exactly() {
    let server = start_server().await;
    let support = server.support();
    support.set_up().await.unwrap();

    let folder = support.create_folder_with_name("inbox").await.unwrap();
    let id = support
        .create_text_document(&folder.id, "line one\nline two\n", "lines.txt")
        .await
        .unwrap();

    assert_eq!(
        support.document_content_as_string(&id).await.unwrap(),
        "line one\nline two\n"
    );

    server.stop().await;
}

#[tokio::test]
async fn child_folder_appears_in_parent_listing() {
    let server = start_server().await;
    let support = server.support();
    support.set_up().await.unwrap();

    let parent = support.create_folder_with_name("projects").await.unwrap();
    support
        .create_child_folder_with_name(&parent.id, "reports")
        .await
        .unwrap();

    let session = support.create_session().await.unwrap();
    let children = session.children(&parent.id).await.unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].name, "reports");
    assert!(children[0].is_folder());

    server.stop().await;
}

#[tokio::test]
async fn cleanup_fails_fatally_when_objects_survive() {
    let server = start_server().await;
    let support = server.support();
    support.set_up().await.unwrap();

    let folder = support.create_folder_with_name("held").await.unwrap();
    let doc_id = support
        .create_text_document(&folder.id, "keep me", "keep.txt")
        .await
        .unwrap();

    let session = support.create_session().await.unwrap();
    session.set_retention(&doc_id, true).await.unwrap();

    let err = support.delete_all_content().await.unwrap_err();
    assert!(matches!(err, DocRepoError::Cleanup(_)));

    // the held document must still be there
    assert!(support.object_by_id(&doc_id).await.is_ok());

    // releasing the hold lets cleanup succeed again
    session.set_retention(&doc_id, false).await.unwrap();
    support.delete_all_content().await.unwrap();

    server.stop().await;
}

#[tokio::test]
async fn unknown_object_lookup_propagates() {
    let server = start_server().await;
    let support = server.support();

    let err = support.object_by_id("does-not-exist").await.unwrap_err();
    assert!(matches!(err, DocRepoError::Session(_)));

    server.stop().await;
}

#[test]
fn exchange_builder_sets_optional_body() {
    let support = RepoTestSupport::new("http://127.0.0.1:1/docrepo-inmemory/rest");

    let exchange = support.create_exchange_with_body(Some("payload"));
    assert_eq!(exchange.in_message().body(), Some(&json!("payload")));

    let blank = support.create_exchange_with_body(None);
    assert!(blank.in_message().body().is_none());
}
