use super::{object_routes, repository_routes};
use crate::error::{DocRepoError, DocRepoResult};
use crate::repo_node::RepoNode;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer as ActixHttpServer};
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

/// HTTP server for a repository node.
///
/// DocRepoHttpServer exposes the node's repository over a REST binding
/// mounted under the node's context path. It provides endpoints for
/// repository discovery, object lookup and listing, folder and document
/// creation, content retrieval, and single and recursive deletion.
pub struct DocRepoHttpServer {
    /// The repository node
    node: Arc<tokio::sync::Mutex<RepoNode>>,
    /// The HTTP server bind address
    bind_address: String,
    /// Context path the REST binding is mounted under
    context_path: String,
}

/// Shared application state for the HTTP server.
pub struct AppState {
    /// The repository node
    pub node: Arc<tokio::sync::Mutex<RepoNode>>,
}

impl DocRepoHttpServer {
    /// Create a new HTTP server.
    ///
    /// # Arguments
    ///
    /// * `node` - The RepoNode instance to serve
    /// * `bind_address` - The address to bind to (e.g., "127.0.0.1:9090")
    ///
    /// # Errors
    ///
    /// Returns a `DocRepoError` if the node's context path is empty.
    pub fn new(node: RepoNode, bind_address: &str) -> DocRepoResult<Self> {
        let context_path = node.config.context_path.trim_matches('/').to_string();
        if context_path.is_empty() {
            return Err(DocRepoError::Config(
                "context path must not be empty".to_string(),
            ));
        }

        Ok(Self {
            node: Arc::new(Mutex::new(node)),
            bind_address: bind_address.to_string(),
            context_path,
        })
    }

    /// Run the HTTP server.
    ///
    /// This method binds the server and accepts client connections until
    /// the task driving it is dropped or aborted.
    ///
    /// # Errors
    ///
    /// Returns a `DocRepoError` if:
    /// * There is an error binding to the specified address
    /// * The server exits with an error
    pub async fn run(&self) -> DocRepoResult<()> {
        info!(
            "Repository server running on {} under /{}",
            self.bind_address, self.context_path
        );

        // Create shared application state
        let app_state = web::Data::new(AppState {
            node: self.node.clone(),
        });
        let context_path = format!("/{}", self.context_path);

        let server = ActixHttpServer::new(move || {
            // Create CORS middleware
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(app_state.clone())
                .service(
                    web::scope(&context_path).service(
                        web::scope("/rest")
                            // Repository discovery
                            .route(
                                "/repositories",
                                web::get().to(repository_routes::list_repositories),
                            )
                            // Object endpoints
                            .route("/objects/{id}", web::get().to(object_routes::get_object))
                            .route(
                                "/objects/{id}",
                                web::delete().to(object_routes::delete_object),
                            )
                            .route(
                                "/objects/{id}/children",
                                web::get().to(object_routes::list_children),
                            )
                            .route(
                                "/objects/{id}/folders",
                                web::post().to(object_routes::create_folder),
                            )
                            .route(
                                "/objects/{id}/documents",
                                web::post().to(object_routes::create_document),
                            )
                            .route(
                                "/objects/{id}/content",
                                web::get().to(object_routes::get_content),
                            )
                            .route(
                                "/objects/{id}/delete-tree",
                                web::post().to(object_routes::delete_tree),
                            )
                            .route(
                                "/objects/{id}/retention",
                                web::post().to(object_routes::set_retention),
                            ),
                    ),
                )
        })
        .bind(&self.bind_address)
        .map_err(|e| DocRepoError::Config(format!("Failed to bind HTTP server: {}", e)))?
        .run();

        // Run the server
        server
            .await
            .map_err(|e| DocRepoError::Http(format!("HTTP server error: {}", e)))?;

        Ok(())
    }
}
