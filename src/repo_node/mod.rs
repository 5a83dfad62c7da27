//! The repository node and its embedded HTTP server.

pub mod http_server;
pub mod node;
pub mod object_routes;
pub mod repository_routes;

pub use http_server::{AppState, DocRepoHttpServer};
pub use node::RepoNode;
