//! DocRepo: an in-memory content repository served over a REST binding,
//! plus the test harness that integration suites use to drive it.
//!
//! The crate has three layers:
//!
//! * [`repo_store`] and [`repo_node`]: the repository itself, an
//!   in-memory tree of folders and documents behind an embedded
//!   actix-web server.
//! * [`client`]: the session layer. A [`client::SessionFactory`] opens
//!   [`client::Session`]s against an endpoint through the narrow
//!   [`client::RepositoryBinding`] capability interface.
//! * [`harness`]: suite scaffolding for server lifecycle, per-test
//!   content cleanup, and content helpers built on sessions.

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod harness;
pub mod logging;
pub mod message;
pub mod repo_node;
pub mod repo_store;

pub use client::{
    BindingType, ClientError, ClientResult, ContentPayload, Repository, RepositoryBinding,
    RestBinding, Session, SessionFactory, SessionParams,
};
pub use config::{load_server_config, ServerConfig};
pub use error::{DocRepoError, DocRepoResult};
pub use harness::{RepoTestServer, RepoTestSupport};
pub use message::{Exchange, Message};
pub use repo_node::{DocRepoHttpServer, RepoNode};
pub use repo_store::{
    ContentStream, ObjectSummary, ObjectType, RepoStore, RepositoryInfo, UnfileMode,
    VersioningState,
};
