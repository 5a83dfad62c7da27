//! Client session layer for the repository's REST endpoint.
//!
//! The session and harness logic depend on the narrow
//! [`RepositoryBinding`] capability interface; [`RestBinding`] is the
//! concrete transport behind it. Sessions are produced by the
//! [`SessionFactory`] from a small parameter map (endpoint URL plus
//! binding-type selector).

pub mod binding;
pub mod error;
pub mod session;
pub mod types;

pub use binding::{RepositoryBinding, RestBinding};
pub use error::{ClientError, ClientResult};
pub use session::{Repository, Session, SessionFactory};
pub use types::{BindingType, ContentPayload, SessionParams};
