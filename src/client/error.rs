use thiserror::Error;

/// Error type for the client session layer
#[derive(Debug, Error)]
pub enum ClientError {
    /// Errors related to session parameters or binding selection
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to the HTTP transport
    #[error("Network error: {0}")]
    Network(String),

    /// A requested object does not exist on the server
    #[error("Not found: {0}")]
    NotFound(String),

    /// Errors related to repository discovery
    #[error("Repository error: {0}")]
    Repository(String),

    /// An error reported by the server for an otherwise well-formed call
    #[error("Remote error: {0}")]
    Remote(String),

    /// Errors related to serialization/deserialization
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Errors related to document content handling
    #[error("Content error: {0}")]
    Content(String),

    /// The session's transport binding has already been closed
    #[error("Binding closed")]
    BindingClosed,
}

/// Conversion from reqwest::Error to ClientError
impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        ClientError::Network(error.to_string())
    }
}

/// Conversion from serde_json::Error to ClientError
impl From<serde_json::Error> for ClientError {
    fn from(error: serde_json::Error) -> Self {
        ClientError::Serialization(error.to_string())
    }
}

/// Result type alias for operations that can result in a ClientError
pub type ClientResult<T> = Result<T, ClientError>;
