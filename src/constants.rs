/// Common constants used across the DocRepo project.
///
/// These defaults are used for command line arguments, configuration,
/// and the wire protocol when explicit values are not provided.
pub const DEFAULT_SERVER_PORT: u16 = 9090;

/// Context path the repository API is mounted under, mirroring the name
/// of the deployable the endpoint is packaged as.
pub const DEFAULT_CONTEXT_PATH: &str = "docrepo-inmemory";

/// Path segment of the REST binding below the context path.
pub const REST_BINDING_ROOT: &str = "rest";

/// Object-type identifier marking folder objects.
pub const FOLDER_TYPE_ID: &str = "cmis:folder";

/// Object-type identifier marking document objects.
pub const DOCUMENT_TYPE_ID: &str = "cmis:document";

/// Property key holding an object's type identifier.
pub const PROP_OBJECT_TYPE_ID: &str = "cmis:objectTypeId";

/// Property key holding an object's name.
pub const PROP_NAME: &str = "cmis:name";

/// Session parameter key for the repository endpoint URL.
pub const ENDPOINT_URL_PARAM: &str = "docrepo.binding.url";

/// Session parameter key for the binding type selector.
pub const BINDING_TYPE_PARAM: &str = "docrepo.binding.type";

/// MIME type used for text documents created by the harness helpers.
pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=UTF-8";
