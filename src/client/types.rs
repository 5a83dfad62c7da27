use super::error::{ClientError, ClientResult};
use crate::constants;
use std::collections::HashMap;

/// Transport profile a session speaks to the repository endpoint.
///
/// Only the REST binding exists today; the selector is still carried in
/// the session parameters so configurations stay explicit about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingType {
    Rest,
}

impl BindingType {
    /// The selector value used in session parameters.
    pub fn value(&self) -> &'static str {
        match self {
            BindingType::Rest => "rest",
        }
    }

    /// Resolve a selector value back to a binding type.
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "rest" => Some(BindingType::Rest),
            _ => None,
        }
    }
}

/// Connection parameters for opening a session.
///
/// A mapping with two required keys: the endpoint URL and the
/// binding-type selector.
#[derive(Debug, Clone, Default)]
pub struct SessionParams {
    values: HashMap<String, String>,
}

impl SessionParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters for the given endpoint with the REST binding selected.
    pub fn for_endpoint(endpoint_url: &str) -> Self {
        let mut params = Self::new();
        params.insert(constants::ENDPOINT_URL_PARAM, endpoint_url);
        params.insert(constants::BINDING_TYPE_PARAM, BindingType::Rest.value());
        params
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// The configured endpoint URL.
    pub fn endpoint_url(&self) -> ClientResult<&str> {
        self.get(constants::ENDPOINT_URL_PARAM).ok_or_else(|| {
            ClientError::Config(format!(
                "missing session parameter {}",
                constants::ENDPOINT_URL_PARAM
            ))
        })
    }

    /// The configured binding type.
    pub fn binding_type(&self) -> ClientResult<BindingType> {
        let value = self.get(constants::BINDING_TYPE_PARAM).ok_or_else(|| {
            ClientError::Config(format!(
                "missing session parameter {}",
                constants::BINDING_TYPE_PARAM
            ))
        })?;
        BindingType::from_value(value)
            .ok_or_else(|| ClientError::Config(format!("unsupported binding type {:?}", value)))
    }
}

/// Content handed to the server when creating a document.
#[derive(Debug, Clone)]
pub struct ContentPayload {
    pub file_name: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

impl ContentPayload {
    pub fn new(file_name: &str, mime_type: &str, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_endpoint_fills_both_required_keys() {
        let params = SessionParams::for_endpoint("http://localhost:9090/docrepo-inmemory/rest");
        assert_eq!(
            params.endpoint_url().unwrap(),
            "http://localhost:9090/docrepo-inmemory/rest"
        );
        assert_eq!(params.binding_type().unwrap(), BindingType::Rest);
    }

    #[test]
    fn missing_endpoint_is_a_config_error() {
        let params = SessionParams::new();
        assert!(matches!(
            params.endpoint_url(),
            Err(ClientError::Config(_))
        ));
    }

    #[test]
    fn unsupported_binding_type_is_rejected() {
        let mut params = SessionParams::for_endpoint("http://localhost/rest");
        params.insert(crate::constants::BINDING_TYPE_PARAM, "atompub");
        assert!(matches!(
            params.binding_type(),
            Err(ClientError::Config(_))
        ));
    }
}
