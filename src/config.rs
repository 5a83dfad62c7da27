use crate::constants;
use serde::{Deserialize, Serialize};

/// Configuration for an embedded repository server instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Context path the repository API is mounted under
    #[serde(default = "default_context_path")]
    pub context_path: String,
    /// Display name of the single repository hosted by the server
    #[serde(default = "default_repository_name")]
    pub repository_name: String,
}

fn default_bind_address() -> String {
    format!("127.0.0.1:{}", constants::DEFAULT_SERVER_PORT)
}

fn default_context_path() -> String {
    constants::DEFAULT_CONTEXT_PATH.to_string()
}

fn default_repository_name() -> String {
    "Main Repository".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            context_path: default_context_path(),
            repository_name: default_repository_name(),
        }
    }
}

impl ServerConfig {
    /// Create a configuration bound to the given local port.
    pub fn with_port(port: u16) -> Self {
        Self {
            bind_address: format!("127.0.0.1:{}", port),
            ..Default::default()
        }
    }

    /// Set the bind address.
    pub fn with_bind_address(mut self, address: &str) -> Self {
        self.bind_address = address.to_string();
        self
    }

    /// Set the context path.
    pub fn with_context_path(mut self, context_path: &str) -> Self {
        self.context_path = context_path.trim_matches('/').to_string();
        self
    }

    /// Set the repository display name.
    pub fn with_repository_name(mut self, name: &str) -> Self {
        self.repository_name = name.to_string();
        self
    }

    /// URL of the REST binding endpoint exposed by this server.
    pub fn endpoint_url(&self) -> String {
        format!(
            "http://{}/{}/{}",
            self.bind_address,
            self.context_path,
            constants::REST_BINDING_ROOT
        )
    }
}

/// Load a server configuration from the given path or from the
/// `DOCREPO_CONFIG` environment variable.
///
/// If the file does not exist, a default [`ServerConfig`] is returned.
/// When a `port` is provided, the returned config has its `bind_address`
/// set to `"127.0.0.1:<port>"` regardless of what the file said.
pub fn load_server_config(
    path: Option<&str>,
    port: Option<u16>,
) -> Result<ServerConfig, std::io::Error> {
    use std::fs;

    let config_path = path
        .map(|p| p.to_string())
        .or_else(|| std::env::var("DOCREPO_CONFIG").ok())
        .unwrap_or_else(|| "config/docrepo_config.json".to_string());

    let mut config = if let Ok(config_str) = fs::read_to_string(&config_path) {
        match serde_json::from_str::<ServerConfig>(&config_str) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::error!("Failed to parse server configuration: {}", e);
                return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, e));
            }
        }
    } else {
        ServerConfig::default()
    };

    if let Some(p) = port {
        config.bind_address = format!("127.0.0.1:{}", p);
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_endpoint_url() {
        let config = ServerConfig::default();
        assert_eq!(
            config.endpoint_url(),
            "http://127.0.0.1:9090/docrepo-inmemory/rest"
        );
    }

    #[test]
    fn port_override_wins() {
        let config = load_server_config(Some("config/does-not-exist.json"), Some(8123)).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:8123");
        assert_eq!(config.context_path, "docrepo-inmemory");
    }

    #[test]
    fn loads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docrepo_config.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"bind_address": "127.0.0.1:7777", "repository_name": "Scratch"}}"#
        )
        .unwrap();

        let config = load_server_config(path.to_str(), None).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:7777");
        assert_eq!(config.repository_name, "Scratch");
        // missing fields fall back to defaults
        assert_eq!(config.context_path, "docrepo-inmemory");
    }

    #[test]
    fn rejects_malformed_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docrepo_config.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(load_server_config(path.to_str(), None).is_err());
    }

    #[test]
    fn context_path_is_normalized() {
        let config = ServerConfig::default().with_context_path("/repo/");
        assert_eq!(config.context_path, "repo");
    }
}
