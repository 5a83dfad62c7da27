use clap::Parser;
use docrepo::repo_node::{DocRepoHttpServer, RepoNode};
use docrepo::{constants, load_server_config};
use log::info;

/// Command line options for the repository server binary.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Port for the HTTP server
    #[arg(long, default_value_t = constants::DEFAULT_SERVER_PORT)]
    port: u16,
}

/// Main entry point for the standalone repository server.
///
/// Starts a repository node with an empty in-memory repository and
/// serves its REST binding until the process is interrupted.
///
/// # Command-Line Arguments
///
/// * `--port <PORT>` - Port for the HTTP server (default: 9090)
///
/// # Environment Variables
///
/// * `DOCREPO_CONFIG` - Path to the server configuration file
///   (default: config/docrepo_config.json)
///
/// # Errors
///
/// Returns an error if:
/// * The configuration file cannot be read or parsed
/// * The HTTP server cannot be started
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    docrepo::logging::init().ok();
    info!("Starting DocRepo server...");

    let Cli { port } = Cli::parse();

    let config = load_server_config(None, Some(port))?;
    info!("Config loaded successfully");

    let bind_address = config.bind_address.clone();
    let node = RepoNode::new(config)?;
    info!("Node ID: {}", node.get_node_id());

    info!("Starting HTTP server on {}...", bind_address);
    let http_server = DocRepoHttpServer::new(node, &bind_address)?;
    http_server.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["test"]);
        assert_eq!(cli.port, 9090);
    }

    #[test]
    fn custom_port() {
        let cli = Cli::parse_from(["test", "--port", "8000"]);
        assert_eq!(cli.port, 8000);
    }
}
