use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use openvto_mcp_server::transport::{http, stdio};
use openvto_mcp_server::{Cli, TransportKind, build_handler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    init_tracing(config.server.verbose);

    let handler = Arc::new(build_handler(&config).await?);
    match config.server.transport {
        TransportKind::Stdio => stdio::run(handler).await?,
        TransportKind::Http => http::serve(handler, config.server.listen_addr().await?).await?,
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
