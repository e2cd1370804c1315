//! Development helper: serve the working directory and open a browser tab.
//!
//! Usage: `devserve <url-path> [port]`

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use image_proxy::config::ObservabilityConfig;
use image_proxy::devserver::{self, DEFAULT_PORT};
use image_proxy::lifecycle::{signals, Shutdown};
use image_proxy::observability::logging::{self, LogTarget};

#[derive(Parser)]
#[command(name = "devserve")]
#[command(about = "Serve the current directory and open it in a browser", long_about = None)]
struct Cli {
    /// Path to open, relative to the served directory
    url_path: String,

    /// Port to listen on
    #[arg(default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Do not launch a browser
    #[arg(long)]
    no_browser: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(&ObservabilityConfig::default(), LogTarget::Stdout);

    let root = std::env::current_dir()?;
    let listener = TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], cli.port))).await?;

    if !cli.no_browser {
        let url = devserver::browser_url(cli.port, &cli.url_path);
        match devserver::open_browser(&url) {
            Ok(()) => tracing::info!(url = %url, "Opened browser"),
            Err(e) => tracing::warn!(url = %url, error = %e, "Could not launch browser"),
        }
    }

    let shutdown = Arc::new(Shutdown::new());
    let rx = shutdown.subscribe();
    signals::forward_to(shutdown);

    devserver::serve(listener, root, rx).await?;
    Ok(())
}
