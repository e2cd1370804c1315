//! JSONP Image Proxy (v1)
//!
//! Long-running HTTP front end for the image responder.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request                ┌──────────────────────────────────────────┐
//!     ─────────────────────────────▶│  http::server  (request ID, trace, limits) │
//!                                   └────────────────────┬─────────────────────┘
//!                                                        ▼
//!                                   ┌──────────────────────────────────────────┐
//!                                   │  image::Responder                         │
//!                                   │  params → extension check → fetch ───────┼──▶ Origin
//!                                   │        → data URI → header filter         │
//!                                   └────────────────────┬─────────────────────┘
//!     Client Response                                    ▼
//!     ◀─────────────────────────────  callback({"data": "data:image/png;base64,..."})
//! ```

use std::path::PathBuf;

use clap::Parser;

use image_proxy::lifecycle::startup::{self, Overrides};
use image_proxy::observability::logging::LogTarget;

#[derive(Parser)]
#[command(name = "image-proxy")]
#[command(about = "Serve remote images as JSONP-wrapped data URIs", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address
    #[arg(short, long)]
    bind: Option<String>,

    /// Override observability.log_level
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = startup::resolve_config(
        cli.config.as_deref(),
        Overrides {
            bind_address: cli.bind,
            log_level: cli.log_level,
        },
    )?;

    startup::init_observability(&config, LogTarget::Stdout);
    tracing::info!("image-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    startup::run_server(config).await
}
