//! Local development server.
//!
//! Serves a directory as static files and points a browser tab at it.
//! Directories resolve to their `index.html`; there is no directory
//! listing, so a directory without one answers 404.

use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::lifecycle::shutdown;

/// Port used when none is given on the command line.
pub const DEFAULT_PORT: u16 = 8000;

/// URL opened in the browser for `url_path`.
pub fn browser_url(port: u16, url_path: &str) -> String {
    format!("http://localhost:{}/{}", port, url_path)
}

/// Static file router rooted at `root`.
pub fn router(root: PathBuf) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(root))
        .layer(TraceLayer::new_for_http())
}

/// Serve `root` until `shutdown_rx` fires.
pub async fn serve(
    listener: TcpListener,
    root: PathBuf,
    shutdown_rx: broadcast::Receiver<()>,
) -> io::Result<()> {
    tracing::info!(
        address = %listener.local_addr()?,
        root = %root.display(),
        "Serving directory"
    );

    axum::serve(listener, router(root))
        .with_graceful_shutdown(shutdown::wait(shutdown_rx))
        .await
}

/// Open `url` with the platform's default browser launcher.
///
/// Must run inside a Tokio runtime: the launcher is reaped on a blocking
/// task so it never lingers as a zombie.
pub fn open_browser(url: &str) -> io::Result<()> {
    let mut child = launcher(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    tokio::task::spawn_blocking(move || match child.wait() {
        Ok(status) if !status.success() => {
            tracing::warn!(%status, "Browser launcher exited with failure")
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "Failed to wait for browser launcher"),
    });
    Ok(())
}

#[cfg(target_os = "macos")]
fn launcher(url: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(url);
    command
}

#[cfg(target_os = "windows")]
fn launcher(url: &str) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", "", url]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn launcher(url: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    command
}
