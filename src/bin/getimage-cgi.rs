//! CGI entry point: answers exactly one image request per process.
//!
//! Configuration is read from the file named by `IMAGE_PROXY_CONFIG`, if set.

use std::io;
use std::path::PathBuf;

use image_proxy::config::load_or_default;
use image_proxy::http::cgi::{self, CgiRequest};
use image_proxy::image::{HttpFetcher, Responder};
use image_proxy::observability::logging::{self, LogTarget};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var_os("IMAGE_PROXY_CONFIG").map(PathBuf::from);
    let mut config = load_or_default(config_path.as_deref())?;
    if std::env::var_os("RUST_LOG").is_none() && config_path.is_none() {
        config.observability.log_level = "warn".to_string();
    }

    // stdout carries the response; logs must stay on stderr.
    logging::init(&config.observability, LogTarget::Stderr);

    let request = CgiRequest::from_env(|key| std::env::var(key).ok(), io::stdin().lock())?;
    tracing::debug!(method = %request.method, query = %request.query, "CGI request");

    let responder = Responder::new(HttpFetcher::new(&config.fetch)?, &config.fetch);
    let response = responder.respond(request.params()).await;

    cgi::write_response(&mut io::stdout().lock(), &response)?;
    Ok(())
}
