//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the fetch timeout fits inside the request timeout
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    InvalidBindAddress(String),

    #[error("listener.endpoint_path `{0}` must start with '/'")]
    InvalidEndpointPath(String),

    #[error("listener.endpoint_path `/health` is reserved for the liveness probe")]
    ReservedEndpointPath,

    #[error("fetch.timeout_secs must be greater than zero")]
    ZeroFetchTimeout,

    #[error("fetch.allowed_extensions must not be empty")]
    NoAllowedExtensions,

    #[error("fetch.allowed_extensions entry `{0}` must be a bare extension like \"png\"")]
    MalformedExtension(String),

    #[error("timeouts.request_secs ({request}) must exceed fetch.timeout_secs ({fetch})")]
    RequestTimeoutTooShort { request: u64, fetch: u64 },

    #[error("observability.metrics_address `{0}` is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a parsed configuration, collecting every error found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if !config.listener.endpoint_path.starts_with('/') {
        errors.push(ValidationError::InvalidEndpointPath(
            config.listener.endpoint_path.clone(),
        ));
    }

    if config.listener.endpoint_path == "/health" {
        errors.push(ValidationError::ReservedEndpointPath);
    }

    if config.fetch.timeout_secs == 0 {
        errors.push(ValidationError::ZeroFetchTimeout);
    }

    if config.fetch.allowed_extensions.is_empty() {
        errors.push(ValidationError::NoAllowedExtensions);
    }

    for ext in &config.fetch.allowed_extensions {
        if ext.is_empty() || ext.contains('.') || ext.contains('/') {
            errors.push(ValidationError::MalformedExtension(ext.clone()));
        }
    }

    if config.timeouts.request_secs <= config.fetch.timeout_secs {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request: config.timeouts.request_secs,
            fetch: config.fetch.timeout_secs,
        });
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
