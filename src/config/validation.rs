//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check route allow-list shape (leading slash, no duplicates)
//! - Validate value ranges and addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}': {1}")]
    BindAddress(String, std::net::AddrParseError),

    #[error("prerender route '{0}' must start with '/'")]
    RouteMissingSlash(String),

    #[error("prerender route '{0}' listed more than once")]
    DuplicateRoute(String),

    #[error("prerender route '{0}' must not contain '..' segments")]
    RouteTraversal(String),

    #[error("prerender.static_dir must not be empty")]
    EmptyStaticDir,

    #[error("prerender.cache_max_age_secs must be greater than zero")]
    ZeroCacheMaxAge,

    #[error("upstream.url '{0}' is not a valid URL: {1}")]
    UpstreamUrl(String, url::ParseError),

    #[error("upstream.url '{0}' has no host")]
    UpstreamNoHost(String),
}

/// Check a configuration for semantic problems. Collects every error rather
/// than stopping at the first.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.listener.bind_address.parse::<SocketAddr>() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
            e,
        ));
    }

    if config.prerender.static_dir.is_empty() {
        errors.push(ValidationError::EmptyStaticDir);
    }
    if config.prerender.cache_max_age_secs == 0 {
        errors.push(ValidationError::ZeroCacheMaxAge);
    }

    let mut seen = HashSet::new();
    for route in &config.prerender.routes {
        if !route.starts_with('/') {
            errors.push(ValidationError::RouteMissingSlash(route.clone()));
        }
        if route.split('/').any(|seg| seg == "..") {
            errors.push(ValidationError::RouteTraversal(route.clone()));
        }
        if !seen.insert(route.as_str()) {
            errors.push(ValidationError::DuplicateRoute(route.clone()));
        }
    }

    if let Some(upstream) = &config.upstream {
        match Url::parse(&upstream.url) {
            Ok(url) => {
                if url.host_str().is_none() {
                    errors.push(ValidationError::UpstreamNoHost(upstream.url.clone()));
                }
            }
            Err(e) => errors.push(ValidationError::UpstreamUrl(upstream.url.clone(), e)),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
