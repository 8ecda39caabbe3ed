//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the prerender gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Crawler detection and static snapshot serving.
    pub prerender: PrerenderConfig,

    /// Single-page application shell served on fallthrough (production host).
    pub spa: SpaConfig,

    /// SPA dev server to forward fallthrough traffic to. When present, the
    /// gateway runs as a development proxy instead of serving `spa.dist_dir`.
    pub upstream: Option<UpstreamConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub admin: AdminConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Crawler detection and snapshot serving configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PrerenderConfig {
    /// Directory holding pre-generated `<route>.html` snapshots
    /// (plus `index.html` for the root route).
    pub static_dir: String,

    /// Routes for which snapshots may exist. Consulted as a membership test;
    /// any route not listed here always falls through to the SPA.
    pub routes: Vec<String>,

    /// Override for the built-in crawler signature set. Empty = use defaults.
    pub signatures: Vec<String>,

    /// `max-age` for the `Cache-Control: public` header on snapshot hits,
    /// in seconds.
    pub cache_max_age_secs: u64,
}

impl Default for PrerenderConfig {
    fn default() -> Self {
        Self {
            static_dir: "static-pages".to_string(),
            routes: vec![
                "/".to_string(),
                "/comprar-backlinks".to_string(),
                "/comprar-backlinks-tecnologia".to_string(),
                "/comprar-backlinks-financas".to_string(),
                "/comprar-backlinks-saude".to_string(),
                "/blog".to_string(),
                "/marketplace".to_string(),
            ],
            signatures: Vec::new(),
            cache_max_age_secs: 3600,
        }
    }
}

/// SPA shell configuration (production host fallthrough).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SpaConfig {
    /// Build output directory of the single-page application.
    pub dist_dir: String,

    /// Entry document within `dist_dir` used as the SPA routing fallback.
    pub shell: String,
}

impl Default for SpaConfig {
    fn default() -> Self {
        Self {
            dist_dir: "dist".to_string(),
            shell: "index.html".to_string(),
        }
    }
}

/// SPA dev server upstream (development proxy host).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Dev server URL, e.g. "http://127.0.0.1:5173".
    pub url: String,
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the admin endpoint.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Admin endpoint bind address.
    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}
