//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router for whichever host mode the config selects
//! - Wire up middleware (tracing, timeout, request ID)
//! - Run the selector before any other handling on every request
//! - Serve snapshot hits; fall through to the SPA shell otherwise
//! - Apply config reloads by swapping the compiled selector
//!
//! # Host Modes
//! - Production (`upstream` absent): fallthrough serves the SPA build
//!   directory with the shell document as routing fallback.
//! - Development (`upstream` present): fallthrough forwards to the SPA dev
//!   server (see `http/proxy.rs`).
//!
//! Both modes run the exact same selection pass; only the fallthrough differs.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::http::proxy::{self, Upstream};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::tls::load_tls_config;
use crate::observability::metrics;
use crate::prerender::{Decision, Selector, StaticDocument};

/// Errors raised while building or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid upstream url '{0}'")]
    InvalidUpstream(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Compiled selector; replaced wholesale on config reload.
    selector: Arc<ArcSwap<Selector>>,
    /// SPA build directory with shell fallback (production mode).
    spa: ServeDir<ServeFile>,
    /// Dev server target (development mode).
    pub(crate) upstream: Option<Upstream>,
    /// Shared upstream client.
    pub(crate) client: Client<HttpConnector, Body>,
}

impl AppState {
    /// Current selector snapshot.
    pub fn selector(&self) -> Arc<Selector> {
        self.selector.load_full()
    }

    /// Host mode label, for logs and the admin endpoint.
    pub fn mode(&self) -> &'static str {
        if self.upstream.is_some() {
            "dev-proxy"
        } else {
            "static"
        }
    }
}

/// HTTP server for the prerender gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        let selector = Arc::new(ArcSwap::from_pointee(Selector::from_config(
            &config.prerender,
        )));

        let shell = Path::new(&config.spa.dist_dir).join(&config.spa.shell);
        let spa = ServeDir::new(&config.spa.dist_dir).fallback(ServeFile::new(shell));

        let upstream = config
            .upstream
            .as_ref()
            .map(|u| Upstream::parse(&u.url))
            .transpose()?;

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            selector,
            spa,
            upstream,
            client,
        };

        let router = Self::build_router(&config, state.clone());
        Ok(Self {
            router,
            config,
            state,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let handler = if state.upstream.is_some() {
            any(proxy::proxy_handler)
        } else {
            any(static_handler)
        };

        Router::new()
            .route("/{*path}", handler.clone())
            .route("/", handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
            .layer(TraceLayer::new_for_http())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Shared state, for the admin endpoint.
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Run the server on the given listener until shutdown is signalled.
    ///
    /// `config_updates` carries validated configs from the file watcher; each
    /// one is compiled into a fresh selector and swapped in atomically.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GatewayConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mode = self.state.mode(),
            "HTTP server starting"
        );

        let selector = self.state.selector.clone();
        tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                let compiled = Selector::from_config(&new_config.prerender);
                let routes = compiled.routes().count();
                selector.store(Arc::new(compiled));
                tracing::info!(routes, "Selector rebuilt from reloaded config");
            }
        });

        if let Some(tls) = &self.config.listener.tls {
            let rustls = load_tls_config(Path::new(&tls.cert_path), Path::new(&tls.key_path)).await?;

            let handle = axum_server::Handle::new();
            let shutdown_handle = handle.clone();
            tokio::spawn(async move {
                let _ = shutdown.recv().await;
                shutdown_handle.graceful_shutdown(Some(Duration::from_secs(10)));
            });

            axum_server::from_tcp_rustls(listener.into_std()?, rustls)
                .handle(handle)
                .serve(self.router.into_make_service())
                .await?;
        } else {
            axum::serve(listener, self.router)
                .with_graceful_shutdown(async move {
                    let _ = shutdown.recv().await;
                })
                .await?;
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Production host handler: snapshot for crawlers, SPA files for everyone else.
async fn static_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let selector = state.selector();
    let (path_and_query, user_agent) = request_parts(&request);

    match selector.decide(&path_and_query, &user_agent).await {
        Ok(Decision::Serve(doc)) => {
            metrics::record_snapshot_hit(&doc.route);
            let response = snapshot_response(doc, selector.cache_max_age_secs());
            metrics::record_request(response.status().as_u16(), start);
            response
        }
        Ok(Decision::Fallthrough) => {
            metrics::record_fallthrough();
            let response = match state.spa.clone().oneshot(request).await {
                Ok(response) => response.map(Body::new),
                Err(infallible) => match infallible {},
            };
            metrics::record_request(response.status().as_u16(), start);
            response
        }
        Err(e) => {
            metrics::record_request(500, start);
            selection_error(&path_and_query, e)
        }
    }
}

/// Raw request target and User-Agent; an absent header reads as empty.
pub(crate) fn request_parts(request: &Request<Body>) -> (String, String) {
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/")
        .to_string();
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    (path_and_query, user_agent)
}

/// Build the snapshot response: 200, HTML, publicly cacheable for a bounded
/// window so crawlers hit a stable snapshot instead of re-rendering cost.
pub(crate) fn snapshot_response(doc: StaticDocument, max_age_secs: u64) -> Response {
    tracing::debug!(route = %doc.route, file = ?doc.path, "Serving prerendered snapshot");
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (
                header::CACHE_CONTROL,
                format!("public, max-age={}", max_age_secs),
            ),
            (header::HeaderName::from_static("x-prerender"), "hit".to_string()),
        ],
        doc.body,
    )
        .into_response()
}

/// Map a selector I/O failure to the host's generic error response.
pub(crate) fn selection_error(path: &str, error: std::io::Error) -> Response {
    tracing::error!(path = %path, error = %error, "Snapshot read failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}
