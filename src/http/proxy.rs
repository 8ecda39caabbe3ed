//! Development proxy host.
//!
//! # Responsibilities
//! - Run the same selection pass as the production host
//! - Forward fallthrough traffic to the SPA dev server
//! - Map upstream failures to 502 without retrying
//!
//! # Design Decisions
//! - Single upstream, single attempt: the selection subsystem defines no
//!   retry states, and a dev server that is down should fail loudly
//! - Request headers (including `x-request-id`) are forwarded as-is; only
//!   scheme and authority are rewritten

use std::str::FromStr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{Authority, PathAndQuery, Scheme},
        Request, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
};
use url::Url;

use crate::http::server::{request_parts, selection_error, snapshot_response, AppState, ServerError};
use crate::observability::metrics;
use crate::prerender::Decision;

/// Parsed dev server target.
#[derive(Debug, Clone)]
pub struct Upstream {
    scheme: Scheme,
    authority: Authority,
}

impl Upstream {
    /// Parse an upstream URL into its scheme and authority.
    pub fn parse(url: &str) -> Result<Self, ServerError> {
        let parsed = Url::parse(url).map_err(|_| ServerError::InvalidUpstream(url.to_string()))?;

        let scheme = Scheme::from_str(parsed.scheme())
            .map_err(|_| ServerError::InvalidUpstream(url.to_string()))?;

        let host = parsed
            .host_str()
            .ok_or_else(|| ServerError::InvalidUpstream(url.to_string()))?;
        let authority_str = match parsed.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let authority = Authority::from_str(&authority_str)
            .map_err(|_| ServerError::InvalidUpstream(url.to_string()))?;

        Ok(Self { scheme, authority })
    }

    /// Rewrite a request URI to point at the upstream, keeping path and query.
    fn rewrite(&self, uri: &Uri) -> Uri {
        let mut parts = uri.clone().into_parts();
        parts.scheme = Some(self.scheme.clone());
        parts.authority = Some(self.authority.clone());
        if parts.path_and_query.is_none() {
            parts.path_and_query = Some(PathAndQuery::from_static("/"));
        }
        Uri::from_parts(parts).unwrap_or_else(|_| uri.clone())
    }
}

/// Dev host handler: snapshot for crawlers, dev server for everyone else.
pub async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
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
            let response = forward(&state, request).await;
            metrics::record_request(response.status().as_u16(), start);
            response
        }
        Err(e) => {
            metrics::record_request(500, start);
            selection_error(&path_and_query, e)
        }
    }
}

/// Forward the request to the dev server, single attempt.
async fn forward(state: &AppState, request: Request<Body>) -> Response {
    // Mode selection guarantees an upstream in this handler.
    let Some(upstream) = &state.upstream else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "No upstream configured").into_response();
    };

    let (mut parts, body) = request.into_parts();
    parts.uri = upstream.rewrite(&parts.uri);

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => response.map(Body::new).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Dev server unreachable");
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
