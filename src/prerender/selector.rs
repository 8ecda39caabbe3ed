//! Static-or-dynamic response selection.
//!
//! # Responsibilities
//! - Canonicalize the request path into a route key
//! - Gate on the route allow-list before any classification work
//! - Classify the User-Agent via [`Classifier`]
//! - Resolve and read the snapshot document on a crawler hit
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Explicit tagged `Decision` instead of middleware control flow; the host
//!   interprets the tag
//! - A missing snapshot is a soft fail (`Fallthrough`), never an error; only
//!   genuine I/O failures surface as `Err`
//! - Single pass per request, two terminal outcomes, no retries

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use axum::body::Bytes;

use crate::config::PrerenderConfig;
use crate::prerender::signatures::Classifier;

/// Outcome of the per-request selection pass.
#[derive(Debug)]
pub enum Decision {
    /// Terminal: the response is fully determined by the snapshot.
    Serve(StaticDocument),
    /// Terminal: control passes to the host's default handling.
    Fallthrough,
}

/// A pre-generated snapshot read from disk.
#[derive(Debug)]
pub struct StaticDocument {
    /// Canonical route the snapshot belongs to.
    pub route: String,
    /// File the contents came from.
    pub path: PathBuf,
    /// Document contents.
    pub body: Bytes,
}

/// Decides, per request, between serving a snapshot and falling through.
#[derive(Debug)]
pub struct Selector {
    routes: HashSet<String>,
    classifier: Classifier,
    static_dir: PathBuf,
    cache_max_age_secs: u64,
}

impl Selector {
    /// Compile a selector from the prerender section of the config.
    pub fn from_config(config: &PrerenderConfig) -> Self {
        let classifier = if config.signatures.is_empty() {
            Classifier::default()
        } else {
            Classifier::new(&config.signatures)
        };
        Self {
            routes: config.routes.iter().cloned().collect(),
            classifier,
            static_dir: PathBuf::from(&config.static_dir),
            cache_max_age_secs: config.cache_max_age_secs,
        }
    }

    /// The crawler classifier this selector consults.
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Allow-listed routes, in no particular order.
    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(String::as_str)
    }

    /// Directory the snapshots are read from.
    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    /// `max-age` to advertise on snapshot responses.
    pub fn cache_max_age_secs(&self) -> u64 {
        self.cache_max_age_secs
    }

    /// Snapshot file name for a canonical route: `index.html` for the root,
    /// `<route-without-leading-slash>.html` for everything else.
    pub fn document_name(route: &str) -> String {
        if route == "/" {
            "index.html".to_string()
        } else {
            format!("{}.html", route.trim_start_matches('/'))
        }
    }

    /// Full path of the snapshot for a canonical route.
    pub fn document_path(&self, route: &str) -> PathBuf {
        self.static_dir.join(Self::document_name(route))
    }

    /// Run the selection pass for one request.
    ///
    /// `path_and_query` is the raw request target; `user_agent` is the raw
    /// header value (pass `""` when absent). Errors are genuine filesystem
    /// failures only; the caller maps them to its generic error response.
    pub async fn decide(&self, path_and_query: &str, user_agent: &str) -> io::Result<Decision> {
        let route = canonical_route(path_and_query);

        // Unlisted routes skip classification entirely; this is the hot path
        // for almost all traffic.
        if !self.routes.contains(route) {
            return Ok(Decision::Fallthrough);
        }

        if !self.classifier.is_crawler(user_agent) {
            return Ok(Decision::Fallthrough);
        }

        let path = self.document_path(route);
        match tokio::fs::read(&path).await {
            Ok(contents) => Ok(Decision::Serve(StaticDocument {
                route: route.to_string(),
                path,
                body: Bytes::from(contents),
            })),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                // Generation step skipped this route, or the allow-list
                // drifted. Soft fail: the crawler gets the SPA shell.
                tracing::debug!(route = %route, file = ?path, "Snapshot missing, falling through");
                Ok(Decision::Fallthrough)
            }
            Err(e) => Err(e),
        }
    }
}

/// Strip the query string (and any fragment) to obtain the allow-list key.
/// An empty remainder canonicalizes to the root route.
pub fn canonical_route(path_and_query: &str) -> &str {
    let path = path_and_query
        .split(['?', '#'])
        .next()
        .unwrap_or(path_and_query);
    if path.is_empty() {
        "/"
    } else {
        path
    }
}
