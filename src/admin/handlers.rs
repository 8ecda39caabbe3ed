use axum::{extract::State, Json};
use serde::Serialize;

use crate::admin::AdminState;
use crate::prerender::Selector;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub mode: &'static str,
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct SnapshotStatus {
    pub route: String,
    pub file: String,
    pub present: bool,
}

#[derive(Serialize)]
pub struct PrerenderReport {
    pub static_dir: String,
    pub documents: Vec<SnapshotStatus>,
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        mode: state.app.mode(),
        status: "operational",
    })
}

/// Per-route snapshot presence. Surfaces drift between the allow-list and
/// what the page-generation step actually produced, which would otherwise be
/// an invisible soft-fail.
pub async fn get_prerender(State(state): State<AdminState>) -> Json<PrerenderReport> {
    let selector = state.app.selector();

    let mut routes: Vec<String> = selector.routes().map(str::to_string).collect();
    routes.sort();

    let mut documents = Vec::with_capacity(routes.len());
    for route in routes {
        let path = selector.document_path(&route);
        let present = tokio::fs::try_exists(&path).await.unwrap_or(false);
        documents.push(SnapshotStatus {
            file: Selector::document_name(&route),
            route,
            present,
        });
    }

    Json(PrerenderReport {
        static_dir: selector.static_dir().to_string_lossy().into_owned(),
        documents,
    })
}
