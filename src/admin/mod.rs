//! Admin endpoint: operational status and snapshot drift reporting.

pub mod auth;
pub mod handlers;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::AppState;

/// State shared by the admin handlers.
#[derive(Clone)]
pub struct AdminState {
    pub app: AppState,
    pub api_key: Arc<String>,
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/prerender", get(get_prerender))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ))
        .with_state(state)
}
