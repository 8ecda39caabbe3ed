//! Integration tests for the admin endpoint: auth gating and the snapshot
//! drift report.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use prerender_gateway::admin::{setup_admin_router, AdminState};
use prerender_gateway::config::GatewayConfig;
use prerender_gateway::http::HttpServer;

mod common;
use common::{scratch_dir, test_client};

const API_KEY: &str = "test-admin-key";

async fn spawn_admin(config: GatewayConfig) -> SocketAddr {
    let server = HttpServer::new(config).unwrap();
    let state = AdminState {
        app: server.state(),
        api_key: Arc::new(API_KEY.to_string()),
    };
    let router = setup_admin_router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

#[tokio::test]
async fn requests_without_token_are_rejected() {
    let addr = spawn_admin(GatewayConfig::default()).await;

    let res = test_client()
        .get(format!("http://{}/admin/status", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);

    let res = test_client()
        .get(format!("http://{}/admin/status", addr))
        .bearer_auth("wrong-key")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);
}

#[tokio::test]
async fn status_reports_version_and_mode() {
    let addr = spawn_admin(GatewayConfig::default()).await;

    let res = test_client()
        .get(format!("http://{}/admin/status", addr))
        .bearer_auth(API_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["mode"], "static");
    assert_eq!(body["status"], "operational");
}

#[tokio::test]
async fn prerender_report_surfaces_drift() {
    let static_dir = scratch_dir("gw-admin-static");
    std::fs::write(static_dir.join("blog.html"), "<html>blog</html>").unwrap();

    let mut config = GatewayConfig::default();
    config.prerender.static_dir = static_dir.to_string_lossy().into_owned();
    config.prerender.routes = vec!["/blog".to_string(), "/marketplace".to_string()];

    let addr = spawn_admin(config).await;

    let res = test_client()
        .get(format!("http://{}/admin/prerender", addr))
        .bearer_auth(API_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let body: serde_json::Value = res.json().await.unwrap();
    let documents = body["documents"].as_array().unwrap();
    assert_eq!(documents.len(), 2);

    let blog = documents.iter().find(|d| d["route"] == "/blog").unwrap();
    assert_eq!(blog["file"], "blog.html");
    assert_eq!(blog["present"], true);

    let market = documents
        .iter()
        .find(|d| d["route"] == "/marketplace")
        .unwrap();
    assert_eq!(market["file"], "marketplace.html");
    assert_eq!(market["present"], false);
}
