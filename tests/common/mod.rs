//! Shared utilities for integration testing.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use prerender_gateway::config::GatewayConfig;
use prerender_gateway::http::HttpServer;
use prerender_gateway::lifecycle::Shutdown;

pub const GOOGLEBOT_UA: &str =
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";
pub const CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Create a unique scratch directory for one test.
pub fn scratch_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("{}-{}", prefix, uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Handles kept alive for the lifetime of a running test gateway.
///
/// Dropping the shutdown coordinator or the config sender would stop the
/// server, so tests hold the whole struct.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_tx: mpsc::UnboundedSender<GatewayConfig>,
}

/// Spawn a gateway on an ephemeral port and wait until it accepts requests.
pub async fn spawn_gateway(config: GatewayConfig) -> TestGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (config_tx, config_rx) = mpsc::unbounded_channel();
    let server_shutdown = shutdown.subscribe();

    let server = HttpServer::new(config).unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener, config_rx, server_shutdown).await;
    });

    // Wait for the listener to come up.
    let client = test_client();
    for _ in 0..50 {
        if client
            .get(format!("http://{}/", addr))
            .send()
            .await
            .is_ok()
        {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }

    TestGateway {
        addr,
        shutdown,
        config_tx,
    }
}

/// Non-pooled client so each request hits a fresh connection.
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Start a simple mock dev server that returns a fixed HTML response.
///
/// Every received request head is forwarded on the returned channel so tests
/// can assert what the gateway actually sent upstream.
pub async fn start_mock_dev_server(
    response: &'static str,
) -> (SocketAddr, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (head_tx, head_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let head_tx = head_tx.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let _ = head_tx.send(String::from_utf8_lossy(&buf[..n]).into_owned());
                        let response_str = format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            response.len(),
                            response
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, head_rx)
}

/// Pull the value of a header out of a raw request head, case-insensitively.
pub fn header_from_head(head: &str, name: &str) -> Option<String> {
    head.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim().eq_ignore_ascii_case(name) {
            Some(value.trim().to_string())
        } else {
            None
        }
    })
}
