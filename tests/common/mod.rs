//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use lane_change::config::{parse_config, ConfigFormat};
use lane_change::{HttpServer, Shutdown};
use tokio::net::TcpListener;

pub const CONFIG: &str = r#"{
    "port": 8080,
    "default": "A",
    "lanes": {
        "A": { "headers": { "X-Lane": "A", "Content-Type": "text/html" }, "content": "<h1>Lane A</h1>" },
        "B": { "headers": { "X-Lane": "B", "Content-Type": "text/html" }, "content": "<h1>Lane B</h1>" }
    }
}"#;

/// A running server bound to an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the real server with the given JSON config.
pub async fn start_server(config: &str) -> TestServer {
    let config = parse_config(config, ConfigFormat::Json).unwrap();
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    TestServer {
        addr,
        shutdown,
        client,
    }
}
