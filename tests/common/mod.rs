//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use edge_resolver::store::MemoryStore;
use edge_resolver::{HttpServer, Resolver, ResolverConfig, Shutdown};
use edge_resolver::http::HyperFetcher;

/// Read an HTTP/1.1 request head and return its request-target.
async fn read_request_target(socket: &mut TcpStream) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
    String::from_utf8_lossy(&head)
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_string()
}

/// Start a simple mock backend that returns a fixed response.
pub async fn start_mock_backend(response: &'static str) -> SocketAddr {
    start_programmable_backend(move |_path| async move { (200, response.to_string()) }).await
}

/// Start a programmable mock backend. The closure receives the request path.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let path = read_request_target(&mut socket).await;
                        let (status, body) = f(path).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nX-Backend: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            addr,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// A running resolver bound to an ephemeral port.
pub struct TestProxy {
    pub addr: SocketAddr,
    pub hosts: MemoryStore,
    pub nodes: MemoryStore,
    shutdown: Shutdown,
}

impl TestProxy {
    pub async fn start(config: ResolverConfig) -> Self {
        let hosts = MemoryStore::new();
        let nodes = MemoryStore::new();
        let resolver = Resolver::new(
            Arc::new(hosts.clone()),
            Arc::new(nodes.clone()),
            Arc::new(HyperFetcher::default()),
        )
        .with_forward_query(config.upstream.forward_query);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Shutdown::new();
        let server = HttpServer::new(config, Arc::new(resolver));
        let server_shutdown = shutdown.subscribe();

        tokio::spawn(async move {
            let _ = server.run(listener, server_shutdown).await;
        });
        tokio::time::sleep(Duration::from_millis(100)).await;

        Self { addr, hosts, nodes, shutdown }
    }

    /// Register `host` → `happ_id` → `nodes`.
    pub fn register(&self, host: &str, happ_id: &str, nodes: &[String]) {
        self.hosts.put(host, happ_id);
        self.nodes.put_json(happ_id, &nodes).unwrap();
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// A client that never pools connections, so each request is independent.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
