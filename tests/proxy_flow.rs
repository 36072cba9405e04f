//! End-to-end tests: real sockets for the resolver and its backend nodes.

use std::sync::{Arc, Mutex};
use edge_resolver::ResolverConfig;
use reqwest::header::HOST;
use serde_json::Value;

mod common;
use common::TestProxy;

#[tokio::test]
async fn test_proxies_path_to_registered_node() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_by_backend = seen.clone();
    let backend = common::start_programmable_backend(move |path| {
        seen_by_backend.lock().unwrap().push(path);
        async { (200, "<html>asset</html>".to_string()) }
    })
    .await;

    let proxy = TestProxy::start(ResolverConfig::default()).await;
    proxy.register("example.com", "happ_hash_123", &[backend.to_string()]);

    let res = common::client()
        .get(proxy.url("/index.html?cache=bust"))
        .header(HOST, "example.com")
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "text/plain");
    assert_eq!(res.headers()["x-backend"], backend.to_string().as_str());
    assert_eq!(res.text().await.unwrap(), "<html>asset</html>");
    assert_eq!(*seen.lock().unwrap(), vec!["/index.html".to_string()]);
}

#[tokio::test]
async fn test_forwards_query_when_configured() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_by_backend = seen.clone();
    let backend = common::start_programmable_backend(move |path| {
        seen_by_backend.lock().unwrap().push(path);
        async { (200, "ok".to_string()) }
    })
    .await;

    let mut config = ResolverConfig::default();
    config.upstream.forward_query = true;
    let proxy = TestProxy::start(config).await;
    proxy.register("example.com", "happ_hash_123", &[backend.to_string()]);

    let res = common::client()
        .get(proxy.url("/app.js?v=3"))
        .header(HOST, "example.com")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(*seen.lock().unwrap(), vec!["/app.js?v=3".to_string()]);
}

#[tokio::test]
async fn test_upstream_error_status_is_not_rewritten() {
    let backend = common::start_programmable_backend(|_| async {
        (503, "node busy".to_string())
    })
    .await;

    let proxy = TestProxy::start(ResolverConfig::default()).await;
    proxy.register("example.com", "happ_hash_123", &[backend.to_string()]);

    let res = common::client()
        .get(proxy.url("/"))
        .header(HOST, "example.com")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 503);
    assert_eq!(res.text().await.unwrap(), "node busy");
}

#[tokio::test]
async fn test_unreachable_node_is_500() {
    // Bind then drop to get a port nobody listens on.
    let dead = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_addr = dead.local_addr().unwrap();
    drop(dead);

    let proxy = TestProxy::start(ResolverConfig::default()).await;
    proxy.register("example.com", "happ_hash_123", &[dead_addr.to_string()]);

    let res = common::client()
        .get(proxy.url("/"))
        .header(HOST, "example.com")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Internal Server Error");
    assert!(body["message"].as_str().unwrap().contains("Upstream request failed"));
}

#[tokio::test]
async fn test_unregistered_host_is_404() {
    let proxy = TestProxy::start(ResolverConfig::default()).await;

    let res = common::client()
        .get(proxy.url("/"))
        .header(HOST, "unregistered.example.com")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    assert_eq!(res.headers()["content-type"], "application/json");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Resource Not Found");
}

#[tokio::test]
async fn test_preflight_over_the_wire() {
    let proxy = TestProxy::start(ResolverConfig::default()).await;

    let res = common::client()
        .request(reqwest::Method::OPTIONS, proxy.url("/"))
        .header("Origin", "https://worker.example.com")
        .header("Access-Control-Request-Method", "DELETE")
        .header("Access-Control-Request-Headers", "origin, x-requested-with")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 204);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    assert_eq!(res.headers()["access-control-max-age"], "86400");
}

#[tokio::test]
async fn test_post_is_405() {
    let proxy = TestProxy::start(ResolverConfig::default()).await;

    let res = common::client()
        .post(proxy.url("/"))
        .header(HOST, "example.com")
        .body("{}")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 405);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Method Not Allowed");
}

#[tokio::test]
async fn test_http2_authority_resolves_like_host_header() {
    let backend = common::start_mock_backend("ok").await;
    let proxy = TestProxy::start(ResolverConfig::default()).await;
    proxy.register("127.0.0.1", "happ_local", &[backend.to_string()]);

    let http1 = common::client();
    let http2 = reqwest::Client::builder()
        .http2_prior_knowledge()
        .no_proxy()
        .build()
        .unwrap();

    for (client, version) in [(http1, reqwest::Version::HTTP_11), (http2, reqwest::Version::HTTP_2)] {
        let res = client.get(proxy.url("/")).send().await.unwrap();
        assert_eq!(res.version(), version);
        assert_eq!(res.status(), 200, "{:?} request was not resolved", version);
        assert_eq!(res.text().await.unwrap(), "ok");
    }
}
