//! Upstream fetch.
//!
//! # Responsibilities
//! - Issue a bare GET to the chosen node (no forwarded headers, no body)
//! - Hand the upstream response back untouched
//!
//! # Design Decisions
//! - No retries and no error translation; failures surface as `FetchError`
//! - Plain HTTP only; TLS belongs to the platform in front of us

use std::time::Duration;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, Uri},
    response::Response,
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;
use url::Url;

/// Errors from the upstream fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid upstream URI: {0}")]
    Uri(#[from] axum::http::uri::InvalidUri),

    #[error("Failed to build upstream request: {0}")]
    Build(#[from] axum::http::Error),

    #[error("Upstream request failed: {0}")]
    Request(#[from] hyper_util::client::legacy::Error),
}

/// Outbound HTTP fetch capability.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET `url` and return the upstream response as received.
    async fn fetch(&self, url: &Url) -> Result<Response, FetchError>;
}

/// `Fetcher` backed by the hyper-util legacy client.
#[derive(Clone)]
pub struct HyperFetcher {
    client: Client<HttpConnector, Body>,
}

impl HyperFetcher {
    /// Create a fetcher with an optional connect timeout.
    pub fn new(connect_timeout: Option<Duration>) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(connect_timeout);

        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self { client }
    }
}

impl Default for HyperFetcher {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl Fetcher for HyperFetcher {
    async fn fetch(&self, url: &Url) -> Result<Response, FetchError> {
        let uri: Uri = url.as_str().parse()?;
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())?;

        let response = self.client.request(request).await?;
        Ok(into_axum_response(response))
    }
}

/// Re-box the upstream body; status and headers are untouched.
fn into_axum_response(response: hyper::Response<Incoming>) -> Response {
    let (parts, body) = response.into_parts();
    Response::from_parts(parts, Body::new(body))
}
