//! Request resolution pipeline.
//!
//! # Data Flow
//! ```text
//! Request
//!     → CORS preflight?            → 204
//!     → method != GET?             → 405
//!     → Host missing / invalid?    → 400
//!     → Host Record lookup         → 404 if absent
//!     → Node List lookup           → 404 if absent
//!     → NodeSelector picks a node
//!     → Fetcher GETs http://<node><path>
//!     → upstream response, verbatim
//! ```
//!
//! Validation outcomes are ordinary responses. Only store, URL and fetch
//! failures come back as `ResolveError`; the hosting layer turns those into 500.

pub mod host;

use std::sync::Arc;
use axum::{
    http::{header, HeaderMap, HeaderValue, Method, Request, Uri},
    response::Response,
};
use thiserror::Error;
use url::Url;

use crate::http::client::{FetchError, Fetcher};
use crate::http::request::request_id;
use crate::http::response::{bad_request, method_not_allowed, not_found, preflight_response};
use crate::load_balancer::{NodeSelector, RandomSelector};
use crate::observability::metrics;
use crate::store::{get_json, KvStore, StoreError};

pub use host::{validate_host, HostError, ValidHost};

/// Failures that abort resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("No node could be selected for hApp ID '{0}'")]
    NoNode(String),

    #[error("Invalid upstream URL for node '{node}': {source}")]
    NodeUrl {
        node: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Resolves requests to a backend node and proxies them.
///
/// Holds no per-request state; share it behind an `Arc`.
pub struct Resolver {
    host_records: Arc<dyn KvStore>,
    node_lists: Arc<dyn KvStore>,
    fetcher: Arc<dyn Fetcher>,
    selector: Box<dyn NodeSelector>,
    forward_query: bool,
}

impl Resolver {
    /// Create a resolver with uniform random node selection.
    pub fn new(
        host_records: Arc<dyn KvStore>,
        node_lists: Arc<dyn KvStore>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            host_records,
            node_lists,
            fetcher,
            selector: Box::new(RandomSelector::new()),
            forward_query: false,
        }
    }

    /// Replace the node selection strategy.
    pub fn with_selector(mut self, selector: impl NodeSelector + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    /// Forward the inbound query string along with the path.
    pub fn with_forward_query(mut self, forward_query: bool) -> Self {
        self.forward_query = forward_query;
        self
    }

    /// Resolve one request.
    pub async fn resolve<B>(&self, request: &Request<B>) -> Result<Response, ResolveError> {
        let request_id = request_id(request);
        let headers = request.headers();
        let method = request.method();
        let path = request.uri().path();

        tracing::info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            origin = ?headers.get(header::ORIGIN),
            referer = ?headers.get(header::REFERER),
            "Got request"
        );

        if is_preflight(headers) {
            tracing::debug!(request_id = %request_id, "Answering CORS preflight");
            return Ok(preflight_response());
        }

        if method != Method::GET {
            tracing::debug!(request_id = %request_id, method = %method, "Rejecting non-GET method");
            return Ok(method_not_allowed(
                "Only the GET method is supported for static assets",
            ));
        }

        let raw_host = match host_value(request) {
            Some(h) => h,
            None => {
                tracing::debug!(request_id = %request_id, "Missing Host header");
                return Ok(bad_request(
                    "Host header is missing.  Required for hApp ID lookup",
                ));
            }
        };

        let host = match validate_host(&raw_host) {
            Ok(h) => h,
            Err(e) => {
                tracing::debug!(request_id = %request_id, host = ?raw_host, error = %e, "Invalid Host header");
                return Ok(bad_request(format!("Host header is: {}", e)));
            }
        };

        let happ_id = self.host_records.get(host.hostname()).await?;
        metrics::record_store_lookup("host_records", happ_id.is_some());
        let happ_id = match happ_id {
            Some(id) => id,
            None => {
                tracing::warn!(request_id = %request_id, host = %host.host(), "No hApp registered for host");
                return Ok(not_found(format!(
                    "There is no hApp registered for host '{}'",
                    host.host()
                )));
            }
        };

        let tranche: Option<Vec<String>> = get_json(&*self.node_lists, &happ_id).await?;
        let tranche = tranche.filter(|nodes| !nodes.is_empty());
        metrics::record_store_lookup("node_lists", tranche.is_some());
        let tranche = match tranche {
            Some(nodes) => nodes,
            None => {
                tracing::warn!(request_id = %request_id, happ_id = %happ_id, "No tranche for hApp ID");
                return Ok(not_found(format!(
                    "There is no tranche for hApp ID '{}'",
                    happ_id
                )));
            }
        };

        let node = self
            .selector
            .select(&tranche)
            .ok_or_else(|| ResolveError::NoNode(happ_id.clone()))?;
        let target = self.target_url(node, request.uri())?;

        tracing::info!(
            request_id = %request_id,
            happ_id = %happ_id,
            node = %node,
            "Fetch GET {}", target
        );
        Ok(self.fetcher.fetch(&target).await?)
    }

    fn target_url(&self, node: &str, uri: &Uri) -> Result<Url, ResolveError> {
        let mut target = format!("http://{}{}", node, uri.path());
        if self.forward_query {
            if let Some(query) = uri.query() {
                target.push('?');
                target.push_str(query);
            }
        }

        Url::parse(&target).map_err(|source| ResolveError::NodeUrl {
            node: node.to_string(),
            source,
        })
    }
}

/// The `Host` header, or for HTTP/2 the `:authority` carried in the URI.
fn host_value<B>(request: &Request<B>) -> Option<HeaderValue> {
    if let Some(host) = request.headers().get(header::HOST) {
        return Some(host.clone());
    }
    request
        .uri()
        .authority()
        .and_then(|authority| HeaderValue::from_str(authority.as_str()).ok())
}

/// A preflight carries all three CORS headers, each non-empty.
fn is_preflight(headers: &HeaderMap) -> bool {
    [
        header::ORIGIN,
        header::ACCESS_CONTROL_REQUEST_METHOD,
        header::ACCESS_CONTROL_REQUEST_HEADERS,
    ]
    .iter()
    .all(|name| headers.get(name).is_some_and(|v| !v.is_empty()))
}
