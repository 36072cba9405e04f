//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router sending every method and path to the resolver
//! - Wire up middleware (request ID, tracing, request timeout)
//! - Turn resolver failures and handler panics into 500 responses
//! - Serve until the shutdown broadcast fires

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ResolverConfig;
use crate::http::request::{request_id, request_id_layer};
use crate::http::response::panic_response;
use crate::observability::metrics;
use crate::resolver::Resolver;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
}

/// HTTP front end for the resolver.
pub struct HttpServer {
    router: Router,
    config: ResolverConfig,
}

impl HttpServer {
    /// Create a new HTTP server around a resolver.
    pub fn new(config: ResolverConfig, resolver: Arc<Resolver>) -> Self {
        let state = AppState { resolver };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ResolverConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(resolve_handler))
            .route("/", any(resolve_handler))
            .with_state(state)
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(request_id_layer())
    }

    /// The fully layered router, for serving elsewhere or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            request_timeout_secs = self.config.timeouts.request_secs,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}

/// Single entry point: hand the request to the resolver.
async fn resolve_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();

    // Nothing downstream reads the inbound body.
    let (parts, _body) = request.into_parts();
    let request = Request::from_parts(parts, ());
    let method = request.method().to_string();

    let response = match state.resolver.resolve(&request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(
                request_id = %request_id(&request),
                error = %e,
                "Request handling failed"
            );
            e.into_response()
        }
    };

    metrics::record_request(&method, response.status().as_u16(), start_time);
    response
}
