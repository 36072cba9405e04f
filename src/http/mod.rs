//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, timeout, tracing)
//!     → resolver (validate, look up, select node)
//!     → client.rs (GET to the chosen node)
//!     → upstream response, or response.rs (synthesized JSON / preflight)
//!     → Send to client
//! ```

pub mod client;
pub mod request;
pub mod response;
pub mod server;

pub use client::{FetchError, Fetcher, HyperFetcher};
pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::HttpServer;
