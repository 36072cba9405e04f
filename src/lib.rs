//! Edge request resolver library.
//!
//! Maps a request's `Host` header to a hApp ID, the hApp ID to a tranche of
//! backend nodes, picks one node at random and proxies the request path to it.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;
pub mod resolver;
pub mod store;

pub use config::schema::ResolverConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use resolver::{ResolveError, Resolver};
