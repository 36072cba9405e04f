//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! resolver, server, stores produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (fmt subscriber)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every resolver log line
//! - Metrics go through the `metrics` facade and cost nothing without a recorder

pub mod logging;
pub mod metrics;
