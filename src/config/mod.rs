//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ResolverConfig (validated, immutable)
//!     → consumed once at startup by main and HttpServer
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; store contents reload, config does not
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::ResolverConfig;
pub use schema::{ListenerConfig, ObservabilityConfig, StoreConfig, TimeoutConfig, UpstreamConfig};
