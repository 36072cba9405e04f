//! Edge request resolver.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (request ID, trace, timeout)
//!                        │
//!                        ▼
//!                     resolver ──▶ store: Host Record  (hostname → hApp ID)
//!                        │    ──▶ store: Node List    (hApp ID → tranche)
//!                        │    ──▶ load_balancer: pick a node at random
//!                        ▼
//!                     http::client ── GET http://<node><path> ──▶ Backend Node
//!     Client Response                                               │
//!     ◀──────────────────────── upstream response, verbatim ◀───────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use edge_resolver::config::{load_config, validation::validate_config, ConfigError, ResolverConfig};
use edge_resolver::http::{HttpServer, HyperFetcher};
use edge_resolver::lifecycle::Shutdown;
use edge_resolver::observability::{logging, metrics};
use edge_resolver::resolver::Resolver;
use edge_resolver::store::{FileStore, KvStore, MemoryStore, StoreError, StoreWatcher};

#[derive(Parser)]
#[command(name = "edge-resolver")]
#[command(about = "Routes requests by Host header to a random node of the hApp's tranche", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override observability.log_level.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ResolverConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init(&config.observability.log_level)?;
    tracing::info!("edge-resolver v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        forward_query = config.upstream.forward_query,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?);
    }

    let (host_records, host_file) = open_store("host_records", config.stores.host_records.as_deref())?;
    let (node_lists, node_file) = open_store("node_lists", config.stores.node_lists.as_deref())?;

    // Watchers stop when dropped; keep them for the life of the server.
    let mut _watchers = Vec::new();
    if config.stores.watch {
        for store in [host_file, node_file].into_iter().flatten() {
            _watchers.push(StoreWatcher::new(store).run()?);
        }
    }

    let fetcher = HyperFetcher::new(Some(Duration::from_secs(config.timeouts.connect_secs)));
    let resolver = Resolver::new(host_records, node_lists, Arc::new(fetcher))
        .with_forward_query(config.upstream.forward_query);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config, Arc::new(resolver));
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Open a store from its configured file, or start it empty.
fn open_store(
    name: &str,
    path: Option<&str>,
) -> Result<(Arc<dyn KvStore>, Option<Arc<FileStore>>), StoreError> {
    match path {
        Some(path) => {
            let store = Arc::new(FileStore::load(path)?);
            let shared: Arc<dyn KvStore> = store.clone();
            Ok((shared, Some(store)))
        }
        None => {
            tracing::warn!(store = name, "No file configured; store starts empty");
            let empty: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
            Ok((empty, None))
        }
    }
}
