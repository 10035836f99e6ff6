//! Graph API - HTTP access to a partitioned graph store
//!
//! Exposes nodes, edges and traversals of a graph store as a REST resource
//! under `/graph`. The store is reached through the `GraphManager` and
//! `GraphTransaction` traits; an in-memory implementation is included.
#![warn(missing_docs)]

// Core foundational modules
pub mod constants;
pub mod core;
pub mod types;

// Main functional modules
pub mod api;
pub mod graph;
pub mod storage;

// Re-export commonly used items for convenience
pub use crate::api::{create_router, start_api_server, GraphEndpoint};
pub use crate::core::{AppState, Config};
pub use crate::graph::{Edge, GraphManager, GraphTransaction, Node};
pub use crate::storage::MemGraph;
pub use crate::types::{ApiError, ConfigError, GraphError, Result};

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize tracing with `level` as the default filter.
///
/// `RUST_LOG` takes precedence when set. Calling this more than once is a
/// no-op.
pub fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok() {
        tracing::info!("Initializing {} v{}", NAME, VERSION);
    }
}
