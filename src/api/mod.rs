//! # API Module
//!
//! HTTP interface of the graph store.
//!
//! ## Endpoints Overview
//!
//! ### Graph Operations
//! - `GET /graph/{partition}/n` - List all nodes of a partition
//! - `GET /graph/{partition}/n/{kind}` - List nodes of a kind (`limit`, `offset`)
//! - `GET /graph/{partition}/{n|e}/{kind}/{key}` - Get a single node or edge
//! - `GET /graph/{partition}/n/{kind}/{key}/{spec}` - Traverse from a node
//! - `PUT|POST|DELETE /graph/{partition}` - Apply `{"nodes": [...], "edges": [...]}`
//! - `PUT|POST|DELETE /graph/{partition}/{n|e}` - Apply a list of nodes or edges
//!
//! List responses carry the size of the whole population in `X-Total-Count`.
//!
//! ### System Operations
//! - `GET /health` - Health check
//! - `GET /info` - Node and edge kinds with their counts

/// Mutation verbs and transactional batch application
pub mod batch;
/// JSON wire format of nodes, edges and traversal results
pub mod codec;
/// Request handling core, independent of axum extractors
pub mod endpoint;
/// Axum handlers
pub mod handlers;
/// Offset/limit pagination
pub mod pagination;
/// Path segment resolution
pub mod path;
/// Router and server startup
pub mod server;
/// Sorting of traversal results
pub mod traversal;

pub use batch::{ApplyStrategy, MutationVerb, TransactionBatch};
pub use endpoint::{GraphEndpoint, GraphResponse};
pub use server::{create_router, start_api_server};
