//! Storage layer for the graph API
//!
//! Provides the in-memory graph store the server runs against when no other
//! `GraphManager` is injected.

/// In-memory graph store
pub mod mem_graph;

/// Transactions of the in-memory graph store
pub mod mem_transaction;

/// Traversal spec grammar understood by the in-memory store
pub mod traversal_spec;

pub use mem_graph::MemGraph;
pub use mem_transaction::MemTransaction;
pub use traversal_spec::TraversalSpec;
