//! Contracts of the graph store collaborator
//!
//! The request-handling core never touches storage directly. It reads
//! through a `GraphManager` and writes through a `GraphTransaction` obtained
//! from it. Both are injected, so tests can substitute their own doubles.

use crate::graph::{Edge, Node};
use crate::types::GraphError;

/// Forward-only, fallible sequence of node keys
pub type KeyIterator = Box<dyn Iterator<Item = Result<String, GraphError>> + Send>;

/// Read access to a graph store
pub trait GraphManager: Send + Sync + 'static {
    /// Transaction type handed out by `begin_transaction`
    type Transaction: GraphTransaction;

    /// Iterate the keys of all nodes of `kind` in `partition`.
    ///
    /// Returns `Ok(None)` if the partition or kind is unknown.
    fn node_key_iterator(
        &self,
        partition: &str,
        kind: &str,
    ) -> Result<Option<KeyIterator>, GraphError>;

    /// Fetch a node with all its attributes
    fn fetch_node(
        &self,
        partition: &str,
        key: &str,
        kind: &str,
    ) -> Result<Option<Node>, GraphError>;

    /// Fetch a node with only the given attributes
    fn fetch_node_part(
        &self,
        partition: &str,
        key: &str,
        kind: &str,
        attrs: &[&str],
    ) -> Result<Option<Node>, GraphError>;

    /// Fetch an edge with all its attributes
    fn fetch_edge(
        &self,
        partition: &str,
        key: &str,
        kind: &str,
    ) -> Result<Option<Edge>, GraphError>;

    /// Number of nodes of `kind` known to the store
    fn node_count(&self, kind: &str) -> u64;

    /// Number of edges of `kind` known to the store
    fn edge_count(&self, kind: &str) -> u64;

    /// All node kinds known to the store, in ascending order
    fn node_kinds(&self) -> Vec<String>;

    /// All edge kinds known to the store, in ascending order
    fn edge_kinds(&self) -> Vec<String>;

    /// Follow `spec` from the node identified by `key`/`kind`.
    ///
    /// The returned vectors have equal length; `edges[i]` was traversed to
    /// reach `nodes[i]`. With `all_data` unset only key and kind of each
    /// entity are returned.
    fn traverse_multi(
        &self,
        partition: &str,
        key: &str,
        kind: &str,
        spec: &str,
        all_data: bool,
    ) -> Result<(Vec<Node>, Vec<Edge>), GraphError>;

    /// Start a new transaction against this store
    fn begin_transaction(&self) -> Self::Transaction;
}

/// A batch of staged mutations committed atomically
pub trait GraphTransaction: Send {
    /// Stage a node update: attributes are merged into an existing node
    fn update_node(&mut self, partition: &str, node: Node) -> Result<(), GraphError>;

    /// Stage a node store: an existing node is replaced
    fn store_node(&mut self, partition: &str, node: Node) -> Result<(), GraphError>;

    /// Stage a node removal
    fn remove_node(&mut self, partition: &str, key: &str, kind: &str) -> Result<(), GraphError>;

    /// Stage an edge store: an existing edge is replaced
    fn store_edge(&mut self, partition: &str, edge: Edge) -> Result<(), GraphError>;

    /// Stage an edge removal
    fn remove_edge(&mut self, partition: &str, key: &str, kind: &str) -> Result<(), GraphError>;

    /// Apply every staged mutation or none of them
    fn commit(self) -> Result<(), GraphError>;
}
