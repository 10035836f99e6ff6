//! Transactional application of mutation batches
//!
//! A request's nodes and edges are staged into one transaction, nodes first,
//! each list in request order. What "staging" means depends on the verb,
//! which picks one `ApplyStrategy` for nodes and one for edges:
//!
//! | Verb | Nodes | Edges |
//! |---|---|---|
//! | PUT | `Merge` | `Replace` |
//! | POST | `Replace` | `Replace` |
//! | DELETE | `Remove` | `Remove` |
//!
//! The first rejected item aborts the batch; the transaction is dropped
//! without commit, so nothing staged before it is applied.

use axum::http::Method;

use crate::api::codec::DecodedBatch;
use crate::graph::{Edge, EntityType, GraphTransaction, Node};
use crate::types::{ApiError, GraphError, Result};
use crate::{log_debug, log_info};

/// Verbs that mutate the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationVerb {
    /// Update nodes in place, replace edges
    Put,
    /// Replace nodes and edges
    Post,
    /// Remove nodes and edges
    Delete,
}

impl MutationVerb {
    /// Map an HTTP method to a mutation verb
    pub fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::PUT => Some(MutationVerb::Put),
            Method::POST => Some(MutationVerb::Post),
            Method::DELETE => Some(MutationVerb::Delete),
            _ => None,
        }
    }

    /// Node and edge strategy of this verb
    pub fn strategies(self) -> (ApplyStrategy, ApplyStrategy) {
        match self {
            MutationVerb::Put => (ApplyStrategy::Merge, ApplyStrategy::Replace),
            MutationVerb::Post => (ApplyStrategy::Replace, ApplyStrategy::Replace),
            MutationVerb::Delete => (ApplyStrategy::Remove, ApplyStrategy::Remove),
        }
    }
}

/// How a single item is staged into a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStrategy {
    /// Merge attributes into an existing entity, creating it if absent
    Merge,
    /// Replace an existing entity, creating it if absent
    Replace,
    /// Remove by key and kind
    Remove,
}

impl ApplyStrategy {
    /// Stage one node
    pub fn apply_node<T: GraphTransaction>(
        self,
        trans: &mut T,
        partition: &str,
        node: Node,
    ) -> std::result::Result<(), GraphError> {
        match self {
            ApplyStrategy::Merge => trans.update_node(partition, node),
            ApplyStrategy::Replace => trans.store_node(partition, node),
            ApplyStrategy::Remove => trans.remove_node(partition, &node.key(), &node.kind()),
        }
    }

    /// Stage one edge. Edges have no partial update; `Merge` replaces.
    pub fn apply_edge<T: GraphTransaction>(
        self,
        trans: &mut T,
        partition: &str,
        edge: Edge,
    ) -> std::result::Result<(), GraphError> {
        match self {
            ApplyStrategy::Merge | ApplyStrategy::Replace => trans.store_edge(partition, edge),
            ApplyStrategy::Remove => trans.remove_edge(partition, &edge.key(), &edge.kind()),
        }
    }
}

/// Counts of a committed batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Nodes staged and committed
    pub nodes: usize,
    /// Edges staged and committed
    pub edges: usize,
}

/// Mutation items of one request, bound to a partition and verb
#[derive(Debug, Clone)]
pub struct TransactionBatch {
    partition: String,
    verb: MutationVerb,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl TransactionBatch {
    /// Create a batch from decoded request items
    pub fn new(partition: impl Into<String>, verb: MutationVerb, decoded: DecodedBatch) -> Self {
        Self {
            partition: partition.into(),
            verb,
            nodes: decoded.nodes,
            edges: decoded.edges,
        }
    }

    /// Stage every item, stopping at the first rejection
    pub fn stage<T: GraphTransaction>(self, trans: &mut T) -> Result<BatchOutcome> {
        let (node_strategy, edge_strategy) = self.verb.strategies();
        let partition = self.partition;
        let outcome = BatchOutcome { nodes: self.nodes.len(), edges: self.edges.len() };

        for (i, node) in self.nodes.into_iter().enumerate() {
            let (key, kind) = (node.key(), node.kind());
            node_strategy
                .apply_node(trans, &partition, node)
                .map_err(|reason| bad_item(EntityType::Node, i, kind, key, reason))?;
        }

        for (i, edge) in self.edges.into_iter().enumerate() {
            let (key, kind) = (edge.key(), edge.kind());
            edge_strategy
                .apply_edge(trans, &partition, edge)
                .map_err(|reason| bad_item(EntityType::Edge, i, kind, key, reason))?;
        }

        log_debug!("Staged {} nodes and {} edges into {}", outcome.nodes, outcome.edges, partition);
        Ok(outcome)
    }

    /// Stage every item, then commit
    pub fn apply<T: GraphTransaction>(self, mut trans: T) -> Result<BatchOutcome> {
        let verb = self.verb;
        let partition = self.partition.clone();

        let outcome = self.stage(&mut trans)?;
        trans.commit().map_err(ApiError::CommitFailure)?;

        log_info!(
            "{:?} committed {} nodes and {} edges to partition {}",
            verb,
            outcome.nodes,
            outcome.edges,
            partition
        );
        Ok(outcome)
    }
}

fn bad_item(
    entity: EntityType,
    index: usize,
    kind: String,
    key: String,
    reason: GraphError,
) -> ApiError {
    ApiError::BadItem { entity, position: index + 1, kind, key, reason }
}
