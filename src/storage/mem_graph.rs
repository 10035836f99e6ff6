//! In-memory graph store
//!
//! A small reference implementation of `GraphManager` backed by per-partition
//! hash maps behind one `parking_lot::RwLock`. Keys within a kind are kept in
//! insertion order so listings are deterministic.

use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::constants::{ATTR_KEY, ATTR_KIND};
use crate::graph::{Edge, EndSide, GraphManager, KeyIterator, Node};
use crate::log_debug;
use crate::storage::mem_transaction::MemTransaction;
use crate::storage::traversal_spec::TraversalSpec;
use crate::types::GraphError;

/// Entities of one kind, keyed and in insertion order
#[derive(Debug, Clone)]
pub(crate) struct KindTable<T> {
    order: Vec<String>,
    entries: HashMap<String, T>,
}

impl<T> Default for KindTable<T> {
    fn default() -> Self {
        Self { order: Vec::new(), entries: HashMap::new() }
    }
}

impl<T> KindTable<T> {
    pub(crate) fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.entries.get_mut(key)
    }

    /// Insert or replace; a replaced entry keeps its position
    pub(crate) fn insert(&mut self, key: String, value: T) {
        if !self.entries.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.entries.insert(key, value);
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<T> {
        let removed = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(removed)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &T)> {
        self.order.iter().filter_map(move |k| self.entries.get(k).map(|v| (k, v)))
    }

    pub(crate) fn keys(&self) -> Vec<String> {
        self.order.clone()
    }
}

/// All nodes and edges of a partition
#[derive(Debug, Clone, Default)]
pub(crate) struct PartitionData {
    pub(crate) nodes: BTreeMap<String, KindTable<Node>>,
    pub(crate) edges: BTreeMap<String, KindTable<Edge>>,
}

impl PartitionData {
    pub(crate) fn node(&self, key: &str, kind: &str) -> Option<&Node> {
        self.nodes.get(kind).and_then(|table| table.get(key))
    }

    pub(crate) fn edge(&self, key: &str, kind: &str) -> Option<&Edge> {
        self.edges.get(kind).and_then(|table| table.get(key))
    }
}

/// Shared state between a `MemGraph` and its transactions
pub(crate) type SharedPartitions = Arc<RwLock<HashMap<String, PartitionData>>>;

/// Partition names are restricted to alphanumeric characters
pub(crate) fn check_partition(partition: &str) -> Result<(), GraphError> {
    if partition.is_empty() || !partition.chars().all(char::is_alphanumeric) {
        return Err(GraphError::InvalidPartition(partition.to_string()));
    }
    Ok(())
}

/// In-memory `GraphManager`
#[derive(Debug, Clone, Default)]
pub struct MemGraph {
    partitions: SharedPartitions,
}

impl MemGraph {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of partitions written to so far
    pub fn partition_count(&self) -> usize {
        self.partitions.read().len()
    }

    fn read_partition<R>(
        &self,
        partition: &str,
        f: impl FnOnce(&PartitionData) -> R,
    ) -> Result<Option<R>, GraphError> {
        check_partition(partition)?;
        let partitions = self.partitions.read();
        Ok(partitions.get(partition).map(f))
    }

    fn count<F>(&self, f: F) -> u64
    where
        F: Fn(&PartitionData) -> usize,
    {
        self.partitions.read().values().map(|p| f(p) as u64).sum()
    }

    fn kinds<F>(&self, f: F) -> Vec<String>
    where
        F: Fn(&PartitionData) -> Vec<String>,
    {
        let mut kinds: Vec<String> = self.partitions.read().values().flat_map(f).collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }
}

impl GraphManager for MemGraph {
    type Transaction = MemTransaction;

    fn node_key_iterator(
        &self,
        partition: &str,
        kind: &str,
    ) -> Result<Option<KeyIterator>, GraphError> {
        let keys = self.read_partition(partition, |p| p.nodes.get(kind).map(KindTable::keys))?;

        Ok(keys.flatten().map(|keys| {
            log_debug!("Iterating {} {} keys in partition {}", keys.len(), kind, partition);
            Box::new(keys.into_iter().map(Ok)) as KeyIterator
        }))
    }

    fn fetch_node(
        &self,
        partition: &str,
        key: &str,
        kind: &str,
    ) -> Result<Option<Node>, GraphError> {
        Ok(self.read_partition(partition, |p| p.node(key, kind).cloned())?.flatten())
    }

    fn fetch_node_part(
        &self,
        partition: &str,
        key: &str,
        kind: &str,
        attrs: &[&str],
    ) -> Result<Option<Node>, GraphError> {
        Ok(self
            .read_partition(partition, |p| p.node(key, kind).map(|n| n.project(attrs)))?
            .flatten())
    }

    fn fetch_edge(
        &self,
        partition: &str,
        key: &str,
        kind: &str,
    ) -> Result<Option<Edge>, GraphError> {
        Ok(self.read_partition(partition, |p| p.edge(key, kind).cloned())?.flatten())
    }

    fn node_count(&self, kind: &str) -> u64 {
        self.count(|p| p.nodes.get(kind).map_or(0, KindTable::len))
    }

    fn edge_count(&self, kind: &str) -> u64 {
        self.count(|p| p.edges.get(kind).map_or(0, KindTable::len))
    }

    fn node_kinds(&self) -> Vec<String> {
        self.kinds(|p| populated_kinds(&p.nodes))
    }

    fn edge_kinds(&self) -> Vec<String> {
        self.kinds(|p| populated_kinds(&p.edges))
    }

    fn traverse_multi(
        &self,
        partition: &str,
        key: &str,
        kind: &str,
        spec: &str,
        all_data: bool,
    ) -> Result<(Vec<Node>, Vec<Edge>), GraphError> {
        let spec = TraversalSpec::parse(spec)?;

        let result = self.read_partition(partition, |p| {
            let mut nodes = Vec::new();
            let mut edges = Vec::new();

            for (_, table) in p.edges.iter().filter(|(k, _)| spec.matches_edge_kind(k)) {
                for (_, edge) in table.iter() {
                    if let Some((node, edge)) = follow(p, edge, key, kind, &spec) {
                        if all_data {
                            nodes.push(node.clone());
                            edges.push(edge);
                        } else {
                            nodes.push(node.project(&[ATTR_KEY, ATTR_KIND]));
                            edges.push(edge.project(&[ATTR_KEY, ATTR_KIND]));
                        }
                    }
                }
            }

            (nodes, edges)
        })?;

        Ok(result.unwrap_or_default())
    }

    fn begin_transaction(&self) -> MemTransaction {
        MemTransaction::new(self.partitions.clone())
    }
}

/// Kinds with at least one live entry
fn populated_kinds<T>(tables: &BTreeMap<String, KindTable<T>>) -> Vec<String> {
    tables.iter().filter(|(_, t)| !t.is_empty()).map(|(k, _)| k.clone()).collect()
}

/// Follow one edge away from the start node if it qualifies.
///
/// The returned edge is oriented so that `end1` is the start node.
fn follow<'p>(
    p: &'p PartitionData,
    edge: &Edge,
    key: &str,
    kind: &str,
    spec: &TraversalSpec,
) -> Option<(&'p Node, Edge)> {
    for side in [EndSide::End1, EndSide::End2] {
        let (Ok(start), Ok(far)) = (edge.end(side), edge.end(side.other())) else {
            return None;
        };

        if start.key != key || start.kind != kind || !spec.matches_start_role(&start.role) {
            continue;
        }
        if !spec.matches_end(&far.role, &far.kind) {
            continue;
        }

        let node = p.node(&far.key, &far.kind)?;
        let mut oriented = edge.clone();
        if side == EndSide::End2 {
            oriented.set_end(EndSide::End1, &start);
            oriented.set_end(EndSide::End2, &far);
        }
        return Some((node, oriented));
    }
    None
}
