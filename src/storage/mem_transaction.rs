//! Transactions of the in-memory graph store
//!
//! Items are validated as they are staged. Commit replays the staged
//! operations against copies of the touched partitions and swaps them in only
//! if every operation succeeded, all under the store's write lock.

use std::collections::HashMap;

use crate::graph::{Edge, EndSide, EntityType, GraphTransaction, Node};
use crate::storage::mem_graph::{check_partition, PartitionData, SharedPartitions};
use crate::types::GraphError;
use crate::{log_debug, log_info};

#[derive(Debug)]
enum StagedOp {
    UpdateNode(String, Node),
    StoreNode(String, Node),
    RemoveNode { partition: String, key: String, kind: String },
    StoreEdge(String, Edge),
    RemoveEdge { partition: String, key: String, kind: String },
}

impl StagedOp {
    fn partition(&self) -> &str {
        match self {
            StagedOp::UpdateNode(p, _) | StagedOp::StoreNode(p, _) | StagedOp::StoreEdge(p, _) => p,
            StagedOp::RemoveNode { partition, .. } | StagedOp::RemoveEdge { partition, .. } => {
                partition
            }
        }
    }
}

/// Kinds may contain alphanumerics, `_`, `-` and `.`
fn check_kind(entity: EntityType, kind: &str) -> Result<(), GraphError> {
    let valid = !kind.is_empty()
        && kind.chars().all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if !valid {
        return Err(GraphError::InvalidData { entity, attr: "kind".into() });
    }
    Ok(())
}

fn check_key(entity: EntityType, key: &str) -> Result<(), GraphError> {
    if key.is_empty() {
        return Err(GraphError::InvalidData { entity, attr: "key".into() });
    }
    Ok(())
}

fn check_node(node: &Node) -> Result<(), GraphError> {
    check_key(EntityType::Node, &node.key())?;
    check_kind(EntityType::Node, &node.kind())
}

fn check_edge(edge: &Edge) -> Result<(), GraphError> {
    check_key(EntityType::Edge, &edge.key())?;
    check_kind(EntityType::Edge, &edge.kind())?;
    edge.end(EndSide::End1)?;
    edge.end(EndSide::End2)?;
    Ok(())
}

/// Transaction against a `MemGraph`
#[derive(Debug)]
pub struct MemTransaction {
    partitions: SharedPartitions,
    staged: Vec<StagedOp>,
}

impl MemTransaction {
    pub(crate) fn new(partitions: SharedPartitions) -> Self {
        Self { partitions, staged: Vec::new() }
    }

    /// Whether nothing has been staged
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    fn stage(&mut self, op: StagedOp) -> Result<(), GraphError> {
        check_partition(op.partition())?;
        self.staged.push(op);
        Ok(())
    }
}

impl GraphTransaction for MemTransaction {
    fn update_node(&mut self, partition: &str, node: Node) -> Result<(), GraphError> {
        check_node(&node)?;
        self.stage(StagedOp::UpdateNode(partition.to_string(), node))
    }

    fn store_node(&mut self, partition: &str, node: Node) -> Result<(), GraphError> {
        check_node(&node)?;
        self.stage(StagedOp::StoreNode(partition.to_string(), node))
    }

    fn remove_node(&mut self, partition: &str, key: &str, kind: &str) -> Result<(), GraphError> {
        check_key(EntityType::Node, key)?;
        check_kind(EntityType::Node, kind)?;
        self.stage(StagedOp::RemoveNode {
            partition: partition.to_string(),
            key: key.to_string(),
            kind: kind.to_string(),
        })
    }

    fn store_edge(&mut self, partition: &str, edge: Edge) -> Result<(), GraphError> {
        check_edge(&edge)?;
        self.stage(StagedOp::StoreEdge(partition.to_string(), edge))
    }

    fn remove_edge(&mut self, partition: &str, key: &str, kind: &str) -> Result<(), GraphError> {
        check_key(EntityType::Edge, key)?;
        check_kind(EntityType::Edge, kind)?;
        self.stage(StagedOp::RemoveEdge {
            partition: partition.to_string(),
            key: key.to_string(),
            kind: kind.to_string(),
        })
    }

    fn commit(self) -> Result<(), GraphError> {
        if self.staged.is_empty() {
            return Ok(());
        }

        let mut live = self.partitions.write();
        let mut working: HashMap<String, PartitionData> = HashMap::new();

        for op in &self.staged {
            let name = op.partition();
            let data = working
                .entry(name.to_string())
                .or_insert_with(|| live.get(name).cloned().unwrap_or_default());
            apply(data, op)?;
        }

        let touched = working.len();
        live.extend(working);
        log_info!(
            "Committed {} staged operations across {} partitions",
            self.staged.len(),
            touched
        );
        Ok(())
    }
}

fn apply(data: &mut PartitionData, op: &StagedOp) -> Result<(), GraphError> {
    match op {
        StagedOp::UpdateNode(_, node) => {
            let table = data.nodes.entry(node.kind()).or_default();
            match table.get_mut(&node.key()) {
                Some(existing) => existing.merge_from(node),
                None => table.insert(node.key(), node.clone()),
            }
        }
        StagedOp::StoreNode(_, node) => {
            data.nodes.entry(node.kind()).or_default().insert(node.key(), node.clone());
        }
        StagedOp::RemoveNode { key, kind, .. } => remove_node(data, key, kind),
        StagedOp::StoreEdge(_, edge) => {
            for side in [EndSide::End1, EndSide::End2] {
                let end = edge.end(side)?;
                if data.node(&end.key, &end.kind).is_none() {
                    return Err(GraphError::MissingEndpoint { key: end.key, kind: end.kind });
                }
            }
            data.edges.entry(edge.kind()).or_default().insert(edge.key(), edge.clone());
        }
        StagedOp::RemoveEdge { key, kind, .. } => {
            if let Some(table) = data.edges.get_mut(kind) {
                table.remove(key);
            }
        }
    }
    Ok(())
}

/// Remove a node, every edge attached to it and, through cascading edges,
/// the nodes at their far ends.
fn remove_node(data: &mut PartitionData, key: &str, kind: &str) {
    let removed = data.nodes.get_mut(kind).and_then(|table| table.remove(key));
    if removed.is_none() {
        return;
    }
    log_debug!("Removed node {} ({})", key, kind);

    let mut cascade = Vec::new();
    for table in data.edges.values_mut() {
        let attached: Vec<(String, Option<(String, String)>)> = table
            .iter()
            .filter_map(|(edge_key, edge)| {
                [EndSide::End1, EndSide::End2].into_iter().find_map(|side| {
                    let here = edge.end(side).ok()?;
                    if here.key != key || here.kind != kind {
                        return None;
                    }
                    let far = edge
                        .end(side.other())
                        .ok()
                        .filter(|_| here.cascading)
                        .map(|far| (far.key, far.kind));
                    Some((edge_key.clone(), far))
                })
            })
            .collect();

        for (edge_key, far) in attached {
            table.remove(&edge_key);
            cascade.extend(far);
        }
    }

    for (far_key, far_kind) in cascade {
        remove_node(data, &far_key, &far_kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeEnd, GraphManager};
    use crate::storage::MemGraph;
    use serde_json::json;

    fn end(key: &str, cascading: bool) -> EdgeEnd {
        EdgeEnd { key: key.into(), kind: "Person".into(), role: "friend".into(), cascading }
    }

    fn seed(graph: &MemGraph) {
        let mut trans = graph.begin_transaction();
        for key in ["a", "b", "c"] {
            trans.store_node("main", Node::new(key, "Person").with_attr("name", key)).unwrap();
        }
        let ab = Edge::new("ab", "Knows", &end("a", true), &end("b", false));
        let bc = Edge::new("bc", "Knows", &end("b", false), &end("c", false));
        trans.store_edge("main", ab).unwrap();
        trans.store_edge("main", bc).unwrap();
        trans.commit().unwrap();
    }

    #[test]
    fn test_staging_rejects_invalid_items() {
        let graph = MemGraph::new();
        let mut trans = graph.begin_transaction();

        assert_eq!(
            trans.store_node("main", Node::new("", "Person")),
            Err(GraphError::InvalidData { entity: EntityType::Node, attr: "key".into() })
        );
        assert_eq!(
            trans.store_node("main", Node::new("1", "Bad Kind")),
            Err(GraphError::InvalidData { entity: EntityType::Node, attr: "kind".into() })
        );
        assert_eq!(
            trans.store_node("not-alnum", Node::new("1", "Person")),
            Err(GraphError::InvalidPartition("not-alnum".into()))
        );
        assert!(trans.store_edge("main", Edge::from(Node::new("e", "Knows"))).is_err());
        assert!(trans.is_empty());
    }

    #[test]
    fn test_uncommitted_transaction_changes_nothing() {
        let graph = MemGraph::new();
        let mut trans = graph.begin_transaction();
        trans.store_node("main", Node::new("1", "Person")).unwrap();
        drop(trans);

        assert_eq!(graph.fetch_node("main", "1", "Person").unwrap(), None);
        assert_eq!(graph.node_count("Person"), 0);
    }

    #[test]
    fn test_update_merges_and_store_replaces() {
        let graph = MemGraph::new();
        seed(&graph);

        let mut trans = graph.begin_transaction();
        trans.update_node("main", Node::new("a", "Person").with_attr("age", 30)).unwrap();
        trans.store_node("main", Node::new("b", "Person").with_attr("age", 40)).unwrap();
        trans.commit().unwrap();

        let a = graph.fetch_node("main", "a", "Person").unwrap().unwrap();
        assert_eq!(a.attr("name"), Some(&json!("a")));
        assert_eq!(a.attr("age"), Some(&json!(30)));

        let b = graph.fetch_node("main", "b", "Person").unwrap().unwrap();
        assert!(b.attr("name").is_none());
    }

    #[test]
    fn test_missing_endpoint_fails_commit_atomically() {
        let graph = MemGraph::new();
        let mut trans = graph.begin_transaction();
        trans.store_node("main", Node::new("a", "Person")).unwrap();
        let dangling = Edge::new("ax", "Knows", &end("a", false), &end("x", false));
        trans.store_edge("main", dangling).unwrap();

        assert_eq!(
            trans.commit(),
            Err(GraphError::MissingEndpoint { key: "x".into(), kind: "Person".into() })
        );
        assert_eq!(graph.fetch_node("main", "a", "Person").unwrap(), None);
    }

    #[test]
    fn test_remove_node_drops_edges_and_cascades() {
        let graph = MemGraph::new();
        seed(&graph);

        let mut trans = graph.begin_transaction();
        trans.remove_node("main", "a", "Person").unwrap();
        trans.commit().unwrap();

        // a cascades to b through "ab"; removing b drops "bc" but c survives
        assert_eq!(graph.fetch_node("main", "a", "Person").unwrap(), None);
        assert_eq!(graph.fetch_node("main", "b", "Person").unwrap(), None);
        assert!(graph.fetch_node("main", "c", "Person").unwrap().is_some());
        assert_eq!(graph.edge_count("Knows"), 0);
    }

    #[test]
    fn test_remove_missing_entities_is_not_an_error() {
        let graph = MemGraph::new();
        let mut trans = graph.begin_transaction();
        trans.remove_node("main", "ghost", "Person").unwrap();
        trans.remove_edge("main", "ghost", "Knows").unwrap();
        assert!(trans.commit().is_ok());
    }
}
