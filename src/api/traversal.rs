//! Ordering of traversal results
//!
//! The store returns traversal results as two parallel vectors where
//! `edges[i]` led to `nodes[i]`. Responses list them by ascending node key;
//! the pairing is kept by computing one permutation and applying it to both.

use crate::constants::ATTR_KEY;
use crate::graph::{attr_string, Edge, Node};
use crate::types::{ApiError, GraphError, Result};

/// Stable ascending permutation of `nodes` by the string form of their key
pub fn sort_permutation(nodes: &[Node]) -> Vec<usize> {
    let keys: Vec<String> = nodes.iter().map(|n| attr_string(n.attr(ATTR_KEY))).collect();
    let mut order: Vec<usize> = (0..nodes.len()).collect();
    order.sort_by(|&a, &b| keys[a].cmp(&keys[b]));
    order
}

/// Sort nodes by key and move each edge along with its node
pub fn merge_traversal(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<(Vec<Node>, Vec<Edge>)> {
    if nodes.len() != edges.len() {
        return Err(ApiError::FetchFailure(GraphError::Storage(format!(
            "Traversal returned {} nodes but {} edges",
            nodes.len(),
            edges.len()
        ))));
    }

    let order = sort_permutation(&nodes);

    let mut nodes: Vec<Option<Node>> = nodes.into_iter().map(Some).collect();
    let mut edges: Vec<Option<Edge>> = edges.into_iter().map(Some).collect();

    let sorted_nodes = order.iter().filter_map(|&i| nodes[i].take()).collect();
    let sorted_edges = order.iter().filter_map(|&i| edges[i].take()).collect();

    Ok((sorted_nodes, sorted_edges))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn pair(node_key: &str, edge_key: &str) -> (Node, Edge) {
        (Node::new(node_key, "Person"), Edge::from(Node::new(edge_key, "Knows")))
    }

    #[test]
    fn test_nodes_and_edges_move_together() {
        let (b, eb) = pair("b", "to-b");
        let (a, ea) = pair("a", "to-a");

        let (nodes, edges) = merge_traversal(vec![b, a], vec![eb, ea]).unwrap();

        assert_eq!(nodes.iter().map(Node::key).collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(edges.iter().map(Edge::key).collect::<Vec<_>>(), vec!["to-a", "to-b"]);
    }

    #[test]
    fn test_equal_keys_keep_store_order() {
        let (n1, e1) = pair("x", "first");
        let (n2, e2) = pair("x", "second");
        let (_, edges) = merge_traversal(vec![n1, n2], vec![e1, e2]).unwrap();
        assert_eq!(edges[0].key(), "first");
        assert_eq!(edges[1].key(), "second");
    }

    #[test]
    fn test_non_string_and_missing_keys() {
        let nodes = vec![
            Node::from_map(json!({"key": 10}).as_object().unwrap().clone()),
            Node::from_map(json!({"kind": "Person"}).as_object().unwrap().clone()),
            Node::from_map(json!({"key": 2}).as_object().unwrap().clone()),
        ];
        // "" < "10" < "2"
        assert_eq!(sort_permutation(&nodes), vec![1, 0, 2]);
    }

    #[test]
    fn test_empty_and_mismatched_input() {
        assert_eq!(merge_traversal(Vec::new(), Vec::new()).unwrap(), (Vec::new(), Vec::new()));

        let (a, _) = pair("a", "e");
        let err = merge_traversal(vec![a], Vec::new()).unwrap_err();
        assert!(err.is_server_error());
    }

    proptest! {
        #[test]
        fn prop_merge_is_a_paired_stable_sort(
            keys in proptest::collection::vec("[a-d]{0,2}", 0..30),
        ) {
            let nodes: Vec<Node> = keys.iter().map(|k| Node::new(k.as_str(), "Person")).collect();
            let edges: Vec<Edge> = (0..keys.len())
                .map(|i| Edge::from(Node::new(i.to_string(), "Knows")))
                .collect();

            let (sorted_nodes, sorted_edges) = merge_traversal(nodes, edges).unwrap();
            prop_assert_eq!(sorted_nodes.len(), keys.len());

            let origins: Vec<usize> =
                sorted_edges.iter().map(|e| e.key().parse().unwrap()).collect();

            // every edge still sits next to the node it led to
            for (node, &origin) in sorted_nodes.iter().zip(&origins) {
                prop_assert_eq!(node.key(), keys[origin].clone());
            }

            // ascending keys, ties in input order
            for w in origins.windows(2) {
                let (a, b) = (&keys[w[0]], &keys[w[1]]);
                prop_assert!(a < b || (a == b && w[0] < w[1]));
            }

            let mut seen = origins.clone();
            seen.sort_unstable();
            prop_assert_eq!(seen, (0..keys.len()).collect::<Vec<_>>());
        }
    }
}
