//! Wire format of graph entities
//!
//! Mutation bodies come in two forms: an envelope object with `nodes` and
//! `edges` lists for the whole partition, or a bare list whose entity type
//! is given by the path. Responses are flat attribute objects, lists of
//! them, or a `[nodes, edges]` pair for traversals.

use serde_json::{Map, Value};

use crate::constants::{ENVELOPE_EDGES, ENVELOPE_NODES};
use crate::graph::{Edge, EntityType, Node};
use crate::types::{ApiError, Result};

/// What a mutation body is expected to contain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationTarget {
    /// Envelope with `nodes` and/or `edges`
    Graph,
    /// Bare list of one entity type
    Entities(EntityType),
}

/// Decoded mutation items, in request order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedBatch {
    /// Node items
    pub nodes: Vec<Node>,
    /// Edge items
    pub edges: Vec<Edge>,
}

impl DecodedBatch {
    /// Total number of items
    pub fn len(&self) -> usize {
        self.nodes.len() + self.edges.len()
    }

    /// Whether the body held no items
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

type Attributes = Map<String, Value>;

fn envelope_error(e: serde_json::Error) -> ApiError {
    ApiError::malformed_body(format!(
        "Could not decode request body as object with list of nodes and/or edges: {}",
        e
    ))
}

/// Take one optional list out of the envelope; absent and `null` are empty
fn take_list(envelope: &mut Attributes, field: &str) -> Result<Vec<Attributes>> {
    match envelope.remove(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(list) => serde_json::from_value(list).map_err(envelope_error),
    }
}

/// Decode a mutation request body
pub fn decode_mutation_body(body: &[u8], target: MutationTarget) -> Result<DecodedBatch> {
    match target {
        MutationTarget::Graph => {
            let mut envelope: Attributes = serde_json::from_slice(body).map_err(envelope_error)?;

            let nodes = take_list(&mut envelope, ENVELOPE_NODES)?;
            let edges = take_list(&mut envelope, ENVELOPE_EDGES)?;

            // Other members are ignored but must still be lists of objects
            for field in envelope.keys().cloned().collect::<Vec<_>>() {
                take_list(&mut envelope, &field)?;
            }

            Ok(DecodedBatch {
                nodes: nodes.into_iter().map(Node::from_map).collect(),
                edges: edges.into_iter().map(Edge::from_map).collect(),
            })
        }
        MutationTarget::Entities(entity) => {
            let items: Vec<Attributes> = serde_json::from_slice(body).map_err(|e| {
                ApiError::malformed_body(format!(
                    "Could not decode request body as list of {}: {}",
                    entity.plural(),
                    e
                ))
            })?;

            let mut batch = DecodedBatch::default();
            match entity {
                EntityType::Node => batch.nodes = items.into_iter().map(Node::from_map).collect(),
                EntityType::Edge => batch.edges = items.into_iter().map(Edge::from_map).collect(),
            }
            Ok(batch)
        }
    }
}

/// Encode a single entity as a flat attribute object
pub fn encode_entity(data: Map<String, Value>) -> Value {
    Value::Object(data)
}

/// Encode a collection as a list of flat attribute objects
pub fn encode_list(items: Vec<Map<String, Value>>) -> Value {
    Value::Array(items.into_iter().map(Value::Object).collect())
}

/// Encode a traversal result as `[nodes, edges]`
pub fn encode_traversal(nodes: Vec<Node>, edges: Vec<Edge>) -> Value {
    Value::Array(vec![
        encode_list(nodes.into_iter().map(Node::into_data).collect()),
        encode_list(edges.into_iter().map(Edge::into_data).collect()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_envelope() {
        let body = br#"{
            "nodes": [{"key":"1","kind":"Person","name":"A"}],
            "edges": [{"key":"e","kind":"Knows"}]
        }"#;
        let batch = decode_mutation_body(body, MutationTarget::Graph).unwrap();

        assert_eq!(batch.nodes.len(), 1);
        assert_eq!(batch.nodes[0].attr("name"), Some(&json!("A")));
        assert_eq!(batch.edges[0].kind(), "Knows");
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn test_decode_envelope_lists_are_optional() {
        let batch = decode_mutation_body(br#"{"edges":[]}"#, MutationTarget::Graph).unwrap();
        assert!(batch.is_empty());

        let batch = decode_mutation_body(br#"{}"#, MutationTarget::Graph).unwrap();
        assert!(batch.is_empty());

        let batch = decode_mutation_body(br#"{"nodes":null}"#, MutationTarget::Graph).unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn test_decode_envelope_other_members_must_be_lists() {
        let body = br#"{"nodes":[],"extra":[{"a":1}]}"#;
        let batch = decode_mutation_body(body, MutationTarget::Graph).unwrap();
        assert!(batch.is_empty());

        let bodies: [&[u8]; 3] =
            [br#"{"nodes":[],"foo":1}"#, br#"{"foo":"bar"}"#, br#"{"foo":[1,2]}"#];
        for body in bodies {
            let err = decode_mutation_body(body, MutationTarget::Graph).unwrap_err();
            assert!(err.is_client_error());
            assert!(err.to_string().contains("object with list of nodes and/or edges"));
        }
    }

    #[test]
    fn test_decode_bare_list_by_entity_type() {
        let body = br#"[{"key":"a","kind":"Person"},{"key":"b","kind":"Person"}]"#;

        let nodes = decode_mutation_body(body, MutationTarget::Entities(EntityType::Node)).unwrap();
        assert_eq!(nodes.nodes.len(), 2);
        assert!(nodes.edges.is_empty());

        let edges = decode_mutation_body(body, MutationTarget::Entities(EntityType::Edge)).unwrap();
        assert_eq!(edges.edges.len(), 2);
        assert!(edges.nodes.is_empty());
    }

    #[test]
    fn test_structurally_wrong_bodies_are_malformed() {
        let envelope = "object with list of nodes and/or edges";
        let cases: [(&[u8], MutationTarget, &str); 4] = [
            (&b"[]"[..], MutationTarget::Graph, envelope),
            (&br#"{"nodes":{"key":"1"}}"#[..], MutationTarget::Graph, envelope),
            (&br#"{"key":"1"}"#[..], MutationTarget::Entities(EntityType::Node), "list of nodes"),
            (&b"[1, 2]"[..], MutationTarget::Entities(EntityType::Edge), "list of edges"),
        ];

        for (body, target, expected) in cases {
            match decode_mutation_body(body, target) {
                Err(ApiError::MalformedBody(msg)) => assert!(msg.contains(expected), "{msg}"),
                other => panic!("expected MalformedBody, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_encode_traversal_pair() {
        let value = encode_traversal(
            vec![Node::new("b", "Person")],
            vec![Edge::from(Node::new("ab", "Knows"))],
        );
        assert_eq!(
            value,
            json!([[{"key": "b", "kind": "Person"}], [{"key": "ab", "kind": "Knows"}]])
        );
        assert_eq!(encode_traversal(Vec::new(), Vec::new()), json!([[], []]));
    }

    #[test]
    fn test_fetched_node_survives_encode_then_decode() {
        let node = Node::new("1", "Person")
            .with_attr("name", "A")
            .with_attr("tags", json!(["x", "y"]));
        let wire = serde_json::to_vec(&encode_list(vec![node.data().clone()])).unwrap();

        let target = MutationTarget::Entities(EntityType::Node);
        let decoded = decode_mutation_body(&wire, target).unwrap();
        assert_eq!(decoded.nodes, vec![node]);
    }
}
