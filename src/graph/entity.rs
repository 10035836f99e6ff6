//! Node and edge data types
//!
//! Entities are flat JSON attribute maps. `key` and `kind` are ordinary
//! attributes; edges additionally describe their two endpoints through the
//! `end1*` / `end2*` attributes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::constants::*;
use crate::types::GraphError;

/// Entity type selected by the `n` / `e` path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    /// Graph nodes
    Node,
    /// Graph edges
    Edge,
}

impl EntityType {
    /// Parse a path segment (`n` or `e`)
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            SEGMENT_NODES => Some(EntityType::Node),
            SEGMENT_EDGES => Some(EntityType::Edge),
            _ => None,
        }
    }

    /// Plural name used in messages
    pub fn plural(self) -> &'static str {
        match self {
            EntityType::Node => "nodes",
            EntityType::Edge => "edges",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityType::Node => write!(f, "node"),
            EntityType::Edge => write!(f, "edge"),
        }
    }
}

/// String form of an attribute value as used for keys, kinds and sorting.
///
/// Strings are taken verbatim, `null` is empty, everything else is rendered
/// as JSON text.
pub fn attr_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// A graph node
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Node {
    data: Map<String, Value>,
}

impl Node {
    /// Create a node from an attribute map
    pub fn from_map(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// Create a node with only key and kind set
    pub fn new(key: impl Into<String>, kind: impl Into<String>) -> Self {
        let mut data = Map::new();
        data.insert(ATTR_KEY.to_string(), Value::String(key.into()));
        data.insert(ATTR_KIND.to_string(), Value::String(kind.into()));
        Self { data }
    }

    /// Builder-style attribute setter
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(name.into(), value.into());
        self
    }

    /// Key of this node (string form)
    pub fn key(&self) -> String {
        attr_string(self.data.get(ATTR_KEY))
    }

    /// Kind of this node (string form)
    pub fn kind(&self) -> String {
        attr_string(self.data.get(ATTR_KIND))
    }

    /// Look up a single attribute
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    /// Set a single attribute
    pub fn set_attr(&mut self, name: impl Into<String>, value: Value) {
        self.data.insert(name.into(), value);
    }

    /// All attributes
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Consume the node, returning its attributes
    pub fn into_data(self) -> Map<String, Value> {
        self.data
    }

    /// Copy of this node restricted to the given attributes
    pub fn project(&self, attrs: &[&str]) -> Node {
        let data = attrs
            .iter()
            .filter_map(|name| self.data.get(*name).map(|v| (name.to_string(), v.clone())))
            .collect();
        Node { data }
    }

    /// Merge another node's attributes into this one, overwriting on conflict
    pub fn merge_from(&mut self, other: &Node) {
        for (name, value) in &other.data {
            self.data.insert(name.clone(), value.clone());
        }
    }
}

/// One end of an edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeEnd {
    /// Key of the endpoint node
    pub key: String,
    /// Kind of the endpoint node
    pub kind: String,
    /// Role the endpoint plays in the relationship
    pub role: String,
    /// Whether deleting this endpoint cascades to the other one
    pub cascading: bool,
}

/// Which end of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndSide {
    /// `end1*` attributes
    End1,
    /// `end2*` attributes
    End2,
}

impl EndSide {
    fn attr_names(self) -> [&'static str; 4] {
        match self {
            EndSide::End1 => [ATTR_END1_KEY, ATTR_END1_KIND, ATTR_END1_ROLE, ATTR_END1_CASCADING],
            EndSide::End2 => [ATTR_END2_KEY, ATTR_END2_KIND, ATTR_END2_ROLE, ATTR_END2_CASCADING],
        }
    }

    /// The opposite end
    pub fn other(self) -> Self {
        match self {
            EndSide::End1 => EndSide::End2,
            EndSide::End2 => EndSide::End1,
        }
    }
}

/// A graph edge: a node with two endpoint descriptions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Edge {
    node: Node,
}

impl Edge {
    /// Create an edge from an attribute map
    pub fn from_map(data: Map<String, Value>) -> Self {
        Self { node: Node::from_map(data) }
    }

    /// Create an edge between two endpoints
    pub fn new(
        key: impl Into<String>,
        kind: impl Into<String>,
        end1: &EdgeEnd,
        end2: &EdgeEnd,
    ) -> Self {
        let mut edge = Self { node: Node::new(key, kind) };
        edge.set_end(EndSide::End1, end1);
        edge.set_end(EndSide::End2, end2);
        edge
    }

    /// Key of this edge (string form)
    pub fn key(&self) -> String {
        self.node.key()
    }

    /// Kind of this edge (string form)
    pub fn kind(&self) -> String {
        self.node.kind()
    }

    /// Look up a single attribute
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.node.attr(name)
    }

    /// All attributes
    pub fn data(&self) -> &Map<String, Value> {
        self.node.data()
    }

    /// Consume the edge, returning its attributes
    pub fn into_data(self) -> Map<String, Value> {
        self.node.into_data()
    }

    /// Copy of this edge restricted to the given attributes
    pub fn project(&self, attrs: &[&str]) -> Edge {
        Edge { node: self.node.project(attrs) }
    }

    /// Parse one endpoint, failing on the first missing attribute
    pub fn end(&self, side: EndSide) -> Result<EdgeEnd, GraphError> {
        let [key_attr, kind_attr, role_attr, cascading_attr] = side.attr_names();
        let required = |attr: &str| -> Result<String, GraphError> {
            let value = attr_string(self.node.attr(attr));
            if value.is_empty() {
                Err(GraphError::InvalidData { entity: EntityType::Edge, attr: attr.to_string() })
            } else {
                Ok(value)
            }
        };

        let key = required(key_attr)?;
        let kind = required(kind_attr)?;
        let role = required(role_attr)?;
        let cascading = match self.node.attr(cascading_attr) {
            Some(Value::Bool(b)) => *b,
            _ => {
                return Err(GraphError::InvalidData {
                    entity: EntityType::Edge,
                    attr: cascading_attr.to_string(),
                })
            }
        };

        Ok(EdgeEnd { key, kind, role, cascading })
    }

    /// Overwrite one endpoint description
    pub fn set_end(&mut self, side: EndSide, end: &EdgeEnd) {
        let [key_attr, kind_attr, role_attr, cascading_attr] = side.attr_names();
        self.node.set_attr(key_attr, Value::String(end.key.clone()));
        self.node.set_attr(kind_attr, Value::String(end.kind.clone()));
        self.node.set_attr(role_attr, Value::String(end.role.clone()));
        self.node.set_attr(cascading_attr, Value::Bool(end.cascading));
    }
}

impl From<Node> for Edge {
    fn from(node: Node) -> Self {
        Self { node }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn end(key: &str, role: &str) -> EdgeEnd {
        EdgeEnd { key: key.into(), kind: "Person".into(), role: role.into(), cascading: false }
    }

    #[test]
    fn test_attr_string_forms() {
        assert_eq!(attr_string(None), "");
        assert_eq!(attr_string(Some(&json!(null))), "");
        assert_eq!(attr_string(Some(&json!("abc"))), "abc");
        assert_eq!(attr_string(Some(&json!(42))), "42");
        assert_eq!(attr_string(Some(&json!(true))), "true");
    }

    #[test]
    fn test_node_project_keeps_only_requested_attrs() {
        let node = Node::new("1", "Person").with_attr("name", "A");
        let part = node.project(&[ATTR_KEY, ATTR_KIND]);

        assert_eq!(part.key(), "1");
        assert_eq!(part.kind(), "Person");
        assert!(part.attr("name").is_none());
    }

    #[test]
    fn test_node_merge_overwrites_and_keeps() {
        let mut node = Node::new("1", "Person").with_attr("name", "A").with_attr("age", 3);
        node.merge_from(&Node::new("1", "Person").with_attr("name", "B"));

        assert_eq!(node.attr("name"), Some(&json!("B")));
        assert_eq!(node.attr("age"), Some(&json!(3)));
    }

    #[test]
    fn test_edge_end_round_trip() {
        let edge = Edge::new("e1", "Knows", &end("a", "friend"), &end("b", "friend"));

        assert_eq!(edge.end(EndSide::End1).unwrap(), end("a", "friend"));
        assert_eq!(edge.end(EndSide::End2).unwrap().key, "b");
    }

    #[test]
    fn test_edge_end_reports_first_missing_attr() {
        let mut data = Map::new();
        data.insert("key".into(), json!("e1"));
        data.insert("kind".into(), json!("Knows"));
        data.insert("end1key".into(), json!("a"));
        let edge = Edge::from_map(data);

        let err = edge.end(EndSide::End1).unwrap_err();
        assert_eq!(
            err,
            GraphError::InvalidData { entity: EntityType::Edge, attr: "end1kind".into() }
        );
    }

    #[test]
    fn test_entity_type_segments() {
        assert_eq!(EntityType::from_segment("n"), Some(EntityType::Node));
        assert_eq!(EntityType::from_segment("e"), Some(EntityType::Edge));
        assert_eq!(EntityType::from_segment("x"), None);
    }
}
