//! Traversal spec grammar of the in-memory store
//!
//! A spec has the form `<start role>:<edge kind>:<end role>:<end kind>`.
//! Any component may be left empty to match everything.

use crate::types::GraphError;

/// Parsed traversal spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalSpec {
    start_role: Option<String>,
    edge_kind: Option<String>,
    end_role: Option<String>,
    end_kind: Option<String>,
}

fn component(part: &str) -> Option<String> {
    if part.is_empty() {
        None
    } else {
        Some(part.to_string())
    }
}

fn matches(expected: &Option<String>, actual: &str) -> bool {
    expected.as_deref().map_or(true, |e| e == actual)
}

impl TraversalSpec {
    /// Parse a spec string
    pub fn parse(spec: &str) -> Result<Self, GraphError> {
        let parts: Vec<&str> = spec.split(':').collect();
        if parts.len() != 4 {
            return Err(GraphError::InvalidSpec(spec.to_string()));
        }

        Ok(Self {
            start_role: component(parts[0]),
            edge_kind: component(parts[1]),
            end_role: component(parts[2]),
            end_kind: component(parts[3]),
        })
    }

    /// Does an edge kind qualify
    pub fn matches_edge_kind(&self, kind: &str) -> bool {
        matches(&self.edge_kind, kind)
    }

    /// Does the role of the starting endpoint qualify
    pub fn matches_start_role(&self, role: &str) -> bool {
        matches(&self.start_role, role)
    }

    /// Does the far endpoint qualify
    pub fn matches_end(&self, role: &str, kind: &str) -> bool {
        matches(&self.end_role, role) && matches(&self.end_kind, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_spec() {
        let spec = TraversalSpec::parse("friend:Knows:friend:Person").unwrap();
        assert!(spec.matches_edge_kind("Knows"));
        assert!(!spec.matches_edge_kind("Likes"));
        assert!(spec.matches_start_role("friend"));
        assert!(spec.matches_end("friend", "Person"));
        assert!(!spec.matches_end("friend", "Robot"));
    }

    #[test]
    fn test_empty_components_are_wildcards() {
        let spec = TraversalSpec::parse(":::").unwrap();
        assert!(spec.matches_edge_kind("anything"));
        assert!(spec.matches_start_role("anything"));
        assert!(spec.matches_end("any", "thing"));
    }

    #[test]
    fn test_wrong_arity_is_rejected() {
        assert_eq!(
            TraversalSpec::parse("a:b"),
            Err(GraphError::InvalidSpec("a:b".into()))
        );
        assert!(TraversalSpec::parse("a:b:c:d:e").is_err());
    }
}
