//! Path resolution for the graph endpoint
//!
//! Turns the segments following `/graph/` into a `RequestShape`. The number
//! of segments decides the shape:
//!
//! | Segments | Shape |
//! |---|---|
//! | `{partition}` | `Partition` |
//! | `{partition}/{n\|e}` | `EntityList` |
//! | `{partition}/{n\|e}/{kind}` | `KindList` |
//! | `{partition}/{n\|e}/{kind}/{key}` | `Entity` |
//! | `{partition}/n/{kind}/{key}/{spec}` | `Traversal` |

use crate::graph::EntityType;
use crate::types::{ApiError, Result};

/// Allowed segment counts of one endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathBounds {
    min: usize,
    max: usize,
    usage: &'static str,
}

impl PathBounds {
    /// Bounds of GET requests
    pub const READ: PathBounds = PathBounds {
        min: 2,
        max: 5,
        usage: "Need a partition, entity type (n or e) and a kind; optional key and traversal spec",
    };

    /// Bounds of PUT, POST and DELETE requests
    pub const WRITE: PathBounds = PathBounds {
        min: 1,
        max: 2,
        usage: "Need a partition; optional entity type (n or e)",
    };

    /// Message returned for out-of-bounds paths
    pub fn usage(&self) -> &'static str {
        self.usage
    }
}

/// Validated shape of a graph request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestShape {
    /// The whole partition
    Partition {
        /// Partition name
        partition: String,
    },
    /// Every entity of one type
    EntityList {
        /// Partition name
        partition: String,
        /// Nodes or edges
        entity: EntityType,
    },
    /// Every entity of one kind
    KindList {
        /// Partition name
        partition: String,
        /// Nodes or edges
        entity: EntityType,
        /// Entity kind
        kind: String,
    },
    /// A single entity
    Entity {
        /// Partition name
        partition: String,
        /// Nodes or edges
        entity: EntityType,
        /// Entity kind
        kind: String,
        /// Entity key
        key: String,
    },
    /// A traversal starting at a single node
    Traversal {
        /// Partition name
        partition: String,
        /// Kind of the start node
        kind: String,
        /// Key of the start node
        key: String,
        /// Traversal spec handed to the store
        spec: String,
    },
}

impl RequestShape {
    /// Partition addressed by this request
    pub fn partition(&self) -> &str {
        match self {
            RequestShape::Partition { partition }
            | RequestShape::EntityList { partition, .. }
            | RequestShape::KindList { partition, .. }
            | RequestShape::Entity { partition, .. }
            | RequestShape::Traversal { partition, .. } => partition,
        }
    }
}

/// Split a raw wildcard path into segments, dropping empty ones
pub fn split_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve path segments into a request shape
pub fn resolve(segments: &[String], bounds: PathBounds) -> Result<RequestShape> {
    if segments.len() < bounds.min || segments.len() > bounds.max {
        return Err(ApiError::invalid_request(bounds.usage));
    }

    let partition = segments[0].clone();
    if segments.len() == 1 {
        return Ok(RequestShape::Partition { partition });
    }

    let entity = EntityType::from_segment(&segments[1])
        .ok_or_else(|| ApiError::invalid_request("Entity type must be n (nodes) or e (edges)"))?;

    let shape = match segments {
        [_, _] => RequestShape::EntityList { partition, entity },
        [_, _, kind] => RequestShape::KindList { partition, entity, kind: kind.clone() },
        [_, _, kind, key] => RequestShape::Entity {
            partition,
            entity,
            kind: kind.clone(),
            key: key.clone(),
        },
        [_, _, kind, key, spec] => {
            if entity != EntityType::Node {
                return Err(ApiError::invalid_request(
                    "Entity type must be n (nodes) when requesting traversal results",
                ));
            }
            RequestShape::Traversal {
                partition,
                kind: kind.clone(),
                key: key.clone(),
                spec: spec.clone(),
            }
        }
        _ => return Err(ApiError::invalid_request(bounds.usage)),
    };

    Ok(shape)
}
