//! Graph data structures and store contracts
//!
//! This module contains the node and edge types exchanged with the store and
//! the traits the request-handling core consumes.

pub mod entity;
pub mod manager;

// Re-export main graph types
pub use entity::{attr_string, Edge, EdgeEnd, EndSide, EntityType, Node};
pub use manager::{GraphManager, GraphTransaction, KeyIterator};
