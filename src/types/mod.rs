//! Type definitions shared across the graph API
//!
//! Only the error taxonomy lives here; graph data types are in `crate::graph`.

/// Request and store error types
pub mod error;

pub use error::{ApiError, ConfigError, GraphError, Result};
