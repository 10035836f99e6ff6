//! Shared application state
//!
//! One `AppState` is built at startup and shared with every request handler.

use crate::api::endpoint::GraphEndpoint;
use crate::core::config::Config;
use crate::graph::GraphManager;

/// Central application state holding the graph endpoint and configuration
pub struct AppState<M: GraphManager> {
    /// Graph endpoint bound to the configured store
    pub graph: GraphEndpoint<M>,

    /// Application configuration
    pub config: Config,
}

// The store sits behind an Arc inside the endpoint, so M need not be Clone.
impl<M: GraphManager> Clone for AppState<M> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.clone(),
            config: self.config.clone(),
        }
    }
}

impl<M: GraphManager> AppState<M> {
    /// Create a new AppState with the given endpoint and configuration
    pub fn new(graph: GraphEndpoint<M>, config: Config) -> Self {
        Self { graph, config }
    }
}
