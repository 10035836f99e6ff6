//! Application factory
//!
//! Builds the `AppState` the server runs with from configuration.

use std::sync::Arc;

use crate::api::endpoint::GraphEndpoint;
use crate::core::app_state::AppState;
use crate::core::config::Config;
use crate::graph::GraphManager;
use crate::log_info;
use crate::storage::MemGraph;

/// Create AppState around an already constructed graph store
pub fn create_app_state_with<M: GraphManager>(manager: Arc<M>, config: Config) -> AppState<M> {
    AppState::new(GraphEndpoint::new(manager), config)
}

/// Create AppState backed by a fresh in-memory graph store
pub fn create_app_state(config: Config) -> AppState<MemGraph> {
    log_info!("Initializing in-memory graph store");
    create_app_state_with(Arc::new(MemGraph::new()), config)
}
