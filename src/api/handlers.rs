//! HTTP request handlers for the graph API
//!
//! Extract the path, query and body of a request and hand them to the
//! `GraphEndpoint` held in the shared `AppState`.

use axum::{
    extract::{Path, Query, State},
    http::Method,
    response::Json,
};
use bytes::Bytes;
use serde::Serialize;
use serde_json::Map;
use std::{collections::HashMap, sync::Arc};

use crate::api::batch::MutationVerb;
use crate::api::endpoint::GraphResponse;
use crate::api::path::split_segments;
use crate::core::AppState;
use crate::graph::GraphManager;
use crate::types::{ApiError, Result};
use crate::{NAME, VERSION};

/// System health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Current system status
    pub status: String,
    /// Crate version
    pub version: String,
}

/// Kind summary of the graph store
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    /// Service name
    pub name: String,
    /// Crate version
    pub version: String,
    /// Node count per node kind
    pub node_kinds: Map<String, serde_json::Value>,
    /// Edge count per edge kind
    pub edge_kinds: Map<String, serde_json::Value>,
}

/// `GET /graph/{*path}`
pub async fn get_graph<M: GraphManager>(
    State(app_state): State<Arc<AppState<M>>>,
    Path(path): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<GraphResponse> {
    app_state.graph.handle_get(&split_segments(&path), &params).await
}

/// `GET /graph`, always rejected with the usage message
pub async fn get_graph_root<M: GraphManager>(
    State(app_state): State<Arc<AppState<M>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<GraphResponse> {
    app_state.graph.handle_get(&[], &params).await
}

/// `PUT|POST|DELETE /graph/{*path}`
pub async fn mutate_graph<M: GraphManager>(
    State(app_state): State<Arc<AppState<M>>>,
    Path(path): Path<String>,
    method: Method,
    body: Bytes,
) -> Result<GraphResponse> {
    let verb = MutationVerb::from_method(&method)
        .ok_or_else(|| ApiError::invalid_request(format!("Method {} is not supported", method)))?;
    app_state.graph.handle_mutation(verb, &split_segments(&path), &body).await
}

/// `PUT|POST|DELETE /graph`, always rejected with the usage message
pub async fn mutate_graph_root<M: GraphManager>(
    State(app_state): State<Arc<AppState<M>>>,
    method: Method,
    body: Bytes,
) -> Result<GraphResponse> {
    let verb = MutationVerb::from_method(&method)
        .ok_or_else(|| ApiError::invalid_request(format!("Method {} is not supported", method)))?;
    app_state.graph.handle_mutation(verb, &[], &body).await
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: VERSION.to_string(),
    })
}

/// Node and edge kinds known to the store, with their counts
pub async fn system_info<M: GraphManager>(
    State(app_state): State<Arc<AppState<M>>>,
) -> Json<InfoResponse> {
    let manager = app_state.graph.manager();

    let node_kinds = manager
        .node_kinds()
        .into_iter()
        .map(|kind| {
            let count = manager.node_count(&kind);
            (kind, count.into())
        })
        .collect();
    let edge_kinds = manager
        .edge_kinds()
        .into_iter()
        .map(|kind| {
            let count = manager.edge_count(&kind);
            (kind, count.into())
        })
        .collect();

    Json(InfoResponse {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        node_kinds,
        edge_kinds,
    })
}
