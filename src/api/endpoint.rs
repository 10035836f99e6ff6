//! Request handling core of the graph endpoint
//!
//! `GraphEndpoint` turns resolved path segments, query parameters and request
//! bodies into calls against an injected `GraphManager`. It knows nothing
//! about axum extractors; the handlers in `api::handlers` feed it.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};

use crate::api::batch::{MutationVerb, TransactionBatch};
use crate::api::codec::{
    decode_mutation_body, encode_entity, encode_list, encode_traversal, MutationTarget,
};
use crate::api::pagination::{PageCursor, PaginationWindow};
use crate::api::path::{resolve, PathBounds, RequestShape};
use crate::api::traversal::merge_traversal;
use crate::constants::{ATTR_KEY, ATTR_KIND, HEADER_TOTAL_COUNT, JSON_CONTENT_TYPE};
use crate::graph::{EntityType, GraphManager, Node};
use crate::types::{ApiError, GraphError, Result};
use crate::{log_debug, log_trace};

/// Successful outcome of a graph request
#[derive(Debug, Clone, PartialEq)]
pub enum GraphResponse {
    /// JSON document, with the list population if the request was a list
    Json {
        /// Response document
        body: Value,
        /// Value of the `X-Total-Count` header
        total_count: Option<u64>,
    },
    /// Mutation applied; empty body
    Empty,
}

impl GraphResponse {
    fn json(body: Value) -> Self {
        GraphResponse::Json { body, total_count: None }
    }

    fn list(rows: Vec<Map<String, Value>>, total: u64) -> Self {
        GraphResponse::Json { body: encode_list(rows), total_count: Some(total) }
    }
}

impl IntoResponse for GraphResponse {
    fn into_response(self) -> Response {
        match self {
            GraphResponse::Json { body, total_count } => {
                let headers = [(CONTENT_TYPE, JSON_CONTENT_TYPE)];
                let mut response = (StatusCode::OK, headers, body.to_string()).into_response();
                if let Some(total) = total_count {
                    response.headers_mut().insert(
                        HeaderName::from_static(HEADER_TOTAL_COUNT),
                        HeaderValue::from(total),
                    );
                }
                response
            }
            GraphResponse::Empty => StatusCode::OK.into_response(),
        }
    }
}

/// Graph endpoint bound to one graph store
pub struct GraphEndpoint<M: GraphManager> {
    manager: Arc<M>,
}

impl<M: GraphManager> Clone for GraphEndpoint<M> {
    fn clone(&self) -> Self {
        Self { manager: self.manager.clone() }
    }
}

impl<M: GraphManager> GraphEndpoint<M> {
    /// Create an endpoint reading and writing through `manager`
    pub fn new(manager: Arc<M>) -> Self {
        Self { manager }
    }

    /// The injected graph store
    pub fn manager(&self) -> &Arc<M> {
        &self.manager
    }

    /// Handle a GET request
    pub async fn handle_get(
        &self,
        segments: &[String],
        query: &HashMap<String, String>,
    ) -> Result<GraphResponse> {
        let shape = resolve(segments, PathBounds::READ)?;
        log_debug!("GET {:?}", shape);

        match shape {
            RequestShape::Partition { .. } => {
                Err(ApiError::invalid_request(PathBounds::READ.usage()))
            }
            RequestShape::EntityList { partition, entity: EntityType::Node } => {
                let window = PaginationWindow::from_query(query)?;
                self.list_partition(&partition, window).await
            }
            RequestShape::KindList { partition, entity: EntityType::Node, kind } => {
                let window = PaginationWindow::from_query(query)?;
                self.list_kind(&partition, &kind, window).await
            }
            RequestShape::EntityList { entity: EntityType::Edge, .. }
            | RequestShape::KindList { entity: EntityType::Edge, .. } => {
                Err(ApiError::invalid_request(
                    "Entity type must be n (nodes) when requesting all items",
                ))
            }
            RequestShape::Entity { partition, entity, kind, key } => {
                self.fetch_entity(&partition, entity, &kind, &key)
            }
            RequestShape::Traversal { partition, kind, key, spec } => {
                self.traverse(&partition, &kind, &key, &spec)
            }
        }
    }

    /// Handle a PUT, POST or DELETE request
    pub async fn handle_mutation(
        &self,
        verb: MutationVerb,
        segments: &[String],
        body: &[u8],
    ) -> Result<GraphResponse> {
        let shape = resolve(segments, PathBounds::WRITE)?;

        let (partition, target) = match shape {
            RequestShape::Partition { partition } => (partition, MutationTarget::Graph),
            RequestShape::EntityList { partition, entity } => {
                (partition, MutationTarget::Entities(entity))
            }
            _ => return Err(ApiError::invalid_request(PathBounds::WRITE.usage())),
        };

        let decoded = decode_mutation_body(body, target)?;
        log_debug!("{:?} of {} items on partition {}", verb, decoded.len(), partition);

        TransactionBatch::new(partition, verb, decoded).apply(self.manager.begin_transaction())?;
        Ok(GraphResponse::Empty)
    }

    /// Nodes of every kind in a partition, kinds in ascending order
    async fn list_partition(
        &self,
        partition: &str,
        window: PaginationWindow,
    ) -> Result<GraphResponse> {
        let kinds = self.manager.node_kinds();
        let total: u64 = kinds.iter().map(|kind| self.manager.node_count(kind)).sum();

        let mut sources = Vec::new();
        for kind in kinds {
            if let Some(keys) = self.manager.node_key_iterator(partition, &kind)? {
                sources.push((kind, keys));
            }
        }
        if sources.is_empty() {
            return Err(ApiError::not_found("Unknown partition"));
        }

        let refs = sources
            .into_iter()
            .flat_map(|(kind, keys)| keys.map(move |key| key.map(|key| (kind.clone(), key))));

        let manager = &self.manager;
        let fetch = |(kind, key): (String, String)| {
            fetch_listed(manager.as_ref(), partition, &kind, &key)
        };

        let rows = collect_rows(PageCursor::open(refs, fetch, window)?).await?;
        Ok(GraphResponse::list(rows, total))
    }

    /// Nodes of one kind in a partition, in store order
    async fn list_kind(
        &self,
        partition: &str,
        kind: &str,
        window: PaginationWindow,
    ) -> Result<GraphResponse> {
        let keys = self
            .manager
            .node_key_iterator(partition, kind)?
            .ok_or_else(|| ApiError::not_found("Unknown partition or node kind"))?;
        let total = self.manager.node_count(kind);

        let manager = &self.manager;
        let fetch = |key: String| fetch_listed(manager.as_ref(), partition, kind, &key);

        let rows = collect_rows(PageCursor::open(keys, fetch, window)?).await?;
        Ok(GraphResponse::list(rows, total))
    }

    fn fetch_entity(
        &self,
        partition: &str,
        entity: EntityType,
        kind: &str,
        key: &str,
    ) -> Result<GraphResponse> {
        let data = match entity {
            EntityType::Node => self
                .manager
                .fetch_node(partition, key, kind)?
                .ok_or_else(|| ApiError::not_found("Unknown partition or node kind"))?
                .into_data(),
            EntityType::Edge => self
                .manager
                .fetch_edge(partition, key, kind)?
                .ok_or_else(|| ApiError::not_found("Unknown partition or edge kind"))?
                .into_data(),
        };

        Ok(GraphResponse::json(encode_entity(data)))
    }

    fn traverse(
        &self,
        partition: &str,
        kind: &str,
        key: &str,
        spec: &str,
    ) -> Result<GraphResponse> {
        self.manager
            .fetch_node_part(partition, key, kind, &[ATTR_KEY, ATTR_KIND])?
            .ok_or_else(|| ApiError::not_found("Unknown partition or node kind"))?;

        let (nodes, edges) = self.manager.traverse_multi(partition, key, kind, spec, true)?;
        log_trace!("Traversal {} from {} ({}) reached {} nodes", spec, key, kind, nodes.len());

        let (nodes, edges) = merge_traversal(nodes, edges)?;
        Ok(GraphResponse::json(encode_traversal(nodes, edges)))
    }
}

/// Fetch a node whose key was just produced by the store's iterator
fn fetch_listed<M: GraphManager>(
    manager: &M,
    partition: &str,
    kind: &str,
    key: &str,
) -> Result<Map<String, Value>> {
    manager
        .fetch_node(partition, key, kind)?
        .map(Node::into_data)
        .ok_or_else(|| {
            ApiError::FetchFailure(GraphError::Storage(format!(
                "Node {} ({}) disappeared while listing",
                key, kind
            )))
        })
}

/// Drain a page, yielding to the runtime between rows
async fn collect_rows<I, T>(rows: I) -> Result<Vec<T>>
where
    I: Iterator<Item = Result<T>>,
{
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
        tokio::task::yield_now().await;
    }
    Ok(out)
}
