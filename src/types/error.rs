//! Error types and handling for the graph API
//!
//! Two layers of errors live here. `GraphError` is what the graph store
//! collaborator reports; `ApiError` is the request-level taxonomy the
//! handlers produce and the HTTP layer renders as a single-line plain-text
//! response.

use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::graph::EntityType;
use crate::{log_error, log_warn};

/// Result type used by the request-handling core
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors raised by a graph store or one of its transactions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Partition name is not usable
    #[error("Invalid partition name: {0}")]
    InvalidPartition(String),

    /// Entity is missing a required attribute or carries an unusable value
    #[error("{entity} is missing or has an invalid {attr} value")]
    InvalidData {
        /// Which entity type was rejected
        entity: EntityType,
        /// Offending attribute name
        attr: String,
    },

    /// Edge endpoint could not be resolved at commit time
    #[error("Can't find edge endpoint: {key} ({kind})")]
    MissingEndpoint {
        /// Endpoint node key
        key: String,
        /// Endpoint node kind
        kind: String,
    },

    /// Traversal spec could not be interpreted
    #[error("Invalid spec: {0}")]
    InvalidSpec(String),

    /// Any other storage fault
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Request-level error taxonomy
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Bad path shape or query parameter
    #[error("{0}")]
    InvalidRequest(String),

    /// Request body could not be decoded
    #[error("{0}")]
    MalformedBody(String),

    /// A mutation item was rejected while staging the transaction
    #[error("Could not apply {entity} #{position} (key: {key}, kind: {kind}): {reason}")]
    BadItem {
        /// Whether the item was a node or an edge
        entity: EntityType,
        /// 1-based position within its list
        position: usize,
        /// Kind attribute of the item (empty if absent)
        kind: String,
        /// Key attribute of the item (empty if absent)
        key: String,
        /// Store-side reason
        reason: GraphError,
    },

    /// Lookup miss (reported as a client error)
    #[error("{0}")]
    NotFound(String),

    /// Iterator or fetch fault while reading from the store
    #[error("{0}")]
    FetchFailure(GraphError),

    /// Offset skipped past the end of the population
    #[error("Offset exceeds available nodes")]
    OffsetOutOfRange {
        /// Requested offset
        offset: usize,
        /// Number of items that were available to skip
        available: usize,
    },

    /// Transaction commit failed
    #[error("{0}")]
    CommitFailure(GraphError),
}

impl ApiError {
    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a malformed body error
    pub fn malformed_body(msg: impl Into<String>) -> Self {
        Self::MalformedBody(msg.into())
    }

    /// Create a lookup miss error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// HTTP status this error is reported with
    pub fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Check if this is a client error (4xx equivalent)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidRequest(_)
                | ApiError::MalformedBody(_)
                | ApiError::BadItem { .. }
                | ApiError::NotFound(_)
        )
    }

    /// Check if this is a server error (5xx equivalent)
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }
}

impl From<GraphError> for ApiError {
    fn from(err: GraphError) -> Self {
        ApiError::FetchFailure(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_client_error() {
            log_warn!("Rejected graph request ({}): {}", status, message);
        } else {
            log_error!("Graph request failed ({}): {}", status, message);
        }

        (
            status,
            [(CONTENT_TYPE, "text/plain; charset=utf-8")],
            message,
        )
            .into_response()
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Cannot read config file {path}: {source}")]
    Read {
        /// Path that was read
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Config file is not valid TOML for `Config`
    #[error("Cannot parse config file {path}: {source}")]
    Parse {
        /// Path that was parsed
        path: String,
        /// Underlying TOML error
        source: toml::de::Error,
    },

    /// A CLI or config value is unusable
    #[error("Invalid configuration value: {0}")]
    Invalid(String),
}
