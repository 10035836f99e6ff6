//! Application-wide constants

/// Root of the graph endpoint
pub const GRAPH_ENDPOINT: &str = "/graph";

/// Response header carrying the unfiltered population size of a list
pub const HEADER_TOTAL_COUNT: &str = "x-total-count";

/// Content type of every successful JSON response
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Path segment selecting nodes
pub const SEGMENT_NODES: &str = "n";

/// Path segment selecting edges
pub const SEGMENT_EDGES: &str = "e";

/// Envelope field holding node items
pub const ENVELOPE_NODES: &str = "nodes";

/// Envelope field holding edge items
pub const ENVELOPE_EDGES: &str = "edges";

/// Query parameter capping the number of listed items
pub const PARAM_LIMIT: &str = "limit";

/// Query parameter skipping leading listed items
pub const PARAM_OFFSET: &str = "offset";

// Entity attribute names

/// Key attribute of nodes and edges
pub const ATTR_KEY: &str = "key";
/// Kind attribute of nodes and edges
pub const ATTR_KIND: &str = "kind";

/// Key of the first edge endpoint
pub const ATTR_END1_KEY: &str = "end1key";
/// Kind of the first edge endpoint
pub const ATTR_END1_KIND: &str = "end1kind";
/// Role of the first edge endpoint
pub const ATTR_END1_ROLE: &str = "end1role";
/// Cascading flag of the first edge endpoint
pub const ATTR_END1_CASCADING: &str = "end1cascading";

/// Key of the second edge endpoint
pub const ATTR_END2_KEY: &str = "end2key";
/// Kind of the second edge endpoint
pub const ATTR_END2_KIND: &str = "end2kind";
/// Role of the second edge endpoint
pub const ATTR_END2_ROLE: &str = "end2role";
/// Cascading flag of the second edge endpoint
pub const ATTR_END2_CASCADING: &str = "end2cascading";

/// Default HTTP port, bound on all interfaces
pub const DEFAULT_HTTP_PORT: u16 = 9090;

/// Default request body limit in bytes
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;
