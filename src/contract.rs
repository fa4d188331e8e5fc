//! # contract: interfaces for the content repository and host services
//!
//! This module defines the trait seams the workflow depends on, plus the
//! plain data types flowing through them:
//!
//! - [`ContentRepository`]: the remote content-repository REST API the crate
//!   consumes (node CRUD, child listing, directed associations). The protocol
//!   is never defined here; one concrete implementor lives in
//!   [`crate::client`], and tests use the generated mocks.
//! - [`Notifier`] / [`DocumentList`]: host-application services with the
//!   contracts "accept a string, display it" and "invalidate the current
//!   listing".
//!
//! All traits are annotated for `mockall` so consumers can generate
//! deterministic mocks for unit and integration tests.

use async_trait::async_trait;
use mockall::automock;
use serde_json::{Map, Value};

/// A content node as observed through the repository API: either an existing
/// record, a transfer container, or a VEO artifact.
#[derive(Debug, Clone, Default)]
pub struct Node {
    /// Opaque repository identifier.
    pub id: String,
    pub name: String,
    /// Namespaced type tag, e.g. `vers:transfer` or `cm:folder`.
    pub node_type: String,
    pub is_file: bool,
    pub is_folder: bool,
    pub parent_id: Option<String>,
    /// Breadcrumb path name, when the server was asked to include it.
    pub path_name: Option<String>,
    pub aspect_names: Vec<String>,
    /// Namespaced property map; see [`crate::vocabulary`] for the keys.
    pub properties: Map<String, Value>,
}

impl Node {
    pub fn has_aspect(&self, aspect: &str) -> bool {
        self.aspect_names.iter().any(|a| a == aspect)
    }

    /// String-valued property, or `None` when absent or of another type.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    pub fn property_bool(&self, key: &str) -> Option<bool> {
        self.properties.get(key).and_then(Value::as_bool)
    }
}

/// Payload for creating a node (or folder) under a parent.
#[derive(Debug, Clone)]
pub struct NodeBody {
    pub name: String,
    pub node_type: String,
    pub properties: Map<String, Value>,
}

/// Partial update for an existing node. Only the provided fields change;
/// properties are merged server-side.
#[derive(Debug, Clone, Default)]
pub struct NodeUpdate {
    pub name: Option<String>,
    pub properties: Map<String, Value>,
}

/// Payload for creating a directed association from a source node.
#[derive(Debug, Clone)]
pub struct AssociationBody {
    pub target_id: String,
    pub assoc_type: String,
}

/// One entry from an association listing: the peer node plus the association
/// type it was linked with.
#[derive(Debug, Clone)]
pub struct NodeAssociation {
    pub node: Node,
    pub assoc_type: String,
}

/// Error for repository calls. Kept concrete (rather than boxed) so callers
/// can branch on the HTTP status, e.g. to map a 409 to a user-facing
/// "folder already exists" message.
#[derive(Debug, Clone)]
pub enum RepoError {
    /// The server answered with a non-success status.
    Http { status: u16, message: String },
    /// The request never produced a response (connection, TLS, timeout).
    Transport(String),
    /// The response arrived but did not parse into the expected shape.
    InvalidResponse(String),
}

impl RepoError {
    /// True when the server rejected the call as a name conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, RepoError::Http { status: 409, .. })
    }
}

impl std::fmt::Display for RepoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoError::Http { status, message } => {
                write!(f, "repository returned HTTP {status}: {message}")
            }
            RepoError::Transport(message) => write!(f, "transport error: {message}"),
            RepoError::InvalidResponse(message) => {
                write!(f, "unexpected repository response: {message}")
            }
        }
    }
}

impl std::error::Error for RepoError {}

/// The content-repository REST API surface this crate consumes, addressed by
/// opaque node identifiers and hierarchical paths.
///
/// Implemented by [`crate::client::RepoClient`] and by test mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Fetch a single node by identifier (or a well-known alias).
    async fn get_node(&self, node_id: &str) -> Result<Node, RepoError>;

    /// Fetch the node at a hierarchical path resolved against `node_id`
    /// (e.g. the `-root-` alias plus a site path).
    async fn get_node_at_path(
        &self,
        node_id: &str,
        relative_path: &str,
    ) -> Result<Node, RepoError>;

    /// List the direct children of a folder node.
    async fn get_node_children(&self, node_id: &str) -> Result<Vec<Node>, RepoError>;

    /// Create a content node under a parent.
    async fn create_node(&self, parent_id: &str, body: NodeBody) -> Result<Node, RepoError>;

    /// Create a folder-like node under a parent.
    async fn create_folder(&self, parent_id: &str, body: NodeBody) -> Result<Node, RepoError>;

    /// Apply a partial update to an existing node.
    async fn update_node(&self, node_id: &str, update: NodeUpdate) -> Result<Node, RepoError>;

    /// Create a directed association from `source_id` to the body's target.
    async fn create_association(
        &self,
        source_id: &str,
        body: AssociationBody,
    ) -> Result<(), RepoError>;

    /// List nodes that point *at* `target_id` with the given association type.
    async fn list_source_associations(
        &self,
        target_id: &str,
        assoc_type: &str,
    ) -> Result<Vec<NodeAssociation>, RepoError>;

    /// List nodes that `source_id` points at with the given association type.
    async fn list_target_associations(
        &self,
        source_id: &str,
        assoc_type: &str,
    ) -> Result<Vec<NodeAssociation>, RepoError>;
}

/// Host-application notification service: accept a string, display it.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait Notifier: Send + Sync {
    fn show_info(&self, message: &str);
    fn show_warning(&self, message: &str);
    fn show_error(&self, message: &str);
}

/// Host-application listing service: invalidate the current listing so
/// status columns re-render from updated node properties.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait DocumentList: Send + Sync {
    fn reload(&self);
}
