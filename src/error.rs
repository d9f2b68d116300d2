use crate::graph::{LinkId, NodeId};
use thiserror::Error;

/// Errors that stop a graph from being compiled into a document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("The graph is empty: add at least one node")]
    EmptyGraph,

    #[error("At least one sensor input node is required")]
    NoSensorInput,

    #[error("Cycle detected: node '{node_id}' depends on its own result")]
    CycleDetected { node_id: NodeId },
}

/// Errors raised by edits to the graph model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node '{0}' not found")]
    NodeNotFound(NodeId),

    #[error("A node with id '{0}' already exists")]
    DuplicateNode(NodeId),

    #[error("Node '{node_id}' has no {direction} port {port} ({available} available)")]
    PortOutOfRange {
        node_id: NodeId,
        port: usize,
        direction: &'static str,
        available: usize,
    },

    #[error("Property '{key}' is not valid for node '{node_id}' of type '{node_type}'")]
    UnknownProperty {
        node_id: NodeId,
        node_type: String,
        key: String,
    },

    #[error("Link '{0}' not found")]
    LinkNotFound(LinkId),
}

/// Errors that can occur when converting an editor export into a [`Graph`](crate::graph::Graph).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphConversionError {
    #[error("Invalid editor data: {0}")]
    ValidationError(String),

    #[error("Failed to parse editor JSON: {0}")]
    JsonParseError(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Errors from saving or loading a compiled document artifact.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Could not access artifact '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization failed: {0}")]
    Encode(String),

    #[error("Deserialization failed: {0}")]
    Decode(String),
}

/// Errors from loading a compiler configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
