//! Error types for infragraph operations.
//!
//! All fallible operations return [`Result<T>`] with context-rich error messages.
//! Construction errors reject the whole snapshot; there is nothing to retry
//! inside the core.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for infragraph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Comprehensive error type for all graph operations.
#[derive(Error, Debug)]
pub enum GraphError {
    /// A node with the same id was already added to the graph
    #[error("Duplicate node id: {node_id}")]
    DuplicateId {
        /// The offending id
        node_id: String,
    },

    /// An edge endpoint or a `parent` refers to a node that does not exist
    #[error("Dangling reference from {from} to missing node {to}")]
    DanglingReference {
        /// Referring entity (edge endpoint pair or child node id)
        from: String,
        /// The id that could not be resolved
        to: String,
    },

    /// Internal invariant violated after classification.
    ///
    /// This indicates a bug in the crate, never bad input.
    #[error("Inconsistent graph state: {message}")]
    InconsistentState {
        /// What was found to be inconsistent
        message: String,
    },

    /// Node not found in the graph
    #[error("Node not found: {node_id}")]
    NodeNotFound {
        /// ID of the missing node
        node_id: String,
    },

    /// Edge weight is negative or not a finite number
    #[error("Invalid weight {weight} on edge {source_id} -> {target_id}")]
    InvalidWeight {
        /// Source node id
        source_id: String,
        /// Target node id
        target_id: String,
        /// The rejected weight
        weight: f64,
    },

    /// Invalid operation (e.g., a cycle in the grouping tree)
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Description of what went wrong
        message: String,
    },

    /// Classifier configuration rejected
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Which setting is wrong and why
        message: String,
    },

    /// Malformed CSV inventory input
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number in the input
        line: usize,
        /// Error details
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error details
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// File access error
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File that could not be read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl GraphError {
    /// Create a serialization error from a message and optional source.
    pub fn serialization<E>(message: impl Into<String>, source: Option<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Serialization {
            message: message.into(),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }

    /// Create an I/O error for the given path.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create an internal consistency error.
    pub fn inconsistent(message: impl Into<String>) -> Self {
        Self::InconsistentState {
            message: message.into(),
        }
    }

    /// Whether this error was caused by the input snapshot rather than a bug.
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateId { .. }
                | Self::DanglingReference { .. }
                | Self::InvalidWeight { .. }
                | Self::Parse { .. }
        )
    }
}
