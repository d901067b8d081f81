//! Error handling for Mindboard
//!
//! Provides the error types shared across the workspace:
//! - Document errors (canonical-state consistency, layer navigation)
//! - History errors (undo/redo integrity)
//! - Persistence errors (document file round-trips)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Document error type
///
/// Represents faults in the canonical entity state or in layer
/// navigation. Invalid *requests* (self-connections, mutations naming
/// tombstoned targets) are rejected silently at the call site and never
/// surface as errors.
#[derive(Error, Debug, Clone)]
pub enum DocumentError {
    /// An operation referenced an entity that is not in the canonical map
    #[error("Unknown entity {id}")]
    UnknownEntity {
        /// The raw identifier that failed to resolve.
        id: u64,
    },

    /// A connection referenced an endpoint that is missing or purged
    #[error("Connection {id} references missing endpoint {endpoint}")]
    DanglingEndpoint {
        /// The connection's identifier.
        id: u64,
        /// The endpoint identifier that failed to resolve.
        endpoint: u64,
    },

    /// A layer load found a parent reference that resolves to nothing
    #[error("Layer {layer} is unreachable: {reason}")]
    LayerLoad {
        /// The layer that failed to load.
        layer: u64,
        /// Why the load failed.
        reason: String,
    },

    /// The document had to be reset after a layer load failed twice
    #[error("Document reset after unrecoverable layer load failure on layer {layer}")]
    Reset {
        /// The layer whose load triggered the reset.
        layer: u64,
    },
}

/// History error type
///
/// Raised from inside command apply/undo arms when the canonical state no
/// longer matches what the command recorded. Caught at the history
/// boundary, logged, and resolved by clearing the whole stack.
#[derive(Error, Debug, Clone)]
pub enum HistoryError {
    /// An undo/redo arm referenced an entity purged out of order
    #[error("History references purged entity {id}")]
    PurgedEntity {
        /// The identifier the command could not resolve.
        id: u64,
    },

    /// A command was replayed against a state it does not match
    #[error("Command state mismatch: {detail}")]
    StateMismatch {
        /// A description of the mismatch.
        detail: String,
    },
}

/// Persistence error type
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The file's format version is not supported
    #[error("Unsupported document version {found}, expected {expected}")]
    UnsupportedVersion {
        /// The version string found in the file.
        found: String,
        /// The version string this build writes.
        expected: String,
    },

    /// JSON (de)serialization failed
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Underlying file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level error enum wrapping all workspace error kinds
#[derive(Error, Debug)]
pub enum Error {
    /// Document-level fault.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// History integrity fault.
    #[error(transparent)]
    History(#[from] HistoryError),

    /// Persistence fault.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Convenience result alias used throughout the workspace
pub type Result<T> = std::result::Result<T, Error>;
