//! Event type definitions for the event bus.
//!
//! This module defines the notification events the engine fires on notable
//! transitions. Events are cloneable and serializable for logging/replay;
//! they are best-effort cues and never feed back into model state.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root event enum for all application events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppEvent {
    /// Document lifecycle events
    Document(DocumentEvent),
    /// Entity lifecycle events
    Entity(EntityEvent),
    /// Layer navigation events
    Layer(LayerEvent),
    /// Undo/redo history events
    History(HistoryEvent),
    /// Error and diagnostic events
    Error(ErrorEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Document(_) => EventCategory::Document,
            AppEvent::Entity(_) => EventCategory::Entity,
            AppEvent::Layer(_) => EventCategory::Layer,
            AppEvent::History(_) => EventCategory::History,
            AppEvent::Error(_) => EventCategory::Error,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Document(e) => e.description(),
            AppEvent::Entity(e) => e.description(),
            AppEvent::Layer(e) => e.description(),
            AppEvent::History(e) => e.description(),
            AppEvent::Error(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Document lifecycle events.
    Document,
    /// Entity lifecycle events.
    Entity,
    /// Layer navigation events.
    Layer,
    /// Undo/redo history events.
    History,
    /// Error and diagnostic events.
    Error,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Document => write!(f, "Document"),
            EventCategory::Entity => write!(f, "Entity"),
            EventCategory::Layer => write!(f, "Layer"),
            EventCategory::History => write!(f, "History"),
            EventCategory::Error => write!(f, "Error"),
        }
    }
}

/// Document lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DocumentEvent {
    /// A new empty document was created
    Created,
    /// A document was loaded from disk
    Loaded {
        /// Source path of the document file.
        path: PathBuf,
    },
    /// A document was saved to disk
    Saved {
        /// Destination path of the document file.
        path: PathBuf,
    },
    /// The document was reset after an unrecoverable fault
    Reset,
}

impl DocumentEvent {
    /// Get a short description for logging
    pub fn description(&self) -> String {
        match self {
            DocumentEvent::Created => "Document created".to_string(),
            DocumentEvent::Loaded { path } => format!("Document loaded from {}", path.display()),
            DocumentEvent::Saved { path } => format!("Document saved to {}", path.display()),
            DocumentEvent::Reset => "Document reset".to_string(),
        }
    }
}

/// Entity lifecycle events (audio cue hooks for the shell)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntityEvent {
    /// An entity was created
    Created {
        /// Raw identifier of the entity.
        id: u64,
        /// Kind name, e.g. "entry" or "connection".
        kind: String,
    },
    /// One or more entities were marked deleted
    Deleted {
        /// How many entities the deletion touched.
        count: usize,
    },
    /// One or more entities were restored by undo
    Restored {
        /// How many entities the restore touched.
        count: usize,
    },
    /// A drag transaction committed
    Dropped {
        /// How many entities were dragged.
        count: usize,
    },
    /// A clipboard paste landed
    Pasted {
        /// How many entities were pasted.
        count: usize,
    },
}

impl EntityEvent {
    /// Get a short description for logging
    pub fn description(&self) -> String {
        match self {
            EntityEvent::Created { id, kind } => format!("Created {} {}", kind, id),
            EntityEvent::Deleted { count } => format!("Deleted {} entities", count),
            EntityEvent::Restored { count } => format!("Restored {} entities", count),
            EntityEvent::Dropped { count } => format!("Dropped {} entities", count),
            EntityEvent::Pasted { count } => format!("Pasted {} entities", count),
        }
    }
}

/// Layer navigation events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LayerEvent {
    /// The displayed layer changed
    Switched {
        /// Raw identifier of the previous layer.
        from: u64,
        /// Raw identifier of the new layer.
        to: u64,
    },
    /// A layer load failed and was retried against the root layer
    Retried {
        /// The layer that failed to load.
        failed: u64,
    },
}

impl LayerEvent {
    /// Get a short description for logging
    pub fn description(&self) -> String {
        match self {
            LayerEvent::Switched { from, to } => format!("Layer switch {} -> {}", from, to),
            LayerEvent::Retried { failed } => format!("Layer {} load retried at root", failed),
        }
    }
}

/// Undo/redo history events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HistoryEvent {
    /// An action was recorded
    Recorded {
        /// Display name of the recorded action.
        name: String,
    },
    /// An action was undone
    Undone {
        /// Display name of the undone action.
        name: String,
    },
    /// An action was redone
    Redone {
        /// Display name of the redone action.
        name: String,
    },
    /// The stack was cleared after an integrity fault
    Cleared,
}

impl HistoryEvent {
    /// Get a short description for logging
    pub fn description(&self) -> String {
        match self {
            HistoryEvent::Recorded { name } => format!("Recorded '{}'", name),
            HistoryEvent::Undone { name } => format!("Undid '{}'", name),
            HistoryEvent::Redone { name } => format!("Redid '{}'", name),
            HistoryEvent::Cleared => "History cleared".to_string(),
        }
    }
}

/// Error and diagnostic events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ErrorEvent {
    /// A recoverable fault was contained
    Recovered {
        /// What went wrong.
        message: String,
    },
    /// A fault forced a destructive recovery (stack clear, reset)
    Degraded {
        /// What went wrong.
        message: String,
    },
}

impl ErrorEvent {
    /// Get a short description for logging
    pub fn description(&self) -> String {
        match self {
            ErrorEvent::Recovered { message } => format!("Recovered: {}", message),
            ErrorEvent::Degraded { message } => format!("Degraded: {}", message),
        }
    }
}
