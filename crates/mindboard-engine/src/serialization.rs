//! Serialization and deserialization of document files.
//!
//! Implements save/load for `.mbd` (Mindboard) document files using JSON
//! with complete board state preservation: the four entity lists, the
//! viewport, and document metadata. The history is never persisted;
//! loading starts a fresh stack.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use crate::model::{Connection, Entry, GroupBox, ImageItem};
use mindboard_core::error::PersistenceError;

/// Document file format version
const FILE_FORMAT_VERSION: &str = "1.0";

/// Complete document file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFile {
    pub version: String,
    pub metadata: DocumentMetadata,
    pub viewport: ViewportState,
    /// Layer displayed when the document was saved.
    #[serde(default)]
    pub active_layer: u64,
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub groups: Vec<GroupBox>,
    #[serde(default)]
    pub images: Vec<ImageItem>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// Document metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub name: String,
    pub id: Uuid,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
}

/// Viewport state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportState {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl DocumentFile {
    /// Creates an empty document file with fresh metadata.
    pub fn new(name: &str) -> Self {
        let now = Utc::now();
        Self {
            version: FILE_FORMAT_VERSION.to_string(),
            metadata: DocumentMetadata {
                name: name.to_string(),
                id: Uuid::new_v4(),
                created: now,
                modified: now,
                author: String::new(),
                description: String::new(),
            },
            viewport: ViewportState {
                zoom: 1.0,
                pan_x: 0.0,
                pan_y: 0.0,
            },
            active_layer: 0,
            entries: Vec::new(),
            groups: Vec::new(),
            images: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Serializes to pretty JSON and writes to disk.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reads and deserializes a document file, rejecting unknown format
    /// versions up front.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let json = std::fs::read_to_string(path)?;
        let file: Self = serde_json::from_str(&json)?;
        if file.version != FILE_FORMAT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: file.version,
                expected: FILE_FORMAT_VERSION.to_string(),
            });
        }
        Ok(file)
    }
}
