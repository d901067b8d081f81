//! Save/load operations for the document.

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::warn;

use super::Document;
use crate::model::{EntityData, EntityId};
use crate::serialization::{DocumentFile, ViewportState};
use mindboard_core::event_bus::{AppEvent, DocumentEvent};

impl Document {
    /// Builds the persistable form of the document: the four entity
    /// lists (tombstoned entities are pending-purge history state and do
    /// not persist), viewport, and metadata.
    pub fn to_file(&self) -> DocumentFile {
        let mut file = DocumentFile::new(&self.document_name);
        file.metadata.modified = Utc::now();
        file.viewport = ViewportState {
            zoom: self.board.viewport().zoom(),
            pan_x: self.board.viewport().pan_x(),
            pan_y: self.board.viewport().pan_y(),
        };
        file.active_layer = self.board.active_layer().raw();
        file.entries = self
            .board
            .entries
            .iter()
            .filter(|e| !e.data.is_deleted())
            .map(|e| e.data.clone())
            .collect();
        file.groups = self
            .board
            .groups
            .iter()
            .filter(|e| !e.data.is_deleted())
            .map(|e| e.data.clone())
            .collect();
        file.images = self
            .board
            .images
            .iter()
            .filter(|e| !e.data.is_deleted())
            .map(|e| e.data.clone())
            .collect();
        file.connections = self
            .board
            .connections
            .iter()
            .filter(|e| !e.data.is_deleted())
            .map(|e| e.data.clone())
            .collect();
        file
    }

    /// Saves the document to a file.
    pub fn save_to_file(&mut self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let file = self.to_file();
        file.save_to_file(&path)
            .with_context(|| format!("saving document to {}", path.as_ref().display()))?;

        self.current_file_path = Some(path.as_ref().to_path_buf());
        self.is_modified = false;
        self.emit(AppEvent::Document(DocumentEvent::Saved {
            path: path.as_ref().to_path_buf(),
        }));
        Ok(())
    }

    /// Rehydrates the canonical maps from a parsed document file and
    /// loads the saved layer (falling back to the root when the saved
    /// layer will not load).
    pub fn load_file(&mut self, file: DocumentFile) {
        self.clear_history(false);
        self.board.clear();

        self.board.viewport_mut().set_zoom(file.viewport.zoom);
        self.board
            .viewport_mut()
            .set_pan(file.viewport.pan_x, file.viewport.pan_y);

        for data in file.entries {
            self.board.reserve_id(data.id());
            self.board.entries.insert(data);
        }
        for data in file.groups {
            self.board.reserve_id(data.id());
            self.board.groups.insert(data);
        }
        for data in file.images {
            self.board.reserve_id(data.id());
            self.board.images.insert(data);
        }
        for data in file.connections {
            self.board.reserve_id(data.id());
            self.board.connections.insert(data);
        }

        let saved_layer = EntityId(file.active_layer);
        if self.board.load_layer(saved_layer).is_err() {
            warn!("saved layer {saved_layer} failed to load, falling back to root");
            if self.board.load_layer(EntityId::ROOT).is_err() {
                self.reset();
                return;
            }
        }

        self.document_name = file.metadata.name;
        self.is_modified = false;
    }

    /// Loads a document from a file.
    pub fn load_from_file(&mut self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let file = DocumentFile::load_from_file(&path)
            .with_context(|| format!("loading document from {}", path.as_ref().display()))?;

        self.load_file(file);
        self.current_file_path = Some(path.as_ref().to_path_buf());
        self.emit(AppEvent::Document(DocumentEvent::Loaded {
            path: path.as_ref().to_path_buf(),
        }));
        Ok(())
    }

    /// Starts a new empty document in place.
    pub fn new_document(&mut self) {
        self.clear_history(true);
        self.board.clear();
        self.clipboard = Default::default();
        self.current_file_path = None;
        self.is_modified = false;
        self.document_name = "Untitled".to_string();
        self.emit(AppEvent::Document(DocumentEvent::Created));
    }
}
