//! Document facade over the board and its history.
//!
//! This is the surface the application shell drives. It owns the board,
//! the undo/redo history, and the event bus, and it is the only place
//! commands are built and recorded.
//!
//! The implementation is split into submodules:
//! - `history`: command recording and undo/redo
//! - `entities`: creation, deletion (with cascade), edits, resizing
//! - `drag`: the interactive drag transaction
//! - `layers`: hierarchy navigation with fault recovery
//! - `clipboard`: internal copy/paste
//! - `file_io`: save/load round-trips

mod clipboard;
mod drag;
mod entities;
mod file_io;
mod history;
mod layers;

pub use clipboard::ClipboardContents;

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::history::CommandHistory;
use crate::model::{EntityId, Mirror, Point};
use crate::selection_manager::SelectMode;
use crate::spatial_index::Bounds;
use mindboard_core::constants::{GRID_CELL_SIZE, HISTORY_CAPACITY};
use mindboard_core::event_bus::{AppEvent, EventBus};

/// Per-document tunables, serialized with application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    pub history_capacity: usize,
    pub grid_cell_size: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            history_capacity: HISTORY_CAPACITY,
            grid_cell_size: GRID_CELL_SIZE,
            canvas_width: 1200.0,
            canvas_height: 800.0,
        }
    }
}

/// One open document: board state, history, and side-channel events.
#[derive(Debug, Clone)]
pub struct Document {
    pub board: Board,
    pub(crate) history: CommandHistory,
    pub(crate) events: Arc<EventBus>,
    pub(crate) clipboard: ClipboardContents,
    pub document_name: String,
    pub current_file_path: Option<PathBuf>,
    pub is_modified: bool,
}

impl Document {
    /// Creates an empty document with default configuration.
    pub fn new() -> Self {
        Self::with_config(DocumentConfig::default())
    }

    /// Creates an empty document with custom configuration.
    pub fn with_config(config: DocumentConfig) -> Self {
        let mut board = Board::with_cell_size(config.grid_cell_size);
        board
            .viewport_mut()
            .set_canvas_size(config.canvas_width, config.canvas_height);
        Self {
            board,
            history: CommandHistory::new(config.history_capacity),
            events: Arc::new(EventBus::new()),
            clipboard: ClipboardContents::default(),
            document_name: "Untitled".to_string(),
            current_file_path: None,
            is_modified: false,
        }
    }

    /// Attaches a shared event bus (the shell wires audio/status cues
    /// through this).
    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = events;
        self
    }

    /// The document's event bus.
    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Best-effort event publication; delivery failures are ignored.
    pub(crate) fn emit(&self, event: AppEvent) {
        let _ = self.events.publish(event);
    }

    /// Display name for the title bar, `*`-suffixed when modified.
    pub fn display_name(&self) -> String {
        let name = if let Some(path) = &self.current_file_path {
            path.file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(&self.document_name)
        } else {
            &self.document_name
        };

        if self.is_modified {
            format!("{}*", name)
        } else {
            name.to_string()
        }
    }

    // ---- per-frame queries ------------------------------------------

    /// Every live object intersecting the rectangle, front-to-back.
    pub fn query_visible(&self, rect: &Bounds) -> Vec<Mirror> {
        self.board.query_visible(rect)
    }

    /// Every live object in the current viewport.
    pub fn query_viewport(&self) -> Vec<Mirror> {
        self.board.query_viewport()
    }

    /// Topmost live object under a screen point.
    pub fn object_under_point(&self, screen_x: f64, screen_y: f64) -> Option<Mirror> {
        self.board.object_under_point(screen_x, screen_y)
    }

    // ---- selection --------------------------------------------------

    /// Selects the object under a screen point.
    pub fn select_at(&mut self, screen_x: f64, screen_y: f64, mode: SelectMode) -> Option<EntityId> {
        self.board.select_at(screen_x, screen_y, mode)
    }

    /// Marquee selection over a world rectangle.
    pub fn select_in_rect(&mut self, rect: &Bounds, mode: SelectMode) {
        self.board.select_in_rect(rect, mode);
    }

    pub fn select_all(&mut self) {
        self.board.select_all();
    }

    pub fn deselect_all(&mut self) {
        self.board.deselect_all();
    }

    pub fn selected_count(&self) -> usize {
        self.board.selection.selected_count()
    }

    // ---- coordinate conversion helpers ------------------------------

    /// Converts a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_x: f64, screen_y: f64) -> Point {
        self.board.viewport().pixel_to_world(screen_x, screen_y)
    }

    /// Converts a world point to screen coordinates.
    pub fn world_to_screen(&self, world_x: f64, world_y: f64) -> (f64, f64) {
        self.board.viewport().world_to_pixel(world_x, world_y)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
