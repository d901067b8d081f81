//! # Mindboard Engine
//!
//! The document/canvas engine behind the Mindboard diagram editor.
//! Thousands of spatial objects (nested entries, group boxes, images,
//! and directed connections) live on an infinite 2D plane organized
//! into navigable hierarchy layers. The engine keeps every mutation
//! reversible and answers, cheaply and every frame, which objects are
//! visible and which object is under the pointer.
//!
//! ## Core Components
//!
//! - **Spatial Index**: grid-bucketed partition for visibility and
//!   hit-test queries
//! - **Command History**: bounded undo/redo with deferred hard-deletion
//! - **Selection**: selection set, render-order promotion, and the drag
//!   transaction
//! - **Entity Stores**: canonical per-kind maps with tombstoning and
//!   live mirrors
//! - **Document**: the facade the application shell drives
//!
//! ## Architecture
//!
//! ```text
//! Document (facade, command recording)
//!   ├── Board (canonical stores + selection + spatial index + viewport)
//!   │     ├── EntityStore<Entry | GroupBox | ImageItem | Connection>
//!   │     ├── SelectionManager (selection, render counter, drag state)
//!   │     ├── SpatialIndex (grid buckets)
//!   │     └── Viewport (camera)
//!   └── CommandHistory (bounded, cleanup on eviction)
//! ```
//!
//! Rendering, text layout, audio, and OS integration are external
//! collaborators; the engine only exposes query results and fires
//! best-effort events at them.

pub mod board;
pub mod commands;
pub mod document;
pub mod entity_store;
pub mod history;
pub mod model;
pub mod selection_manager;
pub mod serialization;
pub mod spatial_index;
pub mod viewport;

// Re-export the primary types from submodules
pub use board::{Board, DragCommit, SavedKey};
pub use commands::Command;
pub use document::{Document, DocumentConfig};
pub use entity_store::{EntityStore, StoredEntity};
pub use history::CommandHistory;
pub use model::{
    ArrowStyle, Connection, EntityData, EntityId, EntityKind, EntitySet, Entry, GroupBox,
    ImageItem, Mark, Mirror, MirrorKind, Point,
};
pub use selection_manager::{DragTarget, SelectMode, SelectionManager};
pub use spatial_index::{Bounds, SpatialIndex, SpatialIndexStats};
pub use viewport::Viewport;
