//! Engine-wide tunables.
//!
//! Central place for the numeric defaults the engine components share.
//! Per-document overrides go through `DocumentConfig` in the engine crate.

/// Side length of a spatial-index grid cell, in world units.
///
/// Chosen to hold a handful of typical entries per bucket; objects larger
/// than a cell simply occupy several buckets.
pub const GRID_CELL_SIZE: f64 = 256.0;

/// Maximum number of entries retained on the undo/redo stack.
///
/// Evicting the oldest entry is also what permanently purges the
/// tombstoned entities that entry still references.
pub const HISTORY_CAPACITY: usize = 50;

/// Zoom clamp range for the viewport.
pub const MIN_ZOOM: f64 = 0.1;
/// Zoom clamp range for the viewport.
pub const MAX_ZOOM: f64 = 50.0;

/// Per-edge padding, in pixels, used when fitting content to the view.
pub const VIEW_PADDING: f64 = 20.0;

/// Hit-test tolerance in screen pixels (divided by zoom for world units).
pub const HIT_TOLERANCE: f64 = 3.0;
