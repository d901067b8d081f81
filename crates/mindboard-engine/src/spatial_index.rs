//! Grid-bucketed spatial index for the board.
//!
//! Partitions the infinite plane into fixed-size square cells; every
//! indexed object is referenced from each cell its bounds overlap, so
//! insertion and removal cost is proportional to the cells touched, never
//! to the total object count. Queries walk the cells overlapping the
//! request rectangle, filter candidates against their exact bounds, and
//! deduplicate objects that span several cells.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::model::EntityId;
use mindboard_core::constants::GRID_CELL_SIZE;

/// Axis-aligned bounding box in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Creates a new bounding box. Callers pass ordered coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Builds an ordered box from two arbitrary corner points.
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2))
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Inclusive point containment.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Overlap test; boxes sharing only an edge still count as touching.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Smallest box covering both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Box grown by a margin on every edge.
    pub fn expanded(&self, margin: f64) -> Bounds {
        Bounds::new(
            self.min_x - margin,
            self.min_y - margin,
            self.max_x + margin,
            self.max_y + margin,
        )
    }
}

/// Integer grid coordinate of a cell.
type CellCoord = (i64, i64);

/// Diagnostic counters for the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpatialIndexStats {
    /// Distinct objects currently indexed.
    pub total_items: usize,
    /// Non-empty grid cells.
    pub occupied_cells: usize,
    /// Largest bucket size.
    pub max_bucket: usize,
}

/// Grid-bucketed spatial index over entity identifiers.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    cell_size: f64,
    cells: HashMap<CellCoord, SmallVec<[EntityId; 4]>>,
    /// Exact bounds of every indexed object, used for precise query
    /// filtering. An id is present here iff it is present in `cells`.
    items: HashMap<EntityId, Bounds>,
}

impl SpatialIndex {
    /// Creates an index with the default cell size.
    pub fn new() -> Self {
        Self::with_cell_size(GRID_CELL_SIZE)
    }

    /// Creates an index with a custom cell size.
    pub fn with_cell_size(cell_size: f64) -> Self {
        debug_assert!(
            cell_size.is_finite() && cell_size > 0.0,
            "cell_size must be positive and finite, got {cell_size}"
        );
        Self {
            cell_size,
            cells: HashMap::new(),
            items: HashMap::new(),
        }
    }

    /// Number of distinct objects in the index.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True if the object is currently indexed.
    pub fn contains(&self, id: EntityId) -> bool {
        self.items.contains_key(&id)
    }

    /// Exact bounds the object was inserted under, if indexed.
    pub fn bounds_of(&self, id: EntityId) -> Option<&Bounds> {
        self.items.get(&id)
    }

    /// Inserts an object into every cell its bounds overlap.
    ///
    /// Re-indexing a moved object is remove-then-insert; callers own that
    /// pairing around any position or size mutation.
    pub fn insert(&mut self, id: EntityId, bounds: &Bounds) {
        debug_assert!(
            !self.items.contains_key(&id),
            "duplicate insert for {id}; remove first"
        );
        for coord in Self::cell_range(self.cell_size, bounds) {
            self.cells.entry(coord).or_default().push(id);
        }
        self.items.insert(id, *bounds);
    }

    /// Removes an object, scanning only the cells its bounds overlap.
    ///
    /// The bounds must be the ones the object was inserted under. Empty
    /// buckets are pruned so a long-lived index does not accumulate dead
    /// cells as content drifts across the plane.
    pub fn remove(&mut self, id: EntityId, bounds: &Bounds) -> bool {
        if self.items.remove(&id).is_none() {
            return false;
        }
        for coord in Self::cell_range(self.cell_size, bounds) {
            if let Some(bucket) = self.cells.get_mut(&coord) {
                bucket.retain(|other| *other != id);
                if bucket.is_empty() {
                    self.cells.remove(&coord);
                }
            }
        }
        true
    }

    /// Lazily yields every indexed object intersecting `rect`, each
    /// exactly once.
    pub fn query_iter<'a>(&'a self, rect: &Bounds) -> QueryIter<'a> {
        QueryIter::new(self, *rect)
    }

    /// Collected form of [`query_iter`](Self::query_iter).
    pub fn query(&self, rect: &Bounds) -> Vec<EntityId> {
        self.query_iter(rect).collect()
    }

    /// Objects whose bounds contain the given point.
    pub fn query_point(&self, x: f64, y: f64) -> Vec<EntityId> {
        self.query_iter(&Bounds::new(x, y, x, y)).collect()
    }

    /// Empties the grid and drops all indexed objects.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.items.clear();
    }

    /// Diagnostic counters.
    pub fn stats(&self) -> SpatialIndexStats {
        SpatialIndexStats {
            total_items: self.items.len(),
            occupied_cells: self.cells.len(),
            max_bucket: self.cells.values().map(SmallVec::len).max().unwrap_or(0),
        }
    }

    /// Grid coordinates of every cell the bounds overlap.
    fn cell_range(cell_size: f64, bounds: &Bounds) -> impl Iterator<Item = CellCoord> {
        let x0 = (bounds.min_x / cell_size).floor() as i64;
        let x1 = (bounds.max_x / cell_size).floor() as i64;
        let y0 = (bounds.min_y / cell_size).floor() as i64;
        let y1 = (bounds.max_y / cell_size).floor() as i64;
        (x0..=x1).flat_map(move |cx| (y0..=y1).map(move |cy| (cx, cy)))
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy, finite, non-restartable query sequence over the index.
///
/// Holds a shared borrow of the index, so the index can not be mutated
/// while a query is in flight; collect the results first when mutation
/// must follow.
pub struct QueryIter<'a> {
    index: &'a SpatialIndex,
    rect: Bounds,
    coords: Vec<CellCoord>,
    cell_idx: usize,
    bucket_idx: usize,
    seen: HashSet<EntityId>,
}

impl<'a> QueryIter<'a> {
    fn new(index: &'a SpatialIndex, rect: Bounds) -> Self {
        // Only materialize coordinates for cells that actually exist; a
        // huge query rectangle over a sparse board stays cheap.
        let coords: Vec<CellCoord> = SpatialIndex::cell_range(index.cell_size, &rect)
            .filter(|coord| index.cells.contains_key(coord))
            .collect();
        Self {
            index,
            rect,
            coords,
            cell_idx: 0,
            bucket_idx: 0,
            seen: HashSet::new(),
        }
    }
}

impl Iterator for QueryIter<'_> {
    type Item = EntityId;

    fn next(&mut self) -> Option<EntityId> {
        while self.cell_idx < self.coords.len() {
            let coord = self.coords[self.cell_idx];
            let bucket = match self.index.cells.get(&coord) {
                Some(bucket) => bucket,
                None => {
                    self.cell_idx += 1;
                    self.bucket_idx = 0;
                    continue;
                }
            };
            while self.bucket_idx < bucket.len() {
                let id = bucket[self.bucket_idx];
                self.bucket_idx += 1;
                if !self.seen.insert(id) {
                    continue;
                }
                if let Some(bounds) = self.index.items.get(&id) {
                    if bounds.intersects(&self.rect) {
                        return Some(id);
                    }
                }
            }
            self.cell_idx += 1;
            self.bucket_idx = 0;
        }
        None
    }
}
