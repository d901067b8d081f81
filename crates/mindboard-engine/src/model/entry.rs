use serde::{Deserialize, Serialize};

use super::{EntityData, EntityId, EntityKind, Point};
use crate::spatial_index::Bounds;

/// Nominal glyph metrics used to derive an entry's box from its text.
///
/// Real text layout lives in the (external) font pipeline; the engine only
/// needs stable, deterministic bounds for indexing and hit-testing, so it
/// sizes entries from fixed per-character metrics.
const CHAR_WIDTH: f64 = 8.4;
const LINE_HEIGHT: f64 = 18.0;
const PADDING: f64 = 6.0;
const MIN_WIDTH: f64 = 40.0;

/// Status mark on an entry, drives its accent color in the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mark {
    #[default]
    None,
    Priority,
    Done,
    Dropped,
}

impl Mark {
    /// Cycles to the next mark in display order.
    pub fn next(self) -> Self {
        match self {
            Mark::None => Mark::Priority,
            Mark::Priority => Mark::Done,
            Mark::Done => Mark::Dropped,
            Mark::Dropped => Mark::None,
        }
    }
}

/// A text entry, the primary object on the board.
///
/// Entries double as containers: any entry is a navigable layer, and other
/// entities claim membership by pointing their `parent_id` at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntityId,
    pub parent_id: EntityId,
    /// Top-left corner of the entry box in world coordinates.
    pub position: Point,
    pub text: String,
    pub mark: Mark,
    pub render_key: i64,
    pub deleted: bool,
}

impl Entry {
    pub fn new(id: EntityId, parent_id: EntityId, position: Point, text: String) -> Self {
        Self {
            id,
            parent_id,
            position,
            text,
            mark: Mark::None,
            render_key: 0,
            deleted: false,
        }
    }

    /// Box size derived from the text content.
    pub fn size(&self) -> (f64, f64) {
        let mut max_chars = 0usize;
        let mut lines = 0usize;
        for line in self.text.lines() {
            max_chars = max_chars.max(line.chars().count());
            lines += 1;
        }
        let lines = lines.max(1);
        let width = (max_chars as f64 * CHAR_WIDTH + 2.0 * PADDING).max(MIN_WIDTH);
        let height = lines as f64 * LINE_HEIGHT + 2.0 * PADDING;
        (width, height)
    }

    /// Anchor point for connections attached to this entry.
    pub fn anchor(&self) -> Point {
        let (w, h) = self.size();
        Point::new(self.position.x + w / 2.0, self.position.y + h / 2.0)
    }
}

impl EntityData for Entry {
    const KIND: EntityKind = EntityKind::Entry;

    fn id(&self) -> EntityId {
        self.id
    }

    fn parent_id(&self) -> EntityId {
        self.parent_id
    }

    fn is_deleted(&self) -> bool {
        self.deleted
    }

    fn set_deleted(&mut self, deleted: bool) {
        self.deleted = deleted;
    }

    fn render_key(&self) -> i64 {
        self.render_key
    }

    fn set_render_key(&mut self, key: i64) {
        self.render_key = key;
    }

    fn bounds(&self) -> Bounds {
        let (w, h) = self.size();
        Bounds::new(
            self.position.x,
            self.position.y,
            self.position.x + w,
            self.position.y + h,
        )
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.position.x += dx;
        self.position.y += dy;
    }
}
