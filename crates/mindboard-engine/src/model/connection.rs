use serde::{Deserialize, Serialize};

use super::{EntityData, EntityId, EntityKind, Point};
use crate::spatial_index::Bounds;

/// Half-thickness used when hit-testing the connection line.
pub const LINE_TOLERANCE: f64 = 2.0;

/// Arrowhead style of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArrowStyle {
    #[default]
    Forward,
    Backward,
    Both,
    Plain,
}

/// A directed connection between two entries.
///
/// Endpoints are referenced by identifier; the endpoint anchor positions
/// are cached here and re-derived by the board whenever an endpoint entry
/// moves, so the cache never outlives a drag frame. A connection with
/// `source == target` is rejected at creation and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: EntityId,
    pub parent_id: EntityId,
    pub source: EntityId,
    pub target: EntityId,
    pub style: ArrowStyle,
    /// Cached anchor of the source entry.
    pub source_pos: Point,
    /// Cached anchor of the target entry.
    pub target_pos: Point,
    pub render_key: i64,
    pub deleted: bool,
}

impl Connection {
    pub fn new(
        id: EntityId,
        parent_id: EntityId,
        source: EntityId,
        target: EntityId,
        style: ArrowStyle,
        source_pos: Point,
        target_pos: Point,
    ) -> Self {
        Self {
            id,
            parent_id,
            source,
            target,
            style,
            source_pos,
            target_pos,
            render_key: 0,
            deleted: false,
        }
    }

    /// True if the connection attaches to the given entry on either end.
    pub fn touches(&self, entry: EntityId) -> bool {
        self.source == entry || self.target == entry
    }

    /// Distance from a point to the connection's line segment.
    pub fn distance_to_point(&self, p: &Point) -> f64 {
        let (a, b) = (self.source_pos, self.target_pos);
        let (vx, vy) = (b.x - a.x, b.y - a.y);
        let len_sq = vx * vx + vy * vy;
        if len_sq < f64::EPSILON {
            return a.distance_to(p);
        }
        let t = (((p.x - a.x) * vx + (p.y - a.y) * vy) / len_sq).clamp(0.0, 1.0);
        let proj = Point::new(a.x + t * vx, a.y + t * vy);
        proj.distance_to(p)
    }
}

impl EntityData for Connection {
    const KIND: EntityKind = EntityKind::Connection;

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
        Bounds::new(
            self.source_pos.x.min(self.target_pos.x) - LINE_TOLERANCE,
            self.source_pos.y.min(self.target_pos.y) - LINE_TOLERANCE,
            self.source_pos.x.max(self.target_pos.x) + LINE_TOLERANCE,
            self.source_pos.y.max(self.target_pos.y) + LINE_TOLERANCE,
        )
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.source_pos.x += dx;
        self.source_pos.y += dy;
        self.target_pos.x += dx;
        self.target_pos.y += dy;
    }
}
