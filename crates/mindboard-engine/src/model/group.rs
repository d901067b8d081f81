use serde::{Deserialize, Serialize};

use super::{EntityData, EntityId, EntityKind, Point};
use crate::spatial_index::Bounds;

/// Smallest box a group can be resized down to.
pub const MIN_GROUP_SIZE: f64 = 20.0;

/// A labeled, user-resizable container box.
///
/// Unlike entries, a group's size is explicit state, not derived from its
/// label text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBox {
    pub id: EntityId,
    pub parent_id: EntityId,
    /// Top-left corner in world coordinates.
    pub position: Point,
    pub label: String,
    pub width: f64,
    pub height: f64,
    pub render_key: i64,
    pub deleted: bool,
}

impl GroupBox {
    pub fn new(
        id: EntityId,
        parent_id: EntityId,
        position: Point,
        label: String,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id,
            parent_id,
            position,
            label,
            width: width.max(MIN_GROUP_SIZE),
            height: height.max(MIN_GROUP_SIZE),
            render_key: 0,
            deleted: false,
        }
    }

    /// Applies a new size, clamped to the minimum.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(MIN_GROUP_SIZE);
        self.height = height.max(MIN_GROUP_SIZE);
    }
}

impl EntityData for GroupBox {
    const KIND: EntityKind = EntityKind::Group;

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
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.position.x += dx;
        self.position.y += dy;
    }
}
