use serde::{Deserialize, Serialize};

use super::{EntityData, EntityId, EntityKind, Point};
use crate::spatial_index::Bounds;

/// A free-floating image placed on the board.
///
/// The engine tracks placement and dimensions only; decoding and texture
/// upload happen in the (external) rendering pipeline, keyed by
/// `source_path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageItem {
    pub id: EntityId,
    pub parent_id: EntityId,
    /// Top-left corner in world coordinates.
    pub position: Point,
    pub source_path: String,
    pub width: f64,
    pub height: f64,
    pub render_key: i64,
    pub deleted: bool,
}

impl ImageItem {
    pub fn new(
        id: EntityId,
        parent_id: EntityId,
        position: Point,
        source_path: String,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id,
            parent_id,
            position,
            source_path,
            width: width.max(1.0),
            height: height.max(1.0),
            render_key: 0,
            deleted: false,
        }
    }

    /// Resizes to a new width, keeping the aspect ratio locked.
    pub fn resize_to_width(&mut self, width: f64) {
        let width = width.max(1.0);
        let aspect = self.height / self.width;
        self.width = width;
        self.height = width * aspect;
    }
}

impl EntityData for ImageItem {
    const KIND: EntityKind = EntityKind::Image;

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
