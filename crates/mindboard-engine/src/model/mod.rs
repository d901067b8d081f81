use serde::{Deserialize, Serialize};

use crate::spatial_index::Bounds;

mod connection;
mod entry;
mod group;
mod image;

pub use connection::{ArrowStyle, Connection, LINE_TOLERANCE};
pub use entry::{Entry, Mark};
pub use group::{GroupBox, MIN_GROUP_SIZE};
pub use image::ImageItem;

/// Process-unique, opaque entity identifier.
///
/// Identifiers are allocated by the owning board's generator and are never
/// reused within a document's lifetime. Mirrors and history commands hold
/// identifiers, never references, so a purged entity can not leave a
/// dangling pointer behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Sentinel parent for top-level entities: the root layer.
    pub const ROOT: EntityId = EntityId(0);

    /// Raw value, for logs and events.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 2D world coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// The four canonical entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Entry,
    Group,
    Image,
    Connection,
}

impl EntityKind {
    /// Lowercase name for logs and events.
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Entry => "entry",
            EntityKind::Group => "group",
            EntityKind::Image => "image",
            EntityKind::Connection => "connection",
        }
    }
}

/// Common behavior every canonical entity implements.
///
/// Shared fields (identifier, parent layer, tombstone flag, render key)
/// are accessed through this trait so the generic store and the board can
/// treat all four kinds uniformly.
pub trait EntityData {
    /// The kind tag for this type.
    const KIND: EntityKind;

    fn id(&self) -> EntityId;
    fn parent_id(&self) -> EntityId;
    fn is_deleted(&self) -> bool;
    fn set_deleted(&mut self, deleted: bool);
    fn render_key(&self) -> i64;
    fn set_render_key(&mut self, key: i64);

    /// Current axis-aligned bounds in world coordinates.
    fn bounds(&self) -> Bounds;

    /// Translate the entity by a delta.
    fn translate(&mut self, dx: f64, dy: f64);
}

/// Per-kind identifier lists, the unit a batch lifecycle operation works
/// on.
///
/// One cascade delete touches entries, connections, and possibly groups
/// and images at once; carrying them as one set keeps the whole batch a
/// single history entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySet {
    pub entries: Vec<EntityId>,
    pub groups: Vec<EntityId>,
    pub images: Vec<EntityId>,
    pub connections: Vec<EntityId>,
}

impl EntitySet {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
            && self.groups.is_empty()
            && self.images.is_empty()
            && self.connections.is_empty()
    }

    /// Total number of identifiers across all kinds.
    pub fn len(&self) -> usize {
        self.entries.len() + self.groups.len() + self.images.len() + self.connections.len()
    }

    /// Adds an identifier under its kind.
    pub fn push(&mut self, kind: EntityKind, id: EntityId) {
        match kind {
            EntityKind::Entry => self.entries.push(id),
            EntityKind::Group => self.groups.push(id),
            EntityKind::Image => self.images.push(id),
            EntityKind::Connection => self.connections.push(id),
        }
    }
}

/// Tag on a live mirror identifying what it reflects.
///
/// `Handle` marks transient shell-registered affordances (resize grips and
/// the like) that are hit-testable but have no canonical entity behind
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MirrorKind {
    Entry,
    Group,
    Image,
    Connection,
    Handle,
}

impl From<EntityKind> for MirrorKind {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Entry => MirrorKind::Entry,
            EntityKind::Group => MirrorKind::Group,
            EntityKind::Image => MirrorKind::Image,
            EntityKind::Connection => MirrorKind::Connection,
        }
    }
}

/// Live, renderable representation of a canonical entity.
///
/// A mirror exists exactly while its entity belongs to the displayed layer
/// and is not tombstoned. It carries copied geometry and capability flags
/// only; all canonical truth stays in the owning store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mirror {
    pub id: EntityId,
    pub kind: MirrorKind,
    pub bounds: Bounds,
    pub render_key: i64,
    /// Spawn sequence number, the fine-grained draw-order tiebreak.
    pub seq: u64,
    pub selectable: bool,
    pub draggable: bool,
    pub screen_space: bool,
}

impl Mirror {
    /// Creates a mirror for a canonical entity with the kind's default
    /// capability flags.
    pub fn new(id: EntityId, kind: EntityKind, bounds: Bounds, render_key: i64, seq: u64) -> Self {
        let kind = MirrorKind::from(kind);
        Self {
            id,
            kind,
            bounds,
            render_key,
            seq,
            selectable: true,
            // Connections follow their endpoints instead of moving on
            // their own.
            draggable: kind != MirrorKind::Connection,
            screen_space: false,
        }
    }

    /// Creates a transient handle mirror in screen space.
    pub fn handle(id: EntityId, bounds: Bounds, seq: u64) -> Self {
        Self {
            id,
            kind: MirrorKind::Handle,
            bounds,
            render_key: i64::MAX,
            seq,
            selectable: true,
            draggable: true,
            screen_space: true,
        }
    }

    /// True for transient handle mirrors.
    pub fn is_handle(&self) -> bool {
        self.kind == MirrorKind::Handle
    }
}
