//! The board: canonical stores, selection, spatial index, and viewport.
//!
//! `Board` is the single owner of all mutable engine state below the
//! history. Every mirror spawn/despawn, every spatial-index insert and
//! remove, and every selection side effect goes through here, which is
//! what keeps the core invariants intact:
//!
//! - a mirror exists iff its entity sits on the displayed layer and is
//!   not tombstoned,
//! - the spatial index holds exactly the live world-space mirrors,
//! - a connection is live only while both endpoint entries are.
//!
//! History commands replay against the board; they never reach into the
//! stores directly.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::entity_store::EntityStore;
use crate::model::{
    Connection, EntityData, EntityId, EntityKind, EntitySet, Entry, GroupBox, ImageItem, Mirror,
    MirrorKind, Point, LINE_TOLERANCE,
};
use crate::selection_manager::{DragTarget, SelectMode, SelectionManager};
use crate::spatial_index::{Bounds, SpatialIndex};
use crate::viewport::Viewport;
use mindboard_core::constants::HIT_TOLERANCE;
use mindboard_core::error::{DocumentError, Error};

/// Render key snapshot taken when a layer's keys are renormalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavedKey {
    pub id: EntityId,
    pub kind: EntityKind,
    pub key: i64,
}

/// Summary of a committed drag, handed to the document for recording.
#[derive(Debug, Clone)]
pub struct DragCommit {
    pub targets: Vec<DragTarget>,
    pub dx: f64,
    pub dy: f64,
}

/// Maps a mirror tag back to its canonical kind; handles have none.
pub(crate) fn entity_kind_of(kind: MirrorKind) -> Option<EntityKind> {
    match kind {
        MirrorKind::Entry => Some(EntityKind::Entry),
        MirrorKind::Group => Some(EntityKind::Group),
        MirrorKind::Image => Some(EntityKind::Image),
        MirrorKind::Connection => Some(EntityKind::Connection),
        MirrorKind::Handle => None,
    }
}

// Generic per-store helpers. Free functions rather than methods so the
// board can hand out disjoint borrows of a store, the index, and the
// selection in one call.

fn spawn_in<T: EntityData>(
    store: &mut EntityStore<T>,
    id: EntityId,
    spatial: &mut SpatialIndex,
    active_layer: EntityId,
    seq: u64,
) -> bool {
    let Some(entity) = store.get_mut(id) else {
        return false;
    };
    if entity.data.is_deleted()
        || entity.data.parent_id() != active_layer
        || entity.mirror.is_some()
    {
        return false;
    }
    let mirror = Mirror::new(id, T::KIND, entity.data.bounds(), entity.data.render_key(), seq);
    spatial.insert(id, &mirror.bounds);
    entity.mirror = Some(mirror);
    true
}

fn mark_deleted_in<T: EntityData>(
    store: &mut EntityStore<T>,
    ids: &[EntityId],
    spatial: &mut SpatialIndex,
    selection: &mut SelectionManager,
) -> usize {
    let mut count = 0;
    for &id in ids {
        if !store.is_live(id) {
            continue;
        }
        // Off-layer entities have no mirror; the tombstone alone is the
        // whole effect then.
        if let Some(mirror) = store.mark_deleted(id) {
            spatial.remove(id, &mirror.bounds);
        }
        selection.discard(id);
        count += 1;
    }
    count
}

fn unmark_in<T: EntityData>(
    store: &mut EntityStore<T>,
    ids: &[EntityId],
    spatial: &mut SpatialIndex,
    active_layer: EntityId,
    next_seq: &mut u64,
) -> usize {
    let mut count = 0;
    for &id in ids {
        if !store.unmark_deleted(id) {
            continue;
        }
        count += 1;
        *next_seq += 1;
        spawn_in(store, id, spatial, active_layer, *next_seq);
    }
    count
}

fn purge_tombstoned_in<T: EntityData>(store: &mut EntityStore<T>, ids: &[EntityId]) -> usize {
    let mut count = 0;
    for &id in ids {
        if store.data(id).is_some_and(|d| d.is_deleted()) && store.purge(id).is_some() {
            count += 1;
        }
    }
    count
}

fn translate_in<T: EntityData>(
    store: &mut EntityStore<T>,
    id: EntityId,
    dx: f64,
    dy: f64,
    spatial: &mut SpatialIndex,
    reindex: bool,
) -> bool {
    let Some(entity) = store.get_mut(id) else {
        return false;
    };
    entity.data.translate(dx, dy);
    if let Some(mirror) = entity.mirror.as_mut() {
        let old = mirror.bounds;
        mirror.bounds = entity.data.bounds();
        if reindex {
            spatial.remove(id, &old);
            spatial.insert(id, &mirror.bounds);
        }
    }
    true
}

fn set_key_in<T: EntityData>(store: &mut EntityStore<T>, id: EntityId, key: i64) -> bool {
    let Some(entity) = store.get_mut(id) else {
        return false;
    };
    entity.data.set_render_key(key);
    if let Some(mirror) = entity.mirror.as_mut() {
        mirror.render_key = key;
    }
    true
}

/// Re-keys the spatial index after an in-place geometry change (resize,
/// text edit).
fn reindex_in<T: EntityData>(
    store: &mut EntityStore<T>,
    id: EntityId,
    spatial: &mut SpatialIndex,
) {
    if let Some(entity) = store.get_mut(id) {
        let fresh = entity.data.bounds();
        if let Some(mirror) = entity.mirror.as_mut() {
            spatial.remove(id, &mirror.bounds);
            mirror.bounds = fresh;
            spatial.insert(id, &mirror.bounds);
        }
    }
}

/// Canonical state aggregate for one document.
#[derive(Debug, Clone)]
pub struct Board {
    pub entries: EntityStore<Entry>,
    pub groups: EntityStore<GroupBox>,
    pub images: EntityStore<ImageItem>,
    pub connections: EntityStore<Connection>,
    pub selection: SelectionManager,
    spatial: SpatialIndex,
    /// Transient screen-space handle mirrors, keyed by id. Handles are
    /// shell-registered, never persisted, and never enter the world
    /// index.
    handles: HashMap<EntityId, Mirror>,
    viewport: Viewport,
    active_layer: EntityId,
    next_id: u64,
    next_seq: u64,
}

impl Board {
    /// Creates an empty board displaying the root layer.
    pub fn new() -> Self {
        Self {
            entries: EntityStore::new(),
            groups: EntityStore::new(),
            images: EntityStore::new(),
            connections: EntityStore::new(),
            selection: SelectionManager::new(),
            spatial: SpatialIndex::new(),
            handles: HashMap::new(),
            viewport: Viewport::default(),
            active_layer: EntityId::ROOT,
            next_id: 1,
            next_seq: 0,
        }
    }

    /// Creates a board with a custom spatial-index cell size.
    pub fn with_cell_size(cell_size: f64) -> Self {
        Self {
            spatial: SpatialIndex::with_cell_size(cell_size),
            ..Self::new()
        }
    }

    /// Allocates a fresh entity identifier.
    pub fn generate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Bumps the id generator past an externally supplied id (load path).
    pub fn reserve_id(&mut self, id: EntityId) {
        self.next_id = self.next_id.max(id.0 + 1);
    }

    /// The currently displayed layer.
    pub fn active_layer(&self) -> EntityId {
        self.active_layer
    }

    /// Read access for the renderer; safe any time after the frame's
    /// mutations are done.
    pub fn spatial(&self) -> &SpatialIndex {
        &self.spatial
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    fn bump_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    // ---- insertion --------------------------------------------------

    /// Inserts a canonical entry, spawning its mirror when it lands on
    /// the displayed layer.
    pub fn insert_entry(&mut self, data: Entry) {
        let id = data.id();
        self.reserve_id(id);
        self.entries.insert(data);
        let seq = self.bump_seq();
        spawn_in(
            &mut self.entries,
            id,
            &mut self.spatial,
            self.active_layer,
            seq,
        );
    }

    /// Inserts a canonical group box.
    pub fn insert_group(&mut self, data: GroupBox) {
        let id = data.id();
        self.reserve_id(id);
        self.groups.insert(data);
        let seq = self.bump_seq();
        spawn_in(
            &mut self.groups,
            id,
            &mut self.spatial,
            self.active_layer,
            seq,
        );
    }

    /// Inserts a canonical image.
    pub fn insert_image(&mut self, data: ImageItem) {
        let id = data.id();
        self.reserve_id(id);
        self.images.insert(data);
        let seq = self.bump_seq();
        spawn_in(
            &mut self.images,
            id,
            &mut self.spatial,
            self.active_layer,
            seq,
        );
    }

    /// Inserts a canonical connection. Endpoint validation happens at the
    /// document boundary; the board only refuses to spawn a mirror for a
    /// connection whose endpoints are not live.
    pub fn insert_connection(&mut self, data: Connection) {
        let id = data.id();
        self.reserve_id(id);
        self.connections.insert(data);
        self.try_spawn_connection(id);
    }

    /// Spawns a connection mirror if its layer is displayed and both
    /// endpoints are live, refreshing the cached anchors first.
    fn try_spawn_connection(&mut self, id: EntityId) -> bool {
        let Some(data) = self.connections.data(id) else {
            return false;
        };
        if data.is_deleted() || data.parent_id() != self.active_layer {
            return false;
        }
        if self.connections.mirror(id).is_some() {
            return false;
        }
        let (source, target) = (data.source, data.target);
        if !self.entries.is_live(source) || !self.entries.is_live(target) {
            debug!("connection {id} not spawned: endpoint not live");
            return false;
        }
        self.sync_connection(id);
        let seq = self.bump_seq();
        spawn_in(
            &mut self.connections,
            id,
            &mut self.spatial,
            self.active_layer,
            seq,
        )
    }

    /// Re-derives a connection's cached anchors from its endpoint
    /// entries, re-keying the index if a mirror is live.
    fn sync_connection(&mut self, id: EntityId) {
        let Some(data) = self.connections.data(id) else {
            return;
        };
        let source_pos = self.entries.data(data.source).map(Entry::anchor);
        let target_pos = self.entries.data(data.target).map(Entry::anchor);
        let (Some(source_pos), Some(target_pos)) = (source_pos, target_pos) else {
            return;
        };
        if let Some(entity) = self.connections.get_mut(id) {
            entity.data.source_pos = source_pos;
            entity.data.target_pos = target_pos;
            let fresh = entity.data.bounds();
            if let Some(mirror) = entity.mirror.as_mut() {
                self.spatial.remove(id, &mirror.bounds);
                mirror.bounds = fresh;
                self.spatial.insert(id, &mirror.bounds);
            }
        }
    }

    /// Refreshes every live connection touching any of the given entries.
    pub fn sync_connections_touching(&mut self, entry_ids: &[EntityId]) {
        if entry_ids.is_empty() {
            return;
        }
        let touched: Vec<EntityId> = self
            .connections
            .iter()
            .filter(|e| {
                !e.data.is_deleted() && entry_ids.iter().any(|&id| e.data.touches(id))
            })
            .map(|e| e.data.id)
            .collect();
        for id in touched {
            self.sync_connection(id);
        }
    }

    // ---- batch lifecycle --------------------------------------------

    /// Tombstones a batch, hiding mirrors, vacating the index and the
    /// selection. Already-tombstoned or unknown ids are skipped silently.
    /// Returns how many tombstones were set.
    pub fn mark_deleted(&mut self, set: &EntitySet) -> usize {
        let mut count = 0;
        count += mark_deleted_in(
            &mut self.connections,
            &set.connections,
            &mut self.spatial,
            &mut self.selection,
        );
        count += mark_deleted_in(
            &mut self.entries,
            &set.entries,
            &mut self.spatial,
            &mut self.selection,
        );
        count += mark_deleted_in(
            &mut self.groups,
            &set.groups,
            &mut self.spatial,
            &mut self.selection,
        );
        count += mark_deleted_in(
            &mut self.images,
            &set.images,
            &mut self.spatial,
            &mut self.selection,
        );
        count
    }

    /// Clears tombstones on a batch, respawning mirrors for entities on
    /// the displayed layer. Entries are restored before connections so a
    /// restored connection finds its endpoints live again. Returns how
    /// many tombstones were cleared.
    pub fn unmark_deleted(&mut self, set: &EntitySet) -> usize {
        let mut count = 0;
        count += unmark_in(
            &mut self.entries,
            &set.entries,
            &mut self.spatial,
            self.active_layer,
            &mut self.next_seq,
        );
        count += unmark_in(
            &mut self.groups,
            &set.groups,
            &mut self.spatial,
            self.active_layer,
            &mut self.next_seq,
        );
        count += unmark_in(
            &mut self.images,
            &set.images,
            &mut self.spatial,
            self.active_layer,
            &mut self.next_seq,
        );
        for &id in &set.connections {
            if self.connections.unmark_deleted(id) {
                count += 1;
                self.try_spawn_connection(id);
            }
        }
        count
    }

    /// Permanently removes the tombstoned members of a batch from the
    /// canonical maps. Live members are left alone; this only ever runs
    /// from history cleanup.
    pub fn purge_tombstoned(&mut self, set: &EntitySet) -> usize {
        let mut count = 0;
        count += purge_tombstoned_in(&mut self.entries, &set.entries);
        count += purge_tombstoned_in(&mut self.groups, &set.groups);
        count += purge_tombstoned_in(&mut self.images, &set.images);
        count += purge_tombstoned_in(&mut self.connections, &set.connections);
        if count > 0 {
            debug!("purged {count} tombstoned entities");
        }
        count
    }

    // ---- per-entity mutation ----------------------------------------

    /// Translates one entity, updating mirror bounds; `reindex` re-keys
    /// the spatial index (dragged objects sit outside the index and skip
    /// it).
    pub fn translate(
        &mut self,
        id: EntityId,
        kind: EntityKind,
        dx: f64,
        dy: f64,
        reindex: bool,
    ) -> bool {
        match kind {
            EntityKind::Entry => {
                translate_in(&mut self.entries, id, dx, dy, &mut self.spatial, reindex)
            }
            EntityKind::Group => {
                translate_in(&mut self.groups, id, dx, dy, &mut self.spatial, reindex)
            }
            EntityKind::Image => {
                translate_in(&mut self.images, id, dx, dy, &mut self.spatial, reindex)
            }
            EntityKind::Connection => translate_in(
                &mut self.connections,
                id,
                dx,
                dy,
                &mut self.spatial,
                reindex,
            ),
        }
    }

    /// Sets an entity's render key on canonical data and mirror alike.
    pub fn set_render_key(&mut self, id: EntityId, kind: EntityKind, key: i64) -> bool {
        match kind {
            EntityKind::Entry => set_key_in(&mut self.entries, id, key),
            EntityKind::Group => set_key_in(&mut self.groups, id, key),
            EntityKind::Image => set_key_in(&mut self.images, id, key),
            EntityKind::Connection => set_key_in(&mut self.connections, id, key),
        }
    }

    /// Current render key of an entity.
    pub fn render_key_of(&self, id: EntityId, kind: EntityKind) -> Option<i64> {
        match kind {
            EntityKind::Entry => self.entries.data(id).map(EntityData::render_key),
            EntityKind::Group => self.groups.data(id).map(EntityData::render_key),
            EntityKind::Image => self.images.data(id).map(EntityData::render_key),
            EntityKind::Connection => self.connections.data(id).map(EntityData::render_key),
        }
    }

    /// Re-keys the spatial index after an in-place geometry change.
    pub fn refresh_bounds(&mut self, id: EntityId, kind: EntityKind) {
        match kind {
            EntityKind::Entry => reindex_in(&mut self.entries, id, &mut self.spatial),
            EntityKind::Group => reindex_in(&mut self.groups, id, &mut self.spatial),
            EntityKind::Image => reindex_in(&mut self.images, id, &mut self.spatial),
            EntityKind::Connection => reindex_in(&mut self.connections, id, &mut self.spatial),
        }
    }

    // ---- mirrors & queries ------------------------------------------

    /// Looks a live mirror up by id across the four stores and the
    /// transient handles.
    pub fn find_mirror(&self, id: EntityId) -> Option<&Mirror> {
        self.handles
            .get(&id)
            .or_else(|| self.entries.mirror(id))
            .or_else(|| self.groups.mirror(id))
            .or_else(|| self.images.mirror(id))
            .or_else(|| self.connections.mirror(id))
    }

    /// Number of live world-space mirrors.
    pub fn live_mirror_count(&self) -> usize {
        self.spatial.len()
    }

    /// Every live object intersecting the rectangle, front-to-back:
    /// screen-space handles first, then world mirrors by render key,
    /// spawn sequence breaking ties.
    pub fn query_visible(&self, rect: &Bounds) -> Vec<Mirror> {
        let mut out: Vec<Mirror> = self
            .spatial
            .query_iter(rect)
            .filter_map(|id| self.find_mirror(id).cloned())
            .collect();
        out.extend(self.handles.values().cloned());
        out.sort_by(|a, b| {
            b.screen_space
                .cmp(&a.screen_space)
                .then(b.render_key.cmp(&a.render_key))
                .then(b.seq.cmp(&a.seq))
        });
        out
    }

    /// Every live object in the viewport's visible world rectangle.
    pub fn query_viewport(&self) -> Vec<Mirror> {
        self.query_visible(&self.viewport.visible_world_bounds())
    }

    /// Precise hit test for one mirror against a world point.
    fn hit_test(&self, mirror: &Mirror, world: &Point, tolerance: f64) -> bool {
        match mirror.kind {
            MirrorKind::Connection => self
                .connections
                .data(mirror.id)
                .is_some_and(|c| c.distance_to_point(world) <= tolerance + LINE_TOLERANCE),
            _ => mirror
                .bounds
                .expanded(tolerance)
                .contains_point(world.x, world.y),
        }
    }

    /// Topmost live object under a screen point, screen-space handles
    /// taking priority over world objects. The tolerance is in screen
    /// pixels and shrinks in world units as the view zooms in.
    pub fn object_under_point(&self, screen_x: f64, screen_y: f64) -> Option<Mirror> {
        // Handles live in screen space and sit above everything.
        let mut handles: Vec<&Mirror> = self
            .handles
            .values()
            .filter(|m| {
                m.bounds
                    .expanded(HIT_TOLERANCE)
                    .contains_point(screen_x, screen_y)
            })
            .collect();
        handles.sort_by(|a, b| b.seq.cmp(&a.seq));
        if let Some(hit) = handles.first() {
            return Some((*hit).clone());
        }

        let world = self.viewport.pixel_to_world(screen_x, screen_y);
        let tolerance = HIT_TOLERANCE / self.viewport.zoom();
        let probe = Bounds::new(world.x, world.y, world.x, world.y).expanded(tolerance);
        let mut candidates: Vec<Mirror> = self
            .spatial
            .query_iter(&probe)
            .filter_map(|id| self.find_mirror(id).cloned())
            .collect();
        candidates.sort_by(|a, b| b.render_key.cmp(&a.render_key).then(b.seq.cmp(&a.seq)));
        candidates
            .into_iter()
            .find(|m| self.hit_test(m, &world, tolerance))
    }

    // ---- selection --------------------------------------------------

    /// Selects the topmost object under a screen point. With `Replace`,
    /// clicking empty space clears the selection.
    pub fn select_at(&mut self, screen_x: f64, screen_y: f64, mode: SelectMode) -> Option<EntityId> {
        match self.object_under_point(screen_x, screen_y) {
            Some(mirror) if mirror.selectable => {
                self.selection.select(mirror.id, mode);
                Some(mirror.id)
            }
            _ => {
                if mode == SelectMode::Replace {
                    self.selection.clear();
                }
                None
            }
        }
    }

    /// Marquee selection: every selectable world object intersecting the
    /// rectangle, with the usual pointer-batch filtering.
    pub fn select_in_rect(&mut self, rect: &Bounds, mode: SelectMode) {
        let rect = Bounds::from_corners(rect.min_x, rect.min_y, rect.max_x, rect.max_y);
        let mirrors: Vec<Mirror> = self
            .spatial
            .query_iter(&rect)
            .filter_map(|id| self.find_mirror(id).cloned())
            .collect();
        self.selection.select_batch(mirrors.iter(), mode, true);
    }

    /// Selects every live mirror on the displayed layer.
    pub fn select_all(&mut self) {
        let mirrors: Vec<Mirror> = self
            .entries
            .mirrors()
            .chain(self.groups.mirrors())
            .chain(self.images.mirrors())
            .chain(self.connections.mirrors())
            .cloned()
            .collect();
        self.selection
            .select_batch(mirrors.iter(), SelectMode::Replace, true);
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    // ---- drag transaction -------------------------------------------

    /// Begins a drag over the selection.
    ///
    /// Bumps the render-order counter once, promotes every selected
    /// draggable world object to that key, and pulls it out of the
    /// spatial index so it can not match as its own drop target.
    pub fn drag_start(&mut self) {
        if self.selection.is_empty() || self.selection.is_dragging() {
            return;
        }
        let key = self.selection.next_order();
        let mut targets = Vec::new();
        for id in self.selection.selected().to_vec() {
            let Some(mirror) = self.find_mirror(id) else {
                continue;
            };
            if !mirror.draggable || mirror.screen_space {
                continue;
            }
            targets.push(DragTarget {
                id,
                kind: mirror.kind,
                old_key: mirror.render_key,
                new_key: key,
            });
        }
        for target in &targets {
            if let Some(kind) = entity_kind_of(target.kind) {
                self.set_render_key(target.id, kind, target.new_key);
            }
            if let Some(mirror) = self.find_mirror(target.id) {
                let bounds = mirror.bounds;
                self.spatial.remove(target.id, &bounds);
            }
        }
        debug!("drag start over {} objects", targets.len());
        self.selection.begin_drag(targets);
    }

    /// Applies a drag delta to every dragged object and keeps dependent
    /// connection geometry in step.
    pub fn drag_update(&mut self, dx: f64, dy: f64) {
        let Some(state) = self.selection.drag_state_mut() else {
            return;
        };
        state.accum_dx += dx;
        state.accum_dy += dy;
        let targets = state.targets.clone();

        let mut moved_entries = Vec::new();
        for target in &targets {
            if let Some(kind) = entity_kind_of(target.kind) {
                self.translate(target.id, kind, dx, dy, false);
                if kind == EntityKind::Entry {
                    moved_entries.push(target.id);
                }
            }
        }
        self.sync_connections_touching(&moved_entries);
    }

    /// Commits the drag: bumps the counter again, re-inserts every
    /// dragged object into the index at its final bounds, and purges
    /// transient handles from the selection. Returns the commit summary
    /// for history recording, or `None` if no drag was in flight.
    pub fn drag_end(&mut self) -> Option<DragCommit> {
        let state = self.selection.take_drag()?;
        self.selection.next_order();
        for target in &state.targets {
            if let Some(mirror) = self.find_mirror(target.id) {
                let bounds = mirror.bounds;
                if !self.spatial.contains(target.id) {
                    self.spatial.insert(target.id, &bounds);
                }
            }
        }
        let handles: Vec<EntityId> = self.handles.keys().copied().collect();
        self.selection
            .purge_handles(|id| handles.contains(&id));
        debug!(
            "drag end over {} objects, delta ({:.1}, {:.1})",
            state.targets.len(),
            state.accum_dx,
            state.accum_dy
        );
        Some(DragCommit {
            dx: state.accum_dx,
            dy: state.accum_dy,
            targets: state.targets,
        })
    }

    /// Aborts the in-flight drag: moves everything back, restores the
    /// original render keys, and re-inserts into the index. Nothing is
    /// recorded.
    pub fn drag_abort(&mut self) {
        let Some(state) = self.selection.take_drag() else {
            return;
        };
        let mut moved_entries = Vec::new();
        for target in &state.targets {
            if let Some(kind) = entity_kind_of(target.kind) {
                self.translate(target.id, kind, -state.accum_dx, -state.accum_dy, false);
                self.set_render_key(target.id, kind, target.old_key);
                if kind == EntityKind::Entry {
                    moved_entries.push(target.id);
                }
            }
            if let Some(mirror) = self.find_mirror(target.id) {
                let bounds = mirror.bounds;
                if !self.spatial.contains(target.id) {
                    self.spatial.insert(target.id, &bounds);
                }
            }
        }
        self.sync_connections_touching(&moved_entries);
        debug!("drag aborted over {} objects", state.targets.len());
    }

    // ---- handles ----------------------------------------------------

    /// Registers a transient screen-space handle and returns its id.
    pub fn add_handle(&mut self, bounds: Bounds) -> EntityId {
        let id = self.generate_id();
        let seq = self.bump_seq();
        self.handles.insert(id, Mirror::handle(id, bounds, seq));
        id
    }

    /// Removes a transient handle.
    pub fn remove_handle(&mut self, id: EntityId) -> bool {
        self.selection.discard(id);
        self.handles.remove(&id).is_some()
    }

    pub fn is_handle(&self, id: EntityId) -> bool {
        self.handles.contains_key(&id)
    }

    // ---- layer switching --------------------------------------------

    /// Highest render key among live mirrors, or 0 on an empty layer.
    pub fn max_live_render_key(&self) -> i64 {
        self.entries
            .mirrors()
            .chain(self.groups.mirrors())
            .chain(self.images.mirrors())
            .chain(self.connections.mirrors())
            .map(|m| m.render_key)
            .max()
            .unwrap_or(0)
    }

    /// Compacts the displayed layer's render keys to a contiguous run,
    /// preserving relative order, and returns the pre-compaction keys.
    pub fn renormalize_active_layer_keys(&mut self) -> Vec<SavedKey> {
        let mut live: Vec<(EntityId, EntityKind, i64, u64)> = self
            .entries
            .mirrors()
            .map(|m| (m.id, EntityKind::Entry, m.render_key, m.seq))
            .chain(
                self.groups
                    .mirrors()
                    .map(|m| (m.id, EntityKind::Group, m.render_key, m.seq)),
            )
            .chain(
                self.images
                    .mirrors()
                    .map(|m| (m.id, EntityKind::Image, m.render_key, m.seq)),
            )
            .chain(
                self.connections
                    .mirrors()
                    .map(|m| (m.id, EntityKind::Connection, m.render_key, m.seq)),
            )
            .collect();
        live.sort_by(|a, b| a.2.cmp(&b.2).then(a.3.cmp(&b.3)));

        let mut saved = Vec::with_capacity(live.len());
        for (slot, (id, kind, old_key, _)) in live.into_iter().enumerate() {
            saved.push(SavedKey {
                id,
                kind,
                key: old_key,
            });
            self.set_render_key(id, kind, slot as i64);
        }
        saved
    }

    /// Restores previously snapshotted render keys verbatim.
    pub fn restore_keys(&mut self, saved: &[SavedKey]) {
        for entry in saved {
            self.set_render_key(entry.id, entry.kind, entry.key);
        }
    }

    /// Loads a layer: renormalizes the outgoing layer's keys, clears the
    /// selection and index, respawns mirrors for the target, and resets
    /// the render-order counter one past the highest key present.
    ///
    /// Returns the outgoing layer's pre-compaction keys so the switch can
    /// be undone with keys intact. On error the board is mid-transition;
    /// the caller retries against the root layer or resets.
    pub fn load_layer(&mut self, target: EntityId) -> Result<Vec<SavedKey>, Error> {
        if target != EntityId::ROOT && !self.entries.is_live(target) {
            return Err(DocumentError::LayerLoad {
                layer: target.raw(),
                reason: "target layer is missing or deleted".to_string(),
            }
            .into());
        }

        let saved = self.renormalize_active_layer_keys();

        // A drag can not survive its layer.
        self.selection.take_drag();
        self.selection.clear();
        self.spatial.clear();
        self.handles.clear();
        self.entries.despawn_all();
        self.groups.despawn_all();
        self.images.despawn_all();
        self.connections.despawn_all();
        self.active_layer = target;

        let entry_ids: Vec<EntityId> = self
            .entries
            .iter_layer(target)
            .map(|e| e.data.id)
            .collect();
        for id in entry_ids {
            let seq = self.bump_seq();
            spawn_in(&mut self.entries, id, &mut self.spatial, target, seq);
        }
        let group_ids: Vec<EntityId> =
            self.groups.iter_layer(target).map(|e| e.data.id).collect();
        for id in group_ids {
            let seq = self.bump_seq();
            spawn_in(&mut self.groups, id, &mut self.spatial, target, seq);
        }
        let image_ids: Vec<EntityId> =
            self.images.iter_layer(target).map(|e| e.data.id).collect();
        for id in image_ids {
            let seq = self.bump_seq();
            spawn_in(&mut self.images, id, &mut self.spatial, target, seq);
        }

        let connection_ids: Vec<(EntityId, EntityId, EntityId)> = self
            .connections
            .iter_layer(target)
            .map(|e| (e.data.id, e.data.source, e.data.target))
            .collect();
        for (id, source, target_entry) in connection_ids {
            for endpoint in [source, target_entry] {
                if !self.entries.contains(endpoint) {
                    return Err(DocumentError::DanglingEndpoint {
                        id: id.raw(),
                        endpoint: endpoint.raw(),
                    }
                    .into());
                }
            }
            if !self.try_spawn_connection(id) {
                // Endpoint tombstoned: degrade to hiding the connection.
                warn!("connection {id} hidden on layer load: endpoint not live");
            }
        }

        let max_key = self.max_live_render_key();
        self.selection.reset_order_floor(max_key);
        Ok(saved)
    }

    // ---- teardown ---------------------------------------------------

    /// Drops everything and returns to an empty root layer. The id
    /// generator is left running so identifiers stay process-unique.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.groups.clear();
        self.images.clear();
        self.connections.clear();
        self.selection = SelectionManager::new();
        self.spatial.clear();
        self.handles.clear();
        self.active_layer = EntityId::ROOT;
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
