//! Entity creation, deletion, and editing for the document.
//!
//! Invalid requests (self-connections, targets that are missing or
//! tombstoned) are rejected silently: no error, no history entry. Every
//! accepted mutation is exactly one history entry, however many entities
//! it touches.

use std::collections::HashSet;

use tracing::debug;

use super::Document;
use crate::commands::{
    Command, CreateEntities, DeleteEntities, EditEntry, EditGroupLabel, ResizeEntity,
};
use crate::model::{
    ArrowStyle, Connection, EntityData, EntityId, EntityKind, EntitySet, Entry, GroupBox,
    ImageItem, Mark, MirrorKind, Point,
};
use mindboard_core::event_bus::{AppEvent, EntityEvent};

impl Document {
    /// True if the id names a layer entries can be created in: the root
    /// or a live entry.
    fn is_valid_layer(&self, layer: EntityId) -> bool {
        layer == EntityId::ROOT || self.board.entries.is_live(layer)
    }

    /// Creates a text entry on the displayed layer.
    pub fn create_entry_at(&mut self, x: f64, y: f64, text: impl Into<String>) -> EntityId {
        let layer = self.board.active_layer();
        self.make_entry(layer, x, y, text.into())
    }

    /// Creates a text entry inside an arbitrary layer. Returns `None`
    /// when the layer is missing or deleted.
    pub fn create_entry_in(
        &mut self,
        layer: EntityId,
        x: f64,
        y: f64,
        text: impl Into<String>,
    ) -> Option<EntityId> {
        if !self.is_valid_layer(layer) {
            debug!("entry creation rejected: layer {layer} is not live");
            return None;
        }
        Some(self.make_entry(layer, x, y, text.into()))
    }

    fn make_entry(&mut self, layer: EntityId, x: f64, y: f64, text: String) -> EntityId {
        let id = self.board.generate_id();
        let mut data = Entry::new(id, layer, Point::new(x, y), text);
        data.render_key = self.board.selection.next_order();
        self.board.insert_entry(data);
        self.record_create(EntityKind::Entry, id, "Create Entry");
        id
    }

    /// Creates a group box on the displayed layer.
    pub fn create_group_at(
        &mut self,
        x: f64,
        y: f64,
        label: impl Into<String>,
        width: f64,
        height: f64,
    ) -> EntityId {
        let id = self.board.generate_id();
        let layer = self.board.active_layer();
        let mut data = GroupBox::new(id, layer, Point::new(x, y), label.into(), width, height);
        data.render_key = self.board.selection.next_order();
        self.board.insert_group(data);
        self.record_create(EntityKind::Group, id, "Create Group");
        id
    }

    /// Places an image on the displayed layer.
    pub fn create_image_at(
        &mut self,
        x: f64,
        y: f64,
        source_path: impl Into<String>,
        width: f64,
        height: f64,
    ) -> EntityId {
        let id = self.board.generate_id();
        let layer = self.board.active_layer();
        let mut data = ImageItem::new(
            id,
            layer,
            Point::new(x, y),
            source_path.into(),
            width,
            height,
        );
        data.render_key = self.board.selection.next_order();
        self.board.insert_image(data);
        self.record_create(EntityKind::Image, id, "Create Image");
        id
    }

    /// Connects two entries. Rejected silently when the endpoints are
    /// equal, not live, or sit on different layers.
    pub fn create_connection(
        &mut self,
        source: EntityId,
        target: EntityId,
        style: ArrowStyle,
    ) -> Option<EntityId> {
        if source == target {
            debug!("connection rejected: source equals target ({source})");
            return None;
        }
        if !self.board.entries.is_live(source) || !self.board.entries.is_live(target) {
            debug!("connection rejected: endpoint not live");
            return None;
        }
        let source_data = self.board.entries.data(source)?;
        let target_data = self.board.entries.data(target)?;
        if source_data.parent_id != target_data.parent_id {
            debug!("connection rejected: endpoints on different layers");
            return None;
        }
        let layer = source_data.parent_id;
        let (source_pos, target_pos) = (source_data.anchor(), target_data.anchor());

        let id = self.board.generate_id();
        let mut data = Connection::new(id, layer, source, target, style, source_pos, target_pos);
        data.render_key = self.board.selection.next_order();
        self.board.insert_connection(data);
        self.record_create(EntityKind::Connection, id, "Create Connection");
        Some(id)
    }

    fn record_create(&mut self, kind: EntityKind, id: EntityId, name: &str) {
        let mut set = EntitySet::default();
        set.push(kind, id);
        self.record_applied(Command::Create(CreateEntities {
            set,
            name: name.to_string(),
        }));
        self.emit(AppEvent::Entity(EntityEvent::Created {
            id: id.raw(),
            kind: kind.name().to_string(),
        }));
    }

    // ---- deletion ---------------------------------------------------

    /// Transitive descendants of an entry, depth-first over `parent_id`.
    fn collect_descendant_entries(&self, root: EntityId) -> Vec<EntityId> {
        let mut found = Vec::new();
        let mut stack = vec![root];
        while let Some(layer) = stack.pop() {
            for child in self.board.entries.iter_layer(layer) {
                found.push(child.data.id);
                stack.push(child.data.id);
            }
        }
        found
    }

    /// Builds the full delete set for a group of directly targeted
    /// entities: transitive descendant entries of every targeted entry,
    /// plus every live connection touching any collected entry.
    fn build_delete_set(&self, targets: &[(EntityId, EntityKind)]) -> EntitySet {
        let mut entry_ids: HashSet<EntityId> = HashSet::new();
        let mut set = EntitySet::default();

        for &(id, kind) in targets {
            match kind {
                EntityKind::Entry => {
                    if entry_ids.insert(id) {
                        for descendant in self.collect_descendant_entries(id) {
                            entry_ids.insert(descendant);
                        }
                    }
                }
                EntityKind::Group => set.groups.push(id),
                EntityKind::Image => set.images.push(id),
                EntityKind::Connection => set.connections.push(id),
            }
        }

        // Deleting an endpoint always takes the connection with it, even
        // when the user never pointed at the connection.
        let mut connection_ids: HashSet<EntityId> = set.connections.iter().copied().collect();
        for conn in self.board.connections.iter() {
            if conn.data.is_deleted() || connection_ids.contains(&conn.data.id) {
                continue;
            }
            if entry_ids.contains(&conn.data.source) || entry_ids.contains(&conn.data.target) {
                connection_ids.insert(conn.data.id);
                set.connections.push(conn.data.id);
            }
        }

        set.entries = entry_ids.into_iter().collect();
        set
    }

    /// Tombstones an explicit batch of entities as one undo step.
    pub fn delete_entities(&mut self, targets: &[(EntityId, EntityKind)]) -> usize {
        let set = self.build_delete_set(targets);
        if set.is_empty() {
            return 0;
        }
        let count = set.len();
        if self
            .push_command(Command::Delete(DeleteEntities {
                set,
                name: "Delete".to_string(),
            }))
            .is_ok()
        {
            self.emit(AppEvent::Entity(EntityEvent::Deleted { count }));
            count
        } else {
            0
        }
    }

    /// Tombstones the selection, cascading through container entries.
    pub fn delete_selected(&mut self) -> usize {
        let targets: Vec<(EntityId, EntityKind)> = self
            .board
            .selection
            .selected()
            .iter()
            .filter_map(|&id| {
                let mirror = self.board.find_mirror(id)?;
                match mirror.kind {
                    MirrorKind::Entry => Some((id, EntityKind::Entry)),
                    MirrorKind::Group => Some((id, EntityKind::Group)),
                    MirrorKind::Image => Some((id, EntityKind::Image)),
                    MirrorKind::Connection => Some((id, EntityKind::Connection)),
                    MirrorKind::Handle => None,
                }
            })
            .collect();
        if targets.is_empty() {
            return 0;
        }
        self.delete_entities(&targets)
    }

    // ---- edits ------------------------------------------------------

    /// Commits a text edit on an entry. Tombstoned or missing targets
    /// are rejected silently, as are no-op edits.
    pub fn set_entry_text(&mut self, id: EntityId, text: impl Into<String>) {
        let text = text.into();
        if !self.board.entries.is_live(id) {
            return;
        }
        let Some(data) = self.board.entries.data(id) else {
            return;
        };
        if data.text == text {
            return;
        }
        let cmd = Command::EditEntry(EditEntry {
            id,
            old_text: data.text.clone(),
            new_text: text,
            old_mark: data.mark,
            new_mark: data.mark,
        });
        let _ = self.push_command(cmd);
    }

    /// Sets an entry's mark.
    pub fn set_entry_mark(&mut self, id: EntityId, mark: Mark) {
        if !self.board.entries.is_live(id) {
            return;
        }
        let Some(data) = self.board.entries.data(id) else {
            return;
        };
        if data.mark == mark {
            return;
        }
        let cmd = Command::EditEntry(EditEntry {
            id,
            old_text: data.text.clone(),
            new_text: data.text.clone(),
            old_mark: data.mark,
            new_mark: mark,
        });
        let _ = self.push_command(cmd);
    }

    /// Cycles an entry's mark to the next state.
    pub fn cycle_entry_mark(&mut self, id: EntityId) {
        if let Some(data) = self.board.entries.data(id) {
            let next = data.mark.next();
            self.set_entry_mark(id, next);
        }
    }

    /// Commits a label edit on a group box.
    pub fn set_group_label(&mut self, id: EntityId, label: impl Into<String>) {
        let label = label.into();
        if !self.board.groups.is_live(id) {
            return;
        }
        let Some(data) = self.board.groups.data(id) else {
            return;
        };
        if data.label == label {
            return;
        }
        let cmd = Command::EditGroupLabel(EditGroupLabel {
            id,
            old_label: data.label.clone(),
            new_label: label,
        });
        let _ = self.push_command(cmd);
    }

    // ---- resizing ---------------------------------------------------

    /// Resizes a group box to an explicit rectangle.
    pub fn resize_group(&mut self, id: EntityId, x: f64, y: f64, width: f64, height: f64) {
        if !self.board.groups.is_live(id) {
            return;
        }
        let Some(data) = self.board.groups.data(id) else {
            return;
        };
        let cmd = Command::Resize(ResizeEntity {
            id,
            kind: EntityKind::Group,
            old_position: (data.position.x, data.position.y),
            new_position: (x, y),
            old_size: (data.width, data.height),
            new_size: (width, height),
        });
        let _ = self.push_command(cmd);
    }

    /// Resizes an image to a new width; the height follows the locked
    /// aspect ratio.
    pub fn resize_image_to_width(&mut self, id: EntityId, width: f64) {
        if !self.board.images.is_live(id) {
            return;
        }
        let Some(data) = self.board.images.data(id) else {
            return;
        };
        let width = width.max(1.0);
        let aspect = data.height / data.width;
        let cmd = Command::Resize(ResizeEntity {
            id,
            kind: EntityKind::Image,
            old_position: (data.position.x, data.position.y),
            new_position: (data.position.x, data.position.y),
            old_size: (data.width, data.height),
            new_size: (width, width * aspect),
        });
        let _ = self.push_command(cmd);
    }
}
