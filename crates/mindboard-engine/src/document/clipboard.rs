//! Internal copy/paste.
//!
//! The clipboard holds cloned canonical data, not identifiers, so a
//! paste survives deletion (even purging) of the originals. OS clipboard
//! integration stays in the shell.

use std::collections::HashMap;

use super::Document;
use crate::commands::{Command, CreateEntities};
use crate::model::{
    Connection, EntityData, EntityId, EntityKind, EntitySet, Entry, GroupBox, ImageItem,
    MirrorKind,
};
use crate::spatial_index::Bounds;
use mindboard_core::event_bus::{AppEvent, EntityEvent};

/// Cloned entity data held between copy and paste.
#[derive(Debug, Clone, Default)]
pub struct ClipboardContents {
    pub entries: Vec<Entry>,
    pub groups: Vec<GroupBox>,
    pub images: Vec<ImageItem>,
    pub connections: Vec<Connection>,
}

impl ClipboardContents {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
            && self.groups.is_empty()
            && self.images.is_empty()
            && self.connections.is_empty()
    }

    /// Bounding box of everything on the clipboard.
    fn bounds(&self) -> Option<Bounds> {
        let mut all = self
            .entries
            .iter()
            .map(EntityData::bounds)
            .chain(self.groups.iter().map(EntityData::bounds))
            .chain(self.images.iter().map(EntityData::bounds));
        let first = all.next()?;
        Some(all.fold(first, |acc, b| acc.union(&b)))
    }
}

impl Document {
    /// Copies the selected entities' canonical data to the clipboard.
    /// Connections come along only when both endpoints are copied too.
    pub fn copy_selected(&mut self) {
        let mut contents = ClipboardContents::default();
        let mut copied_entries = Vec::new();

        for &id in self.board.selection.selected() {
            let Some(mirror) = self.board.find_mirror(id) else {
                continue;
            };
            match mirror.kind {
                MirrorKind::Entry => {
                    if let Some(data) = self.board.entries.data(id) {
                        copied_entries.push(id);
                        contents.entries.push(data.clone());
                    }
                }
                MirrorKind::Group => {
                    if let Some(data) = self.board.groups.data(id) {
                        contents.groups.push(data.clone());
                    }
                }
                MirrorKind::Image => {
                    if let Some(data) = self.board.images.data(id) {
                        contents.images.push(data.clone());
                    }
                }
                MirrorKind::Connection | MirrorKind::Handle => {}
            }
        }

        // Connections between copied entries travel with them whether or
        // not they were selected themselves.
        for conn in self.board.connections.iter() {
            if conn.data.is_deleted() {
                continue;
            }
            if copied_entries.contains(&conn.data.source)
                && copied_entries.contains(&conn.data.target)
            {
                contents.connections.push(conn.data.clone());
            }
        }

        self.clipboard = contents;
    }

    /// Pastes the clipboard centered on a world point, as one history
    /// entry. Pasted entities get fresh identifiers (intra-clipboard
    /// connections are remapped) and land on the displayed layer,
    /// selected.
    pub fn paste_at(&mut self, x: f64, y: f64) {
        if self.clipboard.is_empty() {
            return;
        }
        let Some(bounds) = self.clipboard.bounds() else {
            return;
        };
        let (cx, cy) = bounds.center();
        let (dx, dy) = (x - cx, y - cy);
        let layer = self.board.active_layer();
        let contents = self.clipboard.clone();

        self.board.deselect_all();

        let mut id_map: HashMap<EntityId, EntityId> = HashMap::new();
        let mut set = EntitySet::default();

        for data in &contents.entries {
            let id = self.board.generate_id();
            id_map.insert(data.id, id);
            let mut pasted = data.clone();
            pasted.id = id;
            pasted.parent_id = layer;
            pasted.deleted = false;
            pasted.translate(dx, dy);
            pasted.render_key = self.board.selection.next_order();
            self.board.insert_entry(pasted);
            set.push(EntityKind::Entry, id);
        }
        for data in &contents.groups {
            let id = self.board.generate_id();
            let mut pasted = data.clone();
            pasted.id = id;
            pasted.parent_id = layer;
            pasted.deleted = false;
            pasted.translate(dx, dy);
            pasted.render_key = self.board.selection.next_order();
            self.board.insert_group(pasted);
            set.push(EntityKind::Group, id);
        }
        for data in &contents.images {
            let id = self.board.generate_id();
            let mut pasted = data.clone();
            pasted.id = id;
            pasted.parent_id = layer;
            pasted.deleted = false;
            pasted.translate(dx, dy);
            pasted.render_key = self.board.selection.next_order();
            self.board.insert_image(pasted);
            set.push(EntityKind::Image, id);
        }
        for data in &contents.connections {
            let (Some(&source), Some(&target)) =
                (id_map.get(&data.source), id_map.get(&data.target))
            else {
                continue;
            };
            let id = self.board.generate_id();
            let mut pasted = data.clone();
            pasted.id = id;
            pasted.parent_id = layer;
            pasted.deleted = false;
            pasted.source = source;
            pasted.target = target;
            pasted.translate(dx, dy);
            pasted.render_key = self.board.selection.next_order();
            self.board.insert_connection(pasted);
            set.push(EntityKind::Connection, id);
        }

        for &id in set
            .entries
            .iter()
            .chain(set.groups.iter())
            .chain(set.images.iter())
        {
            self.board
                .selection
                .select(id, crate::selection_manager::SelectMode::Add);
        }

        let count = set.len();
        self.record_applied(Command::Create(CreateEntities {
            set,
            name: "Paste".to_string(),
        }));
        self.emit(AppEvent::Entity(EntityEvent::Pasted { count }));
    }
}
