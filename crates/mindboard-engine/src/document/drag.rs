//! The interactive drag transaction.
//!
//! Mutations during a drag happen live against the board; nothing is
//! recorded until the drag commits at `drag_end`, so an aborted drag
//! leaves no history entry at all.

use super::Document;
use crate::commands::{Command, MoveEntities};
use crate::model::{EntityId, EntityKind, MirrorKind};
use crate::selection_manager::DragTarget;
use mindboard_core::event_bus::{AppEvent, EntityEvent};

impl Document {
    /// Begins dragging the selection. Promotes the dragged objects above
    /// their layer and removes them from the spatial index for the
    /// duration.
    pub fn drag_start(&mut self) {
        self.board.drag_start();
    }

    /// Applies an incremental drag delta.
    pub fn drag_update(&mut self, dx: f64, dy: f64) {
        self.board.drag_update(dx, dy);
    }

    /// Commits the drag as a single history entry.
    pub fn drag_end(&mut self) {
        let Some(commit) = self.board.drag_end() else {
            return;
        };
        if commit.targets.is_empty() {
            return;
        }
        let count = commit.targets.len();
        self.record_applied(Command::Move(MoveEntities {
            targets: commit.targets,
            dx: commit.dx,
            dy: commit.dy,
        }));
        self.emit(AppEvent::Entity(EntityEvent::Dropped { count }));
    }

    /// Abandons the drag, restoring positions and render keys. No
    /// history entry is recorded.
    pub fn drag_abort(&mut self) {
        self.board.drag_abort();
    }

    pub fn is_dragging(&self) -> bool {
        self.board.selection.is_dragging()
    }

    /// Programmatic move of the selection (keyboard nudge), recorded as
    /// one step without touching render keys.
    pub fn move_selected(&mut self, dx: f64, dy: f64) {
        let targets: Vec<DragTarget> = self
            .board
            .selection
            .selected()
            .iter()
            .filter_map(|&id| {
                let mirror = self.board.find_mirror(id)?;
                if !mirror.draggable || mirror.screen_space || mirror.kind == MirrorKind::Handle {
                    return None;
                }
                Some(DragTarget {
                    id,
                    kind: mirror.kind,
                    old_key: mirror.render_key,
                    new_key: mirror.render_key,
                })
            })
            .collect();
        if targets.is_empty() {
            return;
        }
        let _ = self.push_command(Command::Move(MoveEntities { targets, dx, dy }));
    }

    /// Convenience for tests and shells: ids currently being dragged.
    pub fn dragged_ids(&self) -> Vec<EntityId> {
        self.board
            .selection
            .drag_state()
            .map(|s| s.targets.iter().map(|t| t.id).collect())
            .unwrap_or_default()
    }

    /// Kind-aware translation used by shell-driven nudges of a single
    /// entity outside the selection.
    pub fn nudge_entity(&mut self, id: EntityId, kind: EntityKind, dx: f64, dy: f64) {
        if self.board.render_key_of(id, kind).is_none() {
            return;
        }
        let Some(mirror) = self.board.find_mirror(id) else {
            return;
        };
        let target = DragTarget {
            id,
            kind: mirror.kind,
            old_key: mirror.render_key,
            new_key: mirror.render_key,
        };
        let _ = self.push_command(Command::Move(MoveEntities {
            targets: vec![target],
            dx,
            dy,
        }));
    }
}
