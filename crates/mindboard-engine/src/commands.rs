//! Reversible board commands.
//!
//! Every undoable mutation is a plain-data command variant holding
//! identifiers and field deltas only, never references into the stores,
//! so a command outliving its entities (until cleanup purges them) can
//! not dangle. Each variant has three arms:
//!
//! - `apply` performs (or re-performs) the mutation,
//! - `undo` reverses it exactly, render keys included,
//! - `cleanup` runs when the command is discarded from history and
//!   permanently purges whichever of its entities are tombstoned at that
//!   moment.
//!
//! An `Err` out of `apply`/`undo` means the canonical state no longer
//! matches what the command recorded; the history reacts by clearing
//! itself rather than trusting a half-replayed stack.

use crate::board::{Board, SavedKey};
use crate::model::{EntityId, EntityKind, EntitySet, Mark};
use crate::selection_manager::DragTarget;
use mindboard_core::error::{Error, HistoryError};

/// Checks that every id in a set still resolves in its store.
///
/// Tombstoned entities pass; only an id purged out from under the command
/// fails, which is the signal the history stack can no longer be trusted.
fn verify_set(board: &Board, set: &EntitySet) -> Result<(), Error> {
    let missing = set
        .entries
        .iter()
        .find(|id| !board.entries.contains(**id))
        .or_else(|| set.groups.iter().find(|id| !board.groups.contains(**id)))
        .or_else(|| set.images.iter().find(|id| !board.images.contains(**id)))
        .or_else(|| {
            set.connections
                .iter()
                .find(|id| !board.connections.contains(**id))
        });
    match missing {
        Some(id) => Err(HistoryError::PurgedEntity { id: id.raw() }.into()),
        None => Ok(()),
    }
}

/// Creation of a batch of entities.
///
/// The entities are inserted by the document before the command is
/// recorded; `apply` therefore only ever runs as a redo, clearing the
/// tombstones its own `undo` set.
#[derive(Debug, Clone)]
pub struct CreateEntities {
    pub set: EntitySet,
    pub name: String,
}

/// Tombstoning of a batch of entities as one undo step.
#[derive(Debug, Clone)]
pub struct DeleteEntities {
    pub set: EntitySet,
    pub name: String,
}

/// A committed drag: translation plus render-key promotion.
#[derive(Debug, Clone)]
pub struct MoveEntities {
    pub targets: Vec<DragTarget>,
    pub dx: f64,
    pub dy: f64,
}

/// Size (and anchor position) change of a group or image.
#[derive(Debug, Clone)]
pub struct ResizeEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub old_position: (f64, f64),
    pub new_position: (f64, f64),
    pub old_size: (f64, f64),
    pub new_size: (f64, f64),
}

/// Text/mark edit of an entry, committed as one step.
#[derive(Debug, Clone)]
pub struct EditEntry {
    pub id: EntityId,
    pub old_text: String,
    pub new_text: String,
    pub old_mark: Mark,
    pub new_mark: Mark,
}

/// Label edit of a group box.
#[derive(Debug, Clone)]
pub struct EditGroupLabel {
    pub id: EntityId,
    pub old_label: String,
    pub new_label: String,
}

/// Navigation between hierarchy layers.
///
/// `saved_keys` is filled in by `apply`: the outgoing layer's keys before
/// compaction, restored verbatim on undo.
#[derive(Debug, Clone)]
pub struct SwitchLayer {
    pub from: EntityId,
    pub to: EntityId,
    pub saved_keys: Vec<SavedKey>,
}

/// Several commands treated as one user-visible step.
#[derive(Debug, Clone)]
pub struct CompositeCommand {
    pub commands: Vec<Command>,
    pub name: String,
}

/// A recorded, reversible board mutation.
#[derive(Debug, Clone)]
pub enum Command {
    Create(CreateEntities),
    Delete(DeleteEntities),
    Move(MoveEntities),
    Resize(ResizeEntity),
    EditEntry(EditEntry),
    EditGroupLabel(EditGroupLabel),
    SwitchLayer(SwitchLayer),
    Composite(CompositeCommand),
}

impl Command {
    /// Display name for undo/redo menus and history events.
    pub fn name(&self) -> &str {
        match self {
            Command::Create(cmd) => &cmd.name,
            Command::Delete(cmd) => &cmd.name,
            Command::Move(_) => "Move",
            Command::Resize(_) => "Resize",
            Command::EditEntry(_) => "Edit Entry",
            Command::EditGroupLabel(_) => "Edit Label",
            Command::SwitchLayer(_) => "Enter Layer",
            Command::Composite(cmd) => &cmd.name,
        }
    }

    /// Performs (or re-performs) the mutation.
    pub fn apply(&mut self, board: &mut Board) -> Result<(), Error> {
        match self {
            Command::Create(cmd) => {
                verify_set(board, &cmd.set)?;
                board.unmark_deleted(&cmd.set);
                Ok(())
            }
            Command::Delete(cmd) => {
                verify_set(board, &cmd.set)?;
                board.mark_deleted(&cmd.set);
                Ok(())
            }
            // Recording happens after the live drag already moved the
            // objects, so `apply` only ever runs as a redo, with the
            // targets back in the index.
            Command::Move(cmd) => move_targets(board, &cmd.targets, cmd.dx, cmd.dy, false),
            Command::Resize(cmd) => {
                resize_to(board, cmd.id, cmd.kind, cmd.new_position, cmd.new_size)
            }
            Command::EditEntry(cmd) => {
                edit_entry(board, cmd.id, &cmd.new_text, cmd.new_mark)
            }
            Command::EditGroupLabel(cmd) => edit_group_label(board, cmd.id, &cmd.new_label),
            Command::SwitchLayer(cmd) => {
                cmd.saved_keys = board.load_layer(cmd.to)?;
                Ok(())
            }
            Command::Composite(cmd) => {
                for sub in &mut cmd.commands {
                    sub.apply(board)?;
                }
                Ok(())
            }
        }
    }

    /// Reverses the mutation exactly.
    pub fn undo(&mut self, board: &mut Board) -> Result<(), Error> {
        match self {
            Command::Create(cmd) => {
                verify_set(board, &cmd.set)?;
                board.mark_deleted(&cmd.set);
                Ok(())
            }
            Command::Delete(cmd) => {
                verify_set(board, &cmd.set)?;
                board.unmark_deleted(&cmd.set);
                Ok(())
            }
            Command::Move(cmd) => move_targets(board, &cmd.targets, -cmd.dx, -cmd.dy, true),
            Command::Resize(cmd) => {
                resize_to(board, cmd.id, cmd.kind, cmd.old_position, cmd.old_size)
            }
            Command::EditEntry(cmd) => {
                edit_entry(board, cmd.id, &cmd.old_text, cmd.old_mark)
            }
            Command::EditGroupLabel(cmd) => edit_group_label(board, cmd.id, &cmd.old_label),
            Command::SwitchLayer(cmd) => {
                board.load_layer(cmd.from)?;
                board.restore_keys(&cmd.saved_keys);
                let max_key = board.max_live_render_key();
                board.selection.reset_order_floor(max_key);
                Ok(())
            }
            Command::Composite(cmd) => {
                for sub in cmd.commands.iter_mut().rev() {
                    sub.undo(board)?;
                }
                Ok(())
            }
        }
    }

    /// Runs when the command falls out of history: capacity eviction and
    /// cleanup-clearing close discard commands in applied state, branch
    /// truncation discards undone ones. A command only purges tombstones
    /// it owns in the state it is discarded in: an applied delete owns
    /// its victims, an undone create owns its never-redone children. An
    /// entity tombstoned by a *younger* command is therefore never purged out
    /// from under that command's undo.
    pub fn cleanup(&self, board: &mut Board, undone: bool) {
        match self {
            Command::Create(cmd) if undone => {
                board.purge_tombstoned(&cmd.set);
            }
            Command::Delete(cmd) if !undone => {
                board.purge_tombstoned(&cmd.set);
            }
            Command::Composite(cmd) => {
                for sub in &cmd.commands {
                    sub.cleanup(board, undone);
                }
            }
            _ => {}
        }
    }
}

/// Translates move targets and replays their render-key promotion.
///
/// `undo` restores the pre-drag keys verbatim; redo re-applies the
/// promoted ones.
fn move_targets(
    board: &mut Board,
    targets: &[DragTarget],
    dx: f64,
    dy: f64,
    restore_old_keys: bool,
) -> Result<(), Error> {
    let mut moved_entries = Vec::new();
    for target in targets {
        let Some(kind) = crate::board::entity_kind_of(target.kind) else {
            continue;
        };
        if !board.translate(target.id, kind, dx, dy, true) {
            return Err(HistoryError::PurgedEntity {
                id: target.id.raw(),
            }
            .into());
        }
        let key = if restore_old_keys {
            target.old_key
        } else {
            target.new_key
        };
        board.set_render_key(target.id, kind, key);
        if kind == EntityKind::Entry {
            moved_entries.push(target.id);
        }
    }
    board.sync_connections_touching(&moved_entries);
    Ok(())
}

fn resize_to(
    board: &mut Board,
    id: EntityId,
    kind: EntityKind,
    position: (f64, f64),
    size: (f64, f64),
) -> Result<(), Error> {
    match kind {
        EntityKind::Group => {
            let data = board
                .groups
                .data_mut(id)
                .ok_or(HistoryError::PurgedEntity { id: id.raw() })?;
            data.position.x = position.0;
            data.position.y = position.1;
            data.resize(size.0, size.1);
        }
        EntityKind::Image => {
            let data = board
                .images
                .data_mut(id)
                .ok_or(HistoryError::PurgedEntity { id: id.raw() })?;
            data.position.x = position.0;
            data.position.y = position.1;
            data.width = size.0.max(1.0);
            data.height = size.1.max(1.0);
        }
        _ => {
            return Err(HistoryError::StateMismatch {
                detail: format!("{} is not resizable", kind.name()),
            }
            .into());
        }
    }
    board.refresh_bounds(id, kind);
    Ok(())
}

fn edit_entry(board: &mut Board, id: EntityId, text: &str, mark: Mark) -> Result<(), Error> {
    let data = board
        .entries
        .data_mut(id)
        .ok_or(HistoryError::PurgedEntity { id: id.raw() })?;
    data.text = text.to_string();
    data.mark = mark;
    board.refresh_bounds(id, EntityKind::Entry);
    // The entry's box may have grown or shrunk; attached connections
    // anchor to its center.
    board.sync_connections_touching(&[id]);
    Ok(())
}

fn edit_group_label(board: &mut Board, id: EntityId, label: &str) -> Result<(), Error> {
    let data = board
        .groups
        .data_mut(id)
        .ok_or(HistoryError::PurgedEntity { id: id.raw() })?;
    data.label = label.to_string();
    Ok(())
}
