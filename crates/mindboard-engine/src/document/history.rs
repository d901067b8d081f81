//! Command recording and undo/redo for the document.

use tracing::warn;

use super::Document;
use crate::commands::Command;
use mindboard_core::error::Error;
use mindboard_core::event_bus::{AppEvent, HistoryEvent};

impl Document {
    /// Applies a command against the board and records it.
    ///
    /// This is the commit point for every explicit action; interactive
    /// drags record through [`Document::drag_end`] instead, after their
    /// mutations already happened live.
    pub fn push_command(&mut self, mut cmd: Command) -> Result<(), Error> {
        let name = cmd.name().to_string();
        if let Err(err) = cmd.apply(&mut self.board) {
            warn!("command '{name}' rejected: {err}");
            return Err(err);
        }
        self.record_applied(cmd);
        Ok(())
    }

    /// Records a command whose mutation has already been applied.
    pub(crate) fn record_applied(&mut self, cmd: Command) {
        let name = cmd.name().to_string();
        self.history.record(cmd, &mut self.board);
        self.is_modified = true;
        self.emit(AppEvent::History(HistoryEvent::Recorded { name }));
    }

    /// Undoes the last step. Returns false when there was nothing to
    /// undo (or the stack was cleared by a fault).
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&mut self.board) {
            Some(name) => {
                self.is_modified = true;
                self.emit(AppEvent::History(HistoryEvent::Undone { name }));
                true
            }
            None => false,
        }
    }

    /// Redoes the last undone step.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(&mut self.board) {
            Some(name) => {
                self.is_modified = true;
                self.emit(AppEvent::History(HistoryEvent::Redone { name }));
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Name of the step an undo would reverse, for menus.
    pub fn undo_description(&self) -> Option<String> {
        self.history.undo_description()
    }

    /// Name of the step a redo would re-apply, for menus.
    pub fn redo_description(&self) -> Option<String> {
        self.history.redo_description()
    }

    /// Empties the history. With `run_cleanup` every pending cleanup
    /// fires first, hard-purging the tombstones the stack still owned;
    /// plain navigation recovery passes false.
    pub fn clear_history(&mut self, run_cleanup: bool) {
        self.history.clear(run_cleanup, &mut self.board);
        self.emit(AppEvent::History(HistoryEvent::Cleared));
    }
}
