//! Bounded undo/redo history.
//!
//! One list of commands plus a cursor. Everything left of the cursor is
//! applied; everything right of it is the redo branch. Recording after an
//! undo discards that branch, and exceeding the capacity evicts from the
//! oldest end. Both discard paths run the dropped commands' cleanup,
//! which is the only place tombstoned entities are ever hard-purged.
//!
//! A failure inside any undo/redo arm is terminal for the stack: the
//! fault is logged and the whole history is cleared, because a
//! half-replayed stack can silently corrupt every later step.

use tracing::{debug, error};

use crate::board::Board;
use crate::commands::Command;
use mindboard_core::constants::HISTORY_CAPACITY;

/// Bounded, cursor-based command history.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    commands: Vec<Command>,
    /// Number of currently applied commands; index of the next redo.
    cursor: usize,
    capacity: usize,
    enabled: bool,
}

impl CommandHistory {
    /// Creates a history bounded to `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            commands: Vec::new(),
            cursor: 0,
            capacity: capacity.max(1),
            enabled: true,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of undoable steps.
    pub fn undo_depth(&self) -> usize {
        self.cursor
    }

    /// Number of redoable steps.
    pub fn redo_depth(&self) -> usize {
        self.commands.len() - self.cursor
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.commands.len()
    }

    /// Name of the step an undo would reverse.
    pub fn undo_description(&self) -> Option<String> {
        self.cursor
            .checked_sub(1)
            .map(|idx| self.commands[idx].name().to_string())
    }

    /// Name of the step a redo would re-apply.
    pub fn redo_description(&self) -> Option<String> {
        self.commands.get(self.cursor).map(|c| c.name().to_string())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Suspends recording (bulk loads). Commands pushed while disabled
    /// are cleaned up immediately since nothing will ever undo them.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Records an already-applied command.
    ///
    /// Discards the redo branch, appends, then enforces the capacity by
    /// evicting from the oldest end. Every discarded command's cleanup
    /// runs against the board.
    pub fn record(&mut self, cmd: Command, board: &mut Board) {
        if !self.enabled {
            // Nothing will ever undo it, so its cleanup fires now.
            cmd.cleanup(board, false);
            return;
        }

        // The redo branch holds undone commands.
        for dropped in self.commands.drain(self.cursor..) {
            dropped.cleanup(board, true);
        }

        self.commands.push(cmd);
        self.cursor += 1;

        while self.commands.len() > self.capacity {
            let evicted = self.commands.remove(0);
            debug!("history capacity reached, evicting '{}'", evicted.name());
            evicted.cleanup(board, false);
            self.cursor -= 1;
        }
    }

    /// Undoes the step at the cursor.
    ///
    /// Returns the undone step's name, or `None` when there was nothing
    /// to undo or the undo faulted (in which case the stack is cleared).
    pub fn undo(&mut self, board: &mut Board) -> Option<String> {
        if self.cursor == 0 {
            return None;
        }
        let idx = self.cursor - 1;
        let name = self.commands[idx].name().to_string();
        match self.commands[idx].undo(board) {
            Ok(()) => {
                self.cursor = idx;
                Some(name)
            }
            Err(err) => {
                error!("undo of '{name}' failed, clearing history: {err}");
                self.clear(false, board);
                None
            }
        }
    }

    /// Redoes the step at the cursor.
    ///
    /// Returns the redone step's name, or `None` when there was nothing
    /// to redo or the redo faulted (in which case the stack is cleared).
    pub fn redo(&mut self, board: &mut Board) -> Option<String> {
        if self.cursor >= self.commands.len() {
            return None;
        }
        let name = self.commands[self.cursor].name().to_string();
        match self.commands[self.cursor].apply(board) {
            Ok(()) => {
                self.cursor += 1;
                Some(name)
            }
            Err(err) => {
                error!("redo of '{name}' failed, clearing history: {err}");
                self.clear(false, board);
                None
            }
        }
    }

    /// Empties the stack.
    ///
    /// With `run_cleanup` (document close) every pending cleanup fires,
    /// purging all tombstones the stack still owned. Without it (layer
    /// re-navigation, fault recovery) the commands are just dropped.
    pub fn clear(&mut self, run_cleanup: bool, board: &mut Board) {
        if run_cleanup {
            let cursor = self.cursor;
            for (idx, cmd) in self.commands.drain(..).enumerate() {
                cmd.cleanup(board, idx >= cursor);
            }
        } else {
            self.commands.clear();
        }
        self.cursor = 0;
    }

    /// Evicts oldest entries until at most `depth` undo steps remain.
    pub fn trim_to_depth(&mut self, depth: usize, board: &mut Board) {
        while self.cursor > depth {
            let evicted = self.commands.remove(0);
            evicted.cleanup(board, false);
            self.cursor -= 1;
        }
    }

    /// Display names of every recorded step, oldest first.
    pub fn names(&self) -> Vec<String> {
        self.commands.iter().map(|c| c.name().to_string()).collect()
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}
