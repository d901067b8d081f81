//! Hierarchy navigation with fault recovery.
//!
//! A successful layer switch is one undoable step. A failed load is
//! retried once against the root layer; if even the root will not load,
//! the document degrades to a full reset instead of crashing the frame
//! loop.

use tracing::{debug, error, warn};

use super::Document;
use crate::commands::{Command, SwitchLayer};
use crate::model::EntityId;
use mindboard_core::error::{DocumentError, Error};
use mindboard_core::event_bus::{AppEvent, DocumentEvent, ErrorEvent, LayerEvent};

impl Document {
    /// The layer currently displayed.
    pub fn active_layer(&self) -> EntityId {
        self.board.active_layer()
    }

    /// Switches the displayed layer, recording the switch as one
    /// undoable step.
    ///
    /// On a load fault the switch is retried against the root layer (not
    /// recorded, history cleared without cleanup); a second fault resets
    /// the document and surfaces the error to the shell.
    pub fn enter_layer(&mut self, target: EntityId) -> Result<(), Error> {
        let from = self.board.active_layer();
        if target == from {
            return Ok(());
        }
        // Navigating into a missing or tombstoned layer is an invalid
        // request, not a fault: rejected silently, nothing recorded.
        if target != EntityId::ROOT && !self.board.entries.is_live(target) {
            debug!("layer switch rejected: {target} is not live");
            return Ok(());
        }

        let mut cmd = Command::SwitchLayer(SwitchLayer {
            from,
            to: target,
            saved_keys: Vec::new(),
        });
        match cmd.apply(&mut self.board) {
            Ok(()) => {
                self.record_applied(cmd);
                self.emit(AppEvent::Layer(LayerEvent::Switched {
                    from: from.raw(),
                    to: target.raw(),
                }));
                Ok(())
            }
            Err(err) => {
                warn!("layer {target} failed to load, retrying at root: {err}");
                self.emit(AppEvent::Layer(LayerEvent::Retried {
                    failed: target.raw(),
                }));
                self.recover_at_root(target)
            }
        }
    }

    /// Navigates to the parent of the displayed layer.
    pub fn exit_to_parent(&mut self) -> Result<(), Error> {
        let active = self.board.active_layer();
        if active == EntityId::ROOT {
            return Ok(());
        }
        let parent = self
            .board
            .entries
            .data(active)
            .map(|e| e.parent_id)
            .unwrap_or(EntityId::ROOT);
        self.enter_layer(parent)
    }

    /// Second-chance load against the root layer after `failed` refused
    /// to load. The history can not be trusted across a half-finished
    /// switch, so it is cleared without running cleanup.
    fn recover_at_root(&mut self, failed: EntityId) -> Result<(), Error> {
        self.clear_history(false);
        match self.board.load_layer(EntityId::ROOT) {
            Ok(_) => {
                self.emit(AppEvent::Error(ErrorEvent::Recovered {
                    message: format!("layer {failed} failed to load, now at root"),
                }));
                Ok(())
            }
            Err(err) => {
                error!("root layer failed to load after retry, resetting document: {err}");
                self.reset();
                Err(DocumentError::Reset {
                    layer: failed.raw(),
                }
                .into())
            }
        }
    }

    /// Top-level reset: drops all state and returns to an empty root
    /// layer. The last resort when canonical data is beyond repair.
    pub fn reset(&mut self) {
        self.clear_history(false);
        self.board.clear();
        self.clipboard = Default::default();
        self.is_modified = false;
        self.emit(AppEvent::Error(ErrorEvent::Degraded {
            message: "document reset".to_string(),
        }));
        self.emit(AppEvent::Document(DocumentEvent::Reset));
    }

    /// Closes the document: every pending cleanup fires so no tombstone
    /// outlives the history that owned it, then all state drops.
    pub fn close(&mut self) {
        self.clear_history(true);
        self.board.clear();
        self.clipboard = Default::default();
        self.is_modified = false;
    }
}
