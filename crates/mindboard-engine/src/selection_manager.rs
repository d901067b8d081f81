//! Selection state and the drag transaction bookkeeping.
//!
//! `SelectionManager` owns three tightly-coupled pieces of state:
//! - the current selection, as an ordered, deduplicated id list (the last
//!   element is the primary selection),
//! - the document-wide render-order counter every kind of entity shares,
//!   bumped once per drag boundary so dragged content rises above the
//!   rest of its layer,
//! - the in-flight drag transaction, if any.
//!
//! # Selection Model
//!
//! - **Replace** clears the selection before inserting.
//! - **Add** inserts with move-to-end semantics, so re-adding an id makes
//!   it primary without duplicating it.
//! - **Remove** discards the id if present.
//!
//! Pointer-driven batch selection silently skips mirrors that are not
//! selectable as well as transient handle mirrors.
//!
//! # Design
//!
//! The manager holds plain data; the board applies the side effects of
//! selection changes (spatial-index membership, mirror promotion) so a
//! mutation never happens behind the board's back.

use crate::model::{EntityId, Mirror, MirrorKind};

/// How a selection request combines with the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// Clear, then select the given objects.
    Replace,
    /// Keep the current selection, adding the given objects.
    Add,
    /// Discard the given objects from the selection.
    Remove,
}

/// One object participating in the in-flight drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragTarget {
    pub id: EntityId,
    pub kind: MirrorKind,
    /// Render key before the drag promoted the object.
    pub old_key: i64,
    /// Render key assigned at drag start.
    pub new_key: i64,
}

/// Bookkeeping for a drag transaction between start and end/abort.
#[derive(Debug, Clone, Default)]
pub struct DragState {
    pub targets: Vec<DragTarget>,
    /// Total delta applied since drag start, used to revert an abort and
    /// to record the commit as one history entry.
    pub accum_dx: f64,
    pub accum_dy: f64,
}

/// Selection set plus render-order counter.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    /// Selected ids in insertion order; last is primary.
    selected: Vec<EntityId>,
    /// Monotonic counter shared by all entity kinds; never decreases
    /// within one layer view.
    order_counter: i64,
    drag: Option<DragState>,
}

impl SelectionManager {
    /// Creates a new `SelectionManager` with no selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected ids in insertion order.
    pub fn selected(&self) -> &[EntityId] {
        &self.selected
    }

    /// The primary selection, if any.
    pub fn primary(&self) -> Option<EntityId> {
        self.selected.last().copied()
    }

    pub fn is_selected(&self, id: EntityId) -> bool {
        self.selected.contains(&id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Applies one id with the given mode.
    pub fn select(&mut self, id: EntityId, mode: SelectMode) {
        match mode {
            SelectMode::Replace => {
                self.selected.clear();
                self.selected.push(id);
            }
            SelectMode::Add => {
                self.selected.retain(|other| *other != id);
                self.selected.push(id);
            }
            SelectMode::Remove => {
                self.selected.retain(|other| *other != id);
            }
        }
    }

    /// Applies one mode to a batch of candidate mirrors.
    ///
    /// When `pointer` is true the candidates came from pointer input and
    /// non-selectable or handle mirrors are skipped without an error.
    pub fn select_batch<'a, I>(&mut self, candidates: I, mode: SelectMode, pointer: bool)
    where
        I: IntoIterator<Item = &'a Mirror>,
    {
        if mode == SelectMode::Replace {
            self.selected.clear();
        }
        for mirror in candidates {
            if pointer && (!mirror.selectable || mirror.kind == MirrorKind::Handle) {
                continue;
            }
            match mode {
                SelectMode::Replace | SelectMode::Add => {
                    self.selected.retain(|other| *other != mirror.id);
                    self.selected.push(mirror.id);
                }
                SelectMode::Remove => {
                    self.selected.retain(|other| *other != mirror.id);
                }
            }
        }
    }

    /// Drops an id from the selection (deleted entities must not linger).
    pub fn discard(&mut self, id: EntityId) {
        self.selected.retain(|other| *other != id);
    }

    /// Clears the selection. An in-flight drag is intentionally left
    /// untouched; callers abort it explicitly.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Increments the render-order counter and returns the fresh value.
    pub fn next_order(&mut self) -> i64 {
        self.order_counter += 1;
        self.order_counter
    }

    /// Current counter value without incrementing.
    pub fn current_order(&self) -> i64 {
        self.order_counter
    }

    /// Resets the counter to sit above every key in the freshly loaded
    /// layer.
    pub fn reset_order_floor(&mut self, max_key: i64) {
        self.order_counter = max_key;
    }

    /// Begins a drag transaction over the given targets.
    pub fn begin_drag(&mut self, targets: Vec<DragTarget>) {
        debug_assert!(self.drag.is_none(), "drag already in flight");
        self.drag = Some(DragState {
            targets,
            accum_dx: 0.0,
            accum_dy: 0.0,
        });
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag_state(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn drag_state_mut(&mut self) -> Option<&mut DragState> {
        self.drag.as_mut()
    }

    /// Takes the drag transaction out, ending it.
    pub fn take_drag(&mut self) -> Option<DragState> {
        self.drag.take()
    }

    /// Drops every transient handle from the selection (drag teardown).
    pub fn purge_handles<F>(&mut self, is_handle: F)
    where
        F: Fn(EntityId) -> bool,
    {
        self.selected.retain(|id| !is_handle(*id));
    }
}
