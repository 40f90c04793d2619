//! Drag-reorder state machine.
//!
//! Translates a continuous drag gesture into at most one discrete reorder
//! mutation on the [`Composer`]. The machine is decoupled from any input or
//! rendering technology: callers feed it a grab, proposed slots, and a
//! release or cancel; only the release may touch the composer, and it calls
//! `reorder` at most once.

use crate::composer::Composer;
use crate::document::{BlockId, LayoutDocument};
use crate::storage::LayoutStore;
use log::warn;

/// State of a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// A block is detached and floating.
    Dragging {
        /// The grabbed block.
        block_id: BlockId,
        /// Index the block was grabbed from.
        origin: usize,
        /// Proposed insertion slot; transient UI feedback only.
        proposed: usize,
        /// Block count when the grab started, for clamping proposals.
        block_count: usize,
    },
}

/// What a release did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The composer applied the reorder.
    Moved,
    /// Released at the origin slot (or no drag active); nothing to do.
    NoChange,
    /// The drop was invalid (e.g. it would displace the header) and was
    /// silently discarded. Reordering is a casual interaction; unlike a
    /// failed commit this is not surfaced as an error.
    Rejected,
}

/// Short-lived controller for one drag session at a time.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    /// Create an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current drag state.
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Check if a drag is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The block currently floating, so the renderer can ghost it in place.
    pub fn dragging_id(&self) -> Option<BlockId> {
        match self.state {
            DragState::Dragging { block_id, .. } => Some(block_id),
            DragState::Idle => None,
        }
    }

    /// Begin a drag on a block's handle.
    ///
    /// Returns false without changing state when a drag is already active
    /// (the originating gesture wins), when the id is unknown, or when the
    /// grabbed block is the pinned header.
    pub fn begin(&mut self, doc: &LayoutDocument, block_id: BlockId) -> bool {
        if self.is_active() {
            return false;
        }
        let Some(origin) = doc.position(block_id) else {
            return false;
        };
        let Some(block) = doc.block(block_id) else {
            return false;
        };
        if block.kind.is_header() {
            return false;
        }

        self.state = DragState::Dragging {
            block_id,
            origin,
            proposed: origin,
            block_count: doc.blocks.len(),
        };
        true
    }

    /// Update the proposed insertion slot while hovering.
    ///
    /// Only records UI feedback; the composer is never touched here. Slot 0
    /// is recorded as proposed and rejected on release.
    pub fn update(&mut self, slot: usize) {
        if let DragState::Dragging { proposed, block_count, .. } = &mut self.state {
            *proposed = slot.min(block_count.saturating_sub(1));
        }
    }

    /// Release the drag, applying the reorder through the composer.
    ///
    /// Calls `Composer::reorder` at most once, then returns to idle.
    pub fn end<S: LayoutStore>(&mut self, composer: &mut Composer<S>) -> DropOutcome {
        let state = std::mem::take(&mut self.state);
        let DragState::Dragging { block_id, proposed, .. } = state else {
            return DropOutcome::NoChange;
        };

        let Some(doc) = composer.document() else {
            return DropOutcome::Rejected;
        };
        // Recompute from the live document: it may have changed during the
        // drag (e.g. a block removed from a different control).
        let Some(current) = doc.position(block_id) else {
            return DropOutcome::Rejected;
        };
        if proposed == 0 {
            // Would displace the header.
            return DropOutcome::Rejected;
        }
        let proposed = proposed.min(doc.blocks.len() - 1);
        if proposed == current {
            return DropOutcome::NoChange;
        }

        let mut order = doc.block_ids();
        order.remove(current);
        order.insert(proposed, block_id);

        match composer.reorder(&order) {
            Ok(()) => DropOutcome::Moved,
            Err(e) => {
                warn!("drop of {} rejected by composer: {}", block_id, e);
                DropOutcome::Rejected
            }
        }
    }

    /// Cancel the drag (escape gesture, focus loss). Reverts to the original
    /// order with no mutation call.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}
