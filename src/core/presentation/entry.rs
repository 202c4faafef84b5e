//=========================================================================
// Presentable Entry
//=========================================================================
//
// One controller instance tracked by the presentation stack.
//
//   EntryId       → stack-scoped identifier, never reused
//   IdAllocator   → owned by the stack (no process-wide counters)
//   EntryInfo     → copyable read-only snapshot for diagnostics
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use crossbeam_channel::Sender;
use log::warn;

//=== Internal Dependencies ===============================================

use super::handle::{CancellationToken, DismissOutcome, PresentOutcome};
use super::lifecycle::{EntryState, Stage};
use super::{Controller, ControllerKind, PresentFlags};
use crate::core::error::ControllerFault;
use crate::core::host_bridge::ViewHandle;

//=== EntryId =============================================================

/// Identifier of a presented entry.
///
/// Ids are allocated monotonically by the owning stack and are never
/// reused while that stack lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl EntryId {
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//=== IdAllocator =========================================================

pub(crate) struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub(crate) fn new() -> Self {
        Self { next: 1 }
    }

    pub(crate) fn allocate(&mut self) -> EntryId {
        let id = EntryId(self.next);
        self.next += 1;
        id
    }
}

//=== EntryInfo ===========================================================

/// Read-only snapshot of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryInfo<K: ControllerKind> {
    pub id: EntryId,
    pub kind: K,
    pub parent: Option<EntryId>,
    pub layer: i32,
    pub flags: PresentFlags,
    pub state: EntryState,
    pub view: ViewHandle,
}

//=== PresentableEntry ====================================================

pub(crate) struct PresentableEntry<K: ControllerKind> {
    pub(crate) id: EntryId,
    pub(crate) kind: K,
    pub(crate) parent: Option<EntryId>,
    pub(crate) layer: i32,
    pub(crate) flags: PresentFlags,
    pub(crate) state: EntryState,
    pub(crate) stage: Stage,
    pub(crate) view: ViewHandle,
    pub(crate) token: CancellationToken,
    pub(crate) controller: Box<dyn Controller<K>>,

    //--- Completion -------------------------------------------------------
    pub(crate) completion: Option<Sender<PresentOutcome>>,
    pub(crate) dismiss_waiters: Vec<Sender<DismissOutcome>>,

    /// First fault captured while presenting or dismissing.
    pub(crate) fault: Option<ControllerFault>,
}

impl<K: ControllerKind> PresentableEntry<K> {
    pub(crate) fn info(&self) -> EntryInfo<K> {
        EntryInfo {
            id: self.id,
            kind: self.kind,
            parent: self.parent,
            layer: self.layer,
            flags: self.flags,
            state: self.state,
            view: self.view,
        }
    }

    /// Applies a state change if the transition table allows it.
    pub(crate) fn set_state(&mut self, next: EntryState) -> bool {
        if !self.state.can_transition_to(next) {
            warn!(
                target: "presenter::lifecycle",
                "Refused transition {} -> {} for entry {} ({:?})",
                self.state, next, self.id, self.kind
            );
            return false;
        }

        self.state = next;
        true
    }

    pub(crate) fn is_modal(&self) -> bool {
        self.flags.contains(PresentFlags::MODAL)
    }

    pub(crate) fn can_activate(&self) -> bool {
        self.state.is_settled() && !self.flags.contains(PresentFlags::DO_NOT_ACTIVATE)
    }

    /// Records the first fault; later faults are dropped.
    pub(crate) fn record_fault(&mut self, fault: ControllerFault) {
        if self.fault.is_none() {
            self.fault = Some(fault);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
