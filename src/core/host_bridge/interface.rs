//=========================================================================
// Host Bridge Interface
//=========================================================================
//
// Host-to-core contract: view creation and host events.
//
// The core never renders anything. It asks the host's view factory for
// an opaque handle and gives it back through `destroy_view` on disposal.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::task::Poll;

//=== Internal Dependencies ===============================================

use crate::core::args::Args;
use crate::core::error::ViewCreationError;
use crate::core::presentation::{ControllerKind, EntryId, PopTarget, PresentOptions};

//=== ViewHandle ==========================================================

/// Opaque handle to a host-created view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewHandle(u64);

impl ViewHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

//=== ViewRequest =========================================================

/// Describes the view the stack needs for a new entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRequest<K: ControllerKind> {
    pub entry: EntryId,
    pub kind: K,
    pub layer: i32,
    pub parent: Option<EntryId>,
    pub parent_view: Option<ViewHandle>,
}

//=== ViewFactory =========================================================

/// Host collaborator that creates and destroys views.
///
/// `create_view` may suspend by returning `Poll::Pending`; the stack then
/// calls it again with the same request once per tick until it resolves.
/// An error aborts the present without touching the stack.
pub trait ViewFactory<K: ControllerKind> {
    fn create_view(&mut self, request: &ViewRequest<K>) -> Poll<Result<ViewHandle, ViewCreationError>>;

    /// Called when a pending request is abandoned (cancelled, or its
    /// parent went away). Default implementation does nothing.
    fn cancel_view(&mut self, _request: &ViewRequest<K>) {}

    /// Releases a view previously returned by `create_view`.
    fn destroy_view(&mut self, view: ViewHandle);
}

//=== HostEvent ===========================================================

/// Events a host sends to the runtime over its channel.
#[derive(Debug)]
pub enum HostEvent<K: ControllerKind> {
    /// Present a controller. The caller does not get a handle back.
    Present {
        kind: K,
        args: Args,
        options: PresentOptions,
    },

    /// Route a named command through the stack.
    Command { name: String, args: Args },

    /// Dismiss an entry and its descendants.
    Dismiss(EntryId),

    /// Return-to navigation.
    PopTo(PopTarget),

    /// Dismiss everything.
    DismissAll,

    /// Stop the runtime loop.
    Shutdown,
}
