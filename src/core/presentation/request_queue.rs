//=========================================================================
// Request Queue
//=========================================================================
//
// Queue for structural stack requests raised while the stack is busy.
//
// Controller hooks and scheduled callbacks cannot touch the stack
// directly. They queue requests here; the stack drains the queue in FIFO
// order once the current step has completed, so mutations triggered by a
// single external call are never interleaved with reentrant ones.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;

use crossbeam_channel::Sender;

//=== Internal Dependencies ===============================================

use super::handle::{CancellationToken, DismissOutcome, PresentOutcome};
use super::{ControllerKind, EntryId, PopTarget, PresentOptions};
use crate::core::args::Args;

//=== Requests ============================================================

/// A present request with its reserved id and completion channel.
pub(crate) struct PresentRequest<K: ControllerKind> {
    pub(crate) id: EntryId,
    pub(crate) kind: K,
    pub(crate) args: Args,
    pub(crate) options: PresentOptions,
    pub(crate) token: CancellationToken,
    pub(crate) completion: Sender<PresentOutcome>,
}

/// Structural stack operations.
pub(crate) enum StackRequest<K: ControllerKind> {
    Present(PresentRequest<K>),
    Dismiss {
        entry: EntryId,
        waiter: Sender<DismissOutcome>,
    },
    PopTo(PopTarget),
    DismissAll,
}

//=== RequestQueue ========================================================

pub(crate) struct RequestQueue<K: ControllerKind> {
    queue: VecDeque<StackRequest<K>>,
}

impl<K: ControllerKind> RequestQueue<K> {
    pub(crate) fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Queues a request to be processed after the current step.
    pub(crate) fn push(&mut self, request: StackRequest<K>) {
        self.queue.push_back(request);
    }

    /// Removes the oldest queued request.
    pub(crate) fn pop(&mut self) -> Option<StackRequest<K>> {
        self.queue.pop_front()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
