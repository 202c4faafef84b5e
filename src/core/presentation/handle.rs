//=========================================================================
// Completion Handles
//=========================================================================
//
// Caller-side views of in-flight present/dismiss operations.
//
//   PresentHandle  ← bounded(1) channel ← stack resolves on settle/fail
//   DismissSignal  ← bounded(1) channel ← stack resolves on dispose
//
// Handles are polled, never awaited: the stack is single-threaded and
// progresses only when the host pumps `update()`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use log::trace;

//=== Internal Dependencies ===============================================

use super::EntryId;
use crate::core::error::StackError;

//=== Outcomes ============================================================

/// Final outcome of a present request: the entry settled, or failed.
pub type PresentOutcome = Result<EntryId, StackError>;

/// Final outcome of a dismissal. Teardown faults are reported here after
/// the entry has already been removed.
pub type DismissOutcome = Result<(), StackError>;

/// Sends a completion, ignoring receivers that were dropped.
pub(crate) fn resolve<T>(sender: &Sender<T>, outcome: T) {
    if sender.try_send(outcome).is_err() {
        trace!(target: "presenter::stack", "Completion receiver gone or already resolved");
    }
}

//=== CancellationToken ===================================================

/// Cooperative cancellation flag shared between a handle and its entry.
///
/// The stack observes the flag only at suspension points.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

//=== PresentHandle =======================================================

/// Tracks one present request until the entry settles or fails.
#[derive(Debug)]
pub struct PresentHandle {
    id: EntryId,
    token: CancellationToken,
    receiver: Receiver<PresentOutcome>,
    outcome: Option<PresentOutcome>,
}

impl PresentHandle {
    pub(crate) fn new(id: EntryId, token: CancellationToken) -> (Self, Sender<PresentOutcome>) {
        let (sender, receiver) = bounded(1);
        let handle = Self {
            id,
            token,
            receiver,
            outcome: None,
        };
        (handle, sender)
    }

    /// Id reserved for the entry. Valid even if the present fails.
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Requests cancellation of the in-flight present.
    ///
    /// Has no effect once the entry has settled; dismiss it instead.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Returns the outcome if the request has completed.
    pub fn poll(&mut self) -> Option<&PresentOutcome> {
        if self.outcome.is_none() {
            match self.receiver.try_recv() {
                Ok(outcome) => self.outcome = Some(outcome),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.outcome = Some(Err(StackError::Cancelled(self.id)));
                }
            }
        }
        self.outcome.as_ref()
    }

    pub fn is_completed(&mut self) -> bool {
        self.poll().is_some()
    }

    /// Consumes the handle, returning the outcome if completed.
    pub fn into_outcome(mut self) -> Option<PresentOutcome> {
        self.poll();
        self.outcome
    }
}

//=== DismissSignal =======================================================

/// Tracks one dismissal until the entry is disposed.
#[derive(Debug)]
pub struct DismissSignal {
    entry: EntryId,
    receiver: Receiver<DismissOutcome>,
    outcome: Option<DismissOutcome>,
}

impl DismissSignal {
    pub(crate) fn new(entry: EntryId) -> (Self, Sender<DismissOutcome>) {
        let (sender, receiver) = bounded(1);
        let signal = Self {
            entry,
            receiver,
            outcome: None,
        };
        (signal, sender)
    }

    pub fn entry(&self) -> EntryId {
        self.entry
    }

    /// Returns the outcome if the dismissal has completed.
    pub fn poll(&mut self) -> Option<&DismissOutcome> {
        if self.outcome.is_none() {
            match self.receiver.try_recv() {
                Ok(outcome) => self.outcome = Some(outcome),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.outcome = Some(Err(StackError::Cancelled(self.entry)));
                }
            }
        }
        self.outcome.as_ref()
    }

    pub fn is_completed(&mut self) -> bool {
        self.poll().is_some()
    }

    pub fn into_outcome(mut self) -> Option<DismissOutcome> {
        self.poll();
        self.outcome
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn handle_pending_until_resolved() {
        let id = EntryId::from_raw(1);
        let (mut handle, sender) = PresentHandle::new(id, CancellationToken::new());
        assert!(handle.poll().is_none());

        resolve(&sender, Ok(id));
        assert_eq!(handle.poll(), Some(&Ok(id)));
        // Cached after the first receive
        assert_eq!(handle.poll(), Some(&Ok(id)));
    }

    #[test]
    fn handle_cancel_sets_token() {
        let (handle, _sender) = PresentHandle::new(EntryId::from_raw(2), CancellationToken::new());
        handle.cancel();
        assert!(handle.token().is_cancelled());
    }

    #[test]
    fn dropped_sender_reads_as_cancelled() {
        let id = EntryId::from_raw(3);
        let (handle, sender) = PresentHandle::new(id, CancellationToken::new());
        drop(sender);
        assert_eq!(handle.into_outcome(), Some(Err(StackError::Cancelled(id))));
    }

    #[test]
    fn signal_completes_once_resolved() {
        let id = EntryId::from_raw(9);
        let (mut signal, sender) = DismissSignal::new(id);
        assert!(!signal.is_completed());
        resolve(&sender, Ok(()));
        assert!(signal.is_completed());
        assert_eq!(signal.entry(), id);
    }

    #[test]
    fn second_resolve_is_ignored() {
        let id = EntryId::from_raw(5);
        let (signal, sender) = DismissSignal::new(id);
        resolve(&sender, Ok(()));
        resolve(&sender, Err(StackError::Cancelled(id)));
        assert_eq!(signal.into_outcome(), Some(Ok(())));
    }
}
