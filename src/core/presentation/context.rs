//=========================================================================
// Present Context
//=========================================================================
//
// Scoped view of the stack handed to controller hooks.
//
// Hooks cannot mutate the stack structure. Every structural request made
// through the context is queued and applied after the current step.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::entry::{EntryInfo, IdAllocator};
use super::handle::{CancellationToken, DismissSignal, PresentHandle};
use super::request_queue::{PresentRequest, RequestQueue, StackRequest};
use super::{ControllerKind, EntryId, EntryState, PopTarget, PresentOptions};
use crate::core::args::Args;
use crate::core::host_bridge::ViewHandle;
use crate::core::scheduler::{ScheduleContext, ScheduleHandle, Scheduler};
use crate::core::TickControl;

//=== PresentContext ======================================================

/// Context passed to every controller hook.
pub struct PresentContext<'a, K: ControllerKind> {
    info: EntryInfo<K>,
    token: &'a CancellationToken,
    ids: &'a mut IdAllocator,
    requests: &'a mut RequestQueue<K>,
    scheduler: &'a mut Scheduler<K>,
}

impl<'a, K: ControllerKind> PresentContext<'a, K> {
    pub(crate) fn new(
        info: EntryInfo<K>,
        token: &'a CancellationToken,
        ids: &'a mut IdAllocator,
        requests: &'a mut RequestQueue<K>,
        scheduler: &'a mut Scheduler<K>,
    ) -> Self {
        Self {
            info,
            token,
            ids,
            requests,
            scheduler,
        }
    }

    //--- Entry Data -------------------------------------------------------

    pub fn id(&self) -> EntryId {
        self.info.id
    }

    pub fn kind(&self) -> K {
        self.info.kind
    }

    pub fn layer(&self) -> i32 {
        self.info.layer
    }

    pub fn parent(&self) -> Option<EntryId> {
        self.info.parent
    }

    pub fn view(&self) -> ViewHandle {
        self.info.view
    }

    pub fn state(&self) -> EntryState {
        self.info.state
    }

    pub fn info(&self) -> &EntryInfo<K> {
        &self.info
    }

    /// Returns true once this entry's present has been cancelled or a
    /// dismissal has started.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    //--- Stack Requests ---------------------------------------------------

    /// Queues a present. The new entry is a child of this one unless
    /// `options` names another parent.
    pub fn present(&mut self, kind: K, args: Args, options: PresentOptions) -> PresentHandle {
        let options = match options.parent {
            Some(_) => options,
            None => options.with_parent(self.info.id),
        };

        let id = self.ids.allocate();
        let token = CancellationToken::new();
        let (handle, completion) = PresentHandle::new(id, token.clone());

        self.requests.push(StackRequest::Present(PresentRequest {
            id,
            kind,
            args,
            options,
            token,
            completion,
        }));
        handle
    }

    /// Queues dismissal of this entry (and its descendants).
    pub fn dismiss(&mut self) -> DismissSignal {
        self.dismiss_entry(self.info.id)
    }

    /// Queues dismissal of another entry.
    pub fn dismiss_entry(&mut self, entry: EntryId) -> DismissSignal {
        let (signal, waiter) = DismissSignal::new(entry);
        self.requests.push(StackRequest::Dismiss { entry, waiter });
        signal
    }

    /// Queues a return-to navigation.
    pub fn pop_to(&mut self, target: PopTarget) {
        self.requests.push(StackRequest::PopTo(target));
    }

    /// Queues dismissal of every entry, this one included.
    pub fn dismiss_all(&mut self) {
        self.requests.push(StackRequest::DismissAll);
    }

    //--- Scheduling -------------------------------------------------------

    /// Schedules a callback owned by this entry.
    ///
    /// The callback is cancelled automatically when the entry is disposed.
    pub fn schedule<F>(&mut self, interval: f32, callback: F) -> ScheduleHandle
    where
        F: FnMut(&mut ScheduleContext<'_, K>) -> TickControl + 'static,
    {
        self.scheduler
            .schedule(Some(self.info.id), interval, Box::new(callback))
    }

    pub fn unschedule(&mut self, handle: ScheduleHandle) -> bool {
        self.scheduler.unschedule(handle)
    }
}
