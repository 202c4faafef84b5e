//=========================================================================
// Scheduler
//=========================================================================
//
// Tick-driven callback scheduling for controllers and hosts.
//
// Architecture:
//   schedule(owner, interval, cb) → tasks: Vec<ScheduledTask>
//                                        ↓
//   update(delta) ──→ tick() ──→ elapsed ≥ interval ? cb(ctx) : skip
//                                        ↓
//   cb returns Exit / unschedule() / owner disposed → task removed
//
// The scheduler owns no thread. It only advances when the host pumps
// `PresentationStack::update`.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::presentation::request_queue::{RequestQueue, StackRequest};
use crate::core::presentation::{ControllerKind, DismissSignal, EntryId};
use crate::core::TickControl;

//=== ScheduleHandle ======================================================

/// Identifies one scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleHandle(u64);

//=== ScheduleContext =====================================================

/// Data passed to a scheduled callback.
///
/// Callbacks may request dismissals; they are queued and applied after
/// the scheduler tick.
pub struct ScheduleContext<'a, K: ControllerKind> {
    handle: ScheduleHandle,
    owner: Option<EntryId>,
    delta: f32,
    requests: &'a mut RequestQueue<K>,
}

impl<K: ControllerKind> ScheduleContext<'_, K> {
    pub fn handle(&self) -> ScheduleHandle {
        self.handle
    }

    /// Entry owning this callback, if any.
    pub fn owner(&self) -> Option<EntryId> {
        self.owner
    }

    /// Seconds accumulated since the previous invocation.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Queues dismissal of the owning entry.
    pub fn dismiss_owner(&mut self) -> Option<DismissSignal> {
        let owner = self.owner?;
        Some(self.dismiss(owner))
    }

    /// Queues dismissal of any entry.
    pub fn dismiss(&mut self, entry: EntryId) -> DismissSignal {
        let (signal, waiter) = DismissSignal::new(entry);
        self.requests.push(StackRequest::Dismiss { entry, waiter });
        signal
    }
}

//=== Scheduler ===========================================================

/// Callback signature for scheduled work.
pub type ScheduleCallback<K> = Box<dyn FnMut(&mut ScheduleContext<'_, K>) -> TickControl>;

struct ScheduledTask<K: ControllerKind> {
    handle: ScheduleHandle,
    owner: Option<EntryId>,
    interval: f32,
    elapsed: f32,
    callback: ScheduleCallback<K>,
}

/// Per-tick callback scheduler.
pub struct Scheduler<K: ControllerKind> {
    next_handle: u64,
    tasks: Vec<ScheduledTask<K>>,
}

impl<K: ControllerKind> Scheduler<K> {
    pub(crate) fn new() -> Self {
        Self {
            next_handle: 1,
            tasks: Vec::new(),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Schedules `callback` to run once at least `interval` seconds have
    /// accumulated; `0.0` runs it every tick.
    ///
    /// Negative or non-finite intervals are treated as `0.0`.
    pub(crate) fn schedule(
        &mut self,
        owner: Option<EntryId>,
        interval: f32,
        callback: ScheduleCallback<K>,
    ) -> ScheduleHandle {
        let interval = if interval.is_finite() && interval > 0.0 {
            interval
        } else {
            if interval != 0.0 {
                warn!(target: "presenter::scheduler", "Invalid interval {}, using 0", interval);
            }
            0.0
        };

        let handle = ScheduleHandle(self.next_handle);
        self.next_handle += 1;

        debug!(
            target: "presenter::scheduler",
            "Scheduled {:?} (owner: {:?}, interval: {}s)",
            handle, owner, interval
        );

        self.tasks.push(ScheduledTask {
            handle,
            owner,
            interval,
            elapsed: 0.0,
            callback,
        });
        handle
    }

    /// Removes a callback. Returns false if it was not scheduled.
    pub(crate) fn unschedule(&mut self, handle: ScheduleHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.handle != handle);
        before != self.tasks.len()
    }

    /// Removes every callback owned by `owner`. Returns how many.
    pub(crate) fn cancel_owned(&mut self, owner: EntryId) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.owner != Some(owner));
        let removed = before - self.tasks.len();
        if removed > 0 {
            debug!(
                target: "presenter::scheduler",
                "Cancelled {} schedule(s) owned by {}",
                removed, owner
            );
        }
        removed
    }

    //--- Update Loop ------------------------------------------------------

    /// Advances every task by `delta` and invokes the due ones.
    pub(crate) fn tick(&mut self, delta: f32, requests: &mut RequestQueue<K>) {
        let mut finished = Vec::new();

        for task in &mut self.tasks {
            task.elapsed += delta;
            if task.elapsed < task.interval {
                continue;
            }

            let mut context = ScheduleContext {
                handle: task.handle,
                owner: task.owner,
                delta: task.elapsed,
                requests: &mut *requests,
            };
            task.elapsed = 0.0;

            if (task.callback)(&mut context) == TickControl::Exit {
                finished.push(task.handle);
            }
        }

        if !finished.is_empty() {
            trace!(target: "presenter::scheduler", "Callbacks finished: {:?}", finished);
            self.tasks.retain(|task| !finished.contains(&task.handle));
        }
    }

    //--- Query API --------------------------------------------------------

    pub fn contains(&self, handle: ScheduleHandle) -> bool {
        self.tasks.iter().any(|task| task.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::presentation::testing::Screen;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<f32>>>, ScheduleCallback<Screen>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        let callback: ScheduleCallback<Screen> = Box::new(move |ctx| {
            sink.borrow_mut().push(ctx.delta());
            TickControl::Continue
        });
        (calls, callback)
    }

    #[test]
    fn zero_interval_runs_every_tick() {
        let mut scheduler = Scheduler::<Screen>::new();
        let mut requests = RequestQueue::new();
        let (calls, callback) = recorder();
        scheduler.schedule(None, 0.0, callback);

        scheduler.tick(0.5, &mut requests);
        scheduler.tick(0.25, &mut requests);

        assert_eq!(*calls.borrow(), vec![0.5, 0.25]);
    }

    #[test]
    fn interval_accumulates_delta() {
        let mut scheduler = Scheduler::<Screen>::new();
        let mut requests = RequestQueue::new();
        let (calls, callback) = recorder();
        scheduler.schedule(None, 1.0, callback);

        scheduler.tick(0.5, &mut requests);
        assert!(calls.borrow().is_empty());

        scheduler.tick(0.5, &mut requests);
        assert_eq!(*calls.borrow(), vec![1.0]);

        scheduler.tick(0.5, &mut requests);
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn exit_removes_task() {
        let mut scheduler = Scheduler::<Screen>::new();
        let mut requests = RequestQueue::new();
        let handle = scheduler.schedule(None, 0.0, Box::new(|_| TickControl::Exit));

        assert!(scheduler.contains(handle));
        scheduler.tick(0.1, &mut requests);
        assert!(!scheduler.contains(handle));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn unschedule_is_explicit_and_idempotent() {
        let mut scheduler = Scheduler::<Screen>::new();
        let mut requests = RequestQueue::new();
        let (calls, callback) = recorder();
        let handle = scheduler.schedule(None, 0.0, callback);

        assert!(scheduler.unschedule(handle));
        assert!(!scheduler.unschedule(handle));

        scheduler.tick(0.1, &mut requests);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn cancel_owned_only_touches_owner() {
        let mut scheduler = Scheduler::<Screen>::new();
        let owner = EntryId::from_raw(1);
        let other = EntryId::from_raw(2);
        scheduler.schedule(Some(owner), 0.0, Box::new(|_| TickControl::Continue));
        scheduler.schedule(Some(owner), 1.0, Box::new(|_| TickControl::Continue));
        let kept = scheduler.schedule(Some(other), 0.0, Box::new(|_| TickControl::Continue));

        assert_eq!(scheduler.cancel_owned(owner), 2);
        assert_eq!(scheduler.len(), 1);
        assert!(scheduler.contains(kept));
    }

    #[test]
    fn dismiss_owner_queues_request() {
        let mut scheduler = Scheduler::<Screen>::new();
        let mut requests = RequestQueue::new();
        let owner = EntryId::from_raw(3);
        scheduler.schedule(
            Some(owner),
            0.0,
            Box::new(|ctx| {
                ctx.dismiss_owner();
                TickControl::Exit
            }),
        );

        scheduler.tick(0.016, &mut requests);

        assert!(matches!(
            requests.pop(),
            Some(StackRequest::Dismiss { entry, .. }) if entry == owner
        ));
    }

    #[test]
    fn negative_interval_is_clamped() {
        let mut scheduler = Scheduler::<Screen>::new();
        let mut requests = RequestQueue::new();
        let (calls, callback) = recorder();
        scheduler.schedule(None, -3.0, callback);

        scheduler.tick(0.1, &mut requests);
        assert_eq!(calls.borrow().len(), 1);
    }
}
