//=========================================================================
// Entry Lifecycle
//=========================================================================
//
// State machine driving each entry from creation to disposal:
//
//   Created ─→ Presenting ─→ Inactive ⇄ Active
//      │            │            │        │
//      └────────────┴────────────┴────────┴─→ Dismissing ─→ Disposed
//
// Presenting and Dismissing may suspend (`Poll::Pending`). Suspended
// hooks are resumed once per `update()`; everything else runs to
// completion inside `drive()`.
//
// Activation is global: after every structural change the topmost
// settled entry without DO_NOT_ACTIVATE becomes the single active
// entry. The previous one is deactivated first.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::task::Poll;

use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use super::handle::resolve;
use super::stack_manager::PresentationStack;
use super::{Controller, ControllerKind, EntryId, HookPoll, PresentContext};
use crate::core::error::{ControllerError, ControllerFault, Hook, StackError};

//=== Constants ===========================================================

/// Upper bound on drive passes per call. Exceeding it means hooks keep
/// queueing requests in response to each other.
const MAX_DRIVE_PASSES: usize = 1024;

//=== EntryState ==========================================================

/// Observable lifecycle state of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryState {
    Created,
    Presenting,
    Active,
    Inactive,
    Dismissing,
    Disposed,
}

impl EntryState {
    /// Whether `self → next` is a legal transition.
    pub fn can_transition_to(self, next: EntryState) -> bool {
        use EntryState::*;

        matches!(
            (self, next),
            (Created, Presenting)
                | (Created, Dismissing)
                | (Presenting, Active)
                | (Presenting, Inactive)
                | (Presenting, Dismissing)
                | (Active, Inactive)
                | (Inactive, Active)
                | (Active, Dismissing)
                | (Inactive, Dismissing)
                | (Dismissing, Disposed)
        )
    }

    /// Present finished and dismissal has not started.
    pub fn is_settled(self) -> bool {
        matches!(self, EntryState::Active | EntryState::Inactive)
    }

    /// Not yet dismissing.
    pub fn is_live(self) -> bool {
        !matches!(self, EntryState::Dismissing | EntryState::Disposed)
    }
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntryState::Created => "Created",
            EntryState::Presenting => "Presenting",
            EntryState::Active => "Active",
            EntryState::Inactive => "Inactive",
            EntryState::Dismissing => "Dismissing",
            EntryState::Disposed => "Disposed",
        };
        f.write_str(name)
    }
}

//=== Stage ===============================================================

/// Internal progress marker within a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    /// Nothing in flight.
    Idle,
    /// `on_present` suspended; resumed through `poll_present`.
    PresentPending,
    /// Dismissing, waiting for every child to be disposed.
    AwaitChildren,
    /// `on_dismiss` suspended; resumed through `poll_dismiss`.
    DismissPending,
    /// Teardown hooks finished; ready to dispose.
    DismissDone,
}

//=== Lifecycle Driving ===================================================

impl<K: ControllerKind> PresentationStack<K> {
    /// Runs queued requests and lifecycle steps until nothing changes.
    pub(crate) fn drive(&mut self) {
        for _ in 0..MAX_DRIVE_PASSES {
            let mut progressed = self.process_requests();
            progressed |= self.advance_entries();
            progressed |= self.settle_activation();

            if !progressed {
                return;
            }
        }

        warn!(
            target: "presenter::lifecycle",
            "Stack did not quiesce after {} passes, deferring to next update",
            MAX_DRIVE_PASSES
        );
    }

    /// Steps every entry, top to bottom, as far as it can go.
    fn advance_entries(&mut self) -> bool {
        let mut progressed = false;

        let ids: Vec<EntryId> = self.order.iter().rev().copied().collect();
        for id in ids {
            while self.advance_entry(id) {
                progressed = true;
            }
        }

        progressed
    }

    /// Performs one non-suspending step of `id`. Returns false if the
    /// entry is waiting (or gone).
    fn advance_entry(&mut self, id: EntryId) -> bool {
        let Some(entry) = self.entries.get(&id) else {
            return false;
        };

        match (entry.state, entry.stage) {
            (EntryState::Created, Stage::Idle) => {
                if entry.token.is_cancelled() {
                    debug!(target: "presenter::lifecycle", "{} cancelled before presenting", id);
                    self.begin_dismiss_tree(id);
                    return true;
                }

                self.set_state(id, EntryState::Presenting);
                trace!(target: "presenter::lifecycle", "{} on_present", id);
                let poll = self
                    .call_hook(id, |controller, ctx| controller.on_present(ctx))
                    .unwrap_or(Poll::Ready(Ok(())));
                self.apply_present_poll(id, poll);
                true
            }
            (EntryState::Dismissing, Stage::AwaitChildren) => {
                if self.has_children(id) {
                    return false;
                }

                trace!(target: "presenter::lifecycle", "{} on_dismiss", id);
                let poll = self
                    .call_hook(id, |controller, ctx| controller.on_dismiss(ctx))
                    .unwrap_or(Poll::Ready(Ok(())));
                self.apply_dismiss_poll(id, poll);
                true
            }
            (EntryState::Dismissing, Stage::DismissDone) => {
                self.finalize(id);
                true
            }
            _ => false,
        }
    }

    fn apply_present_poll(&mut self, id: EntryId, poll: HookPoll) {
        match poll {
            Poll::Pending => self.set_stage(id, Stage::PresentPending),
            Poll::Ready(Ok(())) => {
                let cancelled = self
                    .entries
                    .get(&id)
                    .is_some_and(|entry| entry.token.is_cancelled());

                if cancelled {
                    debug!(target: "presenter::lifecycle", "{} cancelled while presenting", id);
                    self.begin_dismiss_tree(id);
                    return;
                }

                self.set_stage(id, Stage::Idle);
                self.set_state(id, EntryState::Inactive);
                debug!(target: "presenter::lifecycle", "{} presented", id);
            }
            Poll::Ready(Err(error)) => {
                self.capture_fault(id, Hook::Present, error);
                self.begin_dismiss_tree(id);
            }
        }
    }

    fn apply_dismiss_poll(&mut self, id: EntryId, poll: HookPoll) {
        match poll {
            Poll::Pending => self.set_stage(id, Stage::DismissPending),
            Poll::Ready(result) => {
                if let Err(error) = result {
                    // Teardown continues regardless
                    self.capture_fault(id, Hook::Dismiss, error);
                }
                self.set_stage(id, Stage::DismissDone);
            }
        }
    }

    /// Moves a single entry into Dismissing. Idempotent.
    ///
    /// Active entries are deactivated first.
    pub(super) fn begin_dismiss(&mut self, id: EntryId) {
        let Some(entry) = self.entries.get(&id) else {
            return;
        };
        if !entry.state.is_live() {
            return;
        }

        entry.token.cancel();

        if entry.state == EntryState::Active {
            trace!(target: "presenter::lifecycle", "{} on_deactivate", id);
            self.call_hook(id, |controller, ctx| controller.on_deactivate(ctx));
            self.set_state(id, EntryState::Inactive);
            if self.active == Some(id) {
                self.active = None;
            }
        }

        self.set_state(id, EntryState::Dismissing);
        self.set_stage(id, Stage::AwaitChildren);
        debug!(target: "presenter::lifecycle", "{} dismissing", id);
    }

    /// Removes a fully dismissed entry and resolves its completions.
    fn finalize(&mut self, id: EntryId) {
        let Some(mut entry) = self.entries.remove(&id) else {
            return;
        };
        self.order.retain(|other| *other != id);
        if self.active == Some(id) {
            self.active = None;
        }

        self.views.destroy_view(entry.view);
        let cancelled = self.scheduler.cancel_owned(id);
        entry.set_state(EntryState::Disposed);

        info!(
            target: "presenter::lifecycle",
            "Disposed {} ({:?}), {} schedules cancelled",
            id, entry.kind, cancelled
        );

        // A present that never settled fails with its fault, or Cancelled
        if let Some(completion) = entry.completion.take() {
            let outcome = match &entry.fault {
                Some(fault) if fault.hook != Hook::Dismiss => Err(StackError::from(fault.clone())),
                _ => Err(StackError::Cancelled(id)),
            };
            resolve(&completion, outcome);
        }

        let outcome = match entry.fault.take() {
            Some(fault) if fault.hook == Hook::Dismiss => Err(StackError::from(fault)),
            _ => Ok(()),
        };
        for waiter in entry.dismiss_waiters.drain(..) {
            resolve(&waiter, outcome.clone());
        }
    }

    /// Ensures the topmost activatable entry is the single Active one,
    /// then resolves completions of entries that just settled.
    fn settle_activation(&mut self) -> bool {
        let mut progressed = false;

        let desired = self
            .order
            .iter()
            .rev()
            .copied()
            .find(|id| self.entries.get(id).is_some_and(|e| e.can_activate()));

        if desired != self.active {
            if let Some(current) = self.active.take() {
                if self.state(current) == Some(EntryState::Active) {
                    trace!(target: "presenter::lifecycle", "{} on_deactivate", current);
                    self.call_hook(current, |controller, ctx| controller.on_deactivate(ctx));
                    self.set_state(current, EntryState::Inactive);
                }
            }

            if let Some(next) = desired {
                self.set_state(next, EntryState::Active);
                self.active = Some(next);
                trace!(target: "presenter::lifecycle", "{} on_activate", next);
                self.call_hook(next, |controller, ctx| controller.on_activate(ctx));
            }

            debug!(target: "presenter::lifecycle", "Active entry is now {:?}", self.active);
            progressed = true;
        }

        for entry in self.entries.values_mut() {
            if !entry.state.is_settled() {
                continue;
            }
            if let Some(completion) = entry.completion.take() {
                resolve(&completion, Ok(entry.id));
                progressed = true;
            }
        }

        progressed
    }

    /// Resumes suspended present and dismiss hooks, top to bottom.
    pub(super) fn poll_suspended_hooks(&mut self) {
        let ids: Vec<EntryId> = self.order.iter().rev().copied().collect();

        for id in ids {
            let Some(entry) = self.entries.get(&id) else {
                continue;
            };

            match entry.stage {
                Stage::PresentPending => {
                    if entry.token.is_cancelled() {
                        debug!(target: "presenter::lifecycle", "{} present abandoned", id);
                        self.begin_dismiss_tree(id);
                        continue;
                    }

                    let poll = self
                        .call_hook(id, |controller, ctx| controller.poll_present(ctx))
                        .unwrap_or(Poll::Ready(Ok(())));
                    self.apply_present_poll(id, poll);
                }
                Stage::DismissPending => {
                    let poll = self
                        .call_hook(id, |controller, ctx| controller.poll_dismiss(ctx))
                        .unwrap_or(Poll::Ready(Ok(())));
                    self.apply_dismiss_poll(id, poll);
                }
                _ => {}
            }
        }
    }

    /// Calls `on_tick` on every settled entry, top to bottom.
    pub(super) fn tick_controllers(&mut self, delta: f32) {
        let ids: Vec<EntryId> = self.order.iter().rev().copied().collect();

        for id in ids {
            if self.state(id).is_some_and(EntryState::is_settled) {
                self.call_hook(id, |controller, ctx| controller.on_tick(ctx, delta));
            }
        }
    }

    //--- Hook Plumbing ----------------------------------------------------

    /// Runs `f` against an entry's controller with a fresh context.
    ///
    /// `None` if the entry is gone.
    pub(crate) fn call_hook<R>(
        &mut self,
        id: EntryId,
        f: impl FnOnce(&mut dyn Controller<K>, &mut PresentContext<'_, K>) -> R,
    ) -> Option<R> {
        let entry = self.entries.get_mut(&id)?;
        let info = entry.info();

        let mut ctx = PresentContext::new(
            info,
            &entry.token,
            &mut self.ids,
            &mut self.requests,
            &mut self.scheduler,
        );
        Some(f(entry.controller.as_mut(), &mut ctx))
    }

    fn capture_fault(&mut self, id: EntryId, hook: Hook, error: ControllerError) {
        let Some(entry) = self.entries.get_mut(&id) else {
            return;
        };

        let fault = ControllerFault {
            entry: id,
            kind: format!("{:?}", entry.kind),
            hook,
            error,
        };
        entry.record_fault(fault.clone());
        self.publish_fault(&fault);
    }

    fn has_children(&self, id: EntryId) -> bool {
        self.entries.values().any(|entry| entry.parent == Some(id))
    }

    fn set_state(&mut self, id: EntryId, next: EntryState) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.set_state(next);
        }
    }

    fn set_stage(&mut self, id: EntryId, stage: Stage) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.stage = stage;
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::args::Args;
    use crate::core::presentation::testing::{Harness, Screen, Script};
    use crate::core::presentation::{PresentFlags, PresentOptions, StackConfig};

    const TICK: f32 = 0.016;

    //--- Transition Table -------------------------------------------------

    #[test]
    fn transition_table() {
        use EntryState::*;

        assert!(Created.can_transition_to(Presenting));
        assert!(Presenting.can_transition_to(Inactive));
        assert!(Inactive.can_transition_to(Active));
        assert!(Active.can_transition_to(Dismissing));
        assert!(Dismissing.can_transition_to(Disposed));

        assert!(!Created.can_transition_to(Active));
        assert!(!Dismissing.can_transition_to(Active));
        assert!(!Disposed.can_transition_to(Created));
        assert!(!Active.can_transition_to(Disposed));
    }

    #[test]
    fn settled_and_live() {
        assert!(EntryState::Active.is_settled());
        assert!(!EntryState::Presenting.is_settled());
        assert!(EntryState::Presenting.is_live());
        assert!(!EntryState::Dismissing.is_live());
    }

    //--- Suspended Present ------------------------------------------------

    #[test]
    fn suspended_present_settles_after_ticks() {
        let harness = Harness::new();
        harness.script(
            Screen::Settings,
            Script {
                present_ticks: 2,
                ..Script::default()
            },
        );
        let mut stack = harness.stack();

        let menu = stack
            .present(Screen::Menu, Args::none(), PresentOptions::new())
            .unwrap()
            .id();
        let mut handle = stack
            .present(Screen::Settings, Args::none(), PresentOptions::new())
            .unwrap();

        assert_eq!(stack.state(handle.id()), Some(EntryState::Presenting));
        // Still active until the newcomer settles
        assert_eq!(stack.state(menu), Some(EntryState::Active));
        assert!(handle.poll().is_none());

        stack.update(TICK);
        assert!(handle.poll().is_none());

        stack.update(TICK);
        let id = handle.id();
        assert_eq!(handle.poll(), Some(&Ok(id)));
        assert_eq!(stack.state(handle.id()), Some(EntryState::Active));
        assert_eq!(stack.state(menu), Some(EntryState::Inactive));
    }

    #[test]
    fn cancel_during_suspended_present_runs_dismiss() {
        let harness = Harness::new();
        harness.script(
            Screen::Settings,
            Script {
                present_ticks: 5,
                ..Script::default()
            },
        );
        let mut stack = harness.stack();

        let mut handle = stack
            .present(Screen::Settings, Args::none(), PresentOptions::new())
            .unwrap();
        stack.update(TICK);
        handle.cancel();
        stack.update(TICK);

        let id = handle.id();
        assert_eq!(handle.poll(), Some(&Err(StackError::Cancelled(id))));
        assert!(stack.is_empty());
        assert_eq!(
            harness.events_for(handle.id()),
            vec!["construct", "present", "poll_present", "dismiss"]
        );
        assert_eq!(harness.views().destroyed, vec![handle.id()]);
    }

    #[test]
    fn dismiss_during_suspended_present_cancels_handle() {
        let harness = Harness::new();
        harness.script(
            Screen::Settings,
            Script {
                present_ticks: 5,
                ..Script::default()
            },
        );
        let mut stack = harness.stack();

        let mut handle = stack
            .present(Screen::Settings, Args::none(), PresentOptions::new())
            .unwrap();
        let mut signal = stack.dismiss(handle.id());

        assert_eq!(signal.poll(), Some(&Ok(())));
        let id = handle.id();
        assert_eq!(handle.poll(), Some(&Err(StackError::Cancelled(id))));
        assert!(!harness.events_for(handle.id()).contains(&"activate"));
    }

    //--- Faults -----------------------------------------------------------

    #[test]
    fn present_fault_fails_handle_and_removes_entry() {
        let harness = Harness::new();
        harness.script(
            Screen::Settings,
            Script {
                present_error: Some("boom"),
                ..Script::default()
            },
        );
        let mut stack = harness.stack();
        let faults = stack.faults();

        let menu = stack
            .present(Screen::Menu, Args::none(), PresentOptions::new())
            .unwrap()
            .id();
        let mut handle = stack
            .present(Screen::Settings, Args::none(), PresentOptions::new())
            .unwrap();

        let Some(Err(StackError::ControllerFault(fault))) = handle.poll() else {
            panic!("expected a controller fault");
        };
        assert_eq!(fault.hook, Hook::Present);
        assert_eq!(fault.error.message(), "boom");

        assert!(!stack.contains(handle.id()));
        assert_eq!(stack.state(menu), Some(EntryState::Active));
        assert_eq!(faults.try_recv().map(|f| f.entry), Ok(handle.id()));
    }

    #[test]
    fn dismiss_fault_still_disposes() {
        let harness = Harness::new();
        harness.script(
            Screen::Menu,
            Script {
                dismiss_error: Some("teardown"),
                ..Script::default()
            },
        );
        let mut stack = harness.stack();

        let id = stack
            .present(Screen::Menu, Args::none(), PresentOptions::new())
            .unwrap()
            .id();
        let mut signal = stack.dismiss(id);

        assert!(stack.is_empty());
        let Some(Err(StackError::ControllerFault(fault))) = signal.poll() else {
            panic!("expected a controller fault");
        };
        assert_eq!(fault.hook, Hook::Dismiss);
        assert_eq!(harness.views().destroyed, vec![id]);
    }

    #[test]
    fn full_fault_channel_drops_quietly() {
        let harness = Harness::new();
        harness.script(
            Screen::Toast,
            Script {
                present_error: Some("nope"),
                ..Script::default()
            },
        );
        let mut stack = harness.stack_with_config(StackConfig {
            fault_channel_capacity: 1,
            ..Default::default()
        });

        for _ in 0..3 {
            stack
                .present(Screen::Toast, Args::none(), PresentOptions::new())
                .unwrap();
        }

        assert_eq!(stack.faults().len(), 1);
        assert!(stack.is_empty());
    }

    //--- Suspended Dismiss ------------------------------------------------

    #[test]
    fn suspended_dismiss_keeps_entry_until_done() {
        let harness = Harness::new();
        harness.script(
            Screen::Settings,
            Script {
                dismiss_ticks: 2,
                ..Script::default()
            },
        );
        let mut stack = harness.stack();

        let menu = stack
            .present(Screen::Menu, Args::none(), PresentOptions::new())
            .unwrap()
            .id();
        let settings = stack
            .present(Screen::Settings, Args::none(), PresentOptions::new())
            .unwrap()
            .id();

        let mut signal = stack.dismiss(settings);
        assert_eq!(stack.state(settings), Some(EntryState::Dismissing));
        // Below entry takes over as soon as dismissal starts
        assert_eq!(stack.state(menu), Some(EntryState::Active));
        assert!(signal.poll().is_none());

        stack.update(TICK);
        assert!(stack.contains(settings));

        stack.update(TICK);
        assert!(!stack.contains(settings));
        assert_eq!(signal.poll(), Some(&Ok(())));
    }

    #[test]
    fn repeated_dismiss_joins_in_flight_dismissal() {
        let harness = Harness::new();
        harness.script(
            Screen::Settings,
            Script {
                dismiss_ticks: 2,
                ..Script::default()
            },
        );
        let mut stack = harness.stack();

        let settings = stack
            .present(Screen::Settings, Args::none(), PresentOptions::new())
            .unwrap()
            .id();

        let mut first = stack.dismiss(settings);
        let mut second = stack.dismiss(settings);
        assert_eq!(stack.state(settings), Some(EntryState::Dismissing));
        assert!(first.poll().is_none());
        assert!(second.poll().is_none());

        stack.update(TICK);
        stack.update(TICK);

        assert!(!stack.contains(settings));
        assert_eq!(first.poll(), Some(&Ok(())));
        assert_eq!(second.poll(), Some(&Ok(())));
        assert_eq!(harness.count(settings, "dismiss"), 1);
    }

    #[test]
    fn parent_waits_for_suspended_child() {
        let harness = Harness::new();
        harness.script(
            Screen::Dialog,
            Script {
                dismiss_ticks: 1,
                ..Script::default()
            },
        );
        let mut stack = harness.stack();

        let parent = stack
            .present(Screen::Menu, Args::none(), PresentOptions::new())
            .unwrap()
            .id();
        let child = stack
            .present(Screen::Dialog, Args::none(), PresentOptions::new().with_parent(parent))
            .unwrap()
            .id();

        stack.dismiss(parent);
        assert!(stack.contains(parent));
        assert!(!harness.events_for(parent).contains(&"dismiss"));

        stack.update(TICK);
        assert!(stack.is_empty());
        assert_eq!(harness.disposal_order(), vec![child, parent]);
    }

    //--- Reentrancy -------------------------------------------------------

    #[test]
    fn hook_presents_child() {
        let harness = Harness::new();
        harness.script(
            Screen::Menu,
            Script {
                spawn_child: Some(Screen::Toast),
                ..Script::default()
            },
        );
        let mut stack = harness.stack();

        let menu = stack
            .present(Screen::Menu, Args::none(), PresentOptions::new())
            .unwrap()
            .id();

        let toast = stack.find(Screen::Toast).expect("child presented");
        assert_eq!(toast.parent, Some(menu));
        assert_eq!(toast.state, EntryState::Active);
    }

    #[test]
    fn scheduled_callback_dismisses_owner() {
        let harness = Harness::new();
        harness.script(
            Screen::Toast,
            Script {
                schedule_dismiss_after: Some(0.05),
                ..Script::default()
            },
        );
        let mut stack = harness.stack();

        let toast = stack
            .present(
                Screen::Toast,
                Args::none(),
                PresentOptions::new().with_flags(PresentFlags::DO_NOT_ACTIVATE),
            )
            .unwrap()
            .id();
        assert_eq!(stack.scheduler().len(), 1);

        stack.update(0.03);
        assert!(stack.contains(toast));

        stack.update(0.03);
        assert!(!stack.contains(toast));
        assert!(stack.scheduler().is_empty());
    }

    #[test]
    fn disposal_cancels_owned_schedules() {
        let harness = Harness::new();
        harness.script(
            Screen::Toast,
            Script {
                schedule_dismiss_after: Some(10.0),
                ..Script::default()
            },
        );
        let mut stack = harness.stack();

        let toast = stack
            .present(Screen::Toast, Args::none(), PresentOptions::new())
            .unwrap()
            .id();
        stack.dismiss(toast);

        assert!(stack.scheduler().is_empty());
    }

    #[test]
    fn on_tick_only_for_settled_entries() {
        let harness = Harness::new();
        let ticking = Script {
            record_ticks: true,
            ..Script::default()
        };
        harness.script(Screen::Menu, ticking.clone());
        harness.script(
            Screen::Settings,
            Script {
                present_ticks: 3,
                ..ticking
            },
        );
        let mut stack = harness.stack();

        let menu = stack
            .present(Screen::Menu, Args::none(), PresentOptions::new())
            .unwrap()
            .id();
        let settings = stack
            .present(Screen::Settings, Args::none(), PresentOptions::new())
            .unwrap()
            .id();

        stack.update(TICK);
        stack.update(TICK);

        assert_eq!(harness.count(menu, "tick"), 2);
        assert_eq!(harness.count(settings, "tick"), 0);
    }

    //--- Activation Invariant ---------------------------------------------

    #[test]
    fn at_most_one_active_across_operations() {
        let harness = Harness::new();
        let mut stack = harness.stack();

        let mut ids = Vec::new();
        for (kind, layer) in [
            (Screen::Menu, 0),
            (Screen::Hud, 2),
            (Screen::Settings, 0),
            (Screen::Toast, 1),
            (Screen::Menu, 1),
        ] {
            ids.push(
                stack
                    .present(kind, Args::none(), PresentOptions::new().on_layer(layer))
                    .unwrap()
                    .id(),
            );
            let active = stack.entries().filter(|e| e.state == EntryState::Active).count();
            assert_eq!(active, 1);
        }

        for id in ids.into_iter().rev() {
            stack.dismiss(id);
            let active = stack.entries().filter(|e| e.state == EntryState::Active).count();
            assert!(active <= 1);
            assert_eq!(active, usize::from(!stack.is_empty()));
        }
    }
}
