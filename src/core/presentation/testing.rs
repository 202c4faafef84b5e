//=========================================================================
// Test Support
//=========================================================================
//
// Scripted controllers and an in-memory view factory shared by the unit
// tests of the presentation, command and runtime modules.
//
//=========================================================================

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::task::Poll;

use super::{
    Controller, ControllerKind, ControllerRegistry, EntryId, HookPoll, KindDefaults,
    PresentContext, PresentFlags, PresentOptions, PresentationStack, StackConfig,
};
use crate::core::args::Args;
use crate::core::command::Command;
use crate::core::error::{ControllerError, ViewCreationError};
use crate::core::host_bridge::{ViewFactory, ViewHandle, ViewRequest};
use crate::core::TickControl;

//=== Screen ==============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Screen {
    Menu,
    Settings,
    /// Registered modal on layer 1.
    Dialog,
    Toast,
    Hud,
}

impl ControllerKind for Screen {}

const ALL_SCREENS: [Screen; 5] = [
    Screen::Menu,
    Screen::Settings,
    Screen::Dialog,
    Screen::Toast,
    Screen::Hud,
];

type Journal = Rc<RefCell<Vec<(EntryId, &'static str)>>>;

//=== Script ==============================================================

/// Behavior of a scripted controller.
#[derive(Debug, Clone, Default)]
pub(crate) struct Script {
    /// Number of `poll_present` calls before the present completes.
    pub present_ticks: u32,
    /// Number of `poll_dismiss` calls before the dismiss completes.
    pub dismiss_ticks: u32,
    pub present_error: Option<&'static str>,
    pub dismiss_error: Option<&'static str>,
    pub construct_error: Option<&'static str>,
    /// Commands consumed by the controller.
    pub handles: &'static [&'static str],
    /// Command that makes the controller dismiss itself.
    pub close_on: Option<&'static str>,
    /// Command that makes the controller dismiss every entry.
    pub clear_on: Option<&'static str>,
    pub schedule_dismiss_after: Option<f32>,
    pub spawn_child: Option<Screen>,
    pub record_ticks: bool,
}

struct Scripted {
    script: Script,
    journal: Journal,
    present_left: u32,
    dismiss_left: u32,
}

impl Scripted {
    fn record(&self, ctx: &PresentContext<'_, Screen>, event: &'static str) {
        self.journal.borrow_mut().push((ctx.id(), event));
    }

    fn finish(error: Option<&'static str>) -> HookPoll {
        match error {
            Some(message) => Poll::Ready(Err(ControllerError::new(message))),
            None => Poll::Ready(Ok(())),
        }
    }
}

impl Controller<Screen> for Scripted {
    fn on_present(&mut self, ctx: &mut PresentContext<'_, Screen>) -> HookPoll {
        self.record(ctx, "present");

        if let Some(child) = self.script.spawn_child {
            ctx.present(child, Args::none(), PresentOptions::new());
        }
        if let Some(after) = self.script.schedule_dismiss_after {
            ctx.schedule(after, |schedule| {
                schedule.dismiss_owner();
                TickControl::Exit
            });
        }

        if self.present_left > 0 {
            return Poll::Pending;
        }
        Self::finish(self.script.present_error)
    }

    fn poll_present(&mut self, ctx: &mut PresentContext<'_, Screen>) -> HookPoll {
        self.record(ctx, "poll_present");
        self.present_left = self.present_left.saturating_sub(1);
        if self.present_left > 0 {
            return Poll::Pending;
        }
        Self::finish(self.script.present_error)
    }

    fn on_activate(&mut self, ctx: &mut PresentContext<'_, Screen>) {
        self.record(ctx, "activate");
    }

    fn on_deactivate(&mut self, ctx: &mut PresentContext<'_, Screen>) {
        self.record(ctx, "deactivate");
    }

    fn on_dismiss(&mut self, ctx: &mut PresentContext<'_, Screen>) -> HookPoll {
        self.record(ctx, "dismiss");
        if self.dismiss_left > 0 {
            return Poll::Pending;
        }
        Self::finish(self.script.dismiss_error)
    }

    fn poll_dismiss(&mut self, ctx: &mut PresentContext<'_, Screen>) -> HookPoll {
        self.record(ctx, "poll_dismiss");
        self.dismiss_left = self.dismiss_left.saturating_sub(1);
        if self.dismiss_left > 0 {
            return Poll::Pending;
        }
        Self::finish(self.script.dismiss_error)
    }

    fn on_command(&mut self, command: &Command<'_>, ctx: &mut PresentContext<'_, Screen>) -> bool {
        if self.script.close_on.is_some_and(|name| command.is(name)) {
            self.record(ctx, "command");
            ctx.dismiss();
            return true;
        }
        if self.script.clear_on.is_some_and(|name| command.is(name)) {
            self.record(ctx, "command");
            ctx.dismiss_all();
            return true;
        }
        if self.script.handles.iter().any(|name| command.is(name)) {
            self.record(ctx, "command");
            return true;
        }
        false
    }

    fn on_tick(&mut self, ctx: &mut PresentContext<'_, Screen>, _delta: f32) {
        if self.script.record_ticks {
            self.record(ctx, "tick");
        }
    }
}

//=== Mock Views ==========================================================

/// Everything the mock view factory saw.
#[derive(Debug, Clone, Default)]
pub(crate) struct ViewLog {
    pub created: Vec<EntryId>,
    pub destroyed: Vec<EntryId>,
    pub cancelled: Vec<EntryId>,
    failing: HashSet<Screen>,
    delays: HashMap<Screen, u32>,
    remaining: HashMap<EntryId, u32>,
}

const VIEW_BASE: u64 = 1000;

struct MockViews(Rc<RefCell<ViewLog>>);

impl ViewFactory<Screen> for MockViews {
    fn create_view(&mut self, request: &ViewRequest<Screen>) -> Poll<Result<ViewHandle, ViewCreationError>> {
        let mut log = self.0.borrow_mut();

        let delay = log.delays.get(&request.kind).copied().unwrap_or(0);
        let remaining = log.remaining.entry(request.entry).or_insert(delay);
        if *remaining > 0 {
            *remaining -= 1;
            return Poll::Pending;
        }

        if log.failing.contains(&request.kind) {
            return Poll::Ready(Err(ViewCreationError::new("mock view failure")));
        }

        log.created.push(request.entry);
        Poll::Ready(Ok(ViewHandle::new(VIEW_BASE + request.entry.get())))
    }

    fn cancel_view(&mut self, request: &ViewRequest<Screen>) {
        self.0.borrow_mut().cancelled.push(request.entry);
    }

    fn destroy_view(&mut self, view: ViewHandle) {
        let entry = EntryId::from_raw(view.raw() - VIEW_BASE);
        self.0.borrow_mut().destroyed.push(entry);
    }
}

//=== Harness =============================================================

/// Builds stacks wired to a shared journal and view log.
#[derive(Clone, Default)]
pub(crate) struct Harness {
    journal: Journal,
    scripts: Rc<RefCell<HashMap<Screen, Script>>>,
    views: Rc<RefCell<ViewLog>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, kind: Screen, script: Script) {
        self.scripts.borrow_mut().insert(kind, script);
    }

    pub fn fail_views(&self, kind: Screen) {
        self.views.borrow_mut().failing.insert(kind);
    }

    /// Makes `create_view` return Pending `ticks` times for `kind`.
    pub fn delay_views(&self, kind: Screen, ticks: u32) {
        self.views.borrow_mut().delays.insert(kind, ticks);
    }

    //--- Stack Construction -----------------------------------------------

    pub fn registry(&self, skip: Option<Screen>) -> ControllerRegistry<Screen> {
        let mut registry = ControllerRegistry::new();

        for kind in ALL_SCREENS.into_iter().filter(|kind| Some(*kind) != skip) {
            let defaults = match kind {
                Screen::Dialog => KindDefaults::new(PresentFlags::MODAL, 1),
                _ => KindDefaults::default(),
            };

            let journal = Rc::clone(&self.journal);
            let scripts = Rc::clone(&self.scripts);
            registry.register_with(kind, defaults, move |ctx, _args| {
                let script = scripts.borrow().get(&ctx.kind).cloned().unwrap_or_default();
                journal.borrow_mut().push((ctx.id, "construct"));

                if let Some(message) = script.construct_error {
                    return Err(ControllerError::new(message));
                }

                Ok(Box::new(Scripted {
                    present_left: script.present_ticks,
                    dismiss_left: script.dismiss_ticks,
                    script,
                    journal: Rc::clone(&journal),
                }) as Box<dyn Controller<Screen>>)
            });
        }

        registry
    }

    pub fn views_factory(&self) -> impl ViewFactory<Screen> + 'static {
        MockViews(Rc::clone(&self.views))
    }

    pub fn stack(&self) -> PresentationStack<Screen> {
        self.stack_with_config(StackConfig::default())
    }

    pub fn stack_without(&self, kind: Screen) -> PresentationStack<Screen> {
        PresentationStack::new(self.registry(Some(kind)), self.views_factory())
    }

    pub fn stack_with_config(&self, config: StackConfig) -> PresentationStack<Screen> {
        PresentationStack::with_config(self.registry(None), self.views_factory(), config)
    }

    //--- Inspection -------------------------------------------------------

    pub fn journal(&self) -> Vec<(EntryId, &'static str)> {
        self.journal.borrow().clone()
    }

    pub fn events_for(&self, id: EntryId) -> Vec<&'static str> {
        self.journal
            .borrow()
            .iter()
            .filter(|(entry, _)| *entry == id)
            .map(|(_, event)| *event)
            .collect()
    }

    pub fn count(&self, id: EntryId, event: &str) -> usize {
        self.events_for(id).into_iter().filter(|e| *e == event).count()
    }

    pub fn views(&self) -> ViewLog {
        self.views.borrow().clone()
    }

    /// Entries in the order their views were destroyed.
    pub fn disposal_order(&self) -> Vec<EntryId> {
        self.views.borrow().destroyed.clone()
    }
}
