//=========================================================================
// Presenter Runtime
//
// Host-facing driver around a `PresentationStack`.
//
// Architecture:
// ```text
//     RuntimeBuilder  ──build()──>  Runtime  ──run()──>  [Fixed-rate loop]
//         │                           │
//         ├─ with_tps()               ├─ sender() → HostEvent channel
//         ├─ with_channel_capacity()  ├─ tick(delta) → TickControl
//         ├─ with_fault_channel_…()   └─ shutdown() → dismiss everything
//         └─ with_max_entries()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Sender};
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::host_bridge::{EventCollector, HostEvent, ViewFactory};
use crate::core::presentation::{ControllerKind, ControllerRegistry, PresentationStack, StackConfig};
use crate::core::TickControl;

//=== Constants ===========================================================

/// Ticks granted to suspended dismissals during shutdown.
const SHUTDOWN_TICK_LIMIT: usize = 120;

//=== RuntimeBuilder ======================================================

/// Builder for configuring and constructing a [`Runtime`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (ticks per second for [`Runtime::run`])
/// - **Channel capacity**: 128 host events
/// - **Fault channel capacity**: 64 faults
/// - **Max entries**: unlimited
///
/// # Examples
///
/// ```no_run
/// use std::task::Poll;
/// use aetheric_presenter::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Screen { Title }
/// impl ControllerKind for Screen {}
///
/// struct Title;
/// impl Controller<Screen> for Title {}
///
/// struct Views;
/// impl ViewFactory<Screen> for Views {
///     fn create_view(&mut self, req: &ViewRequest<Screen>) -> Poll<Result<ViewHandle, ViewCreationError>> {
///         Poll::Ready(Ok(ViewHandle::new(req.entry.get())))
///     }
///     fn destroy_view(&mut self, _: ViewHandle) {}
/// }
///
/// let mut registry = ControllerRegistry::new();
/// registry.register(Screen::Title, |_, _| Ok(Box::new(Title)));
///
/// let runtime = RuntimeBuilder::new()
///     .with_tps(30.0)
///     .with_max_entries(16)
///     .build(registry, Views)
///     .init(|stack| {
///         let _ = stack.present(Screen::Title, Args::none(), PresentOptions::new());
///     });
///
/// // The loop runs until every sender is dropped or `Shutdown` arrives
/// let host = runtime.sender();
/// std::thread::spawn(move || {
///     std::thread::sleep(std::time::Duration::from_secs(5));
///     let _ = host.send(HostEvent::Shutdown);
/// });
///
/// runtime.run();
/// ```
pub struct RuntimeBuilder<K: ControllerKind> {
    tps: f64,
    channel_capacity: usize,
    config: StackConfig,
    _phantom: std::marker::PhantomData<K>,
}

impl<K: ControllerKind> RuntimeBuilder<K> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            config: StackConfig::default(),
            _phantom: std::marker::PhantomData,
        }
    }

    /// Sets the target ticks per second for [`Runtime::run`].
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the capacity of the host → runtime event channel.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Sets the capacity of the controller fault channel.
    ///
    /// Default: 64
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_fault_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Fault channel capacity must be positive");
        self.config.fault_channel_capacity = capacity;
        self
    }

    /// Caps live plus pending entries. Further presents fail.
    ///
    /// # Panics
    ///
    /// Panics if `max == 0`.
    pub fn with_max_entries(mut self, max: usize) -> Self {
        assert!(max > 0, "Max entries must be positive");
        self.config.max_entries = Some(max);
        self
    }

    /// Builds the runtime around a registry and a view factory.
    pub fn build<V>(self, registry: ControllerRegistry<K>, views: V) -> Runtime<K>
    where
        V: ViewFactory<K> + 'static,
    {
        info!(
            target: "presenter::runtime",
            "Building runtime (TPS: {}, channel: {}, {:?})",
            self.tps, self.channel_capacity, self.config
        );

        let (sender, receiver) = bounded(self.channel_capacity);

        Runtime {
            stack: PresentationStack::with_config(registry, views, self.config),
            collector: EventCollector::new(receiver),
            sender,
            tps: self.tps,
        }
    }
}

impl<K: ControllerKind> Default for RuntimeBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Runtime =============================================================

/// Owns a presentation stack and feeds it host events.
///
/// Hosts either call [`tick`](Runtime::tick) from their own frame loop or
/// hand control to [`run`](Runtime::run).
pub struct Runtime<K: ControllerKind> {
    stack: PresentationStack<K>,
    collector: EventCollector<K>,
    sender: Sender<HostEvent<K>>,
    tps: f64,
}

impl<K: ControllerKind> Runtime<K> {
    //--- Initialization ---------------------------------------------------

    /// Runs setup code against the stack (initial presents, schedules).
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut PresentationStack<K>),
    {
        info!(target: "presenter::runtime", "Initializing presentation stack");
        init_fn(&mut self.stack);
        self
    }

    //--- Accessors --------------------------------------------------------

    /// A sender for host events. Clone freely; senders may live on other
    /// threads.
    pub fn sender(&self) -> Sender<HostEvent<K>> {
        self.sender.clone()
    }

    pub fn stack(&self) -> &PresentationStack<K> {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut PresentationStack<K> {
        &mut self.stack
    }

    pub fn tps(&self) -> f64 {
        self.tps
    }

    //--- Execution --------------------------------------------------------

    /// Runs one step: applies pending host events, then updates the stack.
    ///
    /// Returns [`TickControl::Exit`] once `Shutdown` is received or every
    /// sender is gone. Events queued before the shutdown are still applied.
    pub fn tick(&mut self, delta: f32) -> TickControl {
        let control = self.collector.collect_frame();

        for event in self.collector.take_events() {
            self.apply(event);
        }

        if control == TickControl::Continue {
            self.stack.update(delta);
        }
        control
    }

    /// Runs a fixed-rate loop on the calling thread until shutdown, then
    /// dismisses everything.
    pub fn run(self) {
        // Only external senders keep the loop alive
        let Runtime {
            stack,
            collector,
            sender,
            tps,
        } = self;
        drop(sender);
        let mut runtime = RunLoop {
            stack,
            collector,
            tps,
        };
        runtime.run();
    }

    /// Dismisses every entry and pumps suspended dismissals to completion.
    pub fn shutdown(&mut self) {
        shutdown_stack(&mut self.stack, self.tps);
    }

    //--- Internal Helpers -------------------------------------------------

    fn apply(&mut self, event: HostEvent<K>) {
        apply_event(&mut self.stack, event);
    }
}

//=== Run Loop ============================================================

/// Runtime without its own sender, so disconnects end the loop.
struct RunLoop<K: ControllerKind> {
    stack: PresentationStack<K>,
    collector: EventCollector<K>,
    tps: f64,
}

impl<K: ControllerKind> RunLoop<K> {
    fn run(&mut self) {
        info!(target: "presenter::runtime", "Starting runtime loop (TPS: {})", self.tps);

        let frame_duration = Duration::from_secs_f64(1.0 / self.tps);
        let mut last_tick = Instant::now();

        loop {
            let frame_start = Instant::now();
            let delta = frame_start.duration_since(last_tick).as_secs_f32();
            last_tick = frame_start;

            //--- Step 1: Gather host events ------------------------------
            let control = self.collector.collect_frame();
            for event in self.collector.take_events() {
                apply_event(&mut self.stack, event);
            }

            if control == TickControl::Exit {
                info!(target: "presenter::runtime", "Runtime loop exiting");
                break;
            }

            //--- Step 2: Update the stack --------------------------------
            self.stack.update(delta);

            //--- Step 3: Maintain pacing ---------------------------------
            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                thread::sleep(frame_duration - elapsed);
            }
        }

        shutdown_stack(&mut self.stack, self.tps);
    }
}

//=== Shared Helpers ======================================================

fn apply_event<K: ControllerKind>(stack: &mut PresentationStack<K>, event: HostEvent<K>) {
    match event {
        HostEvent::Present {
            kind,
            args,
            options,
        } => {
            if let Err(e) = stack.present(kind, args, options) {
                warn!(target: "presenter::runtime", "Host present of {:?} failed: {}", kind, e);
            }
        }
        HostEvent::Command { name, args } => {
            stack.route_command(&name, args);
        }
        HostEvent::Dismiss(entry) => {
            stack.dismiss(entry);
        }
        HostEvent::PopTo(target) => {
            stack.pop_to(target);
        }
        HostEvent::DismissAll => stack.dismiss_all(),
        HostEvent::Shutdown => {
            debug!(target: "presenter::runtime", "Shutdown event reached the stack, ignoring");
        }
    }
}

fn shutdown_stack<K: ControllerKind>(stack: &mut PresentationStack<K>, tps: f64) {
    info!(target: "presenter::runtime", "Shutting down ({} entries)", stack.len());
    stack.dismiss_all();

    let delta = (1.0 / tps) as f32;
    for _ in 0..SHUTDOWN_TICK_LIMIT {
        if stack.is_empty() {
            break;
        }
        stack.update(delta);
    }

    if !stack.is_empty() {
        warn!(
            target: "presenter::runtime",
            "{} entries still dismissing after {} shutdown ticks",
            stack.len(),
            SHUTDOWN_TICK_LIMIT
        );
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
