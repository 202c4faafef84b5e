//=========================================================================
// Platform Host (winit)
//
// Windowed host that drives a `Runtime` from the winit event loop.
//
// Architecture:
// ```text
//  Main Thread:
//  ┌───────────────────────────────────┐
//  │  Winit Event Loop                 │
//  │   ├─ KeyboardInput (pressed)      │
//  │   │    └─ key binding → route_command()
//  │   ├─ RedrawRequested              │
//  │   │    └─ runtime.tick(delta)     │
//  │   └─ CloseRequested               │
//  │        └─ runtime.shutdown()      │
//  └───────────────────────────────────┘
// ```
//
// Frame Boundary: RedrawRequested. The runtime is ticked once per redraw,
// so the presentation stack advances at the display refresh rate.
//
// Winit mandates the main thread on macOS/iOS; the runtime is not `Send`
// and stays on that thread too.
//
//=========================================================================

//=== External Crates =====================================================

use std::collections::HashMap;
use std::time::Instant;

use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowAttributes},
};

pub use winit::keyboard::KeyCode;

//=== Internal Imports ====================================================

use crate::core::args::Args;
use crate::core::presentation::ControllerKind;
use crate::core::TickControl;
use crate::runtime::Runtime;

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are typically fatal: if the event loop can't be created, the
/// host cannot run.
#[derive(Debug)]
pub enum PlatformError {
    /// Failed to create event loop (rare, indicates OS-level issue).
    EventLoopCreation(winit::error::EventLoopError),

    /// Event loop execution error.
    EventLoopExecution(winit::error::EventLoopError),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventLoopCreation(e) => write!(f, "Event loop creation failed: {}", e),
            Self::EventLoopExecution(e) => write!(f, "Event loop error: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::EventLoopCreation(e) | Self::EventLoopExecution(e) => Some(e),
        }
    }
}

//=== WindowHost ==========================================================

/// Window host pumping a [`Runtime`] on every redraw.
///
/// # Example
///
/// ```no_run
/// # use std::task::Poll;
/// # use aetheric_presenter::prelude::*;
/// # use aetheric_presenter::platform::{KeyCode, WindowHost};
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum Screen { Title }
/// # impl ControllerKind for Screen {}
/// # struct Views;
/// # impl ViewFactory<Screen> for Views {
/// #     fn create_view(&mut self, r: &ViewRequest<Screen>) -> Poll<Result<ViewHandle, ViewCreationError>> {
/// #         Poll::Ready(Ok(ViewHandle::new(r.entry.get())))
/// #     }
/// #     fn destroy_view(&mut self, _: ViewHandle) {}
/// # }
/// let runtime = RuntimeBuilder::new().build(ControllerRegistry::<Screen>::new(), Views);
///
/// WindowHost::new(runtime)
///     .with_title("Presenter")
///     .bind_key(KeyCode::Escape, "back")
///     .bind_key(KeyCode::Enter, "confirm")
///     .run()?;
/// # Ok::<(), aetheric_presenter::platform::PlatformError>(())
/// ```
pub struct WindowHost<K: ControllerKind> {
    runtime: Runtime<K>,
    bindings: HashMap<KeyCode, String>,
    title: String,
    window: Option<Window>,
    last_frame: Option<Instant>,
}

impl<K: ControllerKind> WindowHost<K> {
    //--- Construction -----------------------------------------------------

    /// Creates a host. The window is created lazily in `resumed()`.
    pub fn new(runtime: Runtime<K>) -> Self {
        info!(target: "platform", "Window host initialized");
        Self {
            runtime,
            bindings: HashMap::new(),
            title: String::from("Aetheric Presenter"),
            window: None,
            last_frame: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Routes `command` whenever `key` is pressed. Rebinding replaces.
    pub fn bind_key(mut self, key: KeyCode, command: impl Into<String>) -> Self {
        let command = command.into();
        debug!(target: "platform", "Bound {:?} to '{}'", key, command);
        self.bindings.insert(key, command);
        self
    }

    pub fn runtime(&self) -> &Runtime<K> {
        &self.runtime
    }

    //--- Execution --------------------------------------------------------

    /// Runs the winit event loop until the window closes or the runtime
    /// receives `Shutdown`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;
        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    fn command_for(&self, key: KeyCode) -> Option<&str> {
        self.bindings.get(&key).map(String::as_str)
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            trace!(target: "platform", "Unidentified key ignored");
            return;
        };

        let Some(command) = self.command_for(code).map(str::to_owned) else {
            trace!(target: "platform", "Unbound key {:?} ignored", code);
            return;
        };

        let handled = self.runtime.stack_mut().route_command(&command, Args::none());
        trace!(target: "platform", "{:?} → '{}' (handled: {})", code, command, handled);
    }

    /// Ticks the runtime with the time elapsed since the previous frame.
    fn frame(&mut self) -> TickControl {
        let now = Instant::now();
        let delta = self
            .last_frame
            .map(|last| now.duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);

        self.runtime.tick(delta)
    }
}

//=== Winit Integration ===================================================

impl<K: ControllerKind> ApplicationHandler for WindowHost<K> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(800, 600));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.runtime.shutdown();
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.runtime.shutdown();
                event_loop.exit();
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => self.handle_key(key_event),

            WindowEvent::RedrawRequested => {
                if self.frame() == TickControl::Exit {
                    info!(target: "platform", "Runtime requested shutdown");
                    self.runtime.shutdown();
                    event_loop.exit();
                    return;
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
