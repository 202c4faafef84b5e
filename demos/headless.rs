//=========================================================================
// Headless Presenter Demo
//
// Drives a runtime without a window: a scripted "host" thread sends
// events over the runtime channel while the main thread runs the loop.
//
// Run with:
//   RUST_LOG=debug cargo run --bin presenter-demo
//
//=========================================================================

use std::task::Poll;
use std::thread;
use std::time::Duration;

use aetheric_presenter::prelude::*;
use log::info;

//=== Screens =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Screen {
    Title,
    Loading,
    Pause,
    Toast,
}

impl ControllerKind for Screen {}

//=== Controllers =========================================================

struct Title;

impl Controller<Screen> for Title {
    fn on_activate(&mut self, ctx: &mut PresentContext<'_, Screen>) {
        info!("Title screen {} is active", ctx.id());
    }

    fn on_command(&mut self, command: &Command<'_>, ctx: &mut PresentContext<'_, Screen>) -> bool {
        match command.name() {
            "pause" => {
                ctx.present(Screen::Pause, Args::none(), PresentOptions::new());
                true
            }
            "notify" => {
                let text = command.args().get::<String>().cloned().unwrap_or_default();
                ctx.present(Screen::Toast, Args::new(text), PresentOptions::new());
                true
            }
            _ => false,
        }
    }
}

/// Modal overlay that pretends to load assets for a few ticks, then
/// removes itself.
struct Loading {
    remaining: u32,
}

impl Controller<Screen> for Loading {
    fn on_present(&mut self, _ctx: &mut PresentContext<'_, Screen>) -> HookPoll {
        Poll::Pending
    }

    fn poll_present(&mut self, _ctx: &mut PresentContext<'_, Screen>) -> HookPoll {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return Poll::Pending;
        }
        Poll::Ready(Ok(()))
    }

    fn on_activate(&mut self, ctx: &mut PresentContext<'_, Screen>) {
        info!("Loading {} finished", ctx.id());
        ctx.dismiss();
    }
}

struct Pause;

impl Controller<Screen> for Pause {
    fn on_command(&mut self, command: &Command<'_>, ctx: &mut PresentContext<'_, Screen>) -> bool {
        if command.is("resume") {
            ctx.dismiss();
        }
        // Modal: swallow everything else too
        true
    }
}

struct Toast {
    text: String,
}

impl Controller<Screen> for Toast {
    fn on_present(&mut self, ctx: &mut PresentContext<'_, Screen>) -> HookPoll {
        info!("Toast: {}", self.text);
        ctx.schedule(0.5, |schedule| {
            schedule.dismiss_owner();
            TickControl::Exit
        });
        Poll::Ready(Ok(()))
    }
}

//=== Views ===============================================================

/// Logs view creation instead of rendering anything.
struct ConsoleViews;

impl ViewFactory<Screen> for ConsoleViews {
    fn create_view(&mut self, request: &ViewRequest<Screen>) -> Poll<Result<ViewHandle, ViewCreationError>> {
        info!(
            "Create view for {} ({:?}) on layer {}",
            request.entry, request.kind, request.layer
        );
        Poll::Ready(Ok(ViewHandle::new(request.entry.get())))
    }

    fn destroy_view(&mut self, view: ViewHandle) {
        info!("Destroy view {}", view.raw());
    }
}

//=== Main ================================================================

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut registry = ControllerRegistry::new();
    registry.register(Screen::Title, |_, _| Ok(Box::new(Title)));
    registry.register_with(
        Screen::Loading,
        KindDefaults::new(PresentFlags::MODAL, 3),
        |_, _| Ok(Box::new(Loading { remaining: 30 })),
    );
    registry.register_with(
        Screen::Pause,
        KindDefaults::new(PresentFlags::MODAL | PresentFlags::SINGLETON, 1),
        |_, _| Ok(Box::new(Pause)),
    );
    registry.register_with(
        Screen::Toast,
        KindDefaults::new(PresentFlags::DO_NOT_ACTIVATE, 2),
        |_, mut args| {
            let text = args.take::<String>().unwrap_or_default();
            Ok(Box::new(Toast { text }))
        },
    );

    let runtime = RuntimeBuilder::new()
        .with_tps(60.0)
        .build(registry, ConsoleViews)
        .init(|stack| {
            for kind in [Screen::Title, Screen::Loading] {
                if let Err(e) = stack.present(kind, Args::none(), PresentOptions::new()) {
                    log::error!("Initial present of {:?} failed: {}", kind, e);
                }
            }
        });

    let faults = runtime.stack().faults();
    let sender = runtime.sender();

    let host = thread::spawn(move || {
        let script = [
            (700, HostEvent::Command { name: "notify".into(), args: Args::new(String::from("Welcome!")) }),
            (300, HostEvent::Command { name: "pause".into(), args: Args::none() }),
            (300, HostEvent::Command { name: "notify".into(), args: Args::none() }),
            (300, HostEvent::Command { name: "resume".into(), args: Args::none() }),
            (800, HostEvent::Shutdown),
        ];

        for (delay_ms, event) in script {
            thread::sleep(Duration::from_millis(delay_ms));
            if sender.send(event).is_err() {
                break;
            }
        }
    });

    runtime.run();

    if host.join().is_err() {
        log::error!("Host thread panicked");
    }
    for fault in faults.try_iter() {
        log::warn!("Unhandled fault: {}", fault);
    }
    info!("Demo finished");
}
