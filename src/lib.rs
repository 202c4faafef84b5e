//=========================================================================
// Aetheric Presenter — Library Root
//
// A host-agnostic presentation stack: layered view controllers with a
// deterministic, tick-driven lifecycle.
//
// Responsibilities:
// - Expose the presentation core (`core`)
// - Provide a host-facing runtime (`Runtime`, `RuntimeBuilder`)
// - Optionally bridge a winit window (`platform`, feature `winit-host`)
//
// Typical usage:
// ```no_run
// use aetheric_presenter::prelude::*;
//
// let runtime = RuntimeBuilder::new().build(registry, views);
// runtime.init(|stack| { /* initial presents */ }).run();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the stack, lifecycle, routing and scheduling. Hosts
// that run their own frame loop can use `PresentationStack` directly.
//
pub mod core;
pub mod prelude;

//--- Optional Host -------------------------------------------------------
//
// `platform` wraps a winit event loop around a `Runtime`. Only built with
// the `winit-host` feature.
//
#[cfg(feature = "winit-host")]
pub mod platform;

//--- Runtime -------------------------------------------------------------
//
// `runtime` owns a stack and feeds it host events at a fixed rate.
//
mod runtime;

//--- Public Exports ------------------------------------------------------

pub use crate::core::presentation::{PresentationStack, StackConfig};
pub use runtime::{Runtime, RuntimeBuilder};
