//=========================================================================
// Core Systems
//=========================================================================
//
// Host-agnostic presentation core.
//
// Components:
// - `presentation`: the layered stack, entry lifecycle, registry
// - `command`: top-down command routing
// - `scheduler`: per-tick callbacks pumped by `update()`
// - `host_bridge`: view factory contract and host events
// - `args`, `error`: shared payload and error types
//
// Everything here runs on the caller's thread. No internal threads are
// spawned; the host drives progress by calling `update(delta)`.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod args;
pub mod command;
pub mod error;
pub mod host_bridge;
pub mod presentation;
pub mod scheduler;

//=== TickControl =========================================================

/// Control flow signal for update loops and scheduled callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}
