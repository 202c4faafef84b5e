//=========================================================================
// Host Bridge
//=========================================================================
//
// Bridges the host application (engine, window loop, test harness) with
// the presentation core.
//
// Components:
// - `interface`: view factory contract, view handles, host events
// - `event_collector`: core-side host event collection per tick
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Public API ==========================================================

pub(crate) use event_collector::EventCollector;
pub use interface::{HostEvent, ViewFactory, ViewHandle, ViewRequest};
