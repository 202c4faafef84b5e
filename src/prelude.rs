//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_presenter::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Runtime
pub use crate::runtime::{Runtime, RuntimeBuilder};

// Presentation stack
pub use crate::core::presentation::{
    Controller, ControllerKind, ControllerRegistry, DismissSignal, EntryId, EntryInfo, EntryState,
    FactoryContext, HookPoll, KindDefaults, PopTarget, PresentContext, PresentFlags,
    PresentHandle, PresentOptions, PresentationStack, StackConfig,
};

// Commands and scheduling
pub use crate::core::command::Command;
pub use crate::core::scheduler::{ScheduleContext, ScheduleHandle};
pub use crate::core::TickControl;

// Host bridge
pub use crate::core::host_bridge::{HostEvent, ViewFactory, ViewHandle, ViewRequest};

// Payloads and errors
pub use crate::core::args::Args;
pub use crate::core::error::{ControllerError, ControllerFault, StackError, ViewCreationError};
