//=========================================================================
// Presentation System
//=========================================================================
//
// Manages controller lifecycle and the layered presentation stack.
//
// Architecture:
//   PresentationStack
//     ├─ registry: ControllerRegistry<K>      (kind → factory + defaults)
//     ├─ views: Box<dyn ViewFactory<K>>       (host collaborator)
//     ├─ entries: HashMap<EntryId, PresentableEntry<K>>
//     ├─ order: Vec<EntryId>                  (bottom → top, by layer)
//     ├─ requests: RequestQueue<K>            (reentrant requests)
//     └─ scheduler: Scheduler<K>
//
// Flow:
//   present() → create_view() → construct → insert → drive()
//   update()  → poll suspended hooks → scheduler → on_tick → drive()
//   drive()   → requests → advance entries → settle activation (repeat)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;
use std::task::Poll;

//=== Module Declarations =================================================

mod context;
mod entry;
mod handle;
mod lifecycle;
mod options;
mod registry;
pub(crate) mod request_queue;
mod stack_manager;

#[cfg(test)]
pub(crate) mod testing;

//=== Public API ==========================================================

pub use context::PresentContext;
pub use entry::{EntryId, EntryInfo};
pub use handle::{CancellationToken, DismissOutcome, DismissSignal, PresentHandle, PresentOutcome};
pub use lifecycle::EntryState;
pub use options::{PopTarget, PresentFlags, PresentOptions};
pub use registry::{ControllerFactory, ControllerRegistry, FactoryContext, KindDefaults};
pub use stack_manager::{PresentationStack, StackConfig};

pub(crate) use entry::PresentableEntry;

//=== Internal Dependencies ===============================================

use crate::core::command::Command;
use crate::core::error::ControllerError;

//=== Controller Kind Trait ===============================================

/// Marker trait for controller identifiers.
///
/// Kinds key the controller registry. Typically implemented by
/// application-specific enums.
pub trait ControllerKind: Clone + Copy + Eq + Hash + Debug + Send + 'static {}

//=== Controller Trait ====================================================

/// Result of a possibly suspending lifecycle hook.
///
/// `Poll::Pending` is a suspension point: the stack resumes the hook
/// through its `poll_*` counterpart once per tick.
pub type HookPoll = Poll<Result<(), ControllerError>>;

/// Defines controller behavior through explicit lifecycle hooks.
///
/// Every hook has a default implementation, so a controller only
/// overrides what it needs.
///
/// ```rust
/// # use aetheric_presenter::prelude::*;
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum Screen { Pause }
/// # impl ControllerKind for Screen {}
/// struct PauseMenu;
///
/// impl Controller<Screen> for PauseMenu {
///     fn on_command(&mut self, command: &Command<'_>, ctx: &mut PresentContext<'_, Screen>) -> bool {
///         if command.is("resume") {
///             ctx.dismiss();
///             return true;
///         }
///         false
///     }
/// }
/// ```
pub trait Controller<K: ControllerKind> {
    /// Called once when presentation begins.
    fn on_present(&mut self, _ctx: &mut PresentContext<'_, K>) -> HookPoll {
        Poll::Ready(Ok(()))
    }

    /// Resumes a suspended `on_present`. Called once per tick.
    fn poll_present(&mut self, _ctx: &mut PresentContext<'_, K>) -> HookPoll {
        Poll::Ready(Ok(()))
    }

    /// Called when the entry becomes the active input receiver.
    fn on_activate(&mut self, _ctx: &mut PresentContext<'_, K>) {}

    /// Called when the entry stops being the active input receiver.
    fn on_deactivate(&mut self, _ctx: &mut PresentContext<'_, K>) {}

    /// Called once when dismissal begins, after all children are gone.
    fn on_dismiss(&mut self, _ctx: &mut PresentContext<'_, K>) -> HookPoll {
        Poll::Ready(Ok(()))
    }

    /// Resumes a suspended `on_dismiss`. Called once per tick.
    fn poll_dismiss(&mut self, _ctx: &mut PresentContext<'_, K>) -> HookPoll {
        Poll::Ready(Ok(()))
    }

    /// Offers a routed command. Return `true` to stop routing.
    fn on_command(&mut self, _command: &Command<'_>, _ctx: &mut PresentContext<'_, K>) -> bool {
        false
    }

    /// Called every tick while the entry is active or inactive.
    fn on_tick(&mut self, _ctx: &mut PresentContext<'_, K>, _delta: f32) {}
}
