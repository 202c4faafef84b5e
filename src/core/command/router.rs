//=========================================================================
// Command Router
//=========================================================================
//
// Routes a command top-down through the stack:
//
//   top ──→ offer to settled entries ──→ handled? stop
//            │
//            └─ modal entry reached? stop (handled or not)
//
// Entries still presenting or dismissing are skipped, but a modal one
// still blocks everything below it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::Command;
use crate::core::args::Args;
use crate::core::presentation::{ControllerKind, EntryId, PresentableEntry, PresentationStack};

//=== Routing Path ========================================================

/// Entries a command would be offered to, top to bottom.
///
/// The path stops after the first modal entry that is not being
/// dismissed. A dismissing modal has already handed activation to the
/// entry below, so it no longer blocks.
pub(crate) fn routing_path<K: ControllerKind>(
    order: &[EntryId],
    entries: &HashMap<EntryId, PresentableEntry<K>>,
) -> Vec<EntryId> {
    let mut path = Vec::new();

    for id in order.iter().rev() {
        let Some(entry) = entries.get(id) else {
            continue;
        };

        if entry.state.is_settled() {
            path.push(*id);
        }
        if entry.is_modal() && entry.state.is_live() {
            break;
        }
    }

    path
}

//=== Routing =============================================================

impl<K: ControllerKind> PresentationStack<K> {
    /// Routes a named command. Returns true if an entry handled it.
    ///
    /// Requests made by handlers are applied before returning.
    pub fn route_command(&mut self, name: &str, args: Args) -> bool {
        let path = self.command_targets();
        let command = Command::new(name, &args);

        let mut handled_by = None;
        for id in path {
            trace!(target: "presenter::router", "Offering '{}' to {}", name, id);

            let handled = self
                .call_hook(id, |controller, ctx| controller.on_command(&command, ctx))
                .unwrap_or(false);
            if handled {
                handled_by = Some(id);
                break;
            }
        }

        match handled_by {
            Some(id) => debug!(target: "presenter::router", "Command '{}' handled by {}", name, id),
            None => debug!(target: "presenter::router", "Command '{}' was not handled", name),
        }

        self.drive();
        handled_by.is_some()
    }

    /// Entries the next routed command would be offered to, top first.
    pub fn command_targets(&self) -> Vec<EntryId> {
        routing_path(&self.order, &self.entries)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
