//=========================================================================
// Event Collector
//=========================================================================
//
// Host event collector with bounded polling and shutdown detection.
//
// Architecture:
//   Receiver<HostEvent> → collect_frame() → events → TickControl
//
// Bounded polling prevents a flooding host from starving the tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::HostEvent;
use crate::core::presentation::ControllerKind;
use crate::core::TickControl;

//=== EventCollector ======================================================

/// Collects host events for one tick.
pub(crate) struct EventCollector<K: ControllerKind> {
    receiver: Receiver<HostEvent<K>>,
    events: Vec<HostEvent<K>>,
}

impl<K: ControllerKind> EventCollector<K> {
    const MAX_EVENTS_PER_FRAME: usize = 100;

    pub(crate) fn new(receiver: Receiver<HostEvent<K>>) -> Self {
        Self {
            receiver,
            events: Vec::with_capacity(8),
        }
    }

    /// Collects pending host events (bounded to prevent starvation).
    ///
    /// Events received before a `Shutdown` are kept so the caller can
    /// still apply them.
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        self.events.clear();
        let mut drained = 0;

        while drained < Self::MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(HostEvent::Shutdown) => return TickControl::Exit,
                Ok(event) => {
                    self.events.push(event);
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= Self::MAX_EVENTS_PER_FRAME {
            warn!(target: "presenter::runtime", "Host event backlog: drained {} events this frame", drained);
        }

        TickControl::Continue
    }

    /// Takes ownership of the collected events, leaving an empty vec.
    pub(crate) fn take_events(&mut self) -> Vec<HostEvent<K>> {
        std::mem::take(&mut self.events)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
