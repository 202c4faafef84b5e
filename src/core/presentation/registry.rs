//=========================================================================
// Controller Registry
//=========================================================================
//
// Explicit registration table built at startup:
//
//   kind ──→ (factory, default flags, default layer)
//
// Present requests only name a kind; the registry decides which
// controller is constructed and with which defaults.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{Controller, ControllerKind, EntryId, PresentFlags};
use crate::core::args::Args;
use crate::core::error::ControllerError;
use crate::core::host_bridge::ViewHandle;

//=== FactoryContext ======================================================

/// Everything known about an entry when its controller is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactoryContext<K: ControllerKind> {
    pub id: EntryId,
    pub kind: K,
    pub layer: i32,
    pub parent: Option<EntryId>,
    pub view: ViewHandle,
}

//=== KindDefaults ========================================================

/// Defaults applied to every present of a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KindDefaults {
    pub flags: PresentFlags,
    pub layer: i32,
}

impl KindDefaults {
    pub fn new(flags: PresentFlags, layer: i32) -> Self {
        Self { flags, layer }
    }
}

//=== ControllerRegistry ==================================================

/// Builds a controller for a freshly created view.
pub type ControllerFactory<K> =
    Box<dyn Fn(&FactoryContext<K>, Args) -> Result<Box<dyn Controller<K>>, ControllerError>>;

struct Registration<K: ControllerKind> {
    defaults: KindDefaults,
    factory: ControllerFactory<K>,
}

/// Registration table of controller kinds.
///
/// # Example
///
/// ```
/// use aetheric_presenter::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Screen { Menu, Confirm }
/// impl ControllerKind for Screen {}
///
/// struct Menu;
/// impl Controller<Screen> for Menu {}
///
/// let mut registry = ControllerRegistry::new();
/// registry.register(Screen::Menu, |_, _| Ok(Box::new(Menu)));
/// registry.register_with(
///     Screen::Confirm,
///     KindDefaults::new(PresentFlags::MODAL, 1),
///     |_, _| Ok(Box::new(Menu)),
/// );
/// assert!(registry.contains(Screen::Confirm));
/// ```
pub struct ControllerRegistry<K: ControllerKind> {
    registrations: HashMap<K, Registration<K>>,
}

impl<K: ControllerKind> ControllerRegistry<K> {
    pub fn new() -> Self {
        Self {
            registrations: HashMap::new(),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a kind with default flags and layer 0.
    pub fn register<F>(&mut self, kind: K, factory: F)
    where
        F: Fn(&FactoryContext<K>, Args) -> Result<Box<dyn Controller<K>>, ControllerError> + 'static,
    {
        self.register_with(kind, KindDefaults::default(), factory);
    }

    /// Registers a kind with explicit defaults.
    ///
    /// Re-registering a kind replaces the previous registration.
    pub fn register_with<F>(&mut self, kind: K, defaults: KindDefaults, factory: F)
    where
        F: Fn(&FactoryContext<K>, Args) -> Result<Box<dyn Controller<K>>, ControllerError> + 'static,
    {
        let registration = Registration {
            defaults,
            factory: Box::new(factory),
        };

        if self.registrations.insert(kind, registration).is_some() {
            warn!(target: "presenter::stack", "Controller kind {:?} was already registered and has been replaced", kind);
        } else {
            debug!(target: "presenter::stack", "Registered controller kind {:?} ({:?})", kind, defaults);
        }
    }

    //--- Query API --------------------------------------------------------

    pub fn contains(&self, kind: K) -> bool {
        self.registrations.contains_key(&kind)
    }

    pub fn defaults(&self, kind: K) -> Option<KindDefaults> {
        self.registrations.get(&kind).map(|r| r.defaults)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    //--- Construction -----------------------------------------------------

    /// Runs the factory for `context.kind`. `None` if unregistered.
    pub(crate) fn construct(
        &self,
        context: &FactoryContext<K>,
        args: Args,
    ) -> Option<Result<Box<dyn Controller<K>>, ControllerError>> {
        self.registrations
            .get(&context.kind)
            .map(|registration| (registration.factory)(context, args))
    }
}

impl<K: ControllerKind> Default for ControllerRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
