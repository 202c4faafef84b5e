//=========================================================================
// Present Options
//=========================================================================
//
// Flags and placement options for present requests.
//
// Flag precedence when combined:
//   DismissAll  ⊃  Exclusive (same layer)  ⊃  Singleton (same kind)
//   Modal is orthogonal: it only affects command routing.
//   DoNotActivate is orthogonal: it only affects activation.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

//=== Internal Dependencies ===============================================

use super::EntryId;

//=== PresentFlags ========================================================

/// Bitset of presentation behaviors.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PresentFlags(u8);

impl PresentFlags {
    /// No special behavior.
    pub const NONE: Self = Self(0);

    /// Blocks command routing to every entry below it.
    pub const MODAL: Self = Self(1 << 0);

    /// Dismisses every non-ancestor entry on the same layer.
    pub const EXCLUSIVE: Self = Self(1 << 1);

    /// Never becomes the active entry and never deactivates others.
    pub const DO_NOT_ACTIVATE: Self = Self(1 << 2);

    /// Dismisses every non-ancestor entry of the same kind.
    pub const SINGLETON: Self = Self(1 << 3);

    /// Dismisses every non-ancestor entry in the stack.
    pub const DISMISS_ALL: Self = Self(1 << 4);

    const NAMES: [(Self, &'static str); 5] = [
        (Self::MODAL, "MODAL"),
        (Self::EXCLUSIVE, "EXCLUSIVE"),
        (Self::DO_NOT_ACTIVATE, "DO_NOT_ACTIVATE"),
        (Self::SINGLETON, "SINGLETON"),
        (Self::DISMISS_ALL, "DISMISS_ALL"),
    ];

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if every flag in `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl BitOr for PresentFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for PresentFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Debug for PresentFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("PresentFlags(NONE)");
        }

        f.write_str("PresentFlags(")?;
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        f.write_str(")")
    }
}

//=== PresentOptions ======================================================

/// Per-request presentation options.
///
/// Flags are OR-ed with the registered defaults of the kind. A `layer`
/// overrides the registered default layer.
///
/// ```
/// use aetheric_presenter::prelude::*;
///
/// let options = PresentOptions::new().modal().on_layer(2);
/// assert!(options.flags.contains(PresentFlags::MODAL));
/// assert_eq!(options.layer, Some(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PresentOptions {
    pub flags: PresentFlags,
    pub layer: Option<i32>,
    pub parent: Option<EntryId>,
}

impl PresentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flags(mut self, flags: PresentFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn modal(self) -> Self {
        self.with_flags(PresentFlags::MODAL)
    }

    pub fn exclusive(self) -> Self {
        self.with_flags(PresentFlags::EXCLUSIVE)
    }

    pub fn do_not_activate(self) -> Self {
        self.with_flags(PresentFlags::DO_NOT_ACTIVATE)
    }

    pub fn singleton(self) -> Self {
        self.with_flags(PresentFlags::SINGLETON)
    }

    pub fn dismiss_all(self) -> Self {
        self.with_flags(PresentFlags::DISMISS_ALL)
    }

    pub fn on_layer(mut self, layer: i32) -> Self {
        self.layer = Some(layer);
        self
    }

    /// Presents as a child of `parent`; the child is dismissed with it.
    pub fn with_parent(mut self, parent: EntryId) -> Self {
        self.parent = Some(parent);
        self
    }
}

//=== PopTarget ===========================================================

/// Target of a "return to" navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopTarget {
    /// Keep this entry (and its ancestors); dismiss everything above it.
    Entry(EntryId),

    /// Dismiss every entry on a layer above this one.
    Layer(i32),
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_union_and_contains() {
        let flags = PresentFlags::MODAL | PresentFlags::EXCLUSIVE;
        assert!(flags.contains(PresentFlags::MODAL));
        assert!(flags.contains(PresentFlags::EXCLUSIVE));
        assert!(!flags.contains(PresentFlags::SINGLETON));
        assert!(flags.contains(PresentFlags::NONE));
    }

    #[test]
    fn flags_without_clears_bits() {
        let flags = (PresentFlags::MODAL | PresentFlags::DO_NOT_ACTIVATE)
            .without(PresentFlags::MODAL);
        assert_eq!(flags, PresentFlags::DO_NOT_ACTIVATE);
    }

    #[test]
    fn flags_debug_lists_names() {
        let flags = PresentFlags::MODAL | PresentFlags::SINGLETON;
        assert_eq!(format!("{:?}", flags), "PresentFlags(MODAL | SINGLETON)");
        assert_eq!(format!("{:?}", PresentFlags::NONE), "PresentFlags(NONE)");
    }

    #[test]
    fn options_builder_accumulates_flags() {
        let parent = EntryId::from_raw(4);
        let options = PresentOptions::new()
            .modal()
            .exclusive()
            .on_layer(3)
            .with_parent(parent);

        assert_eq!(options.flags, PresentFlags::MODAL | PresentFlags::EXCLUSIVE);
        assert_eq!(options.layer, Some(3));
        assert_eq!(options.parent, Some(parent));
    }

    #[test]
    fn default_options_are_empty() {
        let options = PresentOptions::default();
        assert!(options.flags.is_empty());
        assert_eq!(options.layer, None);
        assert_eq!(options.parent, None);
    }
}
