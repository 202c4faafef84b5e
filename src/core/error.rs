//=========================================================================
// Presentation Errors
//=========================================================================
//
// Error taxonomy for the presentation stack.
//
//   ViewCreationError   → host factory could not produce a view
//   ControllerError     → a controller hook or factory failed
//   ControllerFault     → ControllerError bound to an entry and hook
//   StackError          → everything a caller can observe on a handle
//
// Faults are also published on the stack's fault channel so a host can
// surface them globally without awaiting every handle.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use crate::core::presentation::EntryId;

//=== ViewCreationError ===================================================

/// The external view factory failed to produce a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewCreationError {
    message: String,
}

impl ViewCreationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ViewCreationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "View creation failed: {}", self.message)
    }
}

impl std::error::Error for ViewCreationError {}

//=== ControllerError =====================================================

/// Error returned by controller hooks and controller factories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerError {
    message: String,
}

impl ControllerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ControllerError {}

impl From<&str> for ControllerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for ControllerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

//=== Hook ================================================================

/// Fallible controller entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    /// The registry factory that builds the controller.
    Construct,

    /// `on_present` / `poll_present`.
    Present,

    /// `on_dismiss` / `poll_dismiss`.
    Dismiss,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Construct => f.write_str("construct"),
            Self::Present => f.write_str("present"),
            Self::Dismiss => f.write_str("dismiss"),
        }
    }
}

//=== ControllerFault =====================================================

/// A controller failure captured by the stack.
///
/// The kind is stored in its `Debug` form so faults from every stack can
/// share one channel type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerFault {
    pub entry: EntryId,
    pub kind: String,
    pub hook: Hook,
    pub error: ControllerError,
}

impl fmt::Display for ControllerFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Controller {} ({}) failed during {}: {}",
            self.entry, self.kind, self.hook, self.error
        )
    }
}

impl std::error::Error for ControllerFault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

//=== StackError ==========================================================

/// Result type for presentation stack operations.
pub type StackResult<T> = Result<T, StackError>;

/// Errors surfaced by the presentation stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackError {
    /// The view factory could not produce a view. Nothing was inserted.
    ViewCreation {
        entry: EntryId,
        source: ViewCreationError,
    },

    /// API misuse: stale id, unregistered kind, dead parent, full stack.
    InvalidTransition {
        entry: Option<EntryId>,
        reason: String,
    },

    /// Cooperative cancellation outcome. Not a fault.
    Cancelled(EntryId),

    /// A controller hook failed.
    ControllerFault(ControllerFault),
}

impl StackError {
    pub(crate) fn invalid(entry: Option<EntryId>, reason: impl Into<String>) -> Self {
        Self::InvalidTransition {
            entry,
            reason: reason.into(),
        }
    }

    /// Returns true for the cancellation outcome.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ViewCreation { entry, source } => write!(f, "Entry {}: {}", entry, source),
            Self::InvalidTransition {
                entry: Some(entry),
                reason,
            } => write!(f, "Invalid transition for entry {}: {}", entry, reason),
            Self::InvalidTransition {
                entry: None,
                reason,
            } => write!(f, "Invalid transition: {}", reason),
            Self::Cancelled(entry) => write!(f, "Entry {} was cancelled", entry),
            Self::ControllerFault(fault) => write!(f, "{}", fault),
        }
    }
}

impl std::error::Error for StackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ViewCreation { source, .. } => Some(source),
            Self::ControllerFault(fault) => Some(fault),
            Self::InvalidTransition { .. } | Self::Cancelled(_) => None,
        }
    }
}

impl From<ControllerFault> for StackError {
    fn from(fault: ControllerFault) -> Self {
        Self::ControllerFault(fault)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
