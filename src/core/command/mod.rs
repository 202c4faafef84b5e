//=========================================================================
// Commands
//=========================================================================
//
// Named commands routed top-down through the presentation stack.
//
// Hosts translate their own input (keys, buttons, network messages)
// into commands; controllers decide whether a command is theirs.
//
//=========================================================================

//=== Module Declarations =================================================

mod router;

//=== Internal Dependencies ===============================================

use crate::core::args::Args;

//=== Command =============================================================

/// A routed command, borrowed for the duration of one `on_command` call.
#[derive(Debug, Clone, Copy)]
pub struct Command<'a> {
    name: &'a str,
    args: &'a Args,
}

impl<'a> Command<'a> {
    pub fn new(name: &'a str, args: &'a Args) -> Self {
        Self { name, args }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn args(&self) -> &'a Args {
        self.args
    }

    /// Shorthand for `self.name() == name`.
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}
