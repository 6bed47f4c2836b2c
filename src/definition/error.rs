//! Build errors for machine definitions.

use std::fmt;

/// Errors raised while building a [`MachineDefinition`](super::MachineDefinition).
///
/// All of these are configuration mistakes: they fail the build fast and no
/// definition (and therefore no instance) can exist in a malformed shape.
//
// Display and Error are implemented by hand because `DuplicateTransition`
// has a plain-`String` field named `source`, which thiserror's derive would
// force to be the error source.
#[derive(Debug, PartialEq, Eq)]
pub enum DefinitionError {
    NoInitialState,

    MultipleInitialStates { first: String, second: String },

    UndeclaredState { state: String },

    UndeclaredEvent { event: String },

    DuplicateTransition { source: String, event: String },

    TransitionFromTerminal { state: String },
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoInitialState => {
                write!(f, "no state is marked initial. Call .initial(state) before .build()")
            }
            Self::MultipleInitialStates { first, second } => {
                write!(f, "more than one state is marked initial: '{first}' and '{second}'")
            }
            Self::UndeclaredState { state } => {
                write!(f, "'{state}' is referenced but not in the declared state set")
            }
            Self::UndeclaredEvent { event } => {
                write!(f, "'{event}' is referenced but not in the declared event set")
            }
            Self::DuplicateTransition { source, event } => {
                write!(
                    f,
                    "ambiguous transitions: two transitions share source '{source}' and event '{event}'"
                )
            }
            Self::TransitionFromTerminal { state } => {
                write!(f, "terminal state '{state}' has an outgoing transition")
            }
        }
    }
}

impl std::error::Error for DefinitionError {}
