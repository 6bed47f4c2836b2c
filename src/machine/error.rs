//! Runtime errors for machine instances.

use crate::definition::ActionError;
use thiserror::Error;

/// Errors raised while operating a [`MachineInstance`](super::MachineInstance).
///
/// Lifecycle misuse (`NotStarted`, `AlreadyStarted`) is recoverable: the
/// caller can start or stop and retry. Action failures carry the underlying
/// [`ActionError`]; note the documented asymmetry on the entry variant.
/// A rejected event is not an error at all, see
/// [`EventOutcome`](super::EventOutcome).
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("machine '{key}' has not been started")]
    NotStarted { key: String },

    #[error("machine '{key}' is already running")]
    AlreadyStarted { key: String },

    #[error("'{state}' is not in the definition's declared state set")]
    UndeclaredState { state: String },

    #[error("exit action failed in state '{state}'; transition aborted")]
    ExitActionFailed {
        state: String,
        #[source]
        source: ActionError,
    },

    #[error("transition action failed moving '{from}' -> '{to}'; transition aborted")]
    TransitionActionFailed {
        from: String,
        to: String,
        #[source]
        source: ActionError,
    },

    #[error("entry action failed in state '{state}'; the state change was NOT rolled back")]
    EntryActionFailed {
        state: String,
        #[source]
        source: ActionError,
    },
}
