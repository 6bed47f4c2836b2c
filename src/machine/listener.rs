//! State-change listeners and their dispatch.

use crate::core::State;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Callback invoked after every committed transition.
///
/// `from` is `None` for the notification fired by the first `start()`
/// (there is no source state when entering the initial state). Listeners
/// are registered on the definition and therefore fire for every instance
/// sharing it.
///
/// Implemented by any `Fn(Option<&S>, &S)` closure, or by a type when the
/// listener needs its own state:
///
/// ```rust
/// use machina::machine::TransitionListener;
/// use machina::state_enum;
///
/// state_enum! {
///     enum S {
///         A,
///         B,
///     }
/// }
///
/// struct AuditLog;
///
/// impl TransitionListener<S> for AuditLog {
///     fn state_changed(&self, from: Option<&S>, to: &S) {
///         println!("{:?} -> {:?}", from, to);
///     }
/// }
/// ```
pub trait TransitionListener<S: State>: Send + Sync {
    /// Called with the committed `(from, to)` pair, after the transition.
    fn state_changed(&self, from: Option<&S>, to: &S);
}

impl<S, F> TransitionListener<S> for F
where
    S: State,
    F: Fn(Option<&S>, &S) + Send + Sync,
{
    fn state_changed(&self, from: Option<&S>, to: &S) {
        self(from, to)
    }
}

/// Notify every listener in registration order.
///
/// A panicking listener must not starve the remaining listeners and must
/// not undo the already-committed transition, so panics are caught and
/// logged here.
pub(crate) fn notify_all<S: State>(
    listeners: &[Arc<dyn TransitionListener<S>>],
    from: Option<&S>,
    to: &S,
) {
    for listener in listeners {
        let outcome = catch_unwind(AssertUnwindSafe(|| listener.state_changed(from, to)));
        if outcome.is_err() {
            tracing::warn!(
                from = from.map(|s| s.name()).unwrap_or("<none>"),
                to = to.name(),
                "listener panicked during state-change notification"
            );
        }
    }
}
