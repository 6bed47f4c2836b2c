//! Transition tuples and action types.

use crate::core::{ActionContext, Event, Guard, State};
use std::sync::Arc;
use thiserror::Error;

/// Error raised by an entry, exit, or transition action.
///
/// Actions are caller-supplied; the engine only needs a message to carry
/// back through [`MachineError`](crate::machine::MachineError).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ActionError(String);

impl ActionError {
    /// Create an action error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<String> for ActionError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for ActionError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

/// Type alias for entry, exit, and transition action functions.
///
/// Actions run synchronously during dispatch with mutable access to the
/// instance's extended state and read access to the triggering event.
pub type Action<E> =
    Arc<dyn Fn(&mut ActionContext<'_, E>) -> Result<(), ActionError> + Send + Sync>;

/// A declared `(source, event) -> target` transition.
///
/// Optionally carries a guard over the instance's extended state and a
/// side-effecting action that runs after the source's exit action and
/// before the state mutation.
///
/// # Example
///
/// ```rust
/// use machina::core::ExtendedState;
/// use machina::definition::Transition;
/// use machina::{event_enum, state_enum};
///
/// state_enum! {
///     enum S {
///         Submitted,
///         Paid,
///     }
/// }
///
/// event_enum! {
///     enum E {
///         Pay,
///     }
/// }
///
/// let t = Transition::new(S::Submitted, E::Pay, S::Paid)
///     .when(|vars: &ExtendedState| vars.contains("orderId"))
///     .perform(|ctx| {
///         ctx.extended_state_mut().set("paidAt", "today");
///         Ok(())
///     });
/// assert_eq!(t.source(), &S::Submitted);
/// ```
pub struct Transition<S: State, E: Event> {
    source: S,
    event: E,
    target: S,
    guard: Option<Guard>,
    action: Option<Action<E>>,
}

impl<S: State, E: Event> Transition<S, E> {
    /// Declare a transition from `source` to `target` on `event`.
    pub fn new(source: S, event: E, target: S) -> Self {
        Self {
            source,
            event,
            target,
            guard: None,
            action: None,
        }
    }

    /// Attach a guard (optional).
    pub fn guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Attach a guard from a closure (optional).
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn(&crate::core::ExtendedState) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::new(predicate))
    }

    /// Attach a side-effecting action (optional).
    pub fn perform<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut ActionContext<'_, E>) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    /// The source state.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The triggering event.
    pub fn event(&self) -> &E {
        &self.event
    }

    /// The target state.
    pub fn target(&self) -> &S {
        &self.target
    }

    /// The guard, if any.
    pub fn guard_ref(&self) -> Option<&Guard> {
        self.guard.as_ref()
    }

    /// The action, if any.
    pub fn action_ref(&self) -> Option<&Action<E>> {
        self.action.as_ref()
    }
}

impl<S: State, E: Event> std::fmt::Debug for Transition<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition")
            .field("source", &self.source)
            .field("event", &self.event)
            .field("target", &self.target)
            .field("guarded", &self.guard.is_some())
            .field("actioned", &self.action.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ExtendedState;
    use crate::{event_enum, state_enum};

    state_enum! {
        enum TestState {
            Submitted,
            Paid,
        }
    }

    event_enum! {
        enum TestEvent {
            Pay,
        }
    }

    #[test]
    fn plain_transition_has_no_guard_or_action() {
        let t = Transition::new(TestState::Submitted, TestEvent::Pay, TestState::Paid);
        assert_eq!(t.source(), &TestState::Submitted);
        assert_eq!(t.event(), &TestEvent::Pay);
        assert_eq!(t.target(), &TestState::Paid);
        assert!(t.guard_ref().is_none());
        assert!(t.action_ref().is_none());
    }

    #[test]
    fn when_attaches_a_guard() {
        let t = Transition::new(TestState::Submitted, TestEvent::Pay, TestState::Paid)
            .when(|vars: &ExtendedState| vars.contains("orderId"));

        let mut vars = ExtendedState::new();
        assert!(!t.guard_ref().unwrap().check(&vars));
        vars.set("orderId", 7);
        assert!(t.guard_ref().unwrap().check(&vars));
    }

    #[test]
    fn perform_attaches_an_action() {
        let t = Transition::new(TestState::Submitted, TestEvent::Pay, TestState::Paid)
            .perform(|ctx| {
                ctx.extended_state_mut().set("paid", true);
                Ok(())
            });

        let mut vars = ExtendedState::new();
        let mut ctx = ActionContext::<TestEvent>::new(None, &mut vars);
        (t.action_ref().unwrap().as_ref())(&mut ctx).unwrap();
        assert_eq!(vars.get_as::<bool>("paid"), Some(true));
    }

    #[test]
    fn action_error_carries_message() {
        let err = ActionError::new("payment gateway unavailable");
        assert_eq!(err.to_string(), "payment gateway unavailable");

        let err: ActionError = "declined".into();
        assert_eq!(err.to_string(), "declined");
    }
}
