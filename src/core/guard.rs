//! Guard predicates for controlling state transitions.
//!
//! Guards are pure boolean functions over an instance's extended state. A
//! transition whose guard returns `false` is rejected exactly as if no
//! transition matched, leaving the state unchanged.

use crate::core::ExtendedState;

/// Predicate that determines if a matched transition may fire.
///
/// Guards are evaluated after the `(source, event)` lookup succeeds and
/// before any action runs. They must be deterministic and free of side
/// effects; mutation belongs in actions.
///
/// # Example
///
/// ```rust
/// use machina::core::{ExtendedState, Guard};
///
/// // Only fulfill orders that have a recorded payment.
/// let paid = Guard::new(|vars: &ExtendedState| vars.contains("paymentRef"));
///
/// let mut vars = ExtendedState::new();
/// assert!(!paid.check(&vars));
///
/// vars.set("paymentRef", "TXN-42");
/// assert!(paid.check(&vars));
/// ```
pub struct Guard {
    predicate: Box<dyn Fn(&ExtendedState) -> bool + Send + Sync>,
}

impl Guard {
    /// Create a guard from a predicate over the extended state.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&ExtendedState) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Evaluate the guard against an instance's extended state.
    pub fn check(&self, extended: &ExtendedState) -> bool {
        (self.predicate)(extended)
    }
}

impl std::fmt::Debug for Guard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Guard(..)")
    }
}
