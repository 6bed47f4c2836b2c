//! Core State trait for state machine states.
//!
//! States are opaque identifiers drawn from a finite set, usually a plain
//! enum. Whether a state is initial or terminal is declared on the
//! `MachineDefinition`, not on the trait, so the same enum can serve several
//! tables with different roles.

use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone`: states are copied into outcomes and listener notifications
/// - `Eq` + `Hash`: states key the transition table
/// - `Debug`: states must be debuggable for diagnostics
///
/// # Example
///
/// ```rust
/// use machina::core::State;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum OrderState {
///     Submitted,
///     Paid,
///     Fulfilled,
///     Canceled,
/// }
///
/// impl State for OrderState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Submitted => "Submitted",
///             Self::Paid => "Paid",
///             Self::Fulfilled => "Fulfilled",
///             Self::Canceled => "Canceled",
///         }
///     }
/// }
/// ```
pub trait State: Clone + Eq + Hash + Debug + Send + Sync {
    /// Get the state's name for display, logging, and persistence.
    ///
    /// The name is the serialized form a persistence collaborator stores;
    /// `MachineDefinition::state_named` resolves it back to the state value.
    fn name(&self) -> &str;
}
