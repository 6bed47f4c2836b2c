//! Machina: an event-driven finite state machine engine
//!
//! Machina separates the *definition* of a state machine (the immutable
//! transition table, built once and validated up front) from the *instances*
//! that run against it (one per business key, each with its own current state
//! and extended state). Transitions are triggered by submitted events,
//! optionally guarded by predicates over the instance's extended state, and
//! surrounded by entry/exit actions and listener notifications that run
//! synchronously on the caller's thread.
//!
//! # Core Concepts
//!
//! - **State** / **Event**: opaque finite identifiers via the `State` and
//!   `Event` traits (usually plain enums, see `state_enum!`/`event_enum!`)
//! - **Definition**: the validated `(source, event) -> target` table plus
//!   initial/terminal tagging, state actions, and listeners
//! - **Instance**: a running automaton bound to a key, with an explicit
//!   start/stop lifecycle and a mutable key/value extended state
//! - **Registry**: maps each key to at most one live instance
//!
//! # Example
//!
//! ```rust
//! use machina::definition::{DefinitionBuilder, Transition};
//! use machina::machine::EventOutcome;
//! use machina::registry::MachineRegistry;
//! use machina::{event_enum, state_enum};
//!
//! state_enum! {
//!     enum OrderState {
//!         Submitted,
//!         Paid,
//!         Fulfilled,
//!     }
//! }
//!
//! event_enum! {
//!     enum OrderEvent {
//!         Pay,
//!         Fulfill,
//!     }
//! }
//!
//! let definition = DefinitionBuilder::new()
//!     .initial(OrderState::Submitted)
//!     .state(OrderState::Paid)
//!     .terminal(OrderState::Fulfilled)
//!     .event(OrderEvent::Pay)
//!     .event(OrderEvent::Fulfill)
//!     .transition(Transition::new(
//!         OrderState::Submitted,
//!         OrderEvent::Pay,
//!         OrderState::Paid,
//!     ))
//!     .transition(Transition::new(
//!         OrderState::Paid,
//!         OrderEvent::Fulfill,
//!         OrderState::Fulfilled,
//!     ))
//!     .build()
//!     .unwrap();
//!
//! let registry = MachineRegistry::new(definition);
//! let handle = registry.get_or_create("order-123");
//! let mut order = handle.lock().unwrap();
//!
//! order.start().unwrap();
//! let outcome = order.send(OrderEvent::Pay).unwrap();
//! assert_eq!(outcome, EventOutcome::Accepted(OrderState::Paid));
//! ```

pub mod core;
pub mod definition;
pub mod machine;
pub mod registry;
pub mod snapshot;

// Re-export commonly used types
pub use crate::core::{ActionContext, Event, EventMessage, ExtendedState, Guard, State};
pub use definition::{DefinitionBuilder, DefinitionError, MachineDefinition, Transition};
pub use machine::{EventOutcome, MachineError, MachineInstance, RejectReason, TransitionListener};
pub use registry::MachineRegistry;
pub use snapshot::{Snapshot, SnapshotError};
