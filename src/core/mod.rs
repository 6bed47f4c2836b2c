//! Core state machine vocabulary.
//!
//! This module contains the types the rest of the engine is written in terms
//! of:
//! - State and event identifiers via the `State` and `Event` traits
//! - Submitted events with headers (`EventMessage`)
//! - Per-instance extended state and the context handed to actions
//! - Guard predicates for transition control

mod context;
mod event;
mod guard;
pub mod macros;
mod state;

pub use context::{ActionContext, ExtendedState};
pub use event::{Event, EventMessage};
pub use guard::Guard;
pub use state::State;
