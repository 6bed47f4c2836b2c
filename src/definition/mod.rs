//! Machine definitions: the immutable transition table.
//!
//! A [`MachineDefinition`] is built once from explicit state, event, and
//! transition declarations, validated at build time, and read-only after
//! construction. Many instances can share one definition concurrently via
//! `Arc`.

mod builder;
mod error;
mod transition;

pub use builder::DefinitionBuilder;
pub use error::DefinitionError;
pub use transition::{Action, ActionError, Transition};

use crate::core::{Event, State};
use crate::machine::TransitionListener;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// The validated definition of a state machine.
///
/// Holds the declared state and event sets, initial/terminal tagging, the
/// `(source, event) -> transition` table, per-state entry/exit actions, and
/// the listeners notified after every committed transition of every instance
/// bound to this definition.
///
/// Construct via [`DefinitionBuilder`]; a malformed table never produces a
/// definition.
pub struct MachineDefinition<S: State, E: Event> {
    pub(crate) initial: S,
    pub(crate) states: HashSet<S>,
    pub(crate) terminals: HashSet<S>,
    pub(crate) events: HashSet<E>,
    pub(crate) transitions: HashMap<(S, E), Transition<S, E>>,
    pub(crate) entry_actions: HashMap<S, Action<E>>,
    pub(crate) exit_actions: HashMap<S, Action<E>>,
    pub(crate) listeners: Vec<Arc<dyn TransitionListener<S>>>,
}

impl<S: State, E: Event> MachineDefinition<S, E> {
    /// The single declared initial state.
    pub fn initial_state(&self) -> &S {
        &self.initial
    }

    /// Whether a state is a member of the declared set.
    pub fn contains_state(&self, state: &S) -> bool {
        self.states.contains(state)
    }

    /// Whether a state is tagged terminal.
    pub fn is_terminal(&self, state: &S) -> bool {
        self.terminals.contains(state)
    }

    /// Whether an event is a member of the declared set.
    pub fn contains_event(&self, event: &E) -> bool {
        self.events.contains(event)
    }

    /// The declared state set.
    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.states.iter()
    }

    /// The declared event set.
    pub fn events(&self) -> impl Iterator<Item = &E> {
        self.events.iter()
    }

    /// Number of declared transitions.
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Look up the transition matching a `(source, event)` pair.
    ///
    /// At most one transition exists per pair; ambiguity is rejected at
    /// build time.
    pub fn transition_for(&self, source: &S, event: &E) -> Option<&Transition<S, E>> {
        self.transitions.get(&(source.clone(), event.clone()))
    }

    /// The entry action registered for a state, if any.
    pub fn entry_action(&self, state: &S) -> Option<&Action<E>> {
        self.entry_actions.get(state)
    }

    /// The exit action registered for a state, if any.
    pub fn exit_action(&self, state: &S) -> Option<&Action<E>> {
        self.exit_actions.get(state)
    }

    /// Listeners registered on this definition, in registration order.
    pub fn listeners(&self) -> &[Arc<dyn TransitionListener<S>>] {
        &self.listeners
    }

    /// Resolve a state by its persisted name.
    ///
    /// This is the inverse of [`State::name`], used when rehydrating an
    /// instance from storage.
    pub fn state_named(&self, name: &str) -> Option<S> {
        self.states.iter().find(|s| s.name() == name).cloned()
    }
}

impl<S: State, E: Event> std::fmt::Debug for MachineDefinition<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MachineDefinition")
            .field("initial", &self.initial)
            .field("states", &self.states)
            .field("terminals", &self.terminals)
            .field("events", &self.events)
            .field("transitions", &self.transitions.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
