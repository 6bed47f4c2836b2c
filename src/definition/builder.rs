//! Builder for machine definitions.

use crate::core::{ActionContext, Event, State};
use crate::definition::error::DefinitionError;
use crate::definition::transition::{Action, ActionError, Transition};
use crate::definition::MachineDefinition;
use crate::machine::TransitionListener;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Builder for constructing machine definitions with a fluent API.
///
/// States, events, and transitions are declared explicitly; `build()`
/// validates the whole table and fails with [`DefinitionError`] on a
/// malformed configuration.
///
/// # Example
///
/// ```rust
/// use machina::definition::{DefinitionBuilder, Transition};
/// use machina::{event_enum, state_enum};
///
/// state_enum! {
///     enum S {
///         Submitted,
///         Canceled,
///     }
/// }
///
/// event_enum! {
///     enum E {
///         Cancel,
///     }
/// }
///
/// let definition = DefinitionBuilder::new()
///     .initial(S::Submitted)
///     .terminal(S::Canceled)
///     .event(E::Cancel)
///     .transition(Transition::new(S::Submitted, E::Cancel, S::Canceled))
///     .build()
///     .unwrap();
/// assert_eq!(definition.initial_state(), &S::Submitted);
/// ```
pub struct DefinitionBuilder<S: State, E: Event> {
    initials: Vec<S>,
    states: HashSet<S>,
    terminals: HashSet<S>,
    events: HashSet<E>,
    transitions: Vec<Transition<S, E>>,
    entry_actions: HashMap<S, Action<E>>,
    exit_actions: HashMap<S, Action<E>>,
    listeners: Vec<Arc<dyn TransitionListener<S>>>,
}

impl<S: State, E: Event> DefinitionBuilder<S, E> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initials: Vec::new(),
            states: HashSet::new(),
            terminals: HashSet::new(),
            events: HashSet::new(),
            transitions: Vec::new(),
            entry_actions: HashMap::new(),
            exit_actions: HashMap::new(),
            listeners: Vec::new(),
        }
    }

    /// Declare a plain state.
    pub fn state(mut self, state: S) -> Self {
        self.states.insert(state);
        self
    }

    /// Declare the initial state (required, exactly one).
    pub fn initial(mut self, state: S) -> Self {
        self.states.insert(state.clone());
        if !self.initials.contains(&state) {
            self.initials.push(state);
        }
        self
    }

    /// Declare a terminal state. Terminal states admit no outgoing
    /// transitions.
    pub fn terminal(mut self, state: S) -> Self {
        self.states.insert(state.clone());
        self.terminals.insert(state);
        self
    }

    /// Declare an event.
    pub fn event(mut self, event: E) -> Self {
        self.events.insert(event);
        self
    }

    /// Declare several events at once.
    pub fn events(mut self, events: impl IntoIterator<Item = E>) -> Self {
        self.events.extend(events);
        self
    }

    /// Add a transition.
    pub fn transition(mut self, transition: Transition<S, E>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Register an entry action for a state, replacing any previous one.
    pub fn on_entry<F>(mut self, state: S, action: F) -> Self
    where
        F: Fn(&mut ActionContext<'_, E>) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        self.entry_actions.insert(state, Arc::new(action));
        self
    }

    /// Register an exit action for a state, replacing any previous one.
    pub fn on_exit<F>(mut self, state: S, action: F) -> Self
    where
        F: Fn(&mut ActionContext<'_, E>) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        self.exit_actions.insert(state, Arc::new(action));
        self
    }

    /// Register a listener, notified after every committed transition of
    /// every instance bound to this definition, in registration order.
    pub fn listener<L>(mut self, listener: L) -> Self
    where
        L: TransitionListener<S> + 'static,
    {
        self.listeners.push(Arc::new(listener));
        self
    }

    /// Validate and build the definition.
    pub fn build(self) -> Result<MachineDefinition<S, E>, DefinitionError> {
        let mut initials = self.initials.into_iter();
        let initial = initials.next().ok_or(DefinitionError::NoInitialState)?;
        if let Some(second) = initials.next() {
            return Err(DefinitionError::MultipleInitialStates {
                first: initial.name().to_string(),
                second: second.name().to_string(),
            });
        }

        for state in self.entry_actions.keys().chain(self.exit_actions.keys()) {
            if !self.states.contains(state) {
                return Err(DefinitionError::UndeclaredState {
                    state: state.name().to_string(),
                });
            }
        }

        let mut table: HashMap<(S, E), Transition<S, E>> = HashMap::new();
        for transition in self.transitions {
            for state in [transition.source(), transition.target()] {
                if !self.states.contains(state) {
                    return Err(DefinitionError::UndeclaredState {
                        state: state.name().to_string(),
                    });
                }
            }
            if !self.events.contains(transition.event()) {
                return Err(DefinitionError::UndeclaredEvent {
                    event: transition.event().name().to_string(),
                });
            }
            if self.terminals.contains(transition.source()) {
                return Err(DefinitionError::TransitionFromTerminal {
                    state: transition.source().name().to_string(),
                });
            }

            let key = (transition.source().clone(), transition.event().clone());
            if table.contains_key(&key) {
                return Err(DefinitionError::DuplicateTransition {
                    source: key.0.name().to_string(),
                    event: key.1.name().to_string(),
                });
            }
            table.insert(key, transition);
        }

        tracing::debug!(
            initial = initial.name(),
            states = self.states.len(),
            transitions = table.len(),
            "machine definition built"
        );

        Ok(MachineDefinition {
            initial,
            states: self.states,
            terminals: self.terminals,
            events: self.events,
            transitions: table,
            entry_actions: self.entry_actions,
            exit_actions: self.exit_actions,
            listeners: self.listeners,
        })
    }
}

impl<S: State, E: Event> Default for DefinitionBuilder<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{event_enum, state_enum};

    state_enum! {
        enum TestState {
            Submitted,
            Paid,
            Fulfilled,
            Canceled,
        }
    }

    event_enum! {
        enum TestEvent {
            Pay,
            Fulfill,
            Cancel,
        }
    }

    #[test]
    fn builder_requires_an_initial_state() {
        let result = DefinitionBuilder::<TestState, TestEvent>::new()
            .state(TestState::Paid)
            .build();

        assert_eq!(result.unwrap_err(), DefinitionError::NoInitialState);
    }

    #[test]
    fn builder_rejects_two_initial_states() {
        let result = DefinitionBuilder::<TestState, TestEvent>::new()
            .initial(TestState::Submitted)
            .initial(TestState::Paid)
            .build();

        assert_eq!(
            result.unwrap_err(),
            DefinitionError::MultipleInitialStates {
                first: "Submitted".to_string(),
                second: "Paid".to_string(),
            }
        );
    }

    #[test]
    fn repeating_the_same_initial_is_not_ambiguous() {
        let result = DefinitionBuilder::<TestState, TestEvent>::new()
            .initial(TestState::Submitted)
            .initial(TestState::Submitted)
            .build();

        assert!(result.is_ok());
    }

    #[test]
    fn builder_rejects_undeclared_transition_state() {
        let result = DefinitionBuilder::new()
            .initial(TestState::Submitted)
            .event(TestEvent::Pay)
            .transition(Transition::new(
                TestState::Submitted,
                TestEvent::Pay,
                TestState::Paid,
            ))
            .build();

        assert_eq!(
            result.unwrap_err(),
            DefinitionError::UndeclaredState {
                state: "Paid".to_string(),
            }
        );
    }

    #[test]
    fn builder_rejects_undeclared_event() {
        let result = DefinitionBuilder::new()
            .initial(TestState::Submitted)
            .state(TestState::Paid)
            .transition(Transition::new(
                TestState::Submitted,
                TestEvent::Pay,
                TestState::Paid,
            ))
            .build();

        assert_eq!(
            result.unwrap_err(),
            DefinitionError::UndeclaredEvent {
                event: "Pay".to_string(),
            }
        );
    }

    #[test]
    fn builder_rejects_duplicate_source_event_pair() {
        let result = DefinitionBuilder::new()
            .initial(TestState::Submitted)
            .state(TestState::Paid)
            .state(TestState::Canceled)
            .event(TestEvent::Pay)
            .transition(Transition::new(
                TestState::Submitted,
                TestEvent::Pay,
                TestState::Paid,
            ))
            .transition(Transition::new(
                TestState::Submitted,
                TestEvent::Pay,
                TestState::Canceled,
            ))
            .build();

        assert_eq!(
            result.unwrap_err(),
            DefinitionError::DuplicateTransition {
                source: "Submitted".to_string(),
                event: "Pay".to_string(),
            }
        );
    }

    #[test]
    fn builder_rejects_outgoing_transition_from_terminal() {
        let result = DefinitionBuilder::new()
            .initial(TestState::Submitted)
            .terminal(TestState::Fulfilled)
            .event(TestEvent::Cancel)
            .transition(Transition::new(
                TestState::Fulfilled,
                TestEvent::Cancel,
                TestState::Submitted,
            ))
            .build();

        assert_eq!(
            result.unwrap_err(),
            DefinitionError::TransitionFromTerminal {
                state: "Fulfilled".to_string(),
            }
        );
    }

    #[test]
    fn builder_rejects_action_on_undeclared_state() {
        let result = DefinitionBuilder::<TestState, TestEvent>::new()
            .initial(TestState::Submitted)
            .on_entry(TestState::Paid, |_ctx| Ok(()))
            .build();

        assert_eq!(
            result.unwrap_err(),
            DefinitionError::UndeclaredState {
                state: "Paid".to_string(),
            }
        );
    }

    #[test]
    fn fluent_api_builds_full_definition() {
        let definition = DefinitionBuilder::new()
            .initial(TestState::Submitted)
            .state(TestState::Paid)
            .terminal(TestState::Fulfilled)
            .terminal(TestState::Canceled)
            .events([TestEvent::Pay, TestEvent::Fulfill, TestEvent::Cancel])
            .transition(Transition::new(
                TestState::Submitted,
                TestEvent::Pay,
                TestState::Paid,
            ))
            .transition(Transition::new(
                TestState::Paid,
                TestEvent::Fulfill,
                TestState::Fulfilled,
            ))
            .transition(Transition::new(
                TestState::Submitted,
                TestEvent::Cancel,
                TestState::Canceled,
            ))
            .transition(Transition::new(
                TestState::Paid,
                TestEvent::Cancel,
                TestState::Canceled,
            ))
            .on_entry(TestState::Submitted, |_ctx| Ok(()))
            .listener(|_from: Option<&TestState>, _to: &TestState| {})
            .build()
            .unwrap();

        assert_eq!(definition.transition_count(), 4);
        assert_eq!(definition.listeners().len(), 1);
        assert!(definition.entry_action(&TestState::Submitted).is_some());
        assert!(definition.exit_action(&TestState::Submitted).is_none());
    }
}
