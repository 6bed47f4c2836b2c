//! Running state machine instances.
//!
//! A [`MachineInstance`] is one automaton bound to a key, holding a current
//! state and an extended state, driven by submitted events. Instances have an
//! explicit two-phase lifecycle: construct, then `start()`; events submitted
//! before start are rejected with an error.

mod error;
mod listener;

pub use error::MachineError;
pub use listener::TransitionListener;

use crate::core::{ActionContext, Event, EventMessage, ExtendedState, State};
use crate::definition::MachineDefinition;
use std::sync::Arc;

/// Lifecycle status of an instance.
///
/// `Created` means never started; `Stopped` means started at least once and
/// then stopped. The distinction matters: the initial state's entry action
/// and the `(None, initial)` listener notification fire only on the first
/// start, never on a resume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MachineStatus {
    /// Constructed, never started.
    Created,
    /// Accepting events.
    Running,
    /// Stopped after having run; current state preserved.
    Stopped,
}

/// Outcome of submitting an event to a running instance.
///
/// `Rejected` is expected, frequent input (replaying `Pay` after already
/// paid, poking a terminal state) and is deliberately a value rather than an
/// error, so callers can branch on "no legal move" separately from engine
/// misuse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventOutcome<S: State> {
    /// The transition committed; the instance is now in this state.
    Accepted(S),
    /// No transition fired; state is unchanged.
    Rejected(RejectReason),
}

/// Why a submitted event did not fire a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// No declared transition matches `(current state, event)`.
    NoTransition,
    /// A transition matched but its guard returned false.
    GuardDenied,
}

/// One running automaton bound to a key.
///
/// Holds the current state, the per-instance extended state, and a shared
/// handle to the immutable definition. All operations run synchronously on
/// the caller's thread; a single instance assumes one logical flow drives
/// its events at a time.
pub struct MachineInstance<S: State, E: Event> {
    key: String,
    definition: Arc<MachineDefinition<S, E>>,
    current: S,
    extended: ExtendedState,
    status: MachineStatus,
}

impl<S: State, E: Event> MachineInstance<S, E> {
    /// Create a fresh instance at the definition's initial state, not
    /// started.
    pub fn new(key: impl Into<String>, definition: Arc<MachineDefinition<S, E>>) -> Self {
        let current = definition.initial_state().clone();
        Self {
            key: key.into(),
            definition,
            current,
            extended: ExtendedState::new(),
            status: MachineStatus::Created,
        }
    }

    /// Rehydrate an instance at an arbitrary declared state.
    ///
    /// The instance comes back `Stopped`: it was logically started before it
    /// was persisted, so a later `start()` resumes without re-running any
    /// entry action or re-notifying listeners.
    pub fn restored(
        key: impl Into<String>,
        definition: Arc<MachineDefinition<S, E>>,
        state: S,
    ) -> Result<Self, MachineError> {
        if !definition.contains_state(&state) {
            return Err(MachineError::UndeclaredState {
                state: state.name().to_string(),
            });
        }
        Ok(Self {
            key: key.into(),
            definition,
            current: state,
            extended: ExtendedState::new(),
            status: MachineStatus::Stopped,
        })
    }

    /// The key this instance is bound to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The current discrete state.
    ///
    /// Exposed as a plain value so a persistence collaborator can serialize
    /// it (by [`State::name`]) alongside its own identifier.
    pub fn current_state(&self) -> &S {
        &self.current
    }

    /// The lifecycle status.
    pub fn status(&self) -> MachineStatus {
        self.status
    }

    /// Whether the current state is terminal.
    pub fn is_terminal(&self) -> bool {
        self.definition.is_terminal(&self.current)
    }

    /// The shared definition this instance runs against.
    pub fn definition(&self) -> &Arc<MachineDefinition<S, E>> {
        &self.definition
    }

    /// The extended state, read-only.
    pub fn extended_state(&self) -> &ExtendedState {
        &self.extended
    }

    /// The extended state, mutable.
    ///
    /// Callers may read and write before or after start, e.g. to seed an
    /// order id before the first event. The engine never removes keys on
    /// its own.
    pub fn extended_state_mut(&mut self) -> &mut ExtendedState {
        &mut self.extended
    }

    /// Start accepting events.
    ///
    /// On the first start this runs the initial state's entry action (with
    /// no triggering event in context) and notifies listeners with
    /// `(None, initial)`. Starting a stopped instance resumes silently at
    /// the preserved state. Starting a running instance is an
    /// [`MachineError::AlreadyStarted`] error, not a silent no-op.
    pub fn start(&mut self) -> Result<(), MachineError> {
        match self.status {
            MachineStatus::Running => Err(MachineError::AlreadyStarted {
                key: self.key.clone(),
            }),
            MachineStatus::Stopped => {
                self.status = MachineStatus::Running;
                tracing::debug!(key = %self.key, state = self.current.name(), "machine resumed");
                Ok(())
            }
            MachineStatus::Created => {
                self.status = MachineStatus::Running;
                if let Some(action) = self.definition.entry_action(&self.current) {
                    let mut ctx = ActionContext::new(None, &mut self.extended);
                    (action.as_ref())(&mut ctx).map_err(|source| {
                        MachineError::EntryActionFailed {
                            state: self.current.name().to_string(),
                            source,
                        }
                    })?;
                }
                tracing::debug!(key = %self.key, state = self.current.name(), "machine started");
                listener::notify_all(self.definition.listeners(), None, &self.current);
                Ok(())
            }
        }
    }

    /// Stop accepting events, preserving the current state.
    ///
    /// Fails with [`MachineError::NotStarted`] unless the instance is
    /// running.
    pub fn stop(&mut self) -> Result<(), MachineError> {
        if self.status != MachineStatus::Running {
            return Err(MachineError::NotStarted {
                key: self.key.clone(),
            });
        }
        self.status = MachineStatus::Stopped;
        tracing::debug!(key = %self.key, state = self.current.name(), "machine stopped");
        Ok(())
    }

    /// Submit an event with no headers.
    pub fn send(&mut self, event: E) -> Result<EventOutcome<S>, MachineError> {
        self.send_event(EventMessage::new(event))
    }

    /// Submit an event, evaluating it against the transition table from the
    /// current state.
    ///
    /// A dispatch that finds a matching, guard-approved transition runs, in
    /// order: the source state's exit action, the transition's own action,
    /// the state mutation, the target state's entry action, then the
    /// listener notifications in registration order. The submitted event's
    /// headers are visible to every action through its context.
    ///
    /// Failure atomicity is asymmetric and deliberate: an exit or transition
    /// action error aborts before the mutation, leaving the state at the
    /// source; an entry action error propagates but the mutation is NOT
    /// rolled back. A listener panic is caught and logged; it never undoes
    /// the transition nor starves later listeners.
    pub fn send_event(
        &mut self,
        message: EventMessage<E>,
    ) -> Result<EventOutcome<S>, MachineError> {
        if self.status != MachineStatus::Running {
            return Err(MachineError::NotStarted {
                key: self.key.clone(),
            });
        }

        let Some(transition) = self.definition.transition_for(&self.current, message.id()) else {
            tracing::trace!(
                key = %self.key,
                state = self.current.name(),
                event = message.id().name(),
                "event rejected: no matching transition"
            );
            return Ok(EventOutcome::Rejected(RejectReason::NoTransition));
        };

        if let Some(guard) = transition.guard_ref() {
            if !guard.check(&self.extended) {
                tracing::trace!(
                    key = %self.key,
                    state = self.current.name(),
                    event = message.id().name(),
                    "event rejected: guard denied"
                );
                return Ok(EventOutcome::Rejected(RejectReason::GuardDenied));
            }
        }

        let source = self.current.clone();
        let target = transition.target().clone();
        let transition_action = transition.action_ref().map(Arc::clone);

        if let Some(action) = self.definition.exit_action(&source) {
            let mut ctx = ActionContext::new(Some(&message), &mut self.extended);
            (action.as_ref())(&mut ctx).map_err(|cause| MachineError::ExitActionFailed {
                state: source.name().to_string(),
                source: cause,
            })?;
        }

        if let Some(action) = transition_action {
            let mut ctx = ActionContext::new(Some(&message), &mut self.extended);
            (action.as_ref())(&mut ctx).map_err(|cause| MachineError::TransitionActionFailed {
                from: source.name().to_string(),
                to: target.name().to_string(),
                source: cause,
            })?;
        }

        self.current = target.clone();

        if let Some(action) = self.definition.entry_action(&target) {
            let mut ctx = ActionContext::new(Some(&message), &mut self.extended);
            (action.as_ref())(&mut ctx).map_err(|cause| MachineError::EntryActionFailed {
                state: target.name().to_string(),
                source: cause,
            })?;
        }

        tracing::debug!(
            key = %self.key,
            from = source.name(),
            to = target.name(),
            event = message.id().name(),
            "transition committed"
        );
        listener::notify_all(self.definition.listeners(), Some(&source), &target);

        Ok(EventOutcome::Accepted(target))
    }
}

impl<S: State, E: Event> std::fmt::Debug for MachineInstance<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MachineInstance")
            .field("key", &self.key)
            .field("current", &self.current)
            .field("status", &self.status)
            .finish()
    }
}
