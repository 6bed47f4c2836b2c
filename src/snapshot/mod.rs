//! Snapshots: the persistence-facing capture of an instance.
//!
//! The engine owns no storage. What it offers a persistence collaborator is
//! a serializable [`Snapshot`] of one instance (key, current state by name,
//! extended-state variables, capture time) plus the inverse operation:
//! rehydrating an instance from a snapshot against a definition.

mod error;

pub use error::SnapshotError;

use crate::core::{Event, ExtendedState, State};
use crate::definition::MachineDefinition;
use crate::machine::MachineInstance;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Version identifier for the snapshot format.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable capture of one machine instance.
///
/// The discrete state is stored by its [`State::name`] so the snapshot stays
/// readable in whatever store the collaborator uses; restore resolves the
/// name back through the definition and fails on an unknown one.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snapshot format version.
    pub version: u32,

    /// The key the instance was bound to.
    pub key: String,

    /// Current state, by name.
    pub state: String,

    /// Extended-state variables.
    pub variables: HashMap<String, Value>,

    /// When the snapshot was captured.
    pub taken_at: DateTime<Utc>,
}

impl Snapshot {
    /// Capture an instance.
    pub fn capture<S: State, E: Event>(instance: &MachineInstance<S, E>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            key: instance.key().to_string(),
            state: instance.current_state().name().to_string(),
            variables: instance.extended_state().variables().clone(),
            taken_at: Utc::now(),
        }
    }

    /// Rehydrate an instance from this snapshot.
    ///
    /// The instance comes back stopped at the captured state with the
    /// captured variables; call `start()` to resume it.
    pub fn restore<S: State, E: Event>(
        &self,
        definition: Arc<MachineDefinition<S, E>>,
    ) -> Result<MachineInstance<S, E>, SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        let state = definition
            .state_named(&self.state)
            .ok_or_else(|| SnapshotError::UnknownState {
                state: self.state.clone(),
            })?;

        let mut instance = MachineInstance::restored(self.key.clone(), definition, state)
            .map_err(|e| SnapshotError::ValidationFailed(e.to_string()))?;
        *instance.extended_state_mut() = ExtendedState::from_variables(self.variables.clone());
        Ok(instance)
    }

    /// Serialize to JSON.
    ///
    /// JSON is the only wire form: the variable values are self-describing
    /// `serde_json::Value`s, which non-self-describing codecs cannot
    /// round-trip.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))
    }
}

impl<S: State, E: Event> MachineInstance<S, E> {
    /// Capture this instance as a [`Snapshot`].
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    /// Rehydrate an instance from a snapshot against a definition.
    pub fn from_snapshot(
        snapshot: &Snapshot,
        definition: Arc<MachineDefinition<S, E>>,
    ) -> Result<Self, SnapshotError> {
        snapshot.restore(definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{DefinitionBuilder, Transition};
    use crate::machine::{EventOutcome, MachineStatus};
    use crate::{event_enum, state_enum};

    state_enum! {
        enum OrderState {
            Submitted,
            Paid,
            Fulfilled,
        }
    }

    event_enum! {
        enum OrderEvent {
            Pay,
            Fulfill,
        }
    }

    fn definition() -> Arc<MachineDefinition<OrderState, OrderEvent>> {
        Arc::new(
            DefinitionBuilder::new()
                .initial(OrderState::Submitted)
                .state(OrderState::Paid)
                .terminal(OrderState::Fulfilled)
                .events([OrderEvent::Pay, OrderEvent::Fulfill])
                .transition(Transition::new(
                    OrderState::Submitted,
                    OrderEvent::Pay,
                    OrderState::Paid,
                ))
                .transition(Transition::new(
                    OrderState::Paid,
                    OrderEvent::Fulfill,
                    OrderState::Fulfilled,
                ))
                .build()
                .unwrap(),
        )
    }

    fn paid_instance() -> MachineInstance<OrderState, OrderEvent> {
        let mut machine = MachineInstance::new("order-1", definition());
        machine.extended_state_mut().set("orderId", 42u64);
        machine.start().unwrap();
        machine.send(OrderEvent::Pay).unwrap();
        machine
    }

    #[test]
    fn capture_records_state_by_name() {
        let snapshot = paid_instance().snapshot();

        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.key, "order-1");
        assert_eq!(snapshot.state, "Paid");
        assert_eq!(snapshot.variables["orderId"], serde_json::json!(42));
    }

    #[test]
    fn restore_resumes_where_capture_left_off() {
        let snapshot = paid_instance().snapshot();

        let mut machine = MachineInstance::from_snapshot(&snapshot, definition()).unwrap();
        assert_eq!(machine.status(), MachineStatus::Stopped);
        assert_eq!(machine.current_state(), &OrderState::Paid);
        assert_eq!(machine.extended_state().get_as::<u64>("orderId"), Some(42));

        machine.start().unwrap();
        assert_eq!(
            machine.send(OrderEvent::Fulfill).unwrap(),
            EventOutcome::Accepted(OrderState::Fulfilled)
        );
    }

    #[test]
    fn json_roundtrip() {
        let snapshot = paid_instance().snapshot();
        let json = snapshot.to_json().unwrap();
        let parsed = Snapshot::from_json(&json).unwrap();

        assert_eq!(parsed.key, snapshot.key);
        assert_eq!(parsed.state, snapshot.state);
        assert_eq!(parsed.variables, snapshot.variables);
    }

    #[test]
    fn restore_rejects_unknown_state_name() {
        let mut snapshot = paid_instance().snapshot();
        snapshot.state = "Shipped".to_string();

        let err = snapshot
            .restore::<OrderState, OrderEvent>(definition())
            .unwrap_err();
        assert!(matches!(err, SnapshotError::UnknownState { .. }));
    }

    #[test]
    fn restore_rejects_unsupported_version() {
        let mut snapshot = paid_instance().snapshot();
        snapshot.version = 99;

        let err = snapshot
            .restore::<OrderState, OrderEvent>(definition())
            .unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::UnsupportedVersion {
                found: 99,
                supported: SNAPSHOT_VERSION,
            }
        ));
    }

    #[test]
    fn bad_json_fails_cleanly() {
        let err = Snapshot::from_json("{not json").unwrap_err();
        assert!(matches!(err, SnapshotError::DeserializationFailed(_)));
    }
}
