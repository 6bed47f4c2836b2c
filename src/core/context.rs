//! Per-instance extended state and the context handed to actions.

use crate::core::{Event, EventMessage};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Mutable key/value context attached to one running instance.
///
/// Extended state is independent of the discrete state: it holds whatever
/// the owning caller or the transition actions need to remember across
/// events (an order id, an accumulated total, ...). The engine never removes
/// keys on its own; lifetime equals instance lifetime.
///
/// Values are stored as `serde_json::Value` so truly dynamic metadata fits,
/// with typed accessors for the keys a caller knows ahead of time.
///
/// # Example
///
/// ```rust
/// use machina::core::ExtendedState;
///
/// let mut vars = ExtendedState::new();
/// vars.set("orderId", 42u64);
///
/// assert_eq!(vars.get_as::<u64>("orderId"), Some(42));
/// assert_eq!(vars.get_as::<u64>("missing"), None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ExtendedState {
    variables: HashMap<String, Value>,
}

impl ExtendedState {
    /// Create an empty extended state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, replacing any previous value for the same key.
    ///
    /// Accepts anything serializable; values that fail to serialize are
    /// stored as `Value::Null` rather than panicking mid-transition.
    pub fn set(&mut self, key: impl Into<String>, value: impl Serialize) {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.variables.insert(key.into(), value);
    }

    /// Look up the raw value for a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.variables.get(key)
    }

    /// Look up a key and deserialize it to a concrete type.
    ///
    /// Returns `None` when the key is absent or holds a value of the wrong
    /// shape. A caller that wants the original demo's sentinel behavior can
    /// write `vars.get_as::<i64>("orderId").unwrap_or(-1)` explicitly.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.variables
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Remove a variable, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.variables.remove(key)
    }

    /// Whether a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    /// Number of variables held.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether no variables are held.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// The raw variable map, for snapshotting.
    pub fn variables(&self) -> &HashMap<String, Value> {
        &self.variables
    }

    /// Rebuild an extended state from a raw variable map.
    pub fn from_variables(variables: HashMap<String, Value>) -> Self {
        Self { variables }
    }
}

/// Context handed to entry/exit and transition actions.
///
/// Gives an action mutable access to the instance's extended state and, when
/// the dispatch was triggered by an event, read access to that event and its
/// headers. The entry action run by `start()` sees no event.
pub struct ActionContext<'a, E: Event> {
    event: Option<&'a EventMessage<E>>,
    extended: &'a mut ExtendedState,
}

impl<'a, E: Event> ActionContext<'a, E> {
    pub(crate) fn new(event: Option<&'a EventMessage<E>>, extended: &'a mut ExtendedState) -> Self {
        Self { event, extended }
    }

    /// The event that triggered this dispatch, if any.
    pub fn event(&self) -> Option<&EventMessage<E>> {
        self.event
    }

    /// Look up a header on the triggering event.
    pub fn header(&self, key: &str) -> Option<&Value> {
        self.event.and_then(|msg| msg.header(key))
    }

    /// The instance's extended state, read-only.
    pub fn extended_state(&self) -> &ExtendedState {
        self.extended
    }

    /// The instance's extended state, mutable.
    pub fn extended_state_mut(&mut self) -> &mut ExtendedState {
        self.extended
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Event;

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum TestEvent {
        Pay,
    }

    impl Event for TestEvent {
        fn name(&self) -> &str {
            "Pay"
        }
    }

    #[test]
    fn set_and_get_roundtrips_values() {
        let mut vars = ExtendedState::new();
        vars.set("orderId", 42u64);
        vars.set("customer", "frank");

        assert_eq!(vars.get_as::<u64>("orderId"), Some(42));
        assert_eq!(vars.get_as::<String>("customer"), Some("frank".to_string()));
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn missing_key_returns_none() {
        let vars = ExtendedState::new();
        assert!(vars.get("orderId").is_none());
        assert_eq!(vars.get_as::<i64>("orderId"), None);
        // Explicit sentinel at the call site, not inside the engine.
        assert_eq!(vars.get_as::<i64>("orderId").unwrap_or(-1), -1);
    }

    #[test]
    fn wrong_type_returns_none() {
        let mut vars = ExtendedState::new();
        vars.set("orderId", "not-a-number");
        assert_eq!(vars.get_as::<u64>("orderId"), None);
    }

    #[test]
    fn set_replaces_previous_value() {
        let mut vars = ExtendedState::new();
        vars.set("attempts", 1);
        vars.set("attempts", 2);
        assert_eq!(vars.get_as::<i32>("attempts"), Some(2));
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn remove_and_contains() {
        let mut vars = ExtendedState::new();
        vars.set("tmp", true);
        assert!(vars.contains("tmp"));
        assert_eq!(vars.remove("tmp"), Some(serde_json::json!(true)));
        assert!(!vars.contains("tmp"));
        assert!(vars.is_empty());
    }

    #[test]
    fn action_context_exposes_event_headers() {
        let mut vars = ExtendedState::new();
        let msg = EventMessage::new(TestEvent::Pay).with_header("amount", 1499);

        let mut ctx = ActionContext::new(Some(&msg), &mut vars);
        assert_eq!(ctx.header("amount").and_then(|v| v.as_i64()), Some(1499));
        assert!(ctx.header("missing").is_none());

        ctx.extended_state_mut().set("seen", true);
        assert_eq!(vars.get_as::<bool>("seen"), Some(true));
    }

    #[test]
    fn action_context_without_event_has_no_headers() {
        let mut vars = ExtendedState::new();
        let ctx = ActionContext::<TestEvent>::new(None, &mut vars);
        assert!(ctx.event().is_none());
        assert!(ctx.header("anything").is_none());
    }
}
