//! Event identifiers and submitted event messages.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine events.
///
/// Events are opaque identifiers drawn from a finite set, usually a plain
/// enum. An event submitted to a running instance is wrapped in an
/// [`EventMessage`], which may carry named headers.
///
/// # Example
///
/// ```rust
/// use machina::core::Event;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum OrderEvent {
///     Pay,
///     Fulfill,
///     Cancel,
/// }
///
/// impl Event for OrderEvent {
///     fn name(&self) -> &str {
///         match self {
///             Self::Pay => "Pay",
///             Self::Fulfill => "Fulfill",
///             Self::Cancel => "Cancel",
///         }
///     }
/// }
/// ```
pub trait Event: Clone + Eq + Hash + Debug + Send + Sync {
    /// Get the event's name for display and logging.
    fn name(&self) -> &str;
}

/// A submitted event: an event identifier plus optional string-keyed headers.
///
/// Headers carry per-submission metadata (who triggered the event, an
/// external reference, ...). They are visible to entry/exit and transition
/// actions through [`ActionContext`](crate::core::ActionContext) for the
/// duration of the dispatch; they are not merged into the instance's
/// extended state.
///
/// # Example
///
/// ```rust
/// use machina::core::{Event, EventMessage};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum OrderEvent {
///     Pay,
/// }
///
/// impl Event for OrderEvent {
///     fn name(&self) -> &str {
///         "Pay"
///     }
/// }
///
/// let msg = EventMessage::new(OrderEvent::Pay).with_header("operator", "frank");
/// assert_eq!(msg.header("operator").and_then(|v| v.as_str()), Some("frank"));
/// ```
#[derive(Clone, Debug)]
pub struct EventMessage<E: Event> {
    id: E,
    headers: HashMap<String, Value>,
}

impl<E: Event> EventMessage<E> {
    /// Wrap an event identifier with no headers.
    pub fn new(id: E) -> Self {
        Self {
            id,
            headers: HashMap::new(),
        }
    }

    /// Attach a header, replacing any previous value for the same key.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// The event identifier.
    pub fn id(&self) -> &E {
        &self.id
    }

    /// Look up a header by key.
    pub fn header(&self, key: &str) -> Option<&Value> {
        self.headers.get(key)
    }

    /// All headers on this message.
    pub fn headers(&self) -> &HashMap<String, Value> {
        &self.headers
    }
}
