//! Instance registry: one live instance per key.

use crate::core::{Event, State};
use crate::definition::MachineDefinition;
use crate::machine::{MachineError, MachineInstance};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Maps each external key (an order id, say) to exactly one live instance.
///
/// Instances are created lazily on first request, bound to the registry's
/// shared definition, and reused for the same key thereafter. The lookup
/// path is mutex-protected, so two concurrent requests for the same unseen
/// key never create two distinct instances. The registry never evicts or
/// expires instances; lifecycle ownership beyond that is the caller's.
///
/// Each instance is handed out as `Arc<Mutex<_>>`: per-key access is
/// serialized (a single instance is not safe for concurrent event
/// submission) while different keys proceed independently.
pub struct MachineRegistry<S: State, E: Event> {
    definition: Arc<MachineDefinition<S, E>>,
    instances: Mutex<HashMap<String, Arc<Mutex<MachineInstance<S, E>>>>>,
}

impl<S: State, E: Event> MachineRegistry<S, E> {
    /// Create a registry over a definition.
    pub fn new(definition: MachineDefinition<S, E>) -> Self {
        Self::with_shared(Arc::new(definition))
    }

    /// Create a registry over an already-shared definition.
    pub fn with_shared(definition: Arc<MachineDefinition<S, E>>) -> Self {
        Self {
            definition,
            instances: Mutex::new(HashMap::new()),
        }
    }

    /// The shared definition all instances are bound to.
    pub fn definition(&self) -> &Arc<MachineDefinition<S, E>> {
        &self.definition
    }

    /// Return the instance for `key`, creating it (not started, at the
    /// initial state) on first request.
    pub fn get_or_create(&self, key: &str) -> Arc<Mutex<MachineInstance<S, E>>> {
        let mut instances = self.lock_instances();
        Arc::clone(instances.entry(key.to_string()).or_insert_with(|| {
            tracing::debug!(key, "creating machine instance");
            Arc::new(Mutex::new(MachineInstance::new(
                key,
                Arc::clone(&self.definition),
            )))
        }))
    }

    /// Return the instance for `key`, rehydrating it at `state` on first
    /// request.
    ///
    /// When the key is already live the existing instance wins and the
    /// supplied state is ignored; storage is only consulted for keys the
    /// registry has not seen.
    pub fn get_or_restore(
        &self,
        key: &str,
        state: S,
    ) -> Result<Arc<Mutex<MachineInstance<S, E>>>, MachineError> {
        let mut instances = self.lock_instances();
        if let Some(existing) = instances.get(key) {
            return Ok(Arc::clone(existing));
        }
        tracing::debug!(key, state = state.name(), "restoring machine instance");
        let instance = MachineInstance::restored(key, Arc::clone(&self.definition), state)?;
        let handle = Arc::new(Mutex::new(instance));
        instances.insert(key.to_string(), Arc::clone(&handle));
        Ok(handle)
    }

    /// Look up an instance without creating one.
    pub fn get(&self, key: &str) -> Option<Arc<Mutex<MachineInstance<S, E>>>> {
        self.lock_instances().get(key).cloned()
    }

    /// Whether an instance exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.lock_instances().contains_key(key)
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.lock_instances().len()
    }

    /// Whether no instances are live.
    pub fn is_empty(&self) -> bool {
        self.lock_instances().is_empty()
    }

    /// Keys with live instances.
    pub fn keys(&self) -> Vec<String> {
        self.lock_instances().keys().cloned().collect()
    }

    // A poisoned map only means some caller panicked mid-access; the data
    // is still a plain HashMap, so recover it instead of propagating.
    fn lock_instances(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<String, Arc<Mutex<MachineInstance<S, E>>>>> {
        self.instances
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
