use crate::kv::{
    ChangeListener, KeyValueStore, Listeners, OriginId, StorageChange, SubscriptionId, notify,
};
use folio_domain::StorageKey;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Shared {
    values: Mutex<HashMap<StorageKey, String>>,
    listeners: Mutex<Listeners>,
}

/// Process-local key/value store. Handles obtained through [`connect`] share
/// the same data and listeners but write with their own origin, which is how
/// several sessions over one storage are modelled.
///
/// [`connect`]: MemoryKeyValueStore::connect
#[derive(Clone)]
pub struct MemoryKeyValueStore {
    shared: Arc<Shared>,
    origin: OriginId,
}

impl Default for MemoryKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            origin: OriginId::next(),
        }
    }

    pub fn connect(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            origin: OriginId::next(),
        }
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn origin(&self) -> OriginId {
        self.origin
    }

    fn get(&self, key: &StorageKey) -> anyhow::Result<Option<String>> {
        let values = self
            .shared
            .values
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &StorageKey, value: Option<String>) -> anyhow::Result<()> {
        let changed = {
            let mut values = self
                .shared
                .values
                .lock()
                .unwrap_or_else(|err| err.into_inner());
            match value {
                Some(value) => values.insert(key.clone(), value.clone()) != Some(value),
                None => values.remove(key).is_some(),
            }
        };
        if !changed {
            return Ok(());
        }

        let listeners = self
            .shared
            .listeners
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .snapshot();
        notify(
            &listeners,
            &StorageChange {
                key: key.clone(),
                origin: self.origin,
            },
        );
        Ok(())
    }

    fn subscribe(&self, listener: ChangeListener) -> SubscriptionId {
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .add(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .remove(id)
    }
}
