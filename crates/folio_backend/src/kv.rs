use folio_domain::StorageKey;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

/// Identifies the session that performed a write, so a session can tell its
/// own notifications apart from writes made elsewhere.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct OriginId(u64);

impl OriginId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StorageChange {
    pub key: StorageKey,
    pub origin: OriginId,
}

pub type ChangeListener = Arc<dyn Fn(&StorageChange) + Send + Sync>;

pub trait KeyValueStore: Send + Sync {
    /// Origin stamped on every change this handle writes.
    fn origin(&self) -> OriginId;

    fn get(&self, key: &StorageKey) -> anyhow::Result<Option<String>>;

    /// Writes `value`, or deletes the key when `value` is `None`.
    fn set(&self, key: &StorageKey, value: Option<String>) -> anyhow::Result<()>;

    fn subscribe(&self, listener: ChangeListener) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, ChangeListener)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: ChangeListener) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Listeners in registration order. Callers invoke them after releasing
    /// their locks.
    pub(crate) fn snapshot(&self) -> Vec<ChangeListener> {
        self.entries
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect()
    }
}

pub(crate) fn notify(listeners: &[ChangeListener], change: &StorageChange) {
    for listener in listeners {
        listener(change);
    }
}
