use crate::kv::{KeyValueStore, StorageChange, SubscriptionId};
use crate::settings::SettingsRepository;
use crate::store::Store;
use folio_domain::{Action, AppState, DEFAULT_STORAGE_NAMESPACE, Effect};
use std::collections::VecDeque;
use std::sync::{Arc, mpsc};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EngineOptions {
    pub namespace: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_STORAGE_NAMESPACE.to_owned(),
        }
    }
}

/// Drives the store: applies actions, runs the effects they return and feeds
/// follow-up actions back in, all on the caller's thread.
pub struct Engine {
    store: Store,
    kv: Arc<dyn KeyValueStore>,
    settings: SettingsRepository,
    subscription: SubscriptionId,
    changes: mpsc::Receiver<StorageChange>,
}

impl Engine {
    /// Subscribes to storage changes and loads the persisted state.
    pub fn start(kv: Arc<dyn KeyValueStore>, options: EngineOptions) -> Self {
        let (tx, changes) = mpsc::channel::<StorageChange>();
        let origin = kv.origin();
        let subscription = kv.subscribe(Arc::new(move |change: &StorageChange| {
            if change.origin != origin {
                let _ = tx.send(change.clone());
            }
        }));

        let mut engine = Self {
            store: Store::default(),
            settings: SettingsRepository::new(kv.clone(), options.namespace),
            kv,
            subscription,
            changes,
        };
        engine.process_action_queue(Action::AppStarted);
        engine
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn snapshot(&self) -> Arc<AppState> {
        self.store.snapshot()
    }

    pub fn dispatch(&mut self, action: Action) {
        self.process_action_queue(action);
    }

    /// Applies writes made by other sessions since the last call. Returns
    /// whether the state was reloaded.
    pub fn sync_storage_changes(&mut self) -> bool {
        let user_id = self.store.state().user_id.clone();
        let mut foreign = false;
        while let Ok(change) = self.changes.try_recv() {
            if self.settings.owns(user_id.as_ref(), &change.key) {
                tracing::debug!(key = %change.key, "setting changed in another session");
                foreign = true;
            }
        }
        if !foreign {
            return false;
        }

        match self.settings.load(user_id.as_ref()) {
            Ok(persisted) => {
                self.process_action_queue(Action::PersistedStateChanged {
                    persisted: Box::new(persisted),
                });
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to reload settings");
                false
            }
        }
    }

    fn process_action_queue(&mut self, initial: Action) {
        let mut actions = VecDeque::from([initial]);
        let mut effects = VecDeque::<Effect>::new();

        while let Some(action) = actions.pop_front() {
            effects.extend(self.store.dispatch(action));

            while let Some(effect) = effects.pop_front() {
                match self.run_effect(effect) {
                    Ok(mut followups) => actions.append(&mut followups),
                    Err(err) => {
                        tracing::error!(error = %err, "effect failed");
                    }
                }
            }
        }
    }

    fn run_effect(&mut self, effect: Effect) -> anyhow::Result<VecDeque<Action>> {
        match effect {
            Effect::LoadAppState => {
                let persisted = self.settings.load(self.store.state().user_id.as_ref())?;
                Ok(VecDeque::from([Action::AppStateLoaded {
                    persisted: Box::new(persisted),
                }]))
            }
            effect => {
                self.settings.save(self.store.state(), &effect)?;
                Ok(VecDeque::new())
            }
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.kv.unsubscribe(self.subscription);
    }
}
