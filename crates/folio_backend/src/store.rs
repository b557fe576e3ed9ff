use crate::kv::SubscriptionId;
use folio_domain::{Action, AppState, Effect};
use std::sync::Arc;

type StateListener = Box<dyn FnMut(&Arc<AppState>)>;

/// Holds the current [`AppState`] snapshot. Dispatch is copy-on-write, so a
/// snapshot handed out earlier never changes under its holder.
pub struct Store {
    state: Arc<AppState>,
    next_subscription: u64,
    listeners: Vec<(SubscriptionId, StateListener)>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(AppState::new())
    }
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
            next_subscription: 0,
            listeners: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> Arc<AppState> {
        self.state.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        let effects = Arc::make_mut(&mut self.state).apply(action);
        let state = self.state.clone();
        for (_, listener) in &mut self.listeners {
            listener(&state);
        }
        effects
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Arc<AppState>) + 'static) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(entry_id, _)| *entry_id != id);
        self.listeners.len() != before
    }
}
