use super::FocusKey;
use std::collections::HashSet;

#[derive(Clone, Debug, Default)]
pub struct FocusList {
    pub(crate) keys: Vec<FocusKey>,
    pub is_shown: bool,
    pub last_is_shown: bool,
}

impl FocusList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> &[FocusKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &FocusKey) -> bool {
        self.keys.contains(key)
    }

    pub(crate) fn add(&mut self, key: FocusKey) -> bool {
        if self.keys.contains(&key) {
            return false;
        }
        self.keys.push(key);
        true
    }

    pub(crate) fn remove(&mut self, key: &FocusKey) -> bool {
        let before = self.keys.len();
        self.keys.retain(|k| k != key);
        self.keys.len() != before
    }

    /// Overwrites the order wholesale. Later duplicates are dropped.
    pub(crate) fn replace(&mut self, keys: Vec<FocusKey>) -> bool {
        let mut seen = HashSet::with_capacity(keys.len());
        let next: Vec<FocusKey> = keys
            .into_iter()
            .filter(|key| seen.insert(key.clone()))
            .collect();
        if next == self.keys {
            return false;
        }
        self.keys = next;
        true
    }

    pub(crate) fn set_shown(&mut self, is_shown: bool) {
        self.is_shown = is_shown;
        self.last_is_shown = is_shown;
    }
}
