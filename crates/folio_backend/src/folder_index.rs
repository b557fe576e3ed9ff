use crate::kv::SubscriptionId;
use folio_domain::{ChatId, FolderId, FolderUnreadIndex};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct FolderEntry {
    unread_unmuted: u32,
    chat_ids: Vec<ChatId>,
}

type RevisionListener = Box<dyn FnMut(u64)>;

/// Folder unread counters fed by the chat layer. Every mutation that changes
/// something bumps the revision and notifies subscribers with it.
#[derive(Default)]
pub struct InMemoryFolderUnreadIndex {
    folders: BTreeMap<FolderId, FolderEntry>,
    revision: u64,
    next_subscription: u64,
    listeners: Vec<(SubscriptionId, RevisionListener)>,
}

impl InMemoryFolderUnreadIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_folder(&mut self, folder_id: FolderId, unread_unmuted: u32, chat_ids: Vec<ChatId>) {
        let entry = FolderEntry {
            unread_unmuted,
            chat_ids,
        };
        if self.folders.get(&folder_id) == Some(&entry) {
            return;
        }
        self.folders.insert(folder_id, entry);
        self.changed();
    }

    /// Returns `false` for an unknown folder.
    pub fn set_unread_count(&mut self, folder_id: FolderId, unread_unmuted: u32) -> bool {
        let Some(entry) = self.folders.get_mut(&folder_id) else {
            return false;
        };
        if entry.unread_unmuted != unread_unmuted {
            entry.unread_unmuted = unread_unmuted;
            self.changed();
        }
        true
    }

    pub fn remove_folder(&mut self, folder_id: FolderId) -> bool {
        if self.folders.remove(&folder_id).is_none() {
            return false;
        }
        self.changed();
        true
    }

    pub fn subscribe(&mut self, listener: impl FnMut(u64) + 'static) -> SubscriptionId {
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

    fn changed(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        let revision = self.revision;
        for (_, listener) in &mut self.listeners {
            listener(revision);
        }
    }
}

impl FolderUnreadIndex for InMemoryFolderUnreadIndex {
    fn folder_ids(&self) -> Vec<FolderId> {
        self.folders.keys().copied().collect()
    }

    fn unread_unmuted_count(&self, folder_id: FolderId) -> Option<u32> {
        self.folders.get(&folder_id).map(|entry| entry.unread_unmuted)
    }

    fn chat_ids(&self, folder_id: FolderId) -> Vec<ChatId> {
        self.folders
            .get(&folder_id)
            .map(|entry| entry.chat_ids.clone())
            .unwrap_or_default()
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}
