//! Unread-count aggregation across workspaces.
//!
//! Counts come from an external per-folder index. Exclusion only narrows the
//! "Everything" view: a non-sentinel workspace always counts its own folders.

use crate::selectors::current_workspace;
use crate::{AppState, ChatId, FolderId, Workspace, WorkspaceId};
use std::collections::{BTreeSet, HashMap, HashSet};

pub const DEFAULT_BADGE_MAX: u32 = 99;

/// Per-folder unread counters maintained outside this crate.
pub trait FolderUnreadIndex {
    fn folder_ids(&self) -> Vec<FolderId>;

    /// Unmuted chats with unread messages, or `None` when the folder is unknown.
    fn unread_unmuted_count(&self, folder_id: FolderId) -> Option<u32>;

    /// Ordered chat ids of a folder. Empty when the folder is unknown.
    fn chat_ids(&self, folder_id: FolderId) -> Vec<ChatId>;

    /// Bumped on every change; used as a memo key.
    fn revision(&self) -> u64;
}

fn folder_count<I: FolderUnreadIndex + ?Sized>(index: &I, folder_id: FolderId) -> u32 {
    index.unread_unmuted_count(folder_id).unwrap_or(0)
}

/// Folders owned by at least one non-sentinel workspace.
pub fn claimed_folder_ids<'a>(
    all_workspaces: impl IntoIterator<Item = &'a Workspace>,
) -> BTreeSet<FolderId> {
    all_workspaces
        .into_iter()
        .filter(|workspace| !workspace.is_everything())
        .flat_map(|workspace| workspace.folder_ids.iter().copied())
        .collect()
}

pub fn compute_workspace_unread_count<'a, I: FolderUnreadIndex + ?Sized>(
    workspace: &Workspace,
    exclude_other_workspaces: bool,
    all_workspaces: impl IntoIterator<Item = &'a Workspace>,
    index: &I,
) -> u32 {
    if !workspace.is_everything() {
        let mut seen = HashSet::new();
        return workspace
            .folder_ids
            .iter()
            .filter(|id| seen.insert(**id))
            .map(|id| folder_count(index, *id))
            .fold(0u32, u32::saturating_add);
    }

    let claimed = if exclude_other_workspaces {
        claimed_folder_ids(all_workspaces)
    } else {
        BTreeSet::new()
    };

    index
        .folder_ids()
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter(|id| !claimed.contains(id))
        .map(|id| folder_count(index, id))
        .fold(0u32, u32::saturating_add)
}

/// Count for every listed workspace, sentinel included.
pub fn workspace_unread_counts<I: FolderUnreadIndex + ?Sized>(
    state: &AppState,
    index: &I,
) -> HashMap<WorkspaceId, u32> {
    let exclude = state.workspaces.exclude_other_workspaces();
    let sentinel = Workspace::everything();
    std::iter::once(&sentinel)
        .chain(state.workspaces.iter())
        .map(|workspace| {
            let count =
                compute_workspace_unread_count(workspace, exclude, state.workspaces.iter(), index);
            (workspace.id.clone(), count)
        })
        .collect()
}

/// Chat list filter for the "all chats" folder. While the sentinel workspace is
/// current and exclusion is on, chats living in a claimed folder are hidden.
pub fn filter_everything_chat_ids<I: FolderUnreadIndex + ?Sized>(
    state: &AppState,
    index: &I,
    chat_ids: &[ChatId],
) -> Vec<ChatId> {
    if !state.workspaces.exclude_other_workspaces() || !current_workspace(state).is_everything() {
        return chat_ids.to_vec();
    }

    let hidden: HashSet<ChatId> = claimed_folder_ids(state.workspaces.iter())
        .into_iter()
        .flat_map(|folder_id| index.chat_ids(folder_id))
        .collect();
    if hidden.is_empty() {
        return chat_ids.to_vec();
    }

    chat_ids
        .iter()
        .filter(|id| !hidden.contains(*id))
        .cloned()
        .collect()
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct MemoKey {
    workspaces_revision: u64,
    exclude_other_workspaces: bool,
    index_revision: u64,
}

/// Caches [`workspace_unread_counts`] until the workspace collection, the
/// exclude flag, or the index changes.
#[derive(Debug, Default)]
pub struct UnreadCountMemo {
    key: Option<MemoKey>,
    counts: HashMap<WorkspaceId, u32>,
}

impl UnreadCountMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts<I: FolderUnreadIndex + ?Sized>(
        &mut self,
        state: &AppState,
        index: &I,
    ) -> &HashMap<WorkspaceId, u32> {
        let key = MemoKey {
            workspaces_revision: state.workspaces.revision(),
            exclude_other_workspaces: state.workspaces.exclude_other_workspaces(),
            index_revision: index.revision(),
        };
        if self.key != Some(key) {
            self.counts = workspace_unread_counts(state, index);
            self.key = Some(key);
        }
        &self.counts
    }

    pub fn count<I: FolderUnreadIndex + ?Sized>(
        &mut self,
        state: &AppState,
        index: &I,
        workspace_id: &WorkspaceId,
    ) -> u32 {
        let counts = self.counts(state, index);
        counts
            .get(workspace_id)
            .or_else(|| counts.get(&WorkspaceId::everything()))
            .copied()
            .unwrap_or(0)
    }

    pub fn invalidate(&mut self) {
        self.key = None;
    }
}

/// Badge text: nothing for zero, `"{max}+"` past `max`.
pub fn format_unread_badge(count: u32, max: u32) -> Option<String> {
    if count == 0 {
        return None;
    }
    if count > max {
        return Some(format!("{max}+"));
    }
    Some(count.to_string())
}
