use crate::{AppState, ChatId, FocusKey, MessageId, Workspace, WorkspaceDraft, WorkspaceId};
use std::borrow::Cow;

/// Read access to the live message store.
pub trait MessageLookup {
    type Message;

    fn message(&self, chat_id: &ChatId, message_id: MessageId) -> Option<&Self::Message>;
}

/// Sentinel first, then user workspaces in display order.
pub fn list_workspaces(state: &AppState) -> Vec<Cow<'_, Workspace>> {
    std::iter::once(Cow::Owned(Workspace::everything()))
        .chain(state.workspaces.iter().map(Cow::Borrowed))
        .collect()
}

/// Falls back to the sentinel for the sentinel id and for ids that are gone,
/// e.g. deleted from another session.
pub fn workspace_by_id<'a>(state: &'a AppState, workspace_id: &WorkspaceId) -> Cow<'a, Workspace> {
    if workspace_id.is_everything() {
        return Cow::Owned(Workspace::everything());
    }
    match state.workspaces.get(workspace_id) {
        Some(workspace) => Cow::Borrowed(workspace),
        None => Cow::Owned(Workspace::everything()),
    }
}

pub fn current_workspace(state: &AppState) -> Cow<'_, Workspace> {
    workspace_by_id(state, state.workspaces.current_workspace_id())
}

pub fn is_workspace_creator_open(state: &AppState) -> bool {
    state.workspace_editor.is_open
}

pub fn editing_workspace(state: &AppState) -> Option<&Workspace> {
    let id = state.workspace_editor.editing_workspace_id.as_ref()?;
    state.workspaces.get(id)
}

/// Initial form contents: the edited workspace, or blank when creating one.
pub fn editor_draft(state: &AppState) -> WorkspaceDraft {
    editing_workspace(state)
        .map(WorkspaceDraft::from_workspace)
        .unwrap_or_default()
}

pub fn focus_list_keys(state: &AppState) -> &[FocusKey] {
    state.focus_list.keys()
}

pub fn focus_list_count(state: &AppState) -> usize {
    state.focus_list.len()
}

pub fn is_in_focus_list(state: &AppState, chat_id: &ChatId, message_id: MessageId) -> bool {
    state
        .focus_list
        .keys()
        .iter()
        .any(|key| key.chat_id == *chat_id && key.message_id == message_id)
}

pub fn is_focus_list_shown(state: &AppState) -> bool {
    state.focus_list.is_shown
}

/// Messages in focus-list order. Keys whose message is missing are skipped.
pub fn focus_list_messages<'a, L: MessageLookup>(
    state: &AppState,
    lookup: &'a L,
) -> Vec<&'a L::Message> {
    state
        .focus_list
        .keys()
        .iter()
        .filter_map(|key| lookup.message(&key.chat_id, key.message_id))
        .collect()
}

/// Keys whose message no longer exists. Feed into `Action::PruneFocusList`.
pub fn stale_focus_keys<L: MessageLookup>(state: &AppState, lookup: &L) -> Vec<FocusKey> {
    state
        .focus_list
        .keys()
        .iter()
        .filter(|key| lookup.message(&key.chat_id, key.message_id).is_none())
        .cloned()
        .collect()
}
