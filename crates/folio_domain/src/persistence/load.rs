use crate::state::MAX_WORKSPACE_NAME_LEN;
use crate::{
    AppState, Effect, FocusKey, FolderId, PersistedAppState, PersistedWorkspace, Workspace,
    WorkspaceCollection, WorkspaceId,
};
use std::collections::HashSet;

const FALLBACK_WORKSPACE_NAME: &str = "Workspace";

fn normalize_workspace_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return FALLBACK_WORKSPACE_NAME.to_owned();
    }
    if trimmed.len() <= MAX_WORKSPACE_NAME_LEN {
        return trimmed.to_owned();
    }
    let mut end = MAX_WORKSPACE_NAME_LEN;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].trim_end().to_owned()
}

fn load_workspace(raw: PersistedWorkspace) -> Option<Workspace> {
    let id = raw.id.trim();
    if id.is_empty() || id == WorkspaceId::EVERYTHING_RAW {
        return None;
    }
    let mut folder_ids = Vec::with_capacity(raw.folders_ids.len());
    for folder_id in raw.folders_ids.into_iter().map(FolderId) {
        if !folder_ids.contains(&folder_id) {
            folder_ids.push(folder_id);
        }
    }
    Some(Workspace::new(
        WorkspaceId(id.to_owned()),
        normalize_workspace_name(&raw.name),
        folder_ids,
    ))
}

/// Returns the collection plus whether anything had to be repaired.
fn load_workspaces(persisted: Vec<PersistedWorkspace>) -> (Vec<Workspace>, bool) {
    let total = persisted.len();
    let mut seen = HashSet::new();
    let mut upgraded = false;
    let mut out = Vec::with_capacity(total);
    for raw in persisted {
        let before = raw.clone();
        let Some(workspace) = load_workspace(raw) else {
            upgraded = true;
            continue;
        };
        if !seen.insert(workspace.id.clone()) {
            upgraded = true;
            continue;
        }
        if workspace.id.0 != before.id
            || workspace.name != before.name
            || workspace.folder_ids.len() != before.folders_ids.len()
        {
            upgraded = true;
        }
        out.push(workspace);
    }
    (out, upgraded)
}

fn load_focus_list(persisted: &[String]) -> Vec<FocusKey> {
    let mut seen = HashSet::new();
    persisted
        .iter()
        .filter_map(|raw| FocusKey::parse(raw))
        .filter(|key| seen.insert(key.clone()))
        .collect()
}

/// Replaces the persisted slice of `state`. Session-local UI (focus panel
/// visibility) is only restored when `restore_session_ui` is set.
pub(crate) fn apply_persisted_app_state(
    state: &mut AppState,
    persisted: PersistedAppState,
    restore_session_ui: bool,
) -> Vec<Effect> {
    let (workspaces, workspaces_upgraded) = load_workspaces(persisted.workspaces);

    let revision = state.workspaces.revision;
    let mut collection = WorkspaceCollection::new();
    collection.revision = revision;
    for workspace in workspaces {
        if let Ok(numeric) = workspace.id.0.parse::<u64>() {
            state.last_issued_workspace_id = state.last_issued_workspace_id.max(numeric);
        }
        collection.insert(workspace);
    }
    collection.current_workspace_id = persisted
        .current_workspace_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| WorkspaceId(id.to_owned()))
        .unwrap_or_default();
    collection.exclude_other_workspaces = persisted.exclude_other_workspaces.unwrap_or(false);
    collection.bump();
    state.workspaces = collection;

    if state
        .workspace_editor
        .editing_workspace_id
        .as_ref()
        .is_some_and(|id| !state.workspaces.contains(id))
    {
        state.workspace_editor = Default::default();
    }

    state.focus_list.keys = load_focus_list(&persisted.focus_list);
    if restore_session_ui {
        let shown = persisted.focus_list_shown.unwrap_or(false);
        state.focus_list.set_shown(shown);
    }

    if restore_session_ui && workspaces_upgraded {
        vec![Effect::SaveWorkspaces]
    } else {
        Vec::new()
    }
}
