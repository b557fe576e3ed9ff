use crate::{AppState, PersistedAppState, PersistedWorkspace};

pub(crate) fn to_persisted_app_state(state: &AppState) -> PersistedAppState {
    PersistedAppState {
        workspaces: state
            .workspaces
            .iter()
            .map(|w| PersistedWorkspace {
                id: w.id.0.clone(),
                name: w.name.clone(),
                folders_ids: w.folder_ids.iter().map(|id| id.0).collect(),
            })
            .collect(),
        current_workspace_id: Some(state.workspaces.current_workspace_id.0.clone()),
        exclude_other_workspaces: Some(state.workspaces.exclude_other_workspaces),
        focus_list: state
            .focus_list
            .keys
            .iter()
            .map(ToString::to_string)
            .collect(),
        focus_list_shown: Some(state.focus_list.last_is_shown),
    }
}
