use crate::persistence;
use crate::time::now_unix_ms;
use crate::{
    Action, AppState, Effect, FocusKey, PersistedAppState, WorkspaceDraft, WorkspaceEditor,
    WorkspaceId,
};

mod fresh_id;

impl AppState {
    pub fn apply(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::AppStarted => vec![Effect::LoadAppState],
            Action::UserChanged { user_id } => {
                if self.user_id == user_id {
                    return Vec::new();
                }
                self.user_id = user_id;
                vec![Effect::LoadAppState]
            }
            Action::AppStateLoaded { persisted } => {
                persistence::apply_persisted_app_state(self, *persisted, true)
            }
            Action::PersistedStateChanged { persisted } => {
                persistence::apply_persisted_app_state(self, *persisted, false)
            }

            Action::CreateWorkspace { workspace } => {
                if self.workspaces.insert(workspace) {
                    vec![Effect::SaveWorkspaces]
                } else {
                    Vec::new()
                }
            }
            Action::UpdateWorkspace { workspace } => {
                if self.workspaces.replace(workspace) {
                    vec![Effect::SaveWorkspaces]
                } else {
                    Vec::new()
                }
            }
            Action::DeleteWorkspace { workspace_id } => self.delete_workspace(&workspace_id),
            Action::SetCurrentWorkspace { workspace_id } => {
                self.workspaces.current_workspace_id = workspace_id;
                self.workspaces.bump();
                self.active_chat_folder = 0;
                vec![Effect::SaveCurrentWorkspace]
            }
            Action::SetExcludeOtherWorkspaces { exclude } => {
                if self.workspaces.set_exclude_other_workspaces(exclude) {
                    vec![Effect::SaveExcludeOtherWorkspaces]
                } else {
                    Vec::new()
                }
            }

            Action::OpenWorkspaceCreator => {
                self.workspace_editor = WorkspaceEditor {
                    is_open: true,
                    editing_workspace_id: None,
                };
                Vec::new()
            }
            Action::OpenWorkspaceEditor { workspace_id } => {
                if workspace_id.is_everything() || !self.workspaces.contains(&workspace_id) {
                    return Vec::new();
                }
                self.workspace_editor = WorkspaceEditor {
                    is_open: true,
                    editing_workspace_id: Some(workspace_id),
                };
                Vec::new()
            }
            Action::CloseWorkspaceCreator => {
                self.workspace_editor = WorkspaceEditor::default();
                Vec::new()
            }
            Action::SubmitWorkspaceDraft { draft } => self.submit_workspace_draft(draft),

            Action::SetActiveChatFolder { index } => {
                self.active_chat_folder = index;
                Vec::new()
            }

            Action::AddToFocusList {
                chat_id,
                message_id,
            } => {
                if self.focus_list.add(FocusKey::new(chat_id, message_id)) {
                    vec![Effect::SaveFocusList]
                } else {
                    Vec::new()
                }
            }
            Action::RemoveFromFocusList {
                chat_id,
                message_id,
            } => {
                if self.focus_list.remove(&FocusKey::new(chat_id, message_id)) {
                    vec![Effect::SaveFocusList]
                } else {
                    Vec::new()
                }
            }
            Action::ReplaceFocusList { keys } => {
                if self.focus_list.replace(keys) {
                    vec![Effect::SaveFocusList]
                } else {
                    Vec::new()
                }
            }
            Action::PruneFocusList { missing } => {
                let mut changed = false;
                for key in &missing {
                    changed |= self.focus_list.remove(key);
                }
                if changed {
                    vec![Effect::SaveFocusList]
                } else {
                    Vec::new()
                }
            }
            Action::ToggleFocusList { force } => {
                let shown = force.unwrap_or(!self.focus_list.is_shown);
                self.focus_list.set_shown(shown);
                vec![Effect::SaveFocusListShown]
            }

            Action::ClearError => {
                self.last_error = None;
                Vec::new()
            }
        }
    }

    pub fn to_persisted(&self) -> PersistedAppState {
        persistence::to_persisted_app_state(self)
    }

    /// Issues a fresh workspace id derived from `now_unix_ms`.
    pub fn next_workspace_id(&mut self, now_unix_ms: u64) -> WorkspaceId {
        let (id, issued) = fresh_id::next_workspace_id(
            &self.workspaces,
            self.last_issued_workspace_id,
            now_unix_ms,
        );
        self.last_issued_workspace_id = issued;
        id
    }

    fn delete_workspace(&mut self, workspace_id: &WorkspaceId) -> Vec<Effect> {
        if self.workspaces.remove(workspace_id).is_none() {
            return Vec::new();
        }

        if self.workspace_editor.editing_workspace_id.as_ref() == Some(workspace_id) {
            self.workspace_editor = WorkspaceEditor::default();
        }

        let mut effects = vec![Effect::SaveWorkspaces];
        if self.workspaces.current_workspace_id == *workspace_id {
            self.workspaces.current_workspace_id = WorkspaceId::everything();
            self.active_chat_folder = 0;
            effects.push(Effect::SaveCurrentWorkspace);
        }
        effects
    }

    fn submit_workspace_draft(&mut self, draft: WorkspaceDraft) -> Vec<Effect> {
        if let Err(err) = draft.validate() {
            self.last_error = Some(err.to_string());
            return Vec::new();
        }

        let editing = self.workspace_editor.editing_workspace_id.clone();
        let mut effects = Vec::new();
        match editing {
            Some(workspace_id) => {
                let Ok(workspace) = draft.into_workspace(workspace_id) else {
                    return Vec::new();
                };
                effects.extend(self.apply(Action::UpdateWorkspace { workspace }));
            }
            None => {
                let workspace_id = self.next_workspace_id(now_unix_ms());
                let Ok(workspace) = draft.into_workspace(workspace_id.clone()) else {
                    return Vec::new();
                };
                effects.extend(self.apply(Action::CreateWorkspace { workspace }));
                effects.extend(self.apply(Action::SetCurrentWorkspace { workspace_id }));
            }
        }

        self.workspace_editor = WorkspaceEditor::default();
        self.last_error = None;
        effects
    }
}
