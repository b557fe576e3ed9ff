use super::{FocusList, UserId, WorkspaceCollection, WorkspaceEditor};

#[derive(Clone, Debug)]
pub struct AppState {
    pub(crate) last_issued_workspace_id: u64,

    pub workspaces: WorkspaceCollection,
    pub workspace_editor: WorkspaceEditor,
    pub focus_list: FocusList,
    /// Index of the active chat folder tab in the chat list.
    pub active_chat_folder: usize,
    pub user_id: Option<UserId>,
    pub last_error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            last_issued_workspace_id: 0,
            workspaces: WorkspaceCollection::new(),
            workspace_editor: WorkspaceEditor::default(),
            focus_list: FocusList::new(),
            active_chat_folder: 0,
            user_id: None,
            last_error: None,
        }
    }
}
