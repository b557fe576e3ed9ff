use crate::{
    ChatId, FocusKey, MessageId, PersistedAppState, UserId, Workspace, WorkspaceDraft,
    WorkspaceId,
};

#[derive(Clone, Debug)]
pub enum Action {
    AppStarted,
    UserChanged {
        user_id: Option<UserId>,
    },
    AppStateLoaded {
        persisted: Box<PersistedAppState>,
    },
    /// Another session wrote to the shared settings.
    PersistedStateChanged {
        persisted: Box<PersistedAppState>,
    },

    CreateWorkspace {
        workspace: Workspace,
    },
    UpdateWorkspace {
        workspace: Workspace,
    },
    DeleteWorkspace {
        workspace_id: WorkspaceId,
    },
    SetCurrentWorkspace {
        workspace_id: WorkspaceId,
    },
    SetExcludeOtherWorkspaces {
        exclude: bool,
    },

    OpenWorkspaceCreator,
    OpenWorkspaceEditor {
        workspace_id: WorkspaceId,
    },
    CloseWorkspaceCreator,
    SubmitWorkspaceDraft {
        draft: WorkspaceDraft,
    },

    SetActiveChatFolder {
        index: usize,
    },

    AddToFocusList {
        chat_id: ChatId,
        message_id: MessageId,
    },
    RemoveFromFocusList {
        chat_id: ChatId,
        message_id: MessageId,
    },
    ReplaceFocusList {
        keys: Vec<FocusKey>,
    },
    PruneFocusList {
        missing: Vec<FocusKey>,
    },
    ToggleFocusList {
        force: Option<bool>,
    },

    ClearError,
}
