use crate::{FolderId, Workspace, WorkspaceId};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WorkspaceDraftError {
    EmptyName,
    NameTooLong,
    NoFolders,
}

impl std::fmt::Display for WorkspaceDraftError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkspaceDraftError::EmptyName => write!(f, "workspace name is empty"),
            WorkspaceDraftError::NameTooLong => write!(f, "workspace name is too long"),
            WorkspaceDraftError::NoFolders => write!(f, "workspace has no folders selected"),
        }
    }
}

impl std::error::Error for WorkspaceDraftError {}

/// Form state behind the workspace creator/editor.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WorkspaceDraft {
    pub name: String,
    pub folder_ids: Vec<FolderId>,
}

impl WorkspaceDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_workspace(workspace: &Workspace) -> Self {
        Self {
            name: workspace.name.clone(),
            folder_ids: workspace.folder_ids.clone(),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn toggle_folder(&mut self, folder_id: FolderId) {
        if let Some(idx) = self.folder_ids.iter().position(|id| *id == folder_id) {
            self.folder_ids.remove(idx);
        } else {
            self.folder_ids.push(folder_id);
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn validate(&self) -> Result<(), WorkspaceDraftError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(WorkspaceDraftError::EmptyName);
        }
        if name.len() > crate::state::MAX_WORKSPACE_NAME_LEN {
            return Err(WorkspaceDraftError::NameTooLong);
        }
        if self.folder_ids.is_empty() {
            return Err(WorkspaceDraftError::NoFolders);
        }
        Ok(())
    }

    pub fn into_workspace(self, id: WorkspaceId) -> Result<Workspace, WorkspaceDraftError> {
        self.validate()?;
        let mut folder_ids = Vec::with_capacity(self.folder_ids.len());
        for folder_id in self.folder_ids {
            if !folder_ids.contains(&folder_id) {
                folder_ids.push(folder_id);
            }
        }
        Ok(Workspace::new(id, self.name.trim(), folder_ids))
    }
}
