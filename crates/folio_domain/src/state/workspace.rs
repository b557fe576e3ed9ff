use super::{FolderId, MAX_WORKSPACE_NAME_LEN, WorkspaceId};
use std::collections::HashMap;

pub const EVERYTHING_WORKSPACE_NAME: &str = "Everything";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    pub folder_ids: Vec<FolderId>,
}

impl Workspace {
    pub fn new(id: WorkspaceId, name: impl Into<String>, folder_ids: Vec<FolderId>) -> Self {
        Self {
            id,
            name: name.into(),
            folder_ids,
        }
    }

    /// The implicit workspace that applies no folder filter.
    pub fn everything() -> Self {
        Self {
            id: WorkspaceId::everything(),
            name: EVERYTHING_WORKSPACE_NAME.to_owned(),
            folder_ids: Vec::new(),
        }
    }

    pub fn is_everything(&self) -> bool {
        self.id.is_everything()
    }

    pub fn contains_folder(&self, folder_id: FolderId) -> bool {
        self.folder_ids.contains(&folder_id)
    }

    /// Non-empty, already trimmed, and at most 128 bytes. Stored names always
    /// satisfy this, so loading never rewrites them.
    pub fn has_valid_name(&self) -> bool {
        !self.name.is_empty()
            && self.name.trim() == self.name
            && self.name.len() <= MAX_WORKSPACE_NAME_LEN
    }

    fn dedup_folders(&mut self) {
        let mut seen = Vec::with_capacity(self.folder_ids.len());
        self.folder_ids.retain(|id| {
            if seen.contains(id) {
                return false;
            }
            seen.push(*id);
            true
        });
    }
}

/// User-defined workspaces plus the selection pointer.
///
/// The sentinel id never appears in `by_id` or `order`, and both always hold the
/// same set of ids.
#[derive(Clone, Debug)]
pub struct WorkspaceCollection {
    pub(crate) by_id: HashMap<WorkspaceId, Workspace>,
    pub(crate) order: Vec<WorkspaceId>,
    pub(crate) current_workspace_id: WorkspaceId,
    pub(crate) exclude_other_workspaces: bool,
    pub(crate) revision: u64,
}

impl Default for WorkspaceCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkspaceCollection {
    pub fn new() -> Self {
        Self {
            by_id: HashMap::new(),
            order: Vec::new(),
            current_workspace_id: WorkspaceId::everything(),
            exclude_other_workspaces: false,
            revision: 0,
        }
    }

    pub fn get(&self, workspace_id: &WorkspaceId) -> Option<&Workspace> {
        self.by_id.get(workspace_id)
    }

    pub fn contains(&self, workspace_id: &WorkspaceId) -> bool {
        self.by_id.contains_key(workspace_id)
    }

    /// User-defined workspaces in display order. Never yields the sentinel.
    pub fn iter(&self) -> impl Iterator<Item = &Workspace> + '_ {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    pub fn ids(&self) -> &[WorkspaceId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn current_workspace_id(&self) -> &WorkspaceId {
        &self.current_workspace_id
    }

    pub fn exclude_other_workspaces(&self) -> bool {
        self.exclude_other_workspaces
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn insert(&mut self, mut workspace: Workspace) -> bool {
        if workspace.is_everything()
            || !workspace.has_valid_name()
            || self.by_id.contains_key(&workspace.id)
        {
            return false;
        }
        workspace.dedup_folders();
        self.order.push(workspace.id.clone());
        self.by_id.insert(workspace.id.clone(), workspace);
        self.bump();
        true
    }

    pub(crate) fn replace(&mut self, mut workspace: Workspace) -> bool {
        if !workspace.has_valid_name() {
            return false;
        }
        let Some(existing) = self.by_id.get_mut(&workspace.id) else {
            return false;
        };
        workspace.dedup_folders();
        if *existing == workspace {
            return false;
        }
        *existing = workspace;
        self.bump();
        true
    }

    pub(crate) fn remove(&mut self, workspace_id: &WorkspaceId) -> Option<Workspace> {
        let removed = self.by_id.remove(workspace_id)?;
        self.order.retain(|id| id != workspace_id);
        self.bump();
        Some(removed)
    }

    pub(crate) fn set_exclude_other_workspaces(&mut self, exclude: bool) -> bool {
        if self.exclude_other_workspaces == exclude {
            return false;
        }
        self.exclude_other_workspaces = exclude;
        self.bump();
        true
    }

    pub(crate) fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WorkspaceEditor {
    pub is_open: bool,
    pub editing_workspace_id: Option<WorkspaceId>,
}
