use crate::UserId;
use std::fmt;

pub const DEFAULT_STORAGE_NAMESPACE: &str = "folio";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SettingKey {
    Workspaces,
    CurrentWorkspaceId,
    ExcludeOtherWorkspaces,
    FocusList,
    FocusListShown,
}

impl SettingKey {
    pub const ALL: [SettingKey; 5] = [
        SettingKey::Workspaces,
        SettingKey::CurrentWorkspaceId,
        SettingKey::ExcludeOtherWorkspaces,
        SettingKey::FocusList,
        SettingKey::FocusListShown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Workspaces => "workspaces",
            Self::CurrentWorkspaceId => "current_workspace_id",
            Self::ExcludeOtherWorkspaces => "exclude_other_workspaces",
            Self::FocusList => "focus_list",
            Self::FocusListShown => "focus_list_shown",
        }
    }

    /// Session-local UI keys, skipped when UI persistence is turned off.
    pub fn is_ui_state(self) -> bool {
        matches!(self, Self::FocusListShown)
    }
}

/// Storage location of one setting, scoped to a namespace and, when signed in,
/// to a user.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct StorageKey {
    pub namespace: String,
    pub user_id: Option<UserId>,
    pub key: SettingKey,
}

impl StorageKey {
    pub fn new(namespace: impl Into<String>, user_id: Option<UserId>, key: SettingKey) -> Self {
        Self {
            namespace: namespace.into(),
            user_id,
            key,
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.user_id {
            Some(user_id) => write!(f, "{}/{}/{}", self.namespace, user_id, self.key.as_str()),
            None => write!(f, "{}/{}", self.namespace, self.key.as_str()),
        }
    }
}
