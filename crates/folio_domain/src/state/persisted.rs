/// Workspace as stored by the key/value layer. Field names follow the JSON
/// shape existing clients already wrote.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PersistedWorkspace {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "foldersIds", default)]
    pub folders_ids: Vec<i32>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PersistedAppState {
    pub workspaces: Vec<PersistedWorkspace>,
    pub current_workspace_id: Option<String>,
    pub exclude_other_workspaces: Option<bool>,
    pub focus_list: Vec<String>,
    pub focus_list_shown: Option<bool>,
}
