#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Effect {
    LoadAppState,

    SaveWorkspaces,
    SaveCurrentWorkspace,
    SaveExcludeOtherWorkspaces,
    SaveFocusList,
    SaveFocusListShown,
}
