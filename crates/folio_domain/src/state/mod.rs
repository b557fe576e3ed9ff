mod app;
mod focus_list;
mod ids;
mod persisted;
mod workspace;

pub use app::AppState;
pub use focus_list::FocusList;
pub use ids::{ChatId, FocusKey, FolderId, MessageId, UserId, WorkspaceId};
pub use persisted::{PersistedAppState, PersistedWorkspace};
pub use workspace::{EVERYTHING_WORKSPACE_NAME, Workspace, WorkspaceCollection, WorkspaceEditor};

pub(crate) const MAX_WORKSPACE_NAME_LEN: usize = 128;
