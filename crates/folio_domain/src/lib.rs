mod actions;
pub use actions::Action;
mod effects;
pub use effects::Effect;
mod editor;
pub use editor::{WorkspaceDraft, WorkspaceDraftError};
mod drag;
pub use drag::FocusListDrag;
mod storage_key;
pub use storage_key::{DEFAULT_STORAGE_NAMESPACE, SettingKey, StorageKey};
pub mod paths;
pub mod selectors;
pub mod unread;
pub use unread::{
    DEFAULT_BADGE_MAX, FolderUnreadIndex, UnreadCountMemo, compute_workspace_unread_count,
    format_unread_badge,
};

mod persistence;
mod state;
pub use state::*;

mod reducer;
mod time;
