use crate::{WorkspaceCollection, WorkspaceId};

/// Picks a time-based id strictly greater than the last issued one and not
/// already present in `collection`.
pub(super) fn next_workspace_id(
    collection: &WorkspaceCollection,
    last_issued: u64,
    now_unix_ms: u64,
) -> (WorkspaceId, u64) {
    let mut candidate = now_unix_ms.max(last_issued.saturating_add(1)).max(1);
    loop {
        let id = WorkspaceId(candidate.to_string());
        if !id.is_everything() && !collection.contains(&id) {
            return (id, candidate);
        }
        candidate = candidate.saturating_add(1);
    }
}
