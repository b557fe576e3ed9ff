use crate::kv::KeyValueStore;
use anyhow::Context as _;
use folio_domain::{
    AppState, Effect, PersistedAppState, PersistedWorkspace, SettingKey, StorageKey, UserId,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Maps persisted app state onto per-user settings keys. Every key is decoded
/// on its own, so one malformed value only resets that setting.
#[derive(Clone)]
pub struct SettingsRepository {
    kv: Arc<dyn KeyValueStore>,
    namespace: String,
}

impl SettingsRepository {
    pub fn new(kv: Arc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self {
            kv,
            namespace: namespace.into(),
        }
    }

    pub fn storage_key(&self, user_id: Option<&UserId>, key: SettingKey) -> StorageKey {
        StorageKey::new(self.namespace.clone(), user_id.cloned(), key)
    }

    /// Whether `key` is one of the settings of `user_id` in this namespace.
    pub fn owns(&self, user_id: Option<&UserId>, key: &StorageKey) -> bool {
        key.namespace == self.namespace && key.user_id.as_ref() == user_id
    }

    pub fn load(&self, user_id: Option<&UserId>) -> anyhow::Result<PersistedAppState> {
        let workspaces_key = self.storage_key(user_id, SettingKey::Workspaces);
        let workspaces = self
            .read::<Vec<serde_json::Value>>(&workspaces_key)?
            .unwrap_or_default()
            .into_iter()
            .filter_map(|value| {
                serde_json::from_value::<PersistedWorkspace>(value)
                    .inspect_err(|err| {
                        tracing::warn!(
                            key = %workspaces_key,
                            error = %err,
                            "dropping malformed workspace"
                        );
                    })
                    .ok()
            })
            .collect();

        let focus_list = self
            .read::<Vec<serde_json::Value>>(&self.storage_key(user_id, SettingKey::FocusList))?
            .unwrap_or_default()
            .into_iter()
            .filter_map(|value| match value {
                serde_json::Value::String(raw) => Some(raw),
                _ => None,
            })
            .collect();

        Ok(PersistedAppState {
            workspaces,
            current_workspace_id: self
                .read(&self.storage_key(user_id, SettingKey::CurrentWorkspaceId))?,
            exclude_other_workspaces: self
                .read(&self.storage_key(user_id, SettingKey::ExcludeOtherWorkspaces))?,
            focus_list,
            focus_list_shown: self.read(&self.storage_key(user_id, SettingKey::FocusListShown))?,
        })
    }

    /// Writes the setting that `effect` names. Effects that are not writes are
    /// ignored.
    pub fn save(&self, state: &AppState, effect: &Effect) -> anyhow::Result<()> {
        let user_id = state.user_id.as_ref();
        let persisted = state.to_persisted();
        let (key, value) = match effect {
            Effect::LoadAppState => return Ok(()),
            Effect::SaveWorkspaces => (
                SettingKey::Workspaces,
                serde_json::to_string(&persisted.workspaces),
            ),
            Effect::SaveCurrentWorkspace => (
                SettingKey::CurrentWorkspaceId,
                serde_json::to_string(&persisted.current_workspace_id),
            ),
            Effect::SaveExcludeOtherWorkspaces => (
                SettingKey::ExcludeOtherWorkspaces,
                serde_json::to_string(&persisted.exclude_other_workspaces),
            ),
            Effect::SaveFocusList => (
                SettingKey::FocusList,
                serde_json::to_string(&persisted.focus_list),
            ),
            Effect::SaveFocusListShown => (
                SettingKey::FocusListShown,
                serde_json::to_string(&persisted.focus_list_shown),
            ),
        };

        let key = self.storage_key(user_id, key);
        let value = value.with_context(|| format!("failed to encode setting {key}"))?;
        self.kv
            .set(&key, Some(value))
            .with_context(|| format!("failed to save setting {key}"))
    }

    fn read<T: DeserializeOwned>(&self, key: &StorageKey) -> anyhow::Result<Option<T>> {
        let Some(raw) = self
            .kv
            .get(key)
            .with_context(|| format!("failed to read setting {key}"))?
        else {
            return Ok(None);
        };
        match serde_json::from_str::<T>(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "malformed setting, using default");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::MemoryKeyValueStore;
    use folio_domain::{Action, ChatId, FolderId, MessageId, Workspace, WorkspaceId};

    fn repository() -> (MemoryKeyValueStore, SettingsRepository) {
        let kv = MemoryKeyValueStore::new();
        let repo = SettingsRepository::new(Arc::new(kv.clone()), "folio");
        (kv, repo)
    }

    fn signed_in(user: &str) -> AppState {
        let mut state = AppState::new();
        state.apply(Action::UserChanged {
            user_id: Some(UserId::new(user)),
        });
        state
    }

    fn raw(kv: &MemoryKeyValueStore, user: &str, key: SettingKey) -> Option<String> {
        kv.get(&StorageKey::new("folio", Some(UserId::new(user)), key))
            .unwrap()
    }

    #[test]
    fn saves_use_the_stored_json_shapes() {
        let (kv, repo) = repository();
        let mut state = signed_in("7");
        state.apply(Action::CreateWorkspace {
            workspace: Workspace::new(
                WorkspaceId::new("5"),
                "Work",
                vec![FolderId::from_i32(2), FolderId::from_i32(3)],
            ),
        });
        state.apply(Action::SetCurrentWorkspace {
            workspace_id: WorkspaceId::new("5"),
        });
        state.apply(Action::SetExcludeOtherWorkspaces { exclude: true });
        state.apply(Action::AddToFocusList {
            chat_id: ChatId::new("-100"),
            message_id: MessageId::from_i64(42),
        });

        for effect in [
            Effect::SaveWorkspaces,
            Effect::SaveCurrentWorkspace,
            Effect::SaveExcludeOtherWorkspaces,
            Effect::SaveFocusList,
            Effect::SaveFocusListShown,
        ] {
            repo.save(&state, &effect).unwrap();
        }

        assert_eq!(
            raw(&kv, "7", SettingKey::Workspaces).as_deref(),
            Some(r#"[{"id":"5","name":"Work","foldersIds":[2,3]}]"#)
        );
        assert_eq!(
            raw(&kv, "7", SettingKey::CurrentWorkspaceId).as_deref(),
            Some(r#""5""#)
        );
        assert_eq!(
            raw(&kv, "7", SettingKey::ExcludeOtherWorkspaces).as_deref(),
            Some("true")
        );
        assert_eq!(
            raw(&kv, "7", SettingKey::FocusList).as_deref(),
            Some(r#"["-100_42"]"#)
        );
        assert_eq!(
            raw(&kv, "7", SettingKey::FocusListShown).as_deref(),
            Some("false")
        );
    }

    #[test]
    fn malformed_values_fall_back_per_key() {
        let (kv, repo) = repository();
        let user = UserId::new("7");
        let put = |key: SettingKey, value: &str| {
            kv.set(&repo.storage_key(Some(&user), key), Some(value.to_owned()))
                .unwrap();
        };
        put(
            SettingKey::Workspaces,
            r#"[{"id":"1","name":"A","foldersIds":[1]},{"id":"3"},"junk",{"name":"no id"}]"#,
        );
        put(SettingKey::CurrentWorkspaceId, "{not json");
        put(SettingKey::ExcludeOtherWorkspaces, "\"yes\"");
        put(SettingKey::FocusList, r#"["a_1", 5, null, "b_2"]"#);
        put(SettingKey::FocusListShown, "true");

        let loaded = repo.load(Some(&user)).unwrap();
        let ids: Vec<&str> = loaded.workspaces.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(loaded.current_workspace_id, None);
        assert_eq!(loaded.exclude_other_workspaces, None);
        assert_eq!(loaded.focus_list, vec!["a_1", "b_2"]);
        assert_eq!(loaded.focus_list_shown, Some(true));
    }

    #[test]
    fn whole_value_of_wrong_type_loads_as_empty() {
        let (kv, repo) = repository();
        let user = UserId::new("7");
        kv.set(
            &repo.storage_key(Some(&user), SettingKey::Workspaces),
            Some("{\"id\":\"1\"}".to_owned()),
        )
        .unwrap();

        let loaded = repo.load(Some(&user)).unwrap();
        assert!(loaded.workspaces.is_empty());
    }

    #[test]
    fn users_do_not_see_each_others_settings() {
        let (_kv, repo) = repository();
        let mut alice = signed_in("1");
        alice.apply(Action::AddToFocusList {
            chat_id: ChatId::new("a"),
            message_id: MessageId::from_i64(1),
        });
        repo.save(&alice, &Effect::SaveFocusList).unwrap();

        let bob = UserId::new("2");
        assert!(repo.load(Some(&bob)).unwrap().focus_list.is_empty());
        assert_eq!(
            repo.load(Some(&UserId::new("1"))).unwrap().focus_list,
            vec!["a_1"]
        );
        assert!(repo.load(None).unwrap().focus_list.is_empty());
    }

    #[test]
    fn owns_matches_namespace_and_user() {
        let (_kv, repo) = repository();
        let user = UserId::new("1");
        let own = repo.storage_key(Some(&user), SettingKey::FocusList);
        assert!(repo.owns(Some(&user), &own));
        assert!(!repo.owns(None, &own));
        assert!(!repo.owns(
            Some(&user),
            &StorageKey::new("other", Some(user.clone()), SettingKey::FocusList)
        ));
    }
}
