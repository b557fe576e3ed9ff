use folio_backend::{
    Engine, EngineOptions, KeyValueStore, MemoryKeyValueStore, SqliteStore, SqliteStoreOptions,
};
use folio_domain::selectors::{current_workspace, list_workspaces};
use folio_domain::{
    Action, ChatId, FolderId, MessageId, SettingKey, StorageKey, UserId, Workspace, WorkspaceId,
    paths,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn workspace(id: &str, name: &str, folders: &[i32]) -> Workspace {
    Workspace::new(
        WorkspaceId::new(id),
        name,
        folders.iter().copied().map(FolderId::from_i32).collect(),
    )
}

fn sign_in(engine: &mut Engine, user: &str) {
    engine.dispatch(Action::UserChanged {
        user_id: Some(UserId::new(user)),
    });
}

#[test]
fn sqlite_round_trip_restores_everything_persisted() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let db_path = paths::sqlite_path(dir.path());

    {
        let kv = SqliteStore::new(db_path.clone()).unwrap();
        let mut engine = Engine::start(Arc::new(kv), EngineOptions::default());
        sign_in(&mut engine, "42");
        engine.dispatch(Action::CreateWorkspace {
            workspace: workspace("100", "Work", &[1, 2]),
        });
        engine.dispatch(Action::CreateWorkspace {
            workspace: workspace("200", "Family", &[3]),
        });
        engine.dispatch(Action::SetCurrentWorkspace {
            workspace_id: WorkspaceId::new("200"),
        });
        engine.dispatch(Action::SetExcludeOtherWorkspaces { exclude: true });
        for (chat, message) in [("c", 3), ("a", 1)] {
            engine.dispatch(Action::AddToFocusList {
                chat_id: ChatId::new(chat),
                message_id: MessageId::from_i64(message),
            });
        }
        engine.dispatch(Action::ToggleFocusList { force: Some(true) });
    }

    let kv = SqliteStore::new(db_path).unwrap();
    let mut engine = Engine::start(Arc::new(kv), EngineOptions::default());
    sign_in(&mut engine, "42");
    let state = engine.snapshot();

    let listed: Vec<String> = list_workspaces(&state)
        .iter()
        .map(|w| w.id.to_string())
        .collect();
    assert_eq!(listed, vec!["0", "100", "200"]);
    assert_eq!(current_workspace(&state).name, "Family");
    assert!(state.workspaces.exclude_other_workspaces());
    let keys: Vec<String> = state
        .focus_list
        .keys()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(keys, vec!["c_3", "a_1"]);
    assert!(state.focus_list.is_shown);
}

#[test]
fn focus_panel_visibility_is_not_restored_when_ui_state_is_off() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let db_path = paths::sqlite_path(dir.path());
    let options = SqliteStoreOptions {
        persist_ui_state: false,
    };

    {
        let kv = SqliteStore::new_with_options(db_path.clone(), options).unwrap();
        let mut engine = Engine::start(Arc::new(kv), EngineOptions::default());
        sign_in(&mut engine, "42");
        engine.dispatch(Action::ToggleFocusList { force: Some(true) });
    }

    let kv = SqliteStore::new_with_options(db_path, options).unwrap();
    let mut engine = Engine::start(Arc::new(kv), EngineOptions::default());
    sign_in(&mut engine, "42");
    assert!(!engine.snapshot().focus_list.is_shown);
}

#[test]
fn malformed_settings_load_as_defaults() {
    init_tracing();
    let kv = MemoryKeyValueStore::new();
    let user = Some(UserId::new("42"));
    for (key, raw) in [
        (SettingKey::Workspaces, "not json at all"),
        (SettingKey::CurrentWorkspaceId, "17"),
        (SettingKey::ExcludeOtherWorkspaces, "[true]"),
        (SettingKey::FocusList, r#"["a_1","broken","","b_x","c_3","a_1"]"#),
    ] {
        kv.set(
            &StorageKey::new("folio", user.clone(), key),
            Some(raw.to_owned()),
        )
        .unwrap();
    }

    let mut engine = Engine::start(Arc::new(kv), EngineOptions::default());
    sign_in(&mut engine, "42");
    let state = engine.snapshot();

    assert!(state.workspaces.is_empty());
    assert!(current_workspace(&state).is_everything());
    assert!(!state.workspaces.exclude_other_workspaces());
    let keys: Vec<String> = state
        .focus_list
        .keys()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(keys, vec!["a_1", "c_3"]);
}

#[test]
fn switching_users_swaps_the_whole_persisted_slice() {
    init_tracing();
    let kv = MemoryKeyValueStore::new();
    let mut engine = Engine::start(Arc::new(kv), EngineOptions::default());

    sign_in(&mut engine, "1");
    engine.dispatch(Action::CreateWorkspace {
        workspace: workspace("100", "Alice", &[1]),
    });

    sign_in(&mut engine, "2");
    assert!(engine.snapshot().workspaces.is_empty());
    engine.dispatch(Action::CreateWorkspace {
        workspace: workspace("300", "Bob", &[2]),
    });

    sign_in(&mut engine, "1");
    let state = engine.snapshot();
    let names: Vec<&str> = state.workspaces.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["Alice"]);
}

#[test]
fn namespaces_keep_settings_apart() {
    init_tracing();
    let kv = MemoryKeyValueStore::new();
    let mut first = Engine::start(
        Arc::new(kv.clone()),
        EngineOptions {
            namespace: "folio-a".to_owned(),
        },
    );
    sign_in(&mut first, "1");
    first.dispatch(Action::SetExcludeOtherWorkspaces { exclude: true });

    let mut second = Engine::start(
        Arc::new(kv.connect()),
        EngineOptions {
            namespace: "folio-b".to_owned(),
        },
    );
    sign_in(&mut second, "1");
    assert!(!second.snapshot().workspaces.exclude_other_workspaces());
    assert!(!second.sync_storage_changes());
}
