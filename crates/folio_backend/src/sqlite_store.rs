use crate::kv::{
    ChangeListener, KeyValueStore, Listeners, OriginId, StorageChange, SubscriptionId, notify,
};
use crate::time::now_unix_seconds;
use anyhow::{Context as _, anyhow};
use folio_domain::StorageKey;
use rusqlite::{Connection, OptionalExtension as _, params};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, mpsc};

const LATEST_SCHEMA_VERSION: u32 = 1;

const MIGRATIONS: &[(u32, &str)] = &[(
    1,
    include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/migrations/0001_init.sql"
    )),
)];

/// Settings storage backed by a SQLite file. All access goes through a
/// dedicated worker thread that owns the connection.
#[derive(Clone)]
pub struct SqliteStore {
    tx: mpsc::Sender<DbCommand>,
    listeners: Arc<Mutex<Listeners>>,
    origin: OriginId,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SqliteStoreOptions {
    pub persist_ui_state: bool,
}

impl Default for SqliteStoreOptions {
    fn default() -> Self {
        Self {
            persist_ui_state: true,
        }
    }
}

enum DbCommand {
    GetSetting {
        key: StorageKey,
        reply: mpsc::Sender<anyhow::Result<Option<String>>>,
    },
    SetSetting {
        key: StorageKey,
        value: Option<String>,
        reply: mpsc::Sender<anyhow::Result<bool>>,
    },
}

fn respond_db_open_error(err: &anyhow::Error, cmd: DbCommand) {
    let message = format!("{err:#}");
    match cmd {
        DbCommand::GetSetting { reply, .. } => {
            let _ = reply.send(Err(anyhow!(message)));
        }
        DbCommand::SetSetting { reply, .. } => {
            let _ = reply.send(Err(anyhow!(message)));
        }
    }
}

impl SqliteStore {
    pub fn new(db_path: PathBuf) -> anyhow::Result<Self> {
        Self::new_with_options(db_path, SqliteStoreOptions::default())
    }

    pub fn new_with_options(db_path: PathBuf, options: SqliteStoreOptions) -> anyhow::Result<Self> {
        let (tx, rx) = mpsc::channel::<DbCommand>();

        std::thread::Builder::new()
            .name("folio-sqlite".to_owned())
            .spawn(move || {
                let mut db = SqliteDatabase::open(&db_path, options);
                if let Err(err) = &db {
                    tracing::error!(
                        error = %err,
                        path = %db_path.display(),
                        "failed to open settings db"
                    );
                }
                while let Ok(cmd) = rx.recv() {
                    match (&mut db, cmd) {
                        (Ok(db), DbCommand::GetSetting { key, reply }) => {
                            let _ = reply.send(db.get_setting(&key));
                        }
                        (Ok(db), DbCommand::SetSetting { key, value, reply }) => {
                            let _ = reply.send(db.set_setting(&key, value.as_deref()));
                        }
                        (Err(err), cmd) => {
                            respond_db_open_error(err, cmd);
                        }
                    }
                }
            })
            .context("failed to spawn sqlite worker thread")?;

        Ok(Self {
            tx,
            listeners: Arc::new(Mutex::new(Listeners::default())),
            origin: OriginId::next(),
        })
    }

    pub fn get_setting(&self, key: &StorageKey) -> anyhow::Result<Option<String>> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx
            .send(DbCommand::GetSetting {
                key: key.clone(),
                reply: reply_tx,
            })
            .context("sqlite worker is not running")?;
        reply_rx.recv().context("sqlite worker terminated")?
    }

    /// Returns whether the stored value changed.
    pub fn set_setting(&self, key: &StorageKey, value: Option<String>) -> anyhow::Result<bool> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx
            .send(DbCommand::SetSetting {
                key: key.clone(),
                value,
                reply: reply_tx,
            })
            .context("sqlite worker is not running")?;
        reply_rx.recv().context("sqlite worker terminated")?
    }
}

impl KeyValueStore for SqliteStore {
    fn origin(&self) -> OriginId {
        self.origin
    }

    fn get(&self, key: &StorageKey) -> anyhow::Result<Option<String>> {
        self.get_setting(key)
    }

    fn set(&self, key: &StorageKey, value: Option<String>) -> anyhow::Result<()> {
        if !self.set_setting(key, value)? {
            return Ok(());
        }
        let listeners = self
            .listeners
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .snapshot();
        notify(
            &listeners,
            &StorageChange {
                key: key.clone(),
                origin: self.origin,
            },
        );
        Ok(())
    }

    fn subscribe(&self, listener: ChangeListener) -> SubscriptionId {
        self.listeners
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .add(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .remove(id)
    }
}

struct SqliteDatabase {
    conn: Connection,
    persist_ui_state: bool,
}

impl SqliteDatabase {
    fn open(db_path: &Path, options: SqliteStoreOptions) -> anyhow::Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let mut conn = Connection::open(db_path)
            .with_context(|| format!("failed to open sqlite db {}", db_path.display()))?;

        configure_connection(&mut conn).context("failed to configure sqlite connection")?;
        apply_migrations(&mut conn).context("failed to apply sqlite migrations")?;

        Ok(Self {
            conn,
            persist_ui_state: options.persist_ui_state,
        })
    }

    fn get_setting(&mut self, key: &StorageKey) -> anyhow::Result<Option<String>> {
        if !self.persist_ui_state && key.key.is_ui_state() {
            return Ok(None);
        }
        self.conn
            .query_row(
                "SELECT value FROM settings WHERE namespace = ?1 AND user_id = ?2 AND key = ?3",
                params![key.namespace, user_column(key), key.key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| format!("failed to load setting {key}"))
    }

    fn set_setting(&mut self, key: &StorageKey, value: Option<&str>) -> anyhow::Result<bool> {
        if !self.persist_ui_state && key.key.is_ui_state() {
            return Ok(false);
        }

        let now = now_unix_seconds();
        let user_id = user_column(key);
        let tx = self.conn.transaction()?;
        let previous: Option<String> = tx
            .query_row(
                "SELECT value FROM settings WHERE namespace = ?1 AND user_id = ?2 AND key = ?3",
                params![key.namespace, user_id, key.key.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        if previous.as_deref() == value {
            return Ok(false);
        }

        if let Some(value) = value {
            tx.execute(
                "INSERT INTO settings (namespace, user_id, key, value, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                 ON CONFLICT(namespace, user_id, key) DO UPDATE SET
                   value = excluded.value,
                   updated_at = excluded.updated_at",
                params![key.namespace, user_id, key.key.as_str(), value, now],
            )
            .with_context(|| format!("failed to save setting {key}"))?;
        } else {
            tx.execute(
                "DELETE FROM settings WHERE namespace = ?1 AND user_id = ?2 AND key = ?3",
                params![key.namespace, user_id, key.key.as_str()],
            )
            .with_context(|| format!("failed to delete setting {key}"))?;
        }
        tx.commit()?;
        Ok(true)
    }
}

fn user_column(key: &StorageKey) -> &str {
    key.user_id.as_ref().map(|id| id.as_str()).unwrap_or("")
}

fn configure_connection(conn: &mut Connection) -> anyhow::Result<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA busy_timeout = 5000;",
    )
    .context("failed to apply sqlite PRAGMAs")?;
    Ok(())
}

fn apply_migrations(conn: &mut Connection) -> anyhow::Result<()> {
    let raw_version = conn
        .query_row("PRAGMA user_version", [], |row| row.get::<_, i64>(0))
        .context("failed to read user_version")?;
    let current = u32::try_from(raw_version)
        .with_context(|| format!("invalid sqlite user_version {raw_version}"))?;

    if current > LATEST_SCHEMA_VERSION {
        return Err(anyhow!(
            "sqlite schema version is newer than this build: db={}, app={}",
            current,
            LATEST_SCHEMA_VERSION
        ));
    }

    if current == LATEST_SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn
        .transaction()
        .context("failed to begin migration transaction")?;
    for (version, sql) in MIGRATIONS {
        if *version <= current {
            continue;
        }
        tx.execute_batch(sql)
            .with_context(|| format!("failed to apply migration v{version:04}"))?;
        tx.pragma_update(None, "user_version", *version as i64)
            .context("failed to update user_version")?;
    }
    tx.commit()
        .context("failed to commit migration transaction")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_domain::{SettingKey, UserId};

    fn open_db(path: &Path, options: SqliteStoreOptions) -> SqliteDatabase {
        SqliteDatabase::open(path, options).unwrap()
    }

    fn key(user: Option<&str>, setting: SettingKey) -> StorageKey {
        StorageKey::new("folio", user.map(UserId::new), setting)
    }

    #[test]
    fn migrations_create_schema() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir.path().join("folio.db"), SqliteStoreOptions::default());

        let count: i64 = db
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name = 'settings'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn migrations_reopen_does_not_fail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.db");
        {
            let _db = open_db(&path, SqliteStoreOptions::default());
        }

        let db = open_db(&path, SqliteStoreOptions::default());
        let version: i64 = db
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version as u32, LATEST_SCHEMA_VERSION);
    }

    #[test]
    fn newer_schema_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.pragma_update(None, "user_version", 99i64).unwrap();
        }

        let err = SqliteDatabase::open(&path, SqliteStoreOptions::default())
            .err()
            .expect("newer schema should fail");
        assert!(format!("{err:#}").contains("newer than this build"));
    }

    #[test]
    fn negative_schema_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.pragma_update(None, "user_version", -1i64).unwrap();
        }

        let err = SqliteDatabase::open(&path, SqliteStoreOptions::default())
            .err()
            .expect("negative schema version should fail");
        assert!(format!("{err:#}").contains("invalid sqlite user_version -1"));
    }

    #[test]
    fn settings_upsert_and_delete_per_user() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = open_db(&dir.path().join("folio.db"), SqliteStoreOptions::default());
        let alice = key(Some("1"), SettingKey::FocusList);
        let signed_out = key(None, SettingKey::FocusList);

        assert!(db.set_setting(&alice, Some("[\"a_1\"]")).unwrap());
        assert!(!db.set_setting(&alice, Some("[\"a_1\"]")).unwrap());
        assert!(db.set_setting(&alice, Some("[\"b_2\"]")).unwrap());
        assert!(db.set_setting(&signed_out, Some("[]")).unwrap());

        assert_eq!(
            db.get_setting(&alice).unwrap().as_deref(),
            Some("[\"b_2\"]")
        );
        assert_eq!(db.get_setting(&signed_out).unwrap().as_deref(), Some("[]"));

        assert!(db.set_setting(&alice, None).unwrap());
        assert!(!db.set_setting(&alice, None).unwrap());
        assert_eq!(db.get_setting(&alice).unwrap(), None);
        assert_eq!(db.get_setting(&signed_out).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn ui_state_is_skipped_when_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = open_db(
            &dir.path().join("folio.db"),
            SqliteStoreOptions {
                persist_ui_state: false,
            },
        );
        let shown = key(Some("1"), SettingKey::FocusListShown);
        let list = key(Some("1"), SettingKey::FocusList);

        assert!(!db.set_setting(&shown, Some("true")).unwrap());
        assert_eq!(db.get_setting(&shown).unwrap(), None);
        assert!(db.set_setting(&list, Some("[]")).unwrap());
    }

    #[test]
    fn store_round_trips_through_worker_and_notifies_changes() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::new(dir.path().join("nested").join("folio.db")).unwrap();
        let hits = Arc::new(Mutex::new(Vec::new()));
        let sink = hits.clone();
        store.subscribe(Arc::new(move |change: &StorageChange| {
            sink.lock().unwrap().push(change.key.clone());
        }));

        let k = key(Some("1"), SettingKey::CurrentWorkspaceId);
        store.set(&k, Some("\"5\"".to_owned())).unwrap();
        store.set(&k, Some("\"5\"".to_owned())).unwrap();

        assert_eq!(store.get(&k).unwrap().as_deref(), Some("\"5\""));
        assert_eq!(*hits.lock().unwrap(), vec![k]);
    }

    #[test]
    fn open_failure_is_reported_per_command() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        let store = SqliteStore::new(blocker.join("folio.db")).unwrap();
        let err = store
            .get(&key(None, SettingKey::Workspaces))
            .expect_err("open should have failed");
        assert!(format!("{err:#}").contains("failed to create"));
    }
}
