use notesync_core::db::migrations::latest_version;
use notesync_core::db::{open_db, open_db_in_memory, DbError};
use notesync_core::{NoteDbClient, SqliteNoteDbClient, User, UserKey};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in ["users", "categories", "notes"] {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_user_is_absent() {
    let client = SqliteNoteDbClient::in_memory().unwrap();
    assert!(client.get_user(&UserKey::new("ghost")).unwrap().is_none());
}

#[test]
fn mutations_create_rows_lazily_and_keep_note_order() {
    let client = SqliteNoteDbClient::in_memory().unwrap();
    let alice = UserKey::new("alice");
    let groceries = alice.category("groceries");

    client.add_note(&groceries, "milk").unwrap();
    client.add_note(&groceries, "eggs").unwrap();
    client.add_note(&groceries, "milk").unwrap();
    client.create_category(&alice.category("work")).unwrap();
    client.remove_note(&groceries, "milk").unwrap();
    client.remove_note(&groceries, "absent").unwrap();

    let user = client.get_user(&alice).unwrap().unwrap();
    assert_eq!(user.category_names(), vec!["groceries", "work"]);
    assert_eq!(
        user.category("groceries").unwrap().notes(),
        ["eggs".to_string(), "milk".to_string()]
    );
    assert!(user.category("work").unwrap().is_empty());
}

#[test]
fn put_user_replaces_previous_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.db");

    {
        let client = SqliteNoteDbClient::open_path(&path).unwrap();
        client
            .add_note(&UserKey::new("alice").category("stale"), "old")
            .unwrap();

        let mut fresh = User::new("alice");
        let work = fresh.create_category("work").unwrap();
        work.add_note("b");
        work.add_note("a");
        client.put_user(&fresh).unwrap();
    }

    let reopened = SqliteNoteDbClient::open_path(&path).unwrap();
    let user = reopened.get_user(&UserKey::new("alice")).unwrap().unwrap();
    assert_eq!(user.category_names(), vec!["work"]);
    assert_eq!(
        user.category("work").unwrap().notes(),
        ["b".to_string(), "a".to_string()]
    );
}

#[test]
fn users_do_not_share_categories() {
    let client = SqliteNoteDbClient::in_memory().unwrap();
    client
        .add_note(&UserKey::new("alice").category("work"), "alice note")
        .unwrap();
    client
        .add_note(&UserKey::new("bob").category("work"), "bob note")
        .unwrap();

    let bob = client.get_user(&UserKey::new("bob")).unwrap().unwrap();
    assert_eq!(
        bob.category("work").unwrap().notes(),
        ["bob note".to_string()]
    );
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
