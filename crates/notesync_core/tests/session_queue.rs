use notesync_core::db::DbError;
use notesync_core::{
    spawn_load_user, CategoryKey, CommandQueue, DataError, DbRequestError, DbRequestResult,
    NoteCommand, NoteDbClient, NoteSession, SessionError, SqliteNoteDbClient, User, UserKey,
};
use std::cell::Cell;
use std::sync::mpsc;
use std::sync::Arc;

/// Local client that starts failing after `budget` successful mutations.
struct FlakyClient {
    inner: SqliteNoteDbClient,
    budget: Cell<usize>,
}

impl FlakyClient {
    fn new(budget: usize) -> Self {
        Self {
            inner: SqliteNoteDbClient::in_memory().unwrap(),
            budget: Cell::new(budget),
        }
    }

    fn spend(&self, operation: &'static str) -> DbRequestResult<()> {
        match self.budget.get() {
            0 => Err(DbRequestError::storage(
                operation,
                DbError::UnsupportedSchemaVersion {
                    db_version: 0,
                    latest_supported: 0,
                },
            )),
            left => {
                self.budget.set(left - 1);
                Ok(())
            }
        }
    }
}

impl NoteDbClient for FlakyClient {
    fn get_user(&self, key: &UserKey) -> DbRequestResult<Option<User>> {
        self.inner.get_user(key)
    }

    fn add_note(&self, key: &CategoryKey, note: &str) -> DbRequestResult<()> {
        self.spend("add_note")?;
        self.inner.add_note(key, note)
    }

    fn remove_note(&self, key: &CategoryKey, note: &str) -> DbRequestResult<()> {
        self.spend("remove_note")?;
        self.inner.remove_note(key, note)
    }

    fn create_category(&self, key: &CategoryKey) -> DbRequestResult<()> {
        self.spend("create_category")?;
        self.inner.create_category(key)
    }
}

#[test]
fn login_rejects_blank_username_and_starts_unknown_users_empty() {
    let client = SqliteNoteDbClient::in_memory().unwrap();
    let mut session = NoteSession::new(&client);

    assert!(matches!(
        session.login("   "),
        Err(SessionError::Data(DataError::EmptyUsername))
    ));
    assert!(session.current_user().is_none());

    let user = session.login(" alice ").unwrap();
    assert_eq!(user.name(), "alice");
    assert_eq!(user.category_count(), 0);
}

#[test]
fn mutations_require_login() {
    let client = SqliteNoteDbClient::in_memory().unwrap();
    let mut session = NoteSession::new(&client);
    assert!(matches!(
        session.create_category("work"),
        Err(SessionError::NotLoggedIn)
    ));
    assert!(matches!(
        session.add_note("work", "x"),
        Err(SessionError::NotLoggedIn)
    ));
}

#[test]
fn session_mutations_reach_the_client() {
    let client = SqliteNoteDbClient::in_memory().unwrap();
    {
        let mut session = NoteSession::new(&client);
        session.login("alice").unwrap();
        session.create_category("groceries").unwrap();
        session.add_note("groceries", "milk").unwrap();
        session.add_note("groceries", "eggs").unwrap();
        session.remove_note("groceries", "milk").unwrap();

        assert!(matches!(
            session.create_category("groceries"),
            Err(SessionError::Data(DataError::CategoryAlreadyExists(_)))
        ));
        assert!(matches!(
            session.add_note("missing", "x"),
            Err(SessionError::Data(DataError::CategoryNotFound(_)))
        ));
        assert!(matches!(
            session.remove_note("groceries", "milk"),
            Err(SessionError::Data(DataError::NoteNotFound { .. }))
        ));
    }

    let mut session = NoteSession::new(&client);
    let user = session.login("alice").unwrap();
    assert_eq!(
        user.category("groceries").unwrap().notes(),
        ["eggs".to_string()]
    );
}

#[test]
fn failed_client_calls_roll_back_local_state() {
    // create_category + two add_note calls succeed, the rest fail.
    let client = FlakyClient::new(3);
    let mut session = NoteSession::new(client);
    session.login("alice").unwrap();
    session.create_category("work").unwrap();
    session.add_note("work", "a").unwrap();
    session.add_note("work", "b").unwrap();

    assert!(matches!(
        session.add_note("work", "c"),
        Err(SessionError::Remote(_))
    ));
    assert!(matches!(
        session.remove_note("work", "a"),
        Err(SessionError::Remote(_))
    ));
    assert!(matches!(
        session.create_category("home"),
        Err(SessionError::Remote(_))
    ));

    let user = session.current_user().unwrap();
    assert_eq!(
        user.category("work").unwrap().notes(),
        ["a".to_string(), "b".to_string()]
    );
    assert!(user.category("home").is_none());
}

#[test]
fn queue_flush_stops_at_first_failure_and_keeps_the_rest() {
    let client = FlakyClient::new(2);
    let work = UserKey::new("alice").category("work");
    let mut queue = CommandQueue::new();
    queue.push(NoteCommand::CreateCategory { key: work.clone() });
    queue.push(NoteCommand::AddNote {
        key: work.clone(),
        note: "a".to_string(),
    });
    queue.push(NoteCommand::AddNote {
        key: work.clone(),
        note: "b".to_string(),
    });
    queue.push(NoteCommand::RemoveNote {
        key: work.clone(),
        note: "a".to_string(),
    });

    let report = queue.flush(&client);
    assert_eq!(report.executed, 2);
    assert!(!report.is_complete());
    assert_eq!(queue.len(), 2);
    assert_eq!(
        queue.pending().next(),
        Some(&NoteCommand::AddNote {
            key: work.clone(),
            note: "b".to_string(),
        })
    );

    client.budget.set(10);
    let report = queue.flush(&client);
    assert_eq!(report.executed, 2);
    assert!(report.is_complete());
    assert!(queue.is_empty());

    let user = client.get_user(&work.owner).unwrap().unwrap();
    assert_eq!(user.category("work").unwrap().notes(), ["b".to_string()]);
}

#[test]
fn queue_serializes_commands_with_operation_tag() {
    let mut queue = CommandQueue::new();
    queue.push(NoteCommand::CreateCategory {
        key: UserKey::new("alice").category("work"),
    });

    let encoded = serde_json::to_value(&queue).unwrap();
    assert_eq!(encoded["commands"][0]["op"], "create_category");
    assert_eq!(encoded["commands"][0]["key"]["owner"]["name"], "alice");

    let decoded: CommandQueue = serde_json::from_value(encoded).unwrap();
    assert_eq!(decoded, queue);
}

#[test]
fn background_load_delivers_user_to_callback() {
    let client = Arc::new(SqliteNoteDbClient::in_memory().unwrap());
    client
        .add_note(&UserKey::new("alice").category("work"), "ship")
        .unwrap();

    let (tx, rx) = mpsc::channel();
    let handle = spawn_load_user(Arc::clone(&client), UserKey::new("alice"), move |result| {
        tx.send(result).unwrap();
    });
    handle.join().unwrap();

    let user = rx.recv().unwrap().unwrap().unwrap();
    let mut session = NoteSession::new(Arc::clone(&client));
    session.resume(user);
    session.add_note("work", "review").unwrap();

    let stored = client.get_user(&UserKey::new("alice")).unwrap().unwrap();
    assert_eq!(
        stored.category("work").unwrap().notes(),
        ["ship".to_string(), "review".to_string()]
    );
}
