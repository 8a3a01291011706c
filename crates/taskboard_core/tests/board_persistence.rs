use chrono::{NaiveDate, TimeZone, Utc};
use std::cell::Cell;
use taskboard_core::db::{open_db, open_db_in_memory};
use taskboard_core::{
    Category, KeyValueStore, MemoryKeyValueStore, PersistenceAdapter, PersistenceError, Priority,
    SqliteKeyValueStore, StatusFilter, StorageError, StorageResult, Task, TaskBoard, TaskFields,
    TaskStatus, DEFAULT_BOARD_TITLE,
};

fn fields(title: &str, category: Category, priority: Priority) -> TaskFields {
    TaskFields::new(
        title,
        "details",
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        category,
        priority,
    )
    .unwrap()
}

/// Store whose writes can be switched off to simulate an unavailable medium.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryKeyValueStore,
    refuse_writes: Cell<bool>,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.refuse_writes.get() {
            return Err(StorageError::Rejected("quota exceeded".to_string()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        if self.refuse_writes.get() {
            return Err(StorageError::Rejected("medium unavailable".to_string()));
        }
        self.inner.remove(key)
    }
}

#[test]
fn saved_collection_loads_back_field_for_field() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::try_new(&conn).unwrap();

    let mut board = TaskBoard::open(&kv);
    let store = board.store_mut();
    let a = store.create(fields("alpha", Category::Work, Priority::High));
    let b = store.create_at(
        fields("beta", Category::Personal, Priority::Low),
        Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap(),
    );
    store.toggle_status(&b.id, TaskStatus::Completed);
    let expected: Vec<Task> = board.store().tasks().to_vec();
    assert_eq!(expected.len(), 2);
    assert_eq!(expected[0].id, a.id);

    let reloaded = PersistenceAdapter::new(&kv).load();
    assert_eq!(reloaded.tasks, expected);
}

#[test]
fn board_state_survives_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.sqlite3");

    let created = {
        let conn = open_db(&path).unwrap();
        let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
        let mut board = TaskBoard::open(kv);
        assert!(board.rename("  Groceries  "));
        assert!(board.set_status_filter(StatusFilter::Pending));
        board
            .store_mut()
            .create(fields("eggs", Category::Personal, Priority::Medium))
    };

    let conn = open_db(&path).unwrap();
    let board = TaskBoard::open(SqliteKeyValueStore::try_new(&conn).unwrap());
    assert_eq!(board.board_title(), "Groceries");
    assert_eq!(board.status_filter(), StatusFilter::Pending);
    assert_eq!(board.store().tasks(), [created].as_slice());
}

#[test]
fn corrupt_tasks_value_loads_empty_and_clears_key() {
    let kv = MemoryKeyValueStore::with_entries([("tasks", "\"not-an-array\"")]);
    let board = TaskBoard::open(&kv);

    assert!(board.store().is_empty());
    assert!(!kv.contains_key("tasks"));
}

#[test]
fn non_json_tasks_value_is_discarded() {
    let kv = MemoryKeyValueStore::with_entries([("tasks", "not-an-array")]);
    let board = TaskBoard::open(&kv);

    assert!(board.store().is_empty());
    assert!(!kv.contains_key("tasks"));
}

#[test]
fn partially_valid_array_is_discarded_outright() {
    let raw = r#"[
        {"id":"1","title":"ok","description":"","dueDate":"2024-01-01","category":"Work",
         "priority":"High","status":"pending","createdAt":"2024-01-01T00:00:00.000Z"},
        {"id":"2","title":"bad","description":"","dueDate":"2024-01-01","category":"Garden",
         "priority":"High","status":"pending","createdAt":"2024-01-01T00:00:00.000Z"}
    ]"#;
    let kv = MemoryKeyValueStore::with_entries([("tasks", raw)]);
    let board = TaskBoard::open(&kv);

    assert!(board.store().is_empty());
    assert!(!kv.contains_key("tasks"));
}

#[test]
fn defaults_apply_for_a_fresh_board() {
    let kv = MemoryKeyValueStore::new();
    let board = TaskBoard::open(&kv);
    assert_eq!(board.board_title(), DEFAULT_BOARD_TITLE);
    assert_eq!(board.status_filter(), StatusFilter::All);
    assert!(board.columns().iter().all(|column| column.tasks.is_empty()));
}

#[test]
fn blank_or_unchanged_title_is_not_written() {
    let kv = MemoryKeyValueStore::new();
    let mut board = TaskBoard::open(&kv);

    assert!(!board.rename("   "));
    assert!(!board.rename(DEFAULT_BOARD_TITLE));
    assert!(!kv.contains_key("boardTitle"));
    assert!(!board.set_status_filter(StatusFilter::All));
    assert!(!kv.contains_key("statusFilter"));
}

#[test]
fn write_failure_is_reported_without_rolling_back() {
    let kv = FlakyStore::default();
    let mut board = TaskBoard::open(&kv);
    let kept = board
        .store_mut()
        .create(fields("persisted", Category::Work, Priority::High));
    assert!(board.store().last_write_failure().is_none());

    kv.refuse_writes.set(true);
    let unsaved = board
        .store_mut()
        .create(fields("memory only", Category::Other, Priority::Low));
    assert_eq!(board.store().len(), 2);
    assert!(board.store().get(&unsaved.id).is_some());

    let failure = board.store_mut().take_write_failure().expect("failure recorded");
    assert!(matches!(
        failure,
        PersistenceError::Write {
            key: "tasks",
            source: StorageError::Rejected(_)
        }
    ));
    assert!(board.store().last_write_failure().is_none());

    // The board keeps working; title changes still apply in memory.
    assert!(board.rename("Offline"));
    assert_eq!(board.board_title(), "Offline");
    assert_eq!(
        board.store().last_write_failure().map(PersistenceError::key),
        Some("boardTitle")
    );

    kv.refuse_writes.set(false);
    assert!(board.store_mut().reassign_category(&kept.id, Category::Personal));
    let reloaded = PersistenceAdapter::new(&kv).load();
    assert_eq!(reloaded.tasks.len(), 2);
}
