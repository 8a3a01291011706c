use chrono::{NaiveDate, TimeZone, Utc};
use taskboard_core::{
    Category, DragEvent, DragState, MemoryKeyValueStore, Priority, StatusFilter, TaskBoard,
    TaskFields, TaskId, TaskStatus,
};

fn fields(title: &str, category: Category, priority: Priority) -> TaskFields {
    TaskFields::new(
        title,
        "",
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        category,
        priority,
    )
    .unwrap()
}

fn drag(board: &mut TaskBoard<&MemoryKeyValueStore>, id: &TaskId, target: Option<&str>) -> bool {
    board.handle_drag(DragEvent::Start {
        task_id: id.clone(),
    });
    board.handle_drag(DragEvent::Drop {
        task_id: id.clone(),
        target: target.map(str::to_string),
    })
}

#[test]
fn dropping_on_another_column_changes_only_the_category() {
    let kv = MemoryKeyValueStore::new();
    let mut board = TaskBoard::open(&kv);
    let task = board
        .store_mut()
        .create(fields("Quarterly report", Category::Work, Priority::High));

    assert!(drag(&mut board, &task.id, Some("Personal")));
    assert_eq!(board.drag_state(), &DragState::Resolved);

    let moved = board.store().get(&task.id).unwrap();
    assert_eq!(moved.category, Category::Personal);
    assert_eq!(moved.title, task.title);
    assert_eq!(moved.priority, task.priority);
    assert_eq!(moved.status, task.status);
    assert_eq!(moved.created_at, task.created_at);

    assert!(!drag(&mut board, &task.id, Some("Personal")));
    assert_eq!(board.store().get(&task.id).unwrap().category, Category::Personal);
}

#[test]
fn aborted_and_invalid_drops_leave_task_in_place() {
    let kv = MemoryKeyValueStore::new();
    let mut board = TaskBoard::open(&kv);
    let task = board
        .store_mut()
        .create(fields("stay", Category::Other, Priority::Low));
    let neighbour = board
        .store_mut()
        .create(fields("neighbour", Category::Other, Priority::Low));

    assert!(!drag(&mut board, &task.id, None));
    assert!(!drag(&mut board, &task.id, Some("Someday")));
    assert!(!drag(&mut board, &task.id, Some(neighbour.id.as_str())));
    assert_eq!(board.store().get(&task.id).unwrap().category, Category::Other);
}

#[test]
fn columns_follow_filter_and_display_order() {
    let kv = MemoryKeyValueStore::new();
    let mut board = TaskBoard::open(&kv);
    let store = board.store_mut();
    let old_high = store.create_at(
        fields("old high", Category::Work, Priority::High),
        Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
    );
    let new_medium = store.create_at(
        fields("new medium", Category::Work, Priority::Medium),
        Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap(),
    );
    let done = store.create_at(
        fields("done", Category::Work, Priority::Medium),
        Utc.with_ymd_and_hms(2024, 1, 3, 8, 0, 0).unwrap(),
    );
    store.toggle_status(&done.id, TaskStatus::Completed);

    let columns = board.columns();
    assert_eq!(
        columns.iter().map(|c| c.category).collect::<Vec<_>>(),
        Category::ALL
    );
    let work: Vec<_> = columns[0].tasks.iter().map(|t| t.id.clone()).collect();
    assert_eq!(work, [old_high.id.clone(), new_medium.id.clone(), done.id.clone()]);

    board.set_status_filter(StatusFilter::Completed);
    let completed: Vec<_> = board
        .column(Category::Work)
        .iter()
        .map(|t| t.id.clone())
        .collect();
    assert_eq!(completed, [done.id]);
}
