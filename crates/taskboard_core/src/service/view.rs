//! Per-category view projection.
//!
//! # Invariants
//! - Projection is pure and deterministic for a given snapshot.
//! - Ordering, most significant first: `High` priority, then pending before
//!   completed, then newest `created_at`. Other fields never affect order.
//! - Ties keep snapshot order (stable sort).

use crate::model::task::{Category, Priority, StatusFilter, Task};
use std::cmp::Ordering;

/// Tasks of `category` visible under `filter`, in display order.
pub fn project(tasks: &[Task], category: Category, filter: StatusFilter) -> Vec<&Task> {
    let mut visible: Vec<&Task> = tasks
        .iter()
        .filter(|task| task.category == category && filter.matches(task.status))
        .collect();
    visible.sort_by(|a, b| display_order(a, b));
    visible
}

/// Display comparator used by [`project`].
pub fn display_order(a: &Task, b: &Task) -> Ordering {
    let a_high = a.priority == Priority::High;
    let b_high = b.priority == Priority::High;

    b_high
        .cmp(&a_high)
        .then_with(|| a.is_completed().cmp(&b.is_completed()))
        .then_with(|| b.created_at.cmp(&a.created_at))
}

#[cfg(test)]
mod tests {
    use super::project;
    use crate::model::draft::TaskFields;
    use crate::model::task::{Category, Priority, StatusFilter, Task, TaskStatus};
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, minute, 0).unwrap()
    }

    fn task(title: &str, category: Category, priority: Priority, minute: u32) -> Task {
        let fields = TaskFields::new(
            title,
            "",
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            category,
            priority,
        )
        .unwrap();
        Task::new(fields, at(minute))
    }

    fn titles(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|task| task.title.clone()).collect()
    }

    #[test]
    fn high_priority_dominates_recency() {
        let tasks = vec![
            task("old-high", Category::Work, Priority::High, 1),
            task("new-medium", Category::Work, Priority::Medium, 2),
        ];
        let view = project(&tasks, Category::Work, StatusFilter::All);
        assert_eq!(titles(&view), ["old-high", "new-medium"]);
    }

    #[test]
    fn completed_sorts_after_pending_with_equal_priority() {
        let mut done = task("done", Category::Work, Priority::Low, 5);
        done.status = TaskStatus::Completed;
        let tasks = vec![done, task("open", Category::Work, Priority::Low, 1)];

        let view = project(&tasks, Category::Work, StatusFilter::All);
        assert_eq!(titles(&view), ["open", "done"]);
    }

    #[test]
    fn completed_high_still_precedes_pending_low() {
        let mut done_high = task("done-high", Category::Work, Priority::High, 1);
        done_high.status = TaskStatus::Completed;
        let tasks = vec![task("open-low", Category::Work, Priority::Low, 2), done_high];

        let view = project(&tasks, Category::Work, StatusFilter::All);
        assert_eq!(titles(&view), ["done-high", "open-low"]);
    }

    #[test]
    fn medium_and_low_are_not_distinguished() {
        let tasks = vec![
            task("medium-old", Category::Other, Priority::Medium, 1),
            task("low-new", Category::Other, Priority::Low, 3),
        ];
        let view = project(&tasks, Category::Other, StatusFilter::All);
        assert_eq!(titles(&view), ["low-new", "medium-old"]);
    }

    #[test]
    fn filters_by_category_and_status() {
        let mut done = task("done", Category::Personal, Priority::Low, 1);
        done.status = TaskStatus::Completed;
        let tasks = vec![
            done,
            task("open", Category::Personal, Priority::Low, 2),
            task("work", Category::Work, Priority::Low, 3),
        ];

        let pending = project(&tasks, Category::Personal, StatusFilter::Pending);
        assert_eq!(titles(&pending), ["open"]);
        let completed = project(&tasks, Category::Personal, StatusFilter::Completed);
        assert_eq!(titles(&completed), ["done"]);
        assert!(project(&tasks, Category::Other, StatusFilter::All).is_empty());
    }

    #[test]
    fn equal_keys_keep_snapshot_order_across_reruns() {
        let tasks = vec![
            task("first", Category::Work, Priority::Low, 7),
            task("second", Category::Work, Priority::Low, 7),
        ];
        let once = titles(&project(&tasks, Category::Work, StatusFilter::All));
        let twice = titles(&project(&tasks, Category::Work, StatusFilter::All));
        assert_eq!(once, ["first", "second"]);
        assert_eq!(once, twice);
    }
}
