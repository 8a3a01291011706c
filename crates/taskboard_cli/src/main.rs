//! Terminal front end for the task board.
//!
//! # Responsibility
//! - Compose the board from configuration (composition root).
//! - Act as the external form, confirmation and drag collaborator.

mod config;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use config::AppConfig;
use dialoguer::Confirm;
use log::warn;
use std::path::PathBuf;
use taskboard_core::db::open_db;
use taskboard_core::{
    Category, DragEvent, DueUrgency, KeyValueStore, Priority, SqliteKeyValueStore, StatusFilter,
    Task, TaskBoard, TaskDraft, TaskId,
};

#[derive(Debug, Parser)]
#[command(name = "taskboard", version, about = "Personal task board")]
struct Cli {
    /// Board database file.
    #[arg(long, env = "TASKBOARD_DB", global = true)]
    db: Option<PathBuf>,

    /// Directory for rolling log files.
    #[arg(long, env = "TASKBOARD_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "TASKBOARD_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show every column under the active status filter.
    List,
    /// Create a task.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// YYYY-MM-DD, defaults to today.
        #[arg(long)]
        due: Option<String>,
        #[arg(long, default_value = "Work")]
        category: Category,
        #[arg(long, default_value = "High")]
        priority: Priority,
    },
    /// Edit a task; omitted fields keep their current value.
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        priority: Option<Priority>,
    },
    /// Flip a task between pending and completed.
    Toggle { id: String },
    /// Drag a task onto a column.
    Move { id: String, target: String },
    /// Delete a task after confirmation.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Rename the board.
    Title { title: String },
    /// Set the status filter (all|pending|completed).
    Filter { filter: StatusFilter },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::resolve(cli.db, cli.log_dir, cli.log_level)?;

    if let Err(err) = taskboard_core::init_logging(
        &config.log_level,
        &config.log_dir.to_string_lossy(),
    ) {
        eprintln!("warning: logging disabled: {err}");
    }

    if let Some(parent) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create `{}`", parent.display()))?;
    }
    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    let kv = SqliteKeyValueStore::try_new(&conn)?;
    let mut board = TaskBoard::open(kv);

    run(&mut board, cli.command.unwrap_or(Command::List))?;

    if let Some(err) = board.store_mut().take_write_failure() {
        warn!("event=cli_persist module=cli status=error key={}", err.key());
        eprintln!("warning: changes kept in memory only: {err}");
    }
    Ok(())
}

fn run<S: KeyValueStore>(board: &mut TaskBoard<S>, command: Command) -> Result<()> {
    let today = Local::now().date_naive();

    match command {
        Command::List => print_board(board, today),
        Command::Add {
            title,
            description,
            due,
            category,
            priority,
        } => {
            let mut draft = TaskDraft::new(today);
            draft.title = title;
            draft.description = description;
            if let Some(due) = due {
                draft.due_date = due;
            }
            draft.category = category;
            draft.priority = priority;

            let task = board.store_mut().create(draft.validate()?);
            println!("created {}", task.id);
        }
        Command::Edit {
            id,
            title,
            description,
            due,
            category,
            priority,
        } => {
            let id = TaskId::from(id);
            let Some(task) = board.store().get(&id) else {
                bail!("no task with id `{id}`");
            };
            let mut draft = TaskDraft::from_task(task);
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(due) = due {
                draft.due_date = due;
            }
            if let Some(category) = category {
                draft.category = category;
            }
            if let Some(priority) = priority {
                draft.priority = priority;
            }

            board.store_mut().update(&id, draft.validate()?);
            println!("updated {id}");
        }
        Command::Toggle { id } => {
            let id = TaskId::from(id);
            match board.store_mut().flip_status(&id) {
                Some(status) => println!("{id} is now {status}"),
                None => bail!("no task with id `{id}`"),
            }
        }
        Command::Move { id, target } => {
            let task_id = TaskId::from(id);
            board.handle_drag(DragEvent::Start {
                task_id: task_id.clone(),
            });
            let moved = board.handle_drag(DragEvent::Drop {
                task_id: task_id.clone(),
                target: Some(target.clone()),
            });
            if moved {
                println!("moved {task_id} to {target}");
            } else {
                println!("{task_id} unchanged");
            }
        }
        Command::Delete { id, yes } => {
            let id = TaskId::from(id);
            let Some(token) = board.store_mut().request_delete(&id) else {
                bail!("no task with id `{id}`");
            };
            let confirmed = yes
                || Confirm::new()
                    .with_prompt("Are you sure you want to delete this task?")
                    .default(false)
                    .interact()?;
            if confirmed && board.store_mut().confirm_delete(&token) {
                println!("deleted {id}");
            } else {
                board.store_mut().cancel_delete();
                println!("kept {id}");
            }
        }
        Command::Title { title } => {
            if !board.rename(&title) {
                println!("title unchanged");
            }
            println!("{}", board.board_title());
        }
        Command::Filter { filter } => {
            board.set_status_filter(filter);
            println!("filter: {}", board.status_filter());
        }
    }

    Ok(())
}

fn print_board<S: KeyValueStore>(board: &TaskBoard<S>, today: NaiveDate) {
    println!("{} [{}]", board.board_title(), board.status_filter());
    for column in board.columns() {
        println!();
        println!("== {} ({})", column.category, column.tasks.len());
        if column.tasks.is_empty() {
            println!("   No tasks in {} category", column.category);
        }
        for task in column.tasks {
            println!("   {}", format_task(task, today));
        }
    }
}

fn format_task(task: &Task, today: NaiveDate) -> String {
    let check = if task.is_completed() { "x" } else { " " };
    let due = match (task.due_date, task.due_urgency(today)) {
        (Some(date), Some(urgency)) => {
            let marker = match urgency {
                DueUrgency::Urgent => "!",
                DueUrgency::Approaching => "~",
                DueUrgency::Comfortable => "",
            };
            format!(" due {}{marker}", date.format("%b %-d"))
        }
        _ => String::new(),
    };
    format!(
        "[{check}] {} ({}){due}  #{}",
        task.title, task.priority, task.id
    )
}
