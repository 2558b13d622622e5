//! Task management commands for CLI.

use std::collections::HashSet;

use clap::Subcommand;
use lifeos_core::completion::CompletionController;
use lifeos_core::model::{log_status, Task, TaskKind};
use lifeos_core::storage::{Config, Database};
use lifeos_core::Clock;
use serde::Serialize;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Create {
        /// Task title
        title: String,
        /// Task kind: recurring or one-time (default: recurring)
        #[arg(long, default_value = "recurring")]
        kind: String,
        /// Recurrence frequency hint (e.g. daily)
        #[arg(long)]
        frequency: Option<String>,
        /// Scheduled clock time (HH:MM)
        #[arg(long)]
        time: Option<String>,
        /// Niche ID to associate with
        #[arg(long)]
        niche_id: Option<String>,
    },
    /// List tasks with their done-today flag
    List {
        /// Include archived tasks
        #[arg(long)]
        archived: bool,
        /// Filter by niche ID
        #[arg(long)]
        niche_id: Option<String>,
    },
    /// Get task details
    Get {
        /// Task ID
        id: String,
    },
    /// Mark a task done for today
    Done {
        /// Task ID
        id: String,
        /// Free-text note on the log
        #[arg(long)]
        note: Option<String>,
    },
    /// Reverse today's completion
    Undo {
        /// Task ID
        id: String,
    },
    /// Record an arbitrary status for today
    Mark {
        /// Task ID
        id: String,
        /// Status string (done has engine side effects)
        status: String,
        #[arg(long)]
        note: Option<String>,
    },
    /// Delete a task and its logs
    Delete {
        /// Task ID
        id: String,
    },
}

#[derive(Serialize)]
struct TaskListEntry {
    #[serde(flatten)]
    task: Task,
    done_today: bool,
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load()?;
    let clock = Clock::new(&config.timezone)?;

    match action {
        TaskAction::Create {
            title,
            kind,
            frequency,
            time,
            niche_id,
        } => {
            let mut task = Task::new(title);
            task.kind = match kind.as_str() {
                "one-time" | "one_time" => TaskKind::OneTime,
                _ => TaskKind::Recurring,
            };
            task.frequency = frequency;
            task.scheduled_time = time;
            task.niche_id = niche_id;
            db.create_task(&task)?;
            println!("Task created: {}", task.id);
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List { archived, niche_id } => {
            let done: HashSet<String> =
                db.done_task_ids_on(&clock.day_key())?.into_iter().collect();
            let entries: Vec<TaskListEntry> = db
                .list_tasks(archived)?
                .into_iter()
                .filter(|task| {
                    niche_id
                        .as_ref()
                        .map_or(true, |n| task.niche_id.as_ref() == Some(n))
                })
                .map(|task| TaskListEntry {
                    done_today: done.contains(&task.id),
                    task,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        TaskAction::Get { id } => {
            let task = db
                .get_task(&id)?
                .ok_or_else(|| format!("task not found: {id}"))?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Done { id, note } => {
            let outcome = CompletionController::new(&db).mark(
                &id,
                log_status::DONE,
                note.as_deref(),
                clock.now(),
            )?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        TaskAction::Undo { id } => {
            let outcome = CompletionController::new(&db).mark(
                &id,
                log_status::PENDING,
                None,
                clock.now(),
            )?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        TaskAction::Mark { id, status, note } => {
            let outcome = CompletionController::new(&db).mark(
                &id,
                &status,
                note.as_deref(),
                clock.now(),
            )?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        TaskAction::Delete { id } => {
            db.delete_task(&id)?;
            println!("Task deleted: {id}");
        }
    }
    Ok(())
}
