//! Model types for tasks, per-day logs, the gamification profile, and niches.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Completion semantics of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Archived automatically on first completion.
    OneTime,
    /// Lives forever; completions are recorded per calendar day.
    Recurring,
}

impl Default for TaskKind {
    fn default() -> Self {
        TaskKind::Recurring
    }
}

/// Canonical TaskLog status values.
///
/// Statuses are stored as open strings: unrecognized values are accepted
/// without validation. Only `done` has engine side effects; every other
/// value behaves as an undo for the day.
pub mod log_status {
    pub const PENDING: &str = "pending";
    pub const DONE: &str = "done";
    pub const MISSED: &str = "missed";
    pub const SKIPPED: &str = "skipped";
}

/// A unit of work, one-time or recurring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: String,
    /// Task title
    pub title: String,
    /// Completion semantics
    pub kind: TaskKind,
    /// Recurrence frequency for recurring tasks (free text, e.g. "daily")
    pub frequency: Option<String>,
    /// Scheduled clock time (`HH:MM`), informational only
    pub scheduled_time: Option<String>,
    /// One-time tasks flip to archived on first completion
    pub archived: bool,
    /// Optional niche (category) reference
    pub niche_id: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new active recurring task with default values.
    pub fn new(title: impl Into<String>) -> Self {
        Task {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            kind: TaskKind::default(),
            frequency: None,
            scheduled_time: None,
            archived: false,
            niche_id: None,
            created_at: Utc::now(),
        }
    }
}

/// Outcome of a task on one calendar day.
///
/// At most one log exists per (task, day); the completion controller
/// enforces this by upsert, backed by a unique index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskLog {
    pub id: String,
    pub task_id: String,
    /// Open status string; see [`log_status`]
    pub status: String,
    /// Day key (`YYYY-MM-DD`) resolved in the configured timezone at write time
    pub date: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

/// Singleton gamification state.
///
/// After any engine update `xp < level * 100`: the threshold is always
/// fully consumed into levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub level: u32,
    pub xp: u32,
    /// Consecutive days with at least one completion. Stored value decays
    /// only through [`effective_streak`](crate::gamification::effective_streak)
    /// at read time.
    pub streak: u32,
    pub last_activity_day: Option<NaiveDate>,
}

impl Default for UserProfile {
    fn default() -> Self {
        UserProfile {
            level: 1,
            xp: 0,
            streak: 0,
            last_activity_day: None,
        }
    }
}

/// Task category (e.g. Sport, Work). Irrelevant to the core algorithms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Niche {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub description: String,
}

impl Niche {
    pub fn new(name: impl Into<String>) -> Self {
        Niche {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            icon: String::new(),
            color: String::new(),
            description: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_defaults() {
        let task = Task::new("Morning run");
        assert_eq!(task.kind, TaskKind::Recurring);
        assert!(!task.archived);
        assert!(task.niche_id.is_none());
    }

    #[test]
    fn task_serialization() {
        let task = Task::new("Stretch");
        let json = serde_json::to_string(&task).unwrap();
        let decoded: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.id, task.id);
        assert_eq!(decoded.kind, TaskKind::Recurring);
    }

    #[test]
    fn profile_defaults() {
        let profile = UserProfile::default();
        assert_eq!(profile.level, 1);
        assert_eq!(profile.xp, 0);
        assert_eq!(profile.streak, 0);
        assert!(profile.last_activity_day.is_none());
    }

    #[test]
    fn task_kind_snake_case() {
        assert_eq!(
            serde_json::to_string(&TaskKind::OneTime).unwrap(),
            "\"one_time\""
        );
    }
}
