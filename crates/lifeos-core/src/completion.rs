//! Task-completion orchestration and daily stats.
//!
//! The controller is the only writer of task logs and the profile. A
//! `mark` call commits its log write, profile write, and archive flag as
//! one SQLite transaction, which doubles as the mutual-exclusion boundary
//! for the profile's read-modify-write if this ever runs on a preemptive
//! runtime.

use chrono::{DateTime, Days, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::clock::day_key;
use crate::error::{CoreError, DatabaseError, Result};
use crate::gamification::{apply_completion, effective_streak};
use crate::model::{log_status, TaskKind, TaskLog, UserProfile};
use crate::storage::Database;

/// Outcome of a `mark` call: the status that was applied and the profile
/// snapshot after any gamification side effects.
#[derive(Debug, Clone, Serialize)]
pub struct MarkOutcome {
    pub status: String,
    pub profile: UserProfile,
}

/// Daily stats projection.
#[derive(Debug, Clone, Serialize)]
pub struct TodayStats {
    pub completed_today: u64,
    pub total_active: u64,
    pub completion_rate_today: f64,
    pub completed_last_7_days: u64,
    /// Read-time-decayed streak; the stored value is untouched.
    pub effective_streak: u32,
}

pub struct CompletionController<'a> {
    db: &'a Database,
}

impl<'a> CompletionController<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Record `status` for a task on the calendar day of `now`.
    ///
    /// Marking done twice on one day keeps a single log row and awards XP
    /// exactly once. Any non-done status deletes today's log without
    /// revoking XP or streak; reversal is lossy.
    ///
    /// Status strings are not validated against the canonical set; an
    /// unrecognized value simply takes the non-done path.
    ///
    /// # Errors
    /// Returns [`CoreError::TaskNotFound`] for an unknown task id.
    pub fn mark(
        &self,
        task_id: &str,
        status: &str,
        note: Option<&str>,
        now: DateTime<Tz>,
    ) -> Result<MarkOutcome> {
        let mut task = self
            .db
            .get_task(task_id)?
            .ok_or_else(|| CoreError::TaskNotFound {
                id: task_id.to_string(),
            })?;

        let today = now.date_naive();
        let date = day_key(today);

        let tx = self
            .db
            .conn()
            .unchecked_transaction()
            .map_err(DatabaseError::from)?;

        let existing = self.db.get_log(task_id, &date)?;
        let profile = if status == log_status::DONE {
            match existing {
                Some(log) => {
                    // Idempotent re-mark: touch the status field only.
                    self.db.update_log_status(&log.id, status)?;
                    self.db.get_or_create_profile()?
                }
                None => {
                    let log = TaskLog {
                        id: uuid::Uuid::new_v4().to_string(),
                        task_id: task.id.clone(),
                        status: status.to_string(),
                        date: date.clone(),
                        completed_at: Some(now.with_timezone(&Utc)),
                        note: note.map(str::to_string),
                    };
                    self.db.insert_log(&log)?;

                    let profile =
                        apply_completion(&self.db.get_or_create_profile()?, today);
                    self.db.save_profile(&profile)?;

                    if task.kind == TaskKind::OneTime && !task.archived {
                        task.archived = true;
                        self.db.update_task(&task)?;
                    }
                    profile
                }
            }
        } else {
            if let Some(log) = existing {
                self.db.delete_log(&log.id)?;
            }
            self.db.get_or_create_profile()?
        };

        tx.commit().map_err(DatabaseError::from)?;

        Ok(MarkOutcome {
            status: status.to_string(),
            profile,
        })
    }

    /// Stats for the calendar day of `now`.
    pub fn stats(&self, now: DateTime<Tz>) -> Result<TodayStats> {
        let today = now.date_naive();
        let date = day_key(today);

        let completed_today = self.db.count_done_on(&date)?;
        let total_active = self.db.count_active_tasks()?;
        let week_start = today
            .checked_sub_days(Days::new(6))
            .unwrap_or(today);
        let completed_last_7_days =
            self.db.count_done_between(&day_key(week_start), &date)?;
        let profile = self.db.get_or_create_profile()?;

        let completion_rate_today = if total_active == 0 {
            0.0
        } else {
            completed_today as f64 / total_active as f64
        };

        Ok(TodayStats {
            completed_today,
            total_active,
            completion_rate_today,
            completed_last_7_days,
            effective_streak: effective_streak(&profile, today),
        })
    }
}
