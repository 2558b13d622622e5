//! SQLite-based storage for tasks, per-day logs, the profile, and alert
//! dedup records.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use crate::clock::parse_day_key;
use crate::model::{Niche, Task, TaskKind, TaskLog, UserProfile};

/// Parse task kind from database string
fn parse_task_kind(kind_str: &str) -> TaskKind {
    match kind_str {
        "one_time" => TaskKind::OneTime,
        _ => TaskKind::Recurring,
    }
}

/// Format task kind for database storage
fn format_task_kind(kind: TaskKind) -> &'static str {
    match kind {
        TaskKind::OneTime => "one_time",
        TaskKind::Recurring => "recurring",
    }
}

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Build a Task from a database row
fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
    let kind_str: String = row.get(2)?;
    let created_at_str: String = row.get(7)?;
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        kind: parse_task_kind(&kind_str),
        frequency: row.get(3)?,
        scheduled_time: row.get(4)?,
        archived: row.get(5)?,
        niche_id: row.get(6)?,
        created_at: parse_datetime_fallback(&created_at_str),
    })
}

/// Build a TaskLog from a database row
fn row_to_log(row: &rusqlite::Row) -> Result<TaskLog, rusqlite::Error> {
    let completed_at: Option<String> = row.get(4)?;
    Ok(TaskLog {
        id: row.get(0)?,
        task_id: row.get(1)?,
        status: row.get(2)?,
        date: row.get(3)?,
        completed_at: completed_at.as_deref().map(parse_datetime_fallback),
        note: row.get(5)?,
    })
}

/// SQLite database for Life OS state.
///
/// Holds task definitions, per-day task logs, the singleton gamification
/// profile, niches, and the durable alert dedup records.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/lifeos/lifeos.db`.
    ///
    /// Creates the database file, schema, and default niches if they
    /// don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let path = data_dir()?.join("lifeos.db");
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.migrate()?;
        db.seed_default_niches()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests and ephemeral runs).
    pub fn open_memory() -> Result<Self, Box<dyn std::error::Error>> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        db.seed_default_niches()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS tasks (
                id             TEXT PRIMARY KEY,
                title          TEXT NOT NULL,
                kind           TEXT NOT NULL DEFAULT 'recurring',
                frequency      TEXT,
                scheduled_time TEXT,
                archived       INTEGER NOT NULL DEFAULT 0,
                niche_id       TEXT,
                created_at     TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS task_logs (
                id           TEXT PRIMARY KEY,
                task_id      TEXT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
                status       TEXT NOT NULL,
                date         TEXT NOT NULL,
                completed_at TEXT,
                note         TEXT
            );

            CREATE TABLE IF NOT EXISTS profile (
                id                INTEGER PRIMARY KEY CHECK (id = 1),
                level             INTEGER NOT NULL DEFAULT 1,
                xp                INTEGER NOT NULL DEFAULT 0,
                streak            INTEGER NOT NULL DEFAULT 0,
                last_activity_day TEXT
            );

            CREATE TABLE IF NOT EXISTS niches (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                icon        TEXT NOT NULL DEFAULT '',
                color       TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE IF NOT EXISTS alerts_fired (
                key      TEXT PRIMARY KEY,
                date     TEXT NOT NULL,
                fired_at TEXT NOT NULL
            );

            -- One log per (task, day); the completion controller upserts.
            CREATE UNIQUE INDEX IF NOT EXISTS idx_task_logs_task_date
                ON task_logs(task_id, date);
            CREATE INDEX IF NOT EXISTS idx_task_logs_date_status
                ON task_logs(date, status);
            CREATE INDEX IF NOT EXISTS idx_alerts_fired_date
                ON alerts_fired(date);",
        )?;
        Ok(())
    }

    fn seed_default_niches(&self) -> Result<(), rusqlite::Error> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM niches", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }
        let defaults = [
            ("Sport", "dumbbell", "#EF4444", "Training and health"),
            ("Work", "briefcase", "#3B82F6", "Projects and business"),
            ("Rest", "coffee", "#10B981", "Relax and hobbies"),
        ];
        for (name, icon, color, description) in defaults {
            self.conn.execute(
                "INSERT INTO niches (id, name, icon, color, description)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    uuid::Uuid::new_v4().to_string(),
                    name,
                    icon,
                    color,
                    description,
                ],
            )?;
        }
        Ok(())
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn create_task(&self, task: &Task) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO tasks (id, title, kind, frequency, scheduled_time, archived, niche_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                task.id,
                task.title,
                format_task_kind(task.kind),
                task.frequency,
                task.scheduled_time,
                task.archived,
                task.niche_id,
                task.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_task(&self, id: &str) -> Result<Option<Task>, rusqlite::Error> {
        self.conn
            .query_row(
                "SELECT id, title, kind, frequency, scheduled_time, archived, niche_id, created_at
                 FROM tasks WHERE id = ?1",
                params![id],
                row_to_task,
            )
            .optional()
    }

    /// List tasks, newest first. Archived tasks are excluded unless
    /// `include_archived` is set.
    pub fn list_tasks(&self, include_archived: bool) -> Result<Vec<Task>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, kind, frequency, scheduled_time, archived, niche_id, created_at
             FROM tasks
             WHERE archived = 0 OR ?1
             ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map(params![include_archived], row_to_task)?;
        rows.collect()
    }

    pub fn update_task(&self, task: &Task) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "UPDATE tasks
             SET title = ?2, kind = ?3, frequency = ?4, scheduled_time = ?5,
                 archived = ?6, niche_id = ?7
             WHERE id = ?1",
            params![
                task.id,
                task.title,
                format_task_kind(task.kind),
                task.frequency,
                task.scheduled_time,
                task.archived,
                task.niche_id,
            ],
        )?;
        Ok(())
    }

    /// Delete a task; its logs cascade.
    pub fn delete_task(&self, id: &str) -> Result<(), rusqlite::Error> {
        self.conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(())
    }

    // ── Task logs ────────────────────────────────────────────────────

    pub fn get_log(&self, task_id: &str, date: &str) -> Result<Option<TaskLog>, rusqlite::Error> {
        self.conn
            .query_row(
                "SELECT id, task_id, status, date, completed_at, note
                 FROM task_logs WHERE task_id = ?1 AND date = ?2",
                params![task_id, date],
                row_to_log,
            )
            .optional()
    }

    pub fn insert_log(&self, log: &TaskLog) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO task_logs (id, task_id, status, date, completed_at, note)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                log.id,
                log.task_id,
                log.status,
                log.date,
                log.completed_at.map(|dt| dt.to_rfc3339()),
                log.note,
            ],
        )?;
        Ok(())
    }

    pub fn update_log_status(&self, id: &str, status: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "UPDATE task_logs SET status = ?2 WHERE id = ?1",
            params![id, status],
        )?;
        Ok(())
    }

    pub fn delete_log(&self, id: &str) -> Result<(), rusqlite::Error> {
        self.conn
            .execute("DELETE FROM task_logs WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// Ids of tasks with a done log on the given day.
    pub fn done_task_ids_on(&self, date: &str) -> Result<Vec<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT task_id FROM task_logs WHERE date = ?1 AND status = 'done'",
        )?;
        let rows = stmt.query_map(params![date], |row| row.get::<_, String>(0))?;
        rows.collect()
    }

    // ── Profile ──────────────────────────────────────────────────────

    /// Fetch the singleton profile, creating it with defaults on first
    /// access.
    pub fn get_or_create_profile(&self) -> Result<UserProfile, rusqlite::Error> {
        let existing = self
            .conn
            .query_row(
                "SELECT level, xp, streak, last_activity_day FROM profile WHERE id = 1",
                [],
                |row| {
                    let last: Option<String> = row.get(3)?;
                    Ok(UserProfile {
                        level: row.get(0)?,
                        xp: row.get(1)?,
                        streak: row.get(2)?,
                        last_activity_day: last.as_deref().and_then(parse_day_key),
                    })
                },
            )
            .optional()?;

        match existing {
            Some(profile) => Ok(profile),
            None => {
                let profile = UserProfile::default();
                self.save_profile(&profile)?;
                Ok(profile)
            }
        }
    }

    pub fn save_profile(&self, profile: &UserProfile) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO profile (id, level, xp, streak, last_activity_day)
             VALUES (1, ?1, ?2, ?3, ?4)",
            params![
                profile.level,
                profile.xp,
                profile.streak,
                profile
                    .last_activity_day
                    .map(|d| crate::clock::day_key(d)),
            ],
        )?;
        Ok(())
    }

    // ── Stats ────────────────────────────────────────────────────────

    pub fn count_done_on(&self, date: &str) -> Result<u64, rusqlite::Error> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM task_logs WHERE date = ?1 AND status = 'done'",
            params![date],
            |row| row.get(0),
        )
    }

    /// Done-log count over an inclusive day-key range. Day keys order
    /// lexicographically, so plain string comparison is correct.
    pub fn count_done_between(&self, from: &str, to: &str) -> Result<u64, rusqlite::Error> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM task_logs
             WHERE date >= ?1 AND date <= ?2 AND status = 'done'",
            params![from, to],
            |row| row.get(0),
        )
    }

    pub fn count_active_tasks(&self) -> Result<u64, rusqlite::Error> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE archived = 0",
            [],
            |row| row.get(0),
        )
    }

    // ── Niches ───────────────────────────────────────────────────────

    pub fn list_niches(&self) -> Result<Vec<Niche>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, icon, color, description FROM niches ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Niche {
                id: row.get(0)?,
                name: row.get(1)?,
                icon: row.get(2)?,
                color: row.get(3)?,
                description: row.get(4)?,
            })
        })?;
        rows.collect()
    }

    pub fn create_niche(&self, niche: &Niche) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO niches (id, name, icon, color, description)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![niche.id, niche.name, niche.icon, niche.color, niche.description],
        )?;
        Ok(())
    }

    // ── Alert dedup ──────────────────────────────────────────────────

    /// Record a fired alert so a process restart cannot re-fire it.
    pub fn record_alert_fired(
        &self,
        key: &str,
        date: &str,
        fired_at: DateTime<Utc>,
    ) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO alerts_fired (key, date, fired_at)
             VALUES (?1, ?2, ?3)",
            params![key, date, fired_at.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Dedup keys of alerts already fired on the given day.
    pub fn fired_alert_keys_on(&self, date: &str) -> Result<Vec<String>, rusqlite::Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM alerts_fired WHERE date = ?1")?;
        let rows = stmt.query_map(params![date], |row| row.get::<_, String>(0))?;
        rows.collect()
    }
}
