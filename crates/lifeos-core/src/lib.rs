//! # Life OS Core Library
//!
//! Core business logic for Life OS, a personal task/habit tracker with a
//! gamified completion engine and a posting-window alert daemon. It
//! implements a CLI-first philosophy where all operations are available
//! via a standalone CLI binary over this library.
//!
//! ## Architecture
//!
//! - **Completion engine**: records a task as done/undone per calendar
//!   day and derives XP, levels, and day streaks, with idempotency and
//!   day-rollover guarantees
//! - **Alert scheduler**: a polling loop that computes recurring,
//!   timezone-aware posting windows and fires each pre-alert at most once
//!   per window per day
//! - **Storage**: SQLite-based task/log/profile storage and TOML-based
//!   configuration
//!
//! ## Key Components
//!
//! - [`CompletionController`]: mark/undo orchestration and daily stats
//! - [`AlertScheduler`]: posting-window alert loop
//! - [`Database`]: task, log, and profile persistence
//! - [`Config`]: application configuration management

pub mod alerts;
pub mod clock;
pub mod completion;
pub mod error;
pub mod gamification;
pub mod model;
pub mod notify;
pub mod storage;
pub mod windows;

pub use alerts::AlertScheduler;
pub use clock::Clock;
pub use completion::{CompletionController, MarkOutcome, TodayStats};
pub use error::{ConfigError, CoreError, DatabaseError};
pub use model::{Niche, Task, TaskKind, TaskLog, UserProfile};
pub use notify::{Notifier, TelegramNotifier};
pub use storage::{Config, Database};
pub use windows::{PostingWindow, RolloverBoundary, WindowOccurrence};
