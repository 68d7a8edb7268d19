pub mod config;
pub mod date;
pub mod engine;
pub mod error;
pub mod habit;
pub mod log;
pub mod report;
pub mod snapshot;

pub use date::DateKey;
pub use engine::{apply_xp_delta, LevelChange, Progression, LEVEL_BASE_XP, XP_PER_HABIT};
pub use error::QuestError;
pub use habit::{Habit, HabitCatalog, HabitIcon};
pub use log::{DailyLog, LogBook};
pub use report::WeeklyReport;
pub use snapshot::ProgressSnapshot;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Player progression record. One per installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub level: u32,
    pub current_xp: i64,
    /// Cumulative signed XP. Never clamped, so it can go negative.
    pub total_xp: i64,
    /// Reserved: persisted and displayed, not recomputed.
    pub streak: u32,
    /// Reserved: persisted, not consulted.
    pub last_login_date: DateKey,
}

impl UserStats {
    pub fn new(today: DateKey) -> Self {
        Self {
            level: 1,
            current_xp: 0,
            total_xp: 0,
            streak: 0,
            last_login_date: today,
        }
    }
}

impl Default for UserStats {
    fn default() -> Self {
        Self::new(DateKey::today())
    }
}

/// Durable home of the quest log and the player stats.
///
/// Both records are stored whole. Implementations recover from unreadable
/// records by returning the default value.
#[async_trait]
pub trait QuestStore: Send + Sync {
    async fn load_logs(&self) -> anyhow::Result<LogBook>;
    async fn load_stats(&self) -> anyhow::Result<UserStats>;
    async fn save_stats(&self, stats: &UserStats) -> anyhow::Result<()>;
    /// Write the log book and the stats together; either both land or neither.
    async fn commit_toggle(&self, logs: &LogBook, stats: &UserStats) -> anyhow::Result<()>;
}

/// Source of flavor commentary on the player's progress.
///
/// Never fails: implementations degrade to a fixed fallback line.
#[async_trait]
pub trait Advisor: Send + Sync {
    async fn advise(&self, snapshot: &ProgressSnapshot) -> String;
}
