use serde::Serialize;

use crate::date::DateKey;
use crate::habit::{Habit, HabitCatalog};
use crate::log::DailyLog;
use crate::UserStats;

/// Everything the advisor gets to see about one day.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressSnapshot {
    pub date: DateKey,
    pub completed_count: usize,
    pub total_habits: usize,
    pub stats: UserStats,
    pub habits: Vec<Habit>,
    pub uncompleted: Vec<Habit>,
}

impl ProgressSnapshot {
    pub fn build(catalog: &HabitCatalog, log: &DailyLog, stats: &UserStats) -> Self {
        let uncompleted = catalog
            .habits()
            .iter()
            .filter(|h| !log.is_completed(&h.id))
            .cloned()
            .collect();
        Self {
            date: log.date,
            completed_count: log.completed_count(),
            total_habits: catalog.len(),
            stats: stats.clone(),
            habits: catalog.habits().to_vec(),
            uncompleted,
        }
    }

    pub fn all_done(&self) -> bool {
        self.total_habits > 0 && self.uncompleted.is_empty()
    }

    /// Share of today's quests completed, in percent.
    pub fn completion_pct(&self) -> f64 {
        completion_pct(self.completed_count, self.total_habits)
    }
}

pub fn completion_pct(completed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (completed as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
    }
}
