//! Seven-day progress report, computed from the logs alone.

use serde::Serialize;

use crate::date::DateKey;
use crate::habit::HabitCatalog;
use crate::log::LogBook;
use crate::snapshot::completion_pct;

pub const REPORT_DAYS: u64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayTally {
    pub date: DateKey,
    pub completed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyReport {
    pub start: DateKey,
    pub end: DateKey,
    /// Oldest first.
    pub days: Vec<DayTally>,
    pub total_habits: usize,
    pub completion_pct: f64,
    pub perfect_days: usize,
    /// (habit title, days completed). Ties resolve to catalog order.
    pub most_consistent: Option<(String, usize)>,
    pub least_consistent: Option<(String, usize)>,
}

impl WeeklyReport {
    /// Report for the seven days ending at `end` (inclusive).
    pub fn build(logs: &LogBook, catalog: &HabitCatalog, end: DateKey) -> Self {
        let start = end.minus_days(REPORT_DAYS - 1);
        let mut days = Vec::with_capacity(REPORT_DAYS as usize);
        let mut date = start;
        loop {
            let log = logs.day(date);
            // Ids no longer in the catalog do not count
            let completed = catalog
                .habits()
                .iter()
                .filter(|h| log.is_completed(&h.id))
                .count();
            days.push(DayTally { date, completed });
            if date >= end {
                break;
            }
            date = date.next();
        }

        let total_habits = catalog.len();
        let done: usize = days.iter().map(|d| d.completed).sum();
        let perfect_days = days
            .iter()
            .filter(|d| total_habits > 0 && d.completed == total_habits)
            .count();

        let per_habit: Vec<(String, usize)> = catalog
            .habits()
            .iter()
            .map(|h| {
                let count = days
                    .iter()
                    .filter(|d| logs.day(d.date).is_completed(&h.id))
                    .count();
                (h.title.clone(), count)
            })
            .collect();

        let mut most: Option<(String, usize)> = None;
        let mut least: Option<(String, usize)> = None;
        for (title, count) in &per_habit {
            if most.as_ref().map_or(true, |(_, c)| count > c) {
                most = Some((title.clone(), *count));
            }
            if least.as_ref().map_or(true, |(_, c)| count < c) {
                least = Some((title.clone(), *count));
            }
        }

        Self {
            start,
            end,
            completion_pct: completion_pct(done, total_habits * days.len()),
            days,
            total_habits,
            perfect_days,
            most_consistent: most,
            least_consistent: least,
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self.completion_pct {
            p if p >= 100.0 => "A flawless campaign. The bards are already writing songs.",
            p if p >= 75.0 => "A strong week. The guild takes note of your discipline.",
            p if p >= 40.0 => "Steady progress, adventurer. Keep the torch lit.",
            p if p > 0.0 => "Your mana runs thin. Return to the quest board.",
            _ => "The quest board gathers dust. Every legend starts with one step.",
        }
    }
}
