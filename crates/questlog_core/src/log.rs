use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::date::DateKey;

/// Habits completed on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub date: DateKey,
    /// Set semantics: no duplicates, order carries no meaning.
    pub completed_habit_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
}

impl DailyLog {
    pub fn empty(date: DateKey) -> Self {
        Self {
            date,
            completed_habit_ids: Vec::new(),
            mood: None,
        }
    }

    pub fn is_completed(&self, habit_id: &str) -> bool {
        self.completed_habit_ids.iter().any(|id| id == habit_id)
    }

    /// Flip membership of `habit_id`. Returns `true` if it is now completed.
    pub fn toggle(&mut self, habit_id: &str) -> bool {
        if self.is_completed(habit_id) {
            self.completed_habit_ids.retain(|id| id != habit_id);
            false
        } else {
            self.completed_habit_ids.push(habit_id.to_string());
            true
        }
    }

    pub fn completed_count(&self) -> usize {
        self.completed_habit_ids.len()
    }

    /// Drop repeated ids, keeping first occurrences.
    fn dedup(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.completed_habit_ids.retain(|id| seen.insert(id.clone()));
    }
}

/// Every daily log, keyed by date. Days without an entry have no completions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogBook {
    entries: BTreeMap<DateKey, DailyLog>,
}

impl LogBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// The log for `date`, or an empty one if nothing was recorded.
    pub fn day(&self, date: DateKey) -> DailyLog {
        self.entries
            .get(&date)
            .cloned()
            .unwrap_or_else(|| DailyLog::empty(date))
    }

    pub fn get(&self, date: DateKey) -> Option<&DailyLog> {
        self.entries.get(&date)
    }

    pub fn insert(&mut self, log: DailyLog) {
        self.entries.insert(log.date, log);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DateKey, &DailyLog)> {
        self.entries.iter()
    }

    /// Repair records read from storage: duplicate ids are collapsed and the
    /// inner `date` is forced to match its key.
    pub fn normalize(&mut self) {
        for (key, log) in self.entries.iter_mut() {
            log.dedup();
            if log.date != *key {
                tracing::warn!("Log for {} carried date {}, rewriting", key, log.date);
                log.date = *key;
            }
        }
    }
}

/// Entries are keyed by the given date, whatever the log's own `date` says.
/// Call [`LogBook::normalize`] afterwards to reconcile the two.
impl FromIterator<(DateKey, DailyLog)> for LogBook {
    fn from_iter<I: IntoIterator<Item = (DateKey, DailyLog)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
