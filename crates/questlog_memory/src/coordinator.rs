//! QuestCoordinator — the application state container.
//!
//! Owns the in-memory log book, the player stats, the quest catalog and the
//! day being viewed. Every mutation goes through here: the new state is
//! computed off to the side, committed to the store in one transaction, and
//! only then swapped in, so memory and disk never disagree.

use anyhow::Result;
use questlog_core::{
    Advisor, DailyLog, DateKey, HabitCatalog, LevelChange, LogBook, ProgressSnapshot,
    Progression, QuestError, QuestStore, UserStats, WeeklyReport,
};
use std::sync::Arc;

/// Result of one habit toggle.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleOutcome {
    pub date: DateKey,
    pub habit_id: String,
    pub habit_title: String,
    /// True if the habit is now marked done.
    pub completed: bool,
    pub xp_delta: i64,
    pub level_change: LevelChange,
    pub stats: UserStats,
}

/// State of the oracle panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvisoryPanel {
    pub is_open: bool,
    pub is_loading: bool,
    pub message: String,
}

impl AdvisoryPanel {
    pub fn close(&mut self) {
        self.is_open = false;
    }
}

pub struct QuestCoordinator {
    store: Arc<dyn QuestStore>,
    advisor: Arc<dyn Advisor>,
    catalog: HabitCatalog,
    progression: Progression,
    logs: LogBook,
    stats: UserStats,
    today: DateKey,
    viewed: DateKey,
    panel: AdvisoryPanel,
}

impl QuestCoordinator {
    /// Load both records from `store` and start viewing today.
    pub async fn load(
        store: Arc<dyn QuestStore>,
        advisor: Arc<dyn Advisor>,
        catalog: HabitCatalog,
        progression: Progression,
    ) -> Result<Self> {
        Self::load_at(store, advisor, catalog, progression, DateKey::today()).await
    }

    /// Like [`load`](Self::load) with an explicit notion of "today".
    pub async fn load_at(
        store: Arc<dyn QuestStore>,
        advisor: Arc<dyn Advisor>,
        catalog: HabitCatalog,
        progression: Progression,
        today: DateKey,
    ) -> Result<Self> {
        let logs = store.load_logs().await?;
        let stats = store.load_stats().await?;
        tracing::info!(
            "Quest log loaded: {} days on record, level {} ({} XP)",
            logs.len(),
            stats.level,
            stats.current_xp
        );
        Ok(Self {
            store,
            advisor,
            catalog,
            progression,
            logs,
            stats,
            today,
            viewed: today,
            panel: AdvisoryPanel::default(),
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn stats(&self) -> &UserStats {
        &self.stats
    }

    pub fn logs(&self) -> &LogBook {
        &self.logs
    }

    pub fn catalog(&self) -> &HabitCatalog {
        &self.catalog
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn panel(&self) -> &AdvisoryPanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut AdvisoryPanel {
        &mut self.panel
    }

    pub fn today(&self) -> DateKey {
        self.today
    }

    pub fn viewed_date(&self) -> DateKey {
        self.viewed
    }

    pub fn is_viewing_today(&self) -> bool {
        self.viewed == self.today
    }

    /// Log of the day being viewed.
    pub fn current_log(&self) -> DailyLog {
        self.logs.day(self.viewed)
    }

    // =========================================================================
    // Date navigation
    // =========================================================================

    /// Re-read the wall clock. Long sessions call this between commands.
    pub fn refresh_today(&mut self) {
        self.today = DateKey::today();
    }

    pub fn prev_day(&mut self) -> DateKey {
        self.viewed = self.viewed.prev();
        self.viewed
    }

    /// Step forward one day; refused once today is reached.
    pub fn next_day(&mut self) -> Result<DateKey, QuestError> {
        let next = self.viewed.next();
        if next > self.today {
            return Err(QuestError::BeyondToday(next));
        }
        self.viewed = next;
        Ok(next)
    }

    pub fn go_to(&mut self, date: DateKey) {
        self.viewed = date;
    }

    pub fn go_to_today(&mut self) {
        self.viewed = self.today;
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Flip `habit_id` on `date` and move XP accordingly.
    ///
    /// Any date can be edited. Unknown ids are rejected before anything changes.
    pub async fn toggle_habit(&mut self, date: DateKey, habit_id: &str) -> Result<ToggleOutcome> {
        let habit = self.catalog.require(habit_id)?.clone();
        let xp = self.progression.xp_for(&habit);

        let mut log = self.logs.day(date);
        let completed = log.toggle(&habit.id);
        let xp_delta = if completed { xp } else { -xp };

        let mut logs = self.logs.clone();
        logs.insert(log);
        let stats = self.progression.apply(&self.stats, xp_delta);

        self.store.commit_toggle(&logs, &stats).await?;

        let level_change = LevelChange::between(&self.stats, &stats);
        match level_change {
            LevelChange::Up(n) => tracing::info!("Level up x{} -> {}", n, stats.level),
            LevelChange::Down(n) => tracing::info!("Level down x{} -> {}", n, stats.level),
            LevelChange::Unchanged => {}
        }

        self.logs = logs;
        self.stats = stats.clone();

        Ok(ToggleOutcome {
            date,
            habit_id: habit.id,
            habit_title: habit.title,
            completed,
            xp_delta,
            level_change,
            stats,
        })
    }

    /// Toggle on the day being viewed.
    pub async fn toggle_viewed(&mut self, habit_id: &str) -> Result<ToggleOutcome> {
        self.toggle_habit(self.viewed, habit_id).await
    }

    // =========================================================================
    // Reporting
    // =========================================================================

    pub fn snapshot(&self, date: DateKey) -> ProgressSnapshot {
        ProgressSnapshot::build(&self.catalog, &self.logs.day(date), &self.stats)
    }

    pub fn weekly_report(&self, end: DateKey) -> WeeklyReport {
        WeeklyReport::build(&self.logs, &self.catalog, end)
    }

    /// Ask the advisor about the viewed day and show the answer in the panel.
    ///
    /// Returns `None` without calling out if a request is already in flight.
    pub async fn consult(&mut self) -> Option<String> {
        if self.panel.is_loading {
            tracing::debug!("Oracle already consulted, waiting for the answer");
            return None;
        }
        self.panel.is_open = true;
        self.panel.is_loading = true;

        let snapshot = self.snapshot(self.viewed);
        let message = self.advisor.advise(&snapshot).await;

        self.panel.message = message.clone();
        self.panel.is_loading = false;
        Some(message)
    }
}
