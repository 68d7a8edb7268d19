//! Integration tests for QuestCoordinator
//!
//! Uses tempfile::TempDir for isolated SQLite databases.

use async_trait::async_trait;
use questlog_core::{
    Advisor, DateKey, HabitCatalog, LevelChange, LogBook, ProgressSnapshot, Progression,
    QuestError, QuestStore, UserStats,
};
use questlog_memory::{QuestCoordinator, SqliteStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Advisor that echoes the snapshot it was given.
#[derive(Default)]
struct EchoAdvisor {
    calls: AtomicUsize,
}

#[async_trait]
impl Advisor for EchoAdvisor {
    async fn advise(&self, snapshot: &ProgressSnapshot) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        format!(
            "{}/{} on {}, level {}",
            snapshot.completed_count, snapshot.total_habits, snapshot.date, snapshot.stats.level
        )
    }
}

/// Store whose writes always fail.
struct BrokenStore;

#[async_trait]
impl QuestStore for BrokenStore {
    async fn load_logs(&self) -> anyhow::Result<LogBook> {
        Ok(LogBook::new())
    }
    async fn load_stats(&self) -> anyhow::Result<UserStats> {
        Ok(UserStats::new(today()))
    }
    async fn save_stats(&self, _stats: &UserStats) -> anyhow::Result<()> {
        anyhow::bail!("disk full")
    }
    async fn commit_toggle(&self, _logs: &LogBook, _stats: &UserStats) -> anyhow::Result<()> {
        anyhow::bail!("disk full")
    }
}

fn today() -> DateKey {
    DateKey::from_ymd(2024, 10, 15).unwrap()
}

async fn setup(dir: &tempfile::TempDir) -> (QuestCoordinator, Arc<SqliteStore>, Arc<EchoAdvisor>) {
    let db_path = dir.path().join("test.db");
    let store = Arc::new(SqliteStore::new(&db_path).await.unwrap());
    let advisor = Arc::new(EchoAdvisor::default());
    let coord = QuestCoordinator::load_at(
        store.clone(),
        advisor.clone(),
        HabitCatalog::starter(),
        Progression::default(),
        today(),
    )
    .await
    .unwrap();
    (coord, store, advisor)
}

/// Test 1: seven completions reach level 2 with 5 XP, one undo drops back
#[tokio::test]
async fn test_level_up_and_down_scenario() {
    let dir = tempfile::TempDir::new().unwrap();
    let (mut coord, store, _) = setup(&dir).await;

    // Six habits today, one yesterday
    for id in ["1", "2", "3", "4", "5", "6"] {
        coord.toggle_habit(today(), id).await.unwrap();
    }
    let outcome = coord.toggle_habit(today().prev(), "1").await.unwrap();
    assert_eq!(outcome.level_change, LevelChange::Up(1));
    let s = coord.stats();
    assert_eq!((s.level, s.current_xp, s.total_xp), (2, 5, 105));

    let outcome = coord.toggle_habit(today(), "3").await.unwrap();
    assert!(!outcome.completed);
    assert_eq!(outcome.xp_delta, -15);
    assert_eq!(outcome.level_change, LevelChange::Down(1));
    let s = coord.stats();
    assert_eq!((s.level, s.current_xp, s.total_xp), (1, 90, 90));

    // Disk agrees with memory
    assert_eq!(&store.load_stats().await.unwrap(), coord.stats());
    assert_eq!(&store.load_logs().await.unwrap(), coord.logs());
}

/// Test 2: toggling twice restores both records
#[tokio::test]
async fn test_double_toggle_is_identity() {
    let dir = tempfile::TempDir::new().unwrap();
    let (mut coord, store, _) = setup(&dir).await;
    coord.toggle_habit(today(), "2").await.unwrap();

    let logs_before = coord.logs().day(today());
    let stats_before = coord.stats().clone();

    coord.toggle_habit(today(), "5").await.unwrap();
    coord.toggle_habit(today(), "5").await.unwrap();

    let mut ids_after = coord.logs().day(today()).completed_habit_ids;
    let mut ids_before = logs_before.completed_habit_ids;
    ids_after.sort();
    ids_before.sort();
    assert_eq!(ids_after, ids_before);
    assert_eq!(coord.stats(), &stats_before);
    assert_eq!(store.load_stats().await.unwrap(), stats_before);
}

/// Test 3: unknown habit ids leave everything untouched
#[tokio::test]
async fn test_unknown_habit_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let (mut coord, store, _) = setup(&dir).await;

    let err = coord.toggle_habit(today(), "dragon").await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<QuestError>(),
        Some(&QuestError::UnknownHabit("dragon".into()))
    );
    assert!(coord.logs().is_empty());
    assert_eq!(coord.stats().total_xp, 0);
    assert!(store.load_logs().await.unwrap().is_empty());
}

/// Test 4: state reloads identically in a new session
#[tokio::test]
async fn test_reload_restores_session() {
    let dir = tempfile::TempDir::new().unwrap();
    let (mut coord, _, _) = setup(&dir).await;
    coord.toggle_habit(today(), "1").await.unwrap();
    coord.toggle_habit(today().prev().prev(), "4").await.unwrap();
    let logs = coord.logs().clone();
    let stats = coord.stats().clone();
    drop(coord);

    let (reloaded, _, _) = setup(&dir).await;
    assert_eq!(reloaded.logs(), &logs);
    assert_eq!(reloaded.stats(), &stats);
}

/// Test 5: a failed commit changes neither memory nor disk
#[tokio::test]
async fn test_failed_commit_keeps_state() {
    let mut coord = QuestCoordinator::load_at(
        Arc::new(BrokenStore),
        Arc::new(EchoAdvisor::default()),
        HabitCatalog::starter(),
        Progression::default(),
        today(),
    )
    .await
    .unwrap();

    assert!(coord.toggle_habit(today(), "1").await.is_err());
    assert!(coord.logs().is_empty());
    assert_eq!(coord.stats().current_xp, 0);
}

/// Test 6: navigation refuses to pass today
#[tokio::test]
async fn test_navigation_stops_at_today() {
    let dir = tempfile::TempDir::new().unwrap();
    let (mut coord, _, _) = setup(&dir).await;

    assert!(coord.is_viewing_today());
    assert_eq!(
        coord.next_day().unwrap_err(),
        QuestError::BeyondToday(today().next())
    );

    coord.prev_day();
    coord.prev_day();
    assert!(!coord.is_viewing_today());
    coord.toggle_viewed("6").await.unwrap();
    assert!(coord.logs().day(today().prev().prev()).is_completed("6"));

    assert_eq!(coord.next_day().unwrap(), today().prev());
    coord.go_to_today();
    assert!(coord.is_viewing_today());
}

/// Test 7: the oracle sees the viewed day and the panel settles
#[tokio::test]
async fn test_consult_fills_panel() {
    let dir = tempfile::TempDir::new().unwrap();
    let (mut coord, _, advisor) = setup(&dir).await;
    coord.toggle_habit(today(), "1").await.unwrap();
    coord.toggle_habit(today(), "2").await.unwrap();

    let message = coord.consult().await.unwrap();
    assert_eq!(message, "2/6 on 2024-10-15, level 1");
    let panel = coord.panel();
    assert!(panel.is_open);
    assert!(!panel.is_loading);
    assert_eq!(panel.message, message);
    assert_eq!(advisor.calls.load(Ordering::SeqCst), 1);

    coord.panel_mut().close();
    assert!(!coord.panel().is_open);
}

/// Test 8: weekly report reflects coordinator logs
#[tokio::test]
async fn test_weekly_report() {
    let dir = tempfile::TempDir::new().unwrap();
    let (mut coord, _, _) = setup(&dir).await;
    for id in ["1", "2", "3", "4", "5", "6"] {
        coord.toggle_habit(today(), id).await.unwrap();
    }
    let report = coord.weekly_report(today());
    assert_eq!(report.perfect_days, 1);
    assert_eq!(report.days.last().unwrap().completed, 6);
}
