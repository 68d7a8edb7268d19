use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use questlog_core::{DailyLog, DateKey, LogBook, QuestStore, UserStats};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Row, Sqlite};
use std::collections::BTreeMap;
use std::path::Path;

pub const LOGS_KEY: &str = "questlife_logs";
pub const STATS_KEY: &str = "questlife_stats";

/// Key-value store on SQLite. Each logical record is one JSON document.
#[derive(Clone)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    pub async fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref();
        let pool = if path.as_os_str() == ":memory:" {
            // Every connection to :memory: is its own database, so pin one.
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect("sqlite::memory:")
                .await
        } else {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            SqlitePoolOptions::new()
                .connect(&format!("sqlite://{}?mode=rwc", path.display()))
                .await
        }
        .context("Failed to connect to SQLite database")?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create kv_store table")?;
        Ok(())
    }

    /// Raw value under `key`, if any.
    pub async fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to read {}", key))?;
        Ok(row.map(|r| r.get("value")))
    }

    /// Overwrite the value under `key`.
    pub async fn put_raw(&self, key: &str, value: &str) -> Result<()> {
        upsert(&self.pool, key, value).await
    }

    pub async fn save_logs(&self, logs: &LogBook) -> Result<()> {
        let json = serde_json::to_string(logs).context("Failed to serialize logs")?;
        self.put_raw(LOGS_KEY, &json).await?;
        tracing::debug!("Saved {} daily logs", logs.len());
        Ok(())
    }
}

async fn upsert<'e, E>(executor: E, key: &'e str, value: &'e str) -> Result<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(value)
    .bind(Utc::now().timestamp())
    .execute(executor)
    .await
    .with_context(|| format!("Failed to write {}", key))?;
    Ok(())
}

#[async_trait]
impl QuestStore for SqliteStore {
    async fn load_logs(&self) -> Result<LogBook> {
        let Some(json) = self.get_raw(LOGS_KEY).await? else {
            return Ok(LogBook::new());
        };
        let raw = match serde_json::from_str::<BTreeMap<String, serde_json::Value>>(&json) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Stored logs are unreadable ({}), starting with an empty log", e);
                return Ok(LogBook::new());
            }
        };

        // One bad day must not cost the rest of the history.
        let mut logs: LogBook = raw
            .into_iter()
            .filter_map(|(key, value)| {
                let date = match key.parse::<DateKey>() {
                    Ok(date) => date,
                    Err(e) => {
                        tracing::warn!("Dropping stored log: {}", e);
                        return None;
                    }
                };
                match serde_json::from_value::<DailyLog>(value) {
                    Ok(log) => Some((date, log)),
                    Err(e) => {
                        tracing::warn!("Dropping stored log for {}: {}", date, e);
                        None
                    }
                }
            })
            .collect();
        logs.normalize();
        Ok(logs)
    }

    async fn load_stats(&self) -> Result<UserStats> {
        let Some(json) = self.get_raw(STATS_KEY).await? else {
            return Ok(UserStats::default());
        };
        match serde_json::from_str::<UserStats>(&json) {
            Ok(stats) => Ok(stats),
            Err(e) => {
                tracing::warn!("Stored stats are unreadable ({}), starting fresh", e);
                Ok(UserStats::default())
            }
        }
    }

    async fn save_stats(&self, stats: &UserStats) -> Result<()> {
        let json = serde_json::to_string(stats).context("Failed to serialize stats")?;
        self.put_raw(STATS_KEY, &json).await?;
        tracing::debug!("Stats saved");
        Ok(())
    }

    async fn commit_toggle(&self, logs: &LogBook, stats: &UserStats) -> Result<()> {
        let logs_json = serde_json::to_string(logs).context("Failed to serialize logs")?;
        let stats_json = serde_json::to_string(stats).context("Failed to serialize stats")?;

        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;
        upsert(&mut *tx, LOGS_KEY, &logs_json).await?;
        upsert(&mut *tx, STATS_KEY, &stats_json).await?;
        tx.commit().await.context("Failed to commit toggle")?;

        tracing::debug!(
            "Toggle committed: level={} xp={} total={}",
            stats.level,
            stats.current_xp,
            stats.total_xp
        );
        Ok(())
    }
}
