pub mod coordinator;
pub mod sqlite;

pub use coordinator::{AdvisoryPanel, QuestCoordinator, ToggleOutcome};
pub use sqlite::{SqliteStore, LOGS_KEY, STATS_KEY};
