use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::engine::{LEVEL_BASE_XP, XP_PER_HABIT};
use crate::error::QuestError;
use crate::habit::{Habit, HabitCatalog};

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuestlogConfig {
    pub llm: LlmConfig,
    pub progression: ProgressionConfig,
    pub storage: StorageConfig,
    /// Replaces the starter quests when present.
    pub habits: Option<Vec<Habit>>,
}

impl QuestlogConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    /// After loading, env var overrides are applied.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: QuestlogConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if file doesn't exist, return defaults with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({:#}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    /// The configured quest catalog, or the starter one.
    pub fn catalog(&self) -> Result<HabitCatalog, QuestError> {
        match &self.habits {
            Some(habits) => HabitCatalog::new(habits.clone()),
            None => Ok(HabitCatalog::starter()),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("QUESTLOG_DB") {
            self.storage.db_path = Some(v);
        }
        if let Ok(v) = std::env::var("LLM_PROVIDER") {
            self.llm.provider = v;
        }
        if let Ok(v) = std::env::var("LLM_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("LLM_BASE_URL") {
            self.llm.base_url = Some(v);
        }
        if let Ok(v) = std::env::var("LLM_MAX_TOKENS") {
            if let Ok(n) = v.parse() {
                self.llm.max_tokens = n;
            }
        }
        if let Ok(v) = std::env::var("LLM_TEMPERATURE") {
            if let Ok(n) = v.parse() {
                self.llm.temperature = n;
            }
        }
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// "gemini", "anthropic", "openai" or "mock".
    pub provider: String,
    pub model: String,
    pub base_url: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    /// No request timeout unless set.
    pub timeout_secs: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.5-flash".to_string(),
            base_url: None,
            max_tokens: 256,
            temperature: 0.9,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XpRule {
    /// Every toggle is worth `xp_per_habit`.
    #[default]
    Flat,
    /// Every toggle is worth the habit's own `xp_value`.
    HabitValue,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    pub level_base_xp: i64,
    pub xp_per_habit: i64,
    pub xp_rule: XpRule,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            level_base_xp: LEVEL_BASE_XP,
            xp_per_habit: XP_PER_HABIT,
            xp_rule: XpRule::Flat,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file; `:memory:` keeps everything in RAM.
    pub db_path: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::HabitIcon;

    #[test]
    fn test_default_config() {
        let cfg = QuestlogConfig::default();
        assert_eq!(cfg.llm.provider, "gemini");
        assert_eq!(cfg.llm.model, "gemini-2.5-flash");
        assert!(cfg.llm.timeout_secs.is_none());
        assert_eq!(cfg.progression.level_base_xp, 100);
        assert_eq!(cfg.progression.xp_per_habit, 15);
        assert_eq!(cfg.progression.xp_rule, XpRule::Flat);
        assert!(cfg.storage.db_path.is_none());
        assert_eq!(cfg.catalog().unwrap().len(), 6);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
[llm]
provider = "anthropic"
model = "claude-3-5-haiku-latest"
"#;
        let cfg: QuestlogConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.llm.provider, "anthropic");
        assert_eq!(cfg.llm.model, "claude-3-5-haiku-latest");
        // Defaults for unspecified fields
        assert_eq!(cfg.llm.max_tokens, 256);
        assert_eq!(cfg.progression.xp_per_habit, 15);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[llm]
provider = "openai"
model = "gpt-4o-mini"
base_url = "http://localhost:8080/v1"
max_tokens = 128
temperature = 0.5
timeout_secs = 30

[progression]
level_base_xp = 50
xp_per_habit = 10
xp_rule = "habit_value"

[storage]
db_path = "/tmp/quests.db"

[[habits]]
id = "read"
title = "Read"
description = "Study the ancient tomes."
icon = "brain"
xp_value = 20

[[habits]]
id = "sleep"
title = "Sleep Early"
icon = "moon"
xp_value = 5
"#;
        let cfg: QuestlogConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.llm.provider, "openai");
        assert_eq!(cfg.llm.base_url.as_deref(), Some("http://localhost:8080/v1"));
        assert_eq!(cfg.llm.timeout_secs, Some(30));
        assert_eq!(cfg.progression.level_base_xp, 50);
        assert_eq!(cfg.progression.xp_rule, XpRule::HabitValue);
        assert_eq!(cfg.storage.db_path.as_deref(), Some("/tmp/quests.db"));

        let catalog = cfg.catalog().unwrap();
        assert_eq!(catalog.len(), 2);
        let sleep = catalog.get("sleep").unwrap();
        assert_eq!(sleep.icon, HabitIcon::Moon);
        assert_eq!(sleep.description, "");
    }

    #[test]
    fn test_duplicate_habits_in_config() {
        let toml_str = r#"
[[habits]]
id = "a"
title = "A"
icon = "zap"
xp_value = 1

[[habits]]
id = "a"
title = "Again"
icon = "zap"
xp_value = 1
"#;
        let cfg: QuestlogConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.catalog().unwrap_err(), QuestError::DuplicateHabit("a".into()));
    }

    #[test]
    fn test_env_overrides_and_defaults() {
        // Part 1: env overrides
        std::env::set_var("LLM_PROVIDER", "mock");
        std::env::set_var("QUESTLOG_DB", ":memory:");

        let mut cfg = QuestlogConfig::default();
        cfg.apply_env_overrides();

        assert_eq!(cfg.llm.provider, "mock");
        assert_eq!(cfg.storage.db_path.as_deref(), Some(":memory:"));

        // Clean up env vars before testing defaults
        std::env::remove_var("LLM_PROVIDER");
        std::env::remove_var("QUESTLOG_DB");

        // Part 2: nonexistent path returns defaults (no env interference)
        let cfg = QuestlogConfig::load_or_default("/nonexistent/questlog.toml");
        assert_eq!(cfg.llm.provider, "gemini");
    }
}
