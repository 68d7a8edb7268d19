//! Level/XP state machine.
//!
//! `current_xp` lives inside the capacity of the current level, which is
//! `level * level_base_xp`. Every delta is folded in and the result is
//! re-normalized so that `0 <= current_xp < level * level_base_xp` and
//! `level >= 1` always hold afterwards.

use crate::config::{ProgressionConfig, XpRule};
use crate::habit::Habit;
use crate::UserStats;

pub const LEVEL_BASE_XP: i64 = 100;
pub const XP_PER_HABIT: i64 = 15;

/// XP capacity of a level.
pub fn level_capacity(level: u32, level_base_xp: i64) -> i64 {
    i64::from(level.max(1)).saturating_mul(level_base_xp)
}

/// Fold a signed XP delta into `stats`.
///
/// Crossing several thresholds in one delta moves several levels. Below level
/// 1 the XP floor is clamped to zero; `total_xp` is never clamped.
pub fn apply_xp_delta(stats: &UserStats, delta: i64, level_base_xp: i64) -> UserStats {
    let base = level_base_xp.max(1);
    let mut level = stats.level.max(1);
    let mut xp = stats.current_xp.saturating_add(delta);
    let total = stats.total_xp.saturating_add(delta);

    if xp >= level_capacity(level, base) {
        while xp >= level_capacity(level, base) {
            xp -= level_capacity(level, base);
            level += 1;
        }
    } else {
        while xp < 0 && level > 1 {
            level -= 1;
            xp += level_capacity(level, base);
        }
        if xp < 0 {
            xp = 0;
        }
    }

    UserStats {
        level,
        current_xp: xp,
        total_xp: total,
        ..stats.clone()
    }
}

/// How a single update moved the player's level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelChange {
    Unchanged,
    Up(u32),
    Down(u32),
}

impl LevelChange {
    pub fn between(before: &UserStats, after: &UserStats) -> Self {
        match after.level.cmp(&before.level) {
            std::cmp::Ordering::Greater => Self::Up(after.level - before.level),
            std::cmp::Ordering::Less => Self::Down(before.level - after.level),
            std::cmp::Ordering::Equal => Self::Unchanged,
        }
    }
}

/// Progression rules resolved from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Progression {
    level_base_xp: i64,
    xp_per_habit: i64,
    rule: XpRule,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            level_base_xp: LEVEL_BASE_XP,
            xp_per_habit: XP_PER_HABIT,
            rule: XpRule::Flat,
        }
    }
}

impl Progression {
    pub fn from_config(config: &ProgressionConfig) -> Self {
        if config.level_base_xp < 1 {
            tracing::warn!(
                "level_base_xp {} is not positive, using {}",
                config.level_base_xp,
                LEVEL_BASE_XP
            );
        }
        if config.xp_per_habit < 1 {
            tracing::warn!(
                "xp_per_habit {} is not positive, using {}",
                config.xp_per_habit,
                XP_PER_HABIT
            );
        }
        Self {
            level_base_xp: if config.level_base_xp < 1 { LEVEL_BASE_XP } else { config.level_base_xp },
            xp_per_habit: if config.xp_per_habit < 1 { XP_PER_HABIT } else { config.xp_per_habit },
            rule: config.xp_rule,
        }
    }

    pub fn level_base_xp(&self) -> i64 {
        self.level_base_xp
    }

    /// XP granted (or taken back) for one toggle of `habit`.
    pub fn xp_for(&self, habit: &Habit) -> i64 {
        match self.rule {
            XpRule::Flat => self.xp_per_habit,
            XpRule::HabitValue => i64::from(habit.xp_value),
        }
    }

    /// XP needed to fill the bar at `level`.
    pub fn xp_for_next_level(&self, level: u32) -> i64 {
        level_capacity(level, self.level_base_xp)
    }

    pub fn apply(&self, stats: &UserStats, delta: i64) -> UserStats {
        apply_xp_delta(stats, delta, self.level_base_xp)
    }
}
