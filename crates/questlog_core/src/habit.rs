use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::QuestError;

/// Closed set of habit icons. Unknown tags are rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitIcon {
    Activity,
    Brain,
    Zap,
    Pill,
    Smile,
    Utensils,
    Moon,
}

/// A recurring daily quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub title: String,
    /// Flavor text only.
    #[serde(default)]
    pub description: String,
    pub icon: HabitIcon,
    #[serde(alias = "xpValue")]
    pub xp_value: u32,
}

impl Habit {
    fn new(id: &str, title: &str, description: &str, icon: HabitIcon, xp_value: u32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            icon,
            xp_value,
        }
    }
}

/// The quests on offer. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitCatalog {
    habits: Vec<Habit>,
}

impl HabitCatalog {
    /// Build a catalog, rejecting duplicate ids and zero-XP habits.
    pub fn new(habits: Vec<Habit>) -> Result<Self, QuestError> {
        let mut seen = HashSet::new();
        for habit in &habits {
            if !seen.insert(habit.id.as_str()) {
                return Err(QuestError::DuplicateHabit(habit.id.clone()));
            }
            if habit.xp_value == 0 {
                return Err(QuestError::InvalidXpValue(habit.id.clone()));
            }
        }
        Ok(Self { habits })
    }

    /// The six starter quests.
    pub fn starter() -> Self {
        Self {
            habits: vec![
                Habit::new("1", "Stretching", "Elongate the limbs for agility.", HabitIcon::Activity, 10),
                Habit::new("2", "Practice Mindfulness", "Meditate to restore mana.", HabitIcon::Brain, 15),
                Habit::new("3", "Move Body", "Physical exertion builds strength.", HabitIcon::Zap, 20),
                Habit::new("4", "Take Vitamins", "Ingest micro-nutrients.", HabitIcon::Pill, 5),
                Habit::new("5", "Brush Teeth", "Polish the ivory defenses.", HabitIcon::Smile, 5),
                Habit::new("6", "Take Medications", "Essential alchemy for health.", HabitIcon::Utensils, 10),
            ],
        }
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn get(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&Habit, QuestError> {
        self.get(id).ok_or_else(|| QuestError::UnknownHabit(id.to_string()))
    }

    /// 1-based position lookup, as shown in the quest grid.
    pub fn by_position(&self, position: usize) -> Option<&Habit> {
        position.checked_sub(1).and_then(|i| self.habits.get(i))
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }
}

impl Default for HabitCatalog {
    fn default() -> Self {
        Self::starter()
    }
}
