use crate::date::DateKey;

/// Domain errors surfaced to the player as a one-line message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestError {
    #[error("unknown habit '{0}'")]
    UnknownHabit(String),

    #[error("habit id '{0}' appears more than once in the catalog")]
    DuplicateHabit(String),

    #[error("habit '{0}' must be worth at least 1 XP")]
    InvalidXpValue(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("the future is unwritten: {0} is after today")]
    BeyondToday(DateKey),
}
