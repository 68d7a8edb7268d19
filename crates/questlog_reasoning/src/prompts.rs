use questlog_core::{Habit, ProgressSnapshot};

pub const ORACLE_SYSTEM: &str =
    "You are an RPG quest giver reading an adventurer's daily log. Speak with flavor and atmosphere.";

fn titles(habits: &[Habit]) -> String {
    if habits.is_empty() {
        "none".to_string()
    } else {
        habits
            .iter()
            .map(|h| h.title.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Prompt for one oracle consultation about `snapshot`.
pub fn oracle_prompt(snapshot: &ProgressSnapshot) -> String {
    let guidance = if snapshot.all_done() {
        "Every quest is done: celebrate the victory."
    } else {
        "Some quests remain: urge them to persevere, or warn of decaying mana."
    };
    format!(
        "You are a wise guild master or a mystical spirit guide. The adventurer tracks daily habits as quests.\n\n\
         Current stats:\n\
         - Level: {level}\n\
         - Streak: {streak} days\n\
         - Progress on {date}: {done}/{total} quests completed\n\n\
         Quests on the board: {all}\n\
         Quests still open: {open}\n\n\
         Reply with a short, immersive, RPG-flavored remark of at most two sentences. {guidance}",
        level = snapshot.stats.level,
        streak = snapshot.stats.streak,
        date = snapshot.date,
        done = snapshot.completed_count,
        total = snapshot.total_habits,
        all = titles(&snapshot.habits),
        open = titles(&snapshot.uncompleted),
        guidance = guidance,
    )
}
