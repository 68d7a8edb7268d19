//! Plain-text rendering of the quest screen.

use questlog_core::{HabitIcon, LevelChange, Progression, UserStats, WeeklyReport};
use questlog_memory::{AdvisoryPanel, QuestCoordinator, ToggleOutcome};
use std::fmt::Write;

const BAR_WIDTH: usize = 24;

pub fn icon_glyph(icon: HabitIcon) -> &'static str {
    match icon {
        HabitIcon::Activity => "🤸",
        HabitIcon::Brain => "🧠",
        HabitIcon::Zap => "⚡",
        HabitIcon::Pill => "💊",
        HabitIcon::Smile => "😁",
        // Medications share the pill glyph
        HabitIcon::Utensils => "💊",
        HabitIcon::Moon => "🌙",
    }
}

/// `[#####.......]` filled to `current / max`, clamped to 0–100 %.
pub fn progress_bar(current: i64, max: i64, width: usize) -> String {
    let ratio = if max <= 0 {
        0.0
    } else {
        (current as f64 / max as f64).clamp(0.0, 1.0)
    };
    let filled = (ratio * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

pub fn header(stats: &UserStats, progression: &Progression) -> String {
    let next = progression.xp_for_next_level(stats.level);
    format!(
        "🏆 Level {} Scout    Total XP: {}    Streak: {}\n   XP to Level {} {} {}/{}",
        stats.level,
        stats.total_xp,
        stats.streak,
        stats.level + 1,
        progress_bar(stats.current_xp, next, BAR_WIDTH),
        stats.current_xp,
        next
    )
}

/// The whole screen for the day being viewed.
pub fn day_view(coord: &QuestCoordinator) -> String {
    let mut out = String::new();
    let date = coord.viewed_date();
    let snapshot = coord.snapshot(date);
    let log = coord.current_log();

    let _ = writeln!(out, "{}", header(coord.stats(), coord.progression()));
    let _ = writeln!(out);
    let _ = write!(out, "📅 {} ({})", date.long_label(), date);
    if !coord.is_viewing_today() {
        let _ = write!(out, "  Viewing History");
    }
    let _ = writeln!(out);

    let pct = snapshot.completion_pct();
    let _ = writeln!(
        out,
        "Quest Progress {} {}%",
        progress_bar(pct.round() as i64, 100, BAR_WIDTH),
        pct.round()
    );
    let _ = writeln!(out);

    if coord.catalog().is_empty() {
        let _ = writeln!(out, "No quests assigned by the guild master yet.");
        return out;
    }

    for (i, habit) in coord.catalog().habits().iter().enumerate() {
        let done = log.is_completed(&habit.id);
        let _ = writeln!(
            out,
            " {} {}. {} {:<22} +{} XP",
            if done { "[x]" } else { "[ ]" },
            i + 1,
            icon_glyph(habit.icon),
            habit.title,
            coord.progression().xp_for(habit)
        );
        if !habit.description.is_empty() {
            let _ = writeln!(out, "          {}", habit.description);
        }
    }

    if snapshot.all_done() {
        let _ = writeln!(out);
        let _ = writeln!(out, "✨ Daily Quest Complete! Rest easy, hero. Your streak is safe.");
    }
    out
}

pub fn habit_list(coord: &QuestCoordinator) -> String {
    let mut out = String::new();
    for habit in coord.catalog().habits() {
        let _ = writeln!(
            out,
            "{:>4}  {} {:<22} {:>3} XP  {}",
            habit.id,
            icon_glyph(habit.icon),
            habit.title,
            coord.progression().xp_for(habit),
            habit.description
        );
    }
    if out.is_empty() {
        out.push_str("No quests assigned by the guild master yet.\n");
    }
    out
}

pub fn outcome(outcome: &ToggleOutcome) -> String {
    let mut out = if outcome.completed {
        format!(
            "✔ {} completed on {} ({:+} XP)",
            outcome.habit_title, outcome.date, outcome.xp_delta
        )
    } else {
        format!(
            "✘ {} unmarked on {} ({:+} XP)",
            outcome.habit_title, outcome.date, outcome.xp_delta
        )
    };
    match outcome.level_change {
        LevelChange::Up(_) => {
            let _ = write!(out, "\n⬆ LEVEL UP! You are now level {}.", outcome.stats.level);
        }
        LevelChange::Down(_) => {
            let _ = write!(out, "\n⬇ You fall back to level {}.", outcome.stats.level);
        }
        LevelChange::Unchanged => {}
    }
    out
}

pub fn panel(panel: &AdvisoryPanel) -> String {
    let body = if panel.is_loading {
        "Divining your fate...".to_string()
    } else {
        format!("\"{}\"", panel.message)
    };
    format!("🔮 The Oracle Speaks\n\n   {}\n", body)
}

pub fn report(report: &WeeklyReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Weekly report {} → {}", report.start, report.end);
    for day in &report.days {
        let _ = writeln!(
            out,
            "  {}  {} {}/{}",
            day.date,
            progress_bar(day.completed as i64, report.total_habits as i64, 12),
            day.completed,
            report.total_habits
        );
    }
    let _ = writeln!(
        out,
        "Completion: {:.0}%   Perfect days: {}",
        report.completion_pct, report.perfect_days
    );
    if let Some((title, n)) = &report.most_consistent {
        let _ = writeln!(out, "Most consistent:  {} ({}/{})", title, n, report.days.len());
    }
    if let Some((title, n)) = &report.least_consistent {
        let _ = writeln!(out, "Least consistent: {} ({}/{})", title, n, report.days.len());
    }
    let _ = writeln!(out, "{}", report.verdict());
    out
}
