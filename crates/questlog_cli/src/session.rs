//! Interactive quest screen driven by a line editor.

use anyhow::Result;
use questlog_core::HabitCatalog;
use questlog_memory::QuestCoordinator;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::render;

const HELP: &str = "\
Commands:
  <n>          toggle the n-th quest on the viewed day
  t <id>       toggle a quest by id
  p, prev      previous day
  n, next      next day (never past today)
  today        jump back to today
  o, oracle    consult the oracle
  w, week      weekly report ending on the viewed day
  s, status    redraw the screen
  h, help      this help
  q, quit      leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Toggle(String),
    Prev,
    Next,
    Today,
    Oracle,
    Week,
    Status,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl SessionCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let mut parts = line.split_whitespace();
        let head = match parts.next() {
            Some(h) => h,
            None => return Self::Empty,
        };
        match head.to_ascii_lowercase().as_str() {
            "p" | "prev" => Self::Prev,
            "n" | "next" => Self::Next,
            "today" => Self::Today,
            "o" | "oracle" => Self::Oracle,
            "w" | "week" => Self::Week,
            "s" | "status" => Self::Status,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            "t" | "toggle" => match parts.next() {
                Some(id) => Self::Toggle(id.to_string()),
                None => Self::Unknown(line.to_string()),
            },
            _ if head.chars().all(|c| c.is_ascii_digit()) => Self::Toggle(head.to_string()),
            _ => Self::Unknown(line.to_string()),
        }
    }
}

/// Resolve a token to a habit id: exact id first, then 1-based position.
pub fn resolve_habit(catalog: &HabitCatalog, token: &str) -> Option<String> {
    if let Some(habit) = catalog.get(token) {
        return Some(habit.id.clone());
    }
    token
        .parse::<usize>()
        .ok()
        .and_then(|n| catalog.by_position(n))
        .map(|h| h.id.clone())
}

pub async fn run(coord: &mut QuestCoordinator) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    println!("{}", render::day_view(coord));
    println!("Type 'h' for help.");

    loop {
        let line = match rl.readline("quest> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let _ = rl.add_history_entry(line.as_str());
        coord.refresh_today();

        match SessionCommand::parse(&line) {
            SessionCommand::Empty => continue,
            SessionCommand::Quit => break,
            SessionCommand::Help => println!("{}", HELP),
            SessionCommand::Status => println!("{}", render::day_view(coord)),
            SessionCommand::Prev => {
                coord.prev_day();
                println!("{}", render::day_view(coord));
            }
            SessionCommand::Next => match coord.next_day() {
                Ok(_) => println!("{}", render::day_view(coord)),
                Err(e) => println!("{}", e),
            },
            SessionCommand::Today => {
                coord.go_to_today();
                println!("{}", render::day_view(coord));
            }
            SessionCommand::Toggle(token) => {
                let Some(id) = resolve_habit(coord.catalog(), &token) else {
                    println!("No quest '{}' on the board.", token);
                    continue;
                };
                match coord.toggle_viewed(&id).await {
                    Ok(outcome) => {
                        println!("{}", render::outcome(&outcome));
                        println!();
                        println!("{}", render::day_view(coord));
                    }
                    Err(e) => {
                        tracing::error!("Toggle failed: {:#}", e);
                        println!("[System Error]: {:#}", e);
                    }
                }
            }
            SessionCommand::Oracle => {
                println!("🔮 Divining your fate...");
                if coord.consult().await.is_some() {
                    println!("{}", render::panel(coord.panel()));
                }
                coord.panel_mut().close();
            }
            SessionCommand::Week => {
                let report = coord.weekly_report(coord.viewed_date());
                println!("{}", render::report(&report));
            }
            SessionCommand::Unknown(text) => {
                println!("Unknown command '{}'. Type 'h' for help.", text);
            }
        }
    }

    println!("Farewell, adventurer.");
    Ok(())
}
