use anyhow::Context;
use clap::{Parser, Subcommand};
use questlog_core::config::QuestlogConfig;
use questlog_core::{DateKey, Progression, QuestError};
use questlog_memory::{QuestCoordinator, SqliteStore};
use questlog_reasoning::{create_client, CompletionParams, Oracle};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod render;
mod session;

#[derive(Parser, Debug)]
#[command(name = "questlog", author, version, about = "Daily habits as an RPG quest log", long_about = None)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "questlog.toml")]
    config: String,

    /// Path to the quest database (overrides config)
    #[arg(long)]
    db: Option<String>,

    /// LLM provider for the oracle: gemini, anthropic, openai or mock
    #[arg(long)]
    provider: Option<String>,

    /// Model name (overrides config)
    #[arg(short, long)]
    model: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show level and XP
    Status {
        /// Print the raw stats record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one day's quest board
    Day {
        #[arg(short, long)]
        date: Option<DateKey>,
    },
    /// Toggle a quest by id or 1-based position
    Toggle {
        habit: String,
        #[arg(short, long)]
        date: Option<DateKey>,
    },
    /// List the quest catalog
    Habits,
    /// Ask the oracle for a word on the day's progress
    Oracle {
        #[arg(short, long)]
        date: Option<DateKey>,
    },
    /// Seven-day report ending on the given day
    Week {
        #[arg(short, long)]
        date: Option<DateKey>,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("questlog").join("questlog.db"))
        .unwrap_or_else(|| PathBuf::from("questlog.db"))
}

fn not_beyond_today(date: DateKey) -> Result<DateKey, QuestError> {
    if date > DateKey::today() {
        Err(QuestError::BeyondToday(date))
    } else {
        Ok(date)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.log_json);

    let mut config = QuestlogConfig::load_or_default(&args.config);
    if let Some(db) = args.db {
        config.storage.db_path = Some(db);
    }
    if let Some(provider) = args.provider {
        config.llm.provider = provider;
    }
    if let Some(model) = args.model {
        config.llm.model = model;
    }

    let catalog = config.catalog().context("Invalid habit catalog in config")?;
    let progression = Progression::from_config(&config.progression);

    let db_path = config
        .storage
        .db_path
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(default_db_path);
    info!("Opening quest log at {}", db_path.display());
    let store = Arc::new(SqliteStore::new(&db_path).await?);

    let client = create_client(&config.llm)?;
    let advisor = Arc::new(Oracle::new(client, CompletionParams::from(&config.llm)));

    let mut coord = QuestCoordinator::load(store, advisor, catalog, progression).await?;

    match args.command {
        None => session::run(&mut coord).await?,
        Some(Command::Status { json }) => {
            if json {
                println!("{}", serde_json::to_string_pretty(coord.stats())?);
            } else {
                println!("{}", render::header(coord.stats(), coord.progression()));
            }
        }
        Some(Command::Day { date }) => {
            coord.go_to(not_beyond_today(date.unwrap_or(coord.today()))?);
            print!("{}", render::day_view(&coord));
        }
        Some(Command::Toggle { habit, date }) => {
            let date = date.unwrap_or(coord.today());
            let id = session::resolve_habit(coord.catalog(), &habit)
                .ok_or_else(|| QuestError::UnknownHabit(habit.clone()))?;
            let outcome = coord.toggle_habit(date, &id).await?;
            println!("{}", render::outcome(&outcome));
        }
        Some(Command::Habits) => print!("{}", render::habit_list(&coord)),
        Some(Command::Oracle { date }) => {
            coord.go_to(not_beyond_today(date.unwrap_or(coord.today()))?);
            if coord.consult().await.is_some() {
                print!("{}", render::panel(coord.panel()));
            }
        }
        Some(Command::Week { date }) => {
            let end = date.unwrap_or(coord.today());
            print!("{}", render::report(&coord.weekly_report(end)));
        }
    }

    Ok(())
}
