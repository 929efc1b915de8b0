use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use nudge_core::{
    CatalogView, DayBoundary, EffortLevel, Recurrence, SeededRandom, SessionEngine, TaskDraft, TaskPatch,
    TaskRepository, ThreadRandom, availability_summary, catalog_stats, catalog_view, parse_local_to_utc,
};
use nudge_import::{export_to_path, import_into, read_rows_from_path};
use std::io::{self, Write};
use std::path::PathBuf;

mod config;
mod play;
mod state;

use config::ConfigInit;
use play::{Play, describe};
use state::JsonFileStore;

#[derive(Parser, Debug)]
#[command(
    name = "nudge",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("NUDGE_BUILD_SHA"), ")"),
    about = "Pick an effort level, get one task"
)]
struct Cli {
    /// Pretend it is this local time ("2024-01-02 08:00" or "2024-01-02")
    #[arg(long, global = true)]
    now: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a task
    Add {
        title: String,

        /// low | medium | high
        #[arg(long, short, default_value = "low")]
        level: EffortLevel,

        /// Recurrence like 3d, 2w, "every month" (omit for one-time)
        #[arg(long)]
        every: Option<String>,
    },

    /// List tasks (recurring + open one-time by default)
    List {
        /// Show completed one-time tasks instead
        #[arg(long, default_value_t = false)]
        archive: bool,

        /// Print raw JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Change a task's title, level or recurrence
    Edit {
        /// Task id (a unique prefix is enough)
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long, short)]
        level: Option<EffortLevel>,

        #[arg(long)]
        every: Option<String>,
    },

    /// Delete a task
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short, default_value_t = false)]
        yes: bool,
    },

    /// Flip a task between done and not done
    Toggle { id: String },

    /// Availability per level and the catalog report
    Stats,

    /// Reopen recurring tasks whose time has come
    Refresh,

    /// Import tasks from a CSV with title,effort,interval,unit columns
    Import { csv: PathBuf },

    /// Export all tasks to CSV
    Export { csv: PathBuf },

    /// Start a session at an effort level
    Play {
        level: EffortLevel,

        /// Seed the picker for reproducible sessions
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Config file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default ~/.nudge/config.toml
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.log_level)),
        )
        .init();

    if let Command::Config { command } = &cli.command {
        match command {
            ConfigCommand::Init => match config::init_config()? {
                (p, ConfigInit::Written) => println!("Wrote {}", p.display()),
                (p, ConfigInit::AlreadyExists) => println!("Config already exists: {}", p.display()),
            },
            ConfigCommand::Show => print!("{}", toml::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let boundary = cfg.day_boundary()?;
    let fixed_now = match cli.now.as_deref() {
        Some(s) => Some(
            parse_local_to_utc(s, &boundary).with_context(|| format!("--now: could not read '{s}'"))?,
        ),
        None => None,
    };
    let clock = move || fixed_now.unwrap_or_else(Utc::now);
    let now = clock();

    let mut store = JsonFileStore::open_default()?;
    let mut repo = TaskRepository::load(&store, boundary)?;
    tracing::debug!(path = %store.path().display(), tasks = repo.len(), "loaded tasks");
    let reopened = repo.refresh_recurring(now);
    if reopened > 0 {
        repo.save(&mut store)?;
    }

    match cli.command {
        Command::Add { title, level, every } => {
            let recurrence = parse_every(every.as_deref())?;
            let draft = TaskDraft::new(title, level)
                .every(recurrence.interval, recurrence.unit)
                .custom();
            let task = repo.add(draft.validate()?);
            repo.save(&mut store)?;
            println!("Added {} [{}]", describe(&task), short_id(&task.id));
        }

        Command::List { archive, json } => {
            let view = if archive { CatalogView::Archive } else { CatalogView::Tasks };
            let tasks = catalog_view(repo.all(), view);
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("(no tasks)");
            } else {
                for t in tasks {
                    let mark = if t.is_completed { "x" } else { " " };
                    let back = match t.next_available_at {
                        Some(next) => format!(" | back {}", boundary.local_date(next)),
                        None => String::new(),
                    };
                    println!("[{mark}] {} {}{back}", short_id(&t.id), describe(t));
                }
            }
        }

        Command::Edit { id, title, level, every } => {
            let Some(id) = resolve_id(&repo, &id)? else {
                return Ok(());
            };
            let recurrence = every.as_deref().map(Recurrence::parse).transpose()?;
            let patch = TaskPatch {
                title,
                level,
                recurrence_unit: recurrence.map(|r| r.unit),
                recurrence_interval: recurrence.map(|r| r.interval),
            };
            if let Some(t) = repo.update(&id, &patch) {
                println!("Updated {}", describe(t));
            }
            repo.save(&mut store)?;
        }

        Command::Delete { id, yes } => {
            let Some(id) = resolve_id(&repo, &id)? else {
                return Ok(());
            };
            if cfg.session.confirm_delete && !yes && !confirm(&format!("Delete '{}'?", title_of(&repo, &id)))? {
                println!("Kept.");
                return Ok(());
            }
            if let Some(t) = repo.delete(&id) {
                println!("Deleted {}", t.title);
            }
            repo.save(&mut store)?;
        }

        Command::Toggle { id } => {
            let Some(id) = resolve_id(&repo, &id)? else {
                return Ok(());
            };
            if let Some(t) = repo.toggle(&id, now) {
                let state = if t.is_completed { "done" } else { "not done" };
                println!("{} is now {state}", t.title);
            }
            repo.save(&mut store)?;
        }

        Command::Stats => print_stats(&repo, now, &boundary),

        Command::Refresh => {
            println!("Reopened {reopened} recurring task(s).");
        }

        Command::Import { csv } => {
            if !csv.exists() {
                bail!("CSV not found: {}", csv.display());
            }
            let rows = read_rows_from_path(&csv)?;
            let summary = import_into(&mut repo, &rows);
            repo.save(&mut store)?;
            println!(
                "Imported {} task(s) from {} ({} duplicate(s) skipped, {} row(s) rejected)",
                summary.added,
                csv.display(),
                summary.skipped_duplicates,
                summary.rejected
            );
        }

        Command::Export { csv } => {
            let n = export_to_path(&csv, repo.all())?;
            println!("Exported {n} task(s) to {}", csv.display());
        }

        Command::Play { level, seed } => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut out = io::stdout();
            match seed {
                Some(seed) => {
                    Play {
                        repo: &mut repo,
                        store: &mut store,
                        session: SessionEngine::new(SeededRandom::new(seed)),
                        clock: &clock,
                        confirm_delete: cfg.session.confirm_delete,
                    }
                    .run(level, &mut input, &mut out)?;
                }
                None => {
                    Play {
                        repo: &mut repo,
                        store: &mut store,
                        session: SessionEngine::new(ThreadRandom),
                        clock: &clock,
                        confirm_delete: cfg.session.confirm_delete,
                    }
                    .run(level, &mut input, &mut out)?;
                }
            }
        }

        Command::Config { .. } => unreachable!("handled above"),
    }

    Ok(())
}

fn parse_every(every: Option<&str>) -> Result<Recurrence> {
    match every {
        Some(s) => Ok(Recurrence::parse(s)?),
        None => Ok(Recurrence::ONCE),
    }
}

/// First eight characters of an id. Ids read from disk are not always uuids.
fn short_id(id: &str) -> &str {
    id.char_indices().nth(8).map_or(id, |(i, _)| &id[..i])
}

fn title_of(repo: &TaskRepository, id: &str) -> String {
    repo.get(id).map(|t| t.title.clone()).unwrap_or_default()
}

/// Resolve a full id or unique prefix. Unknown ids print a note and resolve to nothing.
fn resolve_id(repo: &TaskRepository, prefix: &str) -> Result<Option<String>> {
    let matches: Vec<&str> = repo
        .all()
        .iter()
        .map(|t| t.id.as_str())
        .filter(|id| id.starts_with(prefix))
        .collect();
    match matches.as_slice() {
        [] => {
            println!("No task with id {prefix}");
            Ok(None)
        }
        [one] => Ok(Some(one.to_string())),
        many => bail!("id prefix '{prefix}' matches {} tasks; use more characters", many.len()),
    }
}

fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn print_stats(repo: &TaskRepository, now: DateTime<Utc>, boundary: &DayBoundary) {
    let summary = availability_summary(repo.all(), now, boundary);
    println!("# Available now\n");
    for level in EffortLevel::ALL {
        println!("- {level}: {}", summary.count(level));
    }
    match summary.next_refresh_days {
        Some(days) => println!("\nNext recurring task returns in {days} day(s)."),
        None => println!("\nNo recurring tasks waiting."),
    }

    let stats = catalog_stats(repo.all(), now, boundary);
    println!("\n# Catalog health\n");
    for (level, h) in &stats.health {
        println!("- {level}: {} done, {} left ({}%)", h.done, h.left, h.percent_done());
    }

    println!("\n# Today\n");
    if !stats.has_activity_today {
        println!("(nothing completed yet today)");
        return;
    }
    for (level, n) in stats.today_by_level.iter().filter(|(_, n)| **n > 0) {
        println!("- {level}: {n}");
    }
    for (unit, n) in stats.today_by_unit.iter().filter(|(_, n)| **n > 0) {
        println!("- {unit}: {n}");
    }
}
