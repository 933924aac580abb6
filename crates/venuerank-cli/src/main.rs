use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use venuerank_core::{
    ConferenceSource, JournalSource, MatchTrace, OverrideStore, Resolver, SqliteBackend,
    config_file,
};
use venuerank_corerank::ConferenceTable;
use venuerank_sjr::JournalTable;

mod output;

use output::ColorMode;

/// Default priorities of the shipped sources: journals are consulted first.
const JOURNAL_PRIORITY: i32 = 10;
const CONFERENCE_PRIORITY: i32 = 20;

/// Venue Rank - Resolve publication venue titles to quality ranking tiers
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the journal ranking table (JSON)
    #[arg(long, global = true)]
    journal_table: Option<PathBuf>,

    /// Path to the conference ranking table (JSON)
    #[arg(long, global = true)]
    conference_table: Option<PathBuf>,

    /// Path to the override preference database
    #[arg(long, global = true)]
    overrides_db: Option<PathBuf>,

    /// Comma-separated list of source ids to disable
    #[arg(long, global = true, value_delimiter = ',')]
    disable: Vec<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a single venue title to its ranking
    Resolve {
        title: String,

        /// Print the strategy-attempt trace
        #[arg(long)]
        trace: bool,
    },

    /// Resolve every title in a file, one per line
    Batch {
        file: PathBuf,
    },

    /// Manage user overrides
    Override {
        #[command(subcommand)]
        action: OverrideAction,
    },

    /// List registered ranking sources
    Sources,

    /// Show loaded reference table statistics
    Tables,
}

#[derive(Subcommand, Debug)]
enum OverrideAction {
    /// Set (or replace) the override rank for a title
    Set { title: String, rank: String },

    /// Remove the override for a title
    Remove { title: String },

    /// List all overrides
    List,

    /// Remove every override
    Clear,
}

/// Everything a command needs: the wired resolver plus table statistics
/// captured before the tables moved into their sources.
struct Setup {
    resolver: Resolver,
    journal_count: Option<usize>,
    conference_count: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let color = ColorMode(!cli.no_color);
    let setup = build(&cli)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Command::Resolve { title, trace } => {
            if *trace {
                let mut match_trace = MatchTrace::new();
                let rank = setup.resolver.resolve_traced(title, &mut match_trace);
                output::print_trace(&mut out, &match_trace, color)?;
                output::print_resolution(&mut out, title, rank.as_deref(), color)?;
            } else {
                let rank = setup.resolver.resolve(title);
                output::print_resolution(&mut out, title, rank.as_deref(), color)?;
            }
        }
        Command::Batch { file } => {
            batch(&mut out, &setup.resolver, file, color)?;
        }
        Command::Override { action } => match action {
            OverrideAction::Set { title, rank } => {
                setup.resolver.set_override(title, rank)?;
                writeln!(out, "Override set: {} -> {}", title, rank)?;
            }
            OverrideAction::Remove { title } => {
                if setup.resolver.remove_override(title)? {
                    writeln!(out, "Override removed: {}", title)?;
                } else {
                    writeln!(out, "No override for: {}", title)?;
                }
            }
            OverrideAction::List => {
                output::print_overrides(&mut out, &setup.resolver.overrides(), color)?;
            }
            OverrideAction::Clear => {
                let count = setup.resolver.override_count();
                setup.resolver.clear_overrides()?;
                writeln!(out, "Cleared {} override(s)", count)?;
            }
        },
        Command::Sources => {
            let sources: Vec<(String, String, i32, bool)> = setup
                .resolver
                .registry()
                .descriptors()
                .iter()
                .map(|d| (d.id.clone(), d.name.clone(), d.priority, d.is_enabled()))
                .collect();
            output::print_sources(&mut out, &sources, color)?;
        }
        Command::Tables => {
            match setup.journal_count {
                Some(count) => writeln!(out, "Journal table: {} entries", count)?,
                None => writeln!(out, "Journal table: not loaded")?,
            }
            match setup.conference_count {
                Some(count) => writeln!(out, "Conference table: {} entries", count)?,
                None => writeln!(out, "Conference table: not loaded")?,
            }
            writeln!(out, "Overrides: {}", setup.resolver.override_count())?;
        }
    }

    Ok(())
}

/// Wire the resolver from CLI flags cascaded over the config file.
fn build(cli: &Cli) -> anyhow::Result<Setup> {
    let config = config_file::load_config();

    let journal_path = cli.journal_table.clone().or_else(|| {
        config
            .tables
            .as_ref()
            .and_then(|t| t.journal_path.clone())
            .map(PathBuf::from)
    });
    let conference_path = cli.conference_table.clone().or_else(|| {
        config
            .tables
            .as_ref()
            .and_then(|t| t.conference_path.clone())
            .map(PathBuf::from)
    });
    let db_path = cli
        .overrides_db
        .clone()
        .or_else(|| {
            config
                .overrides
                .as_ref()
                .and_then(|o| o.db_path.clone())
                .map(PathBuf::from)
        })
        .or_else(default_overrides_path);

    let mut disabled = cli.disable.clone();
    if let Some(from_config) = config.sources.as_ref().and_then(|s| s.disabled.clone()) {
        disabled.extend(from_config);
    }

    let store = match db_path {
        Some(path) => {
            let backend = SqliteBackend::open(&path)
                .with_context(|| format!("opening override database {}", path.display()))?;
            OverrideStore::load(Box::new(backend))
        }
        None => {
            tracing::warn!("no override database path available, overrides are session-only");
            OverrideStore::in_memory()
        }
    };
    let mut resolver = Resolver::new(store);

    let mut journal_count = None;
    if let Some(path) = journal_path {
        // The journal source carries no enablement flag; disabling it just
        // skips registration.
        if disabled.iter().any(|id| id == JournalSource::ID) {
            tracing::info!("journal source disabled, skipping registration");
        } else {
            let table = JournalTable::from_json_file(&path)
                .with_context(|| format!("loading journal table {}", path.display()))?;
            journal_count = Some(table.len());
            resolver.register_source(JournalSource::descriptor(table, JOURNAL_PRIORITY))?;
        }
    }

    let mut conference_count = None;
    if let Some(path) = conference_path {
        let table = ConferenceTable::from_json_file(&path)
            .with_context(|| format!("loading conference table {}", path.display()))?;
        conference_count = Some(table.len());
        let enabled = Arc::new(AtomicBool::new(
            !disabled.iter().any(|id| id == ConferenceSource::ID),
        ));
        resolver.register_source(ConferenceSource::descriptor(
            table,
            CONFERENCE_PRIORITY,
            Some(enabled),
        ))?;
    }

    Ok(Setup {
        resolver,
        journal_count,
        conference_count,
    })
}

/// Platform data path for the override database:
/// `<data_dir>/venuerank/prefs.db`.
fn default_overrides_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("venuerank").join("prefs.db"))
}

/// Resolve every non-empty line of `file`, reusing the one loaded resolver
/// (and its single override snapshot) for the whole run.
fn batch(
    out: &mut dyn Write,
    resolver: &Resolver,
    file: &PathBuf,
    color: ColorMode,
) -> anyhow::Result<()> {
    let reader = std::io::BufReader::new(
        std::fs::File::open(file).with_context(|| format!("opening {}", file.display()))?,
    );
    let titles: Vec<String> = reader
        .lines()
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();

    let bar = ProgressBar::new(titles.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut results = Vec::with_capacity(titles.len());
    for title in &titles {
        bar.inc(1);
        results.push(resolver.resolve(title));
    }
    bar.finish_and_clear();

    let mut resolved = 0;
    for (title, rank) in titles.iter().zip(&results) {
        if rank.is_some() {
            resolved += 1;
        }
        output::print_resolution(out, title, rank.as_deref(), color)?;
    }
    output::print_batch_summary(out, resolved, titles.len(), color)?;
    Ok(())
}
