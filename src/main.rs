// 🪦 memorial-dates CLI
// check one pair of date strings, validate a whole page file, or list saved reports

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use memorial_dates::{
    get_all_reports, get_report_summaries, insert_report, load_memorials, setup_database,
    verify_count, DateConsistencyValidator, PageReport, ValidatorConfig,
};

#[derive(Parser)]
#[command(name = "memorial-dates")]
#[command(about = "Cross-check Hebrew and Gregorian dates on memorial inscriptions", long_about = None)]
#[command(version)]
struct Cli {
    /// Validator config (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate one Hebrew date against one Gregorian text
    Check {
        /// Hebrew date phrase, e.g. "י\"א סיון תשע\"ט"
        #[arg(long)]
        hebrew: String,

        /// Gregorian text, e.g. "1938 - 2019"
        #[arg(long)]
        gregorian: String,
    },
    /// Validate every entry in a JSON or CSV file
    Page {
        file: PathBuf,

        /// Save the report to this SQLite database
        #[arg(long)]
        db: Option<PathBuf>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List saved reports
    History {
        #[arg(long)]
        db: PathBuf,

        /// Print full reports as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so JSON on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ValidatorConfig::from_file(path)?,
        None => ValidatorConfig::default(),
    };
    let validator = DateConsistencyValidator::with_config(config);

    match cli.command {
        Commands::Check { hebrew, gregorian } => {
            let result = validator.validate(&hebrew, &gregorian);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Page { file, db, json } => run_page(&validator, &file, db.as_deref(), json)?,
        Commands::History { db, json } => run_history(&db, json)?,
    }

    Ok(())
}

fn run_page(
    validator: &DateConsistencyValidator,
    file: &Path,
    db_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let entries = load_memorials(file)?;

    let source = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    let report = PageReport::build(&source, entries, validator);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.summary());
        for entry in &report.entries {
            println!(
                "  {} {}: {}",
                if entry.validation.is_flagged() { "✗" } else { "✓" },
                entry.entry.label(),
                entry.validation.summary()
            );
        }
    }

    if let Some(db_path) = db_path {
        let conn = open_database(db_path)?;
        let inserted = insert_report(&conn, &report)?;
        let count = verify_count(&conn)?;

        if inserted {
            eprintln!("✓ Saved report {} ({} reports in history)", report.id, count);
        } else {
            eprintln!("⚠️  Same page already saved; skipped ({} reports in history)", count);
        }
    }

    Ok(())
}

fn run_history(db_path: &Path, json: bool) -> Result<()> {
    let conn = open_database(db_path)?;

    if json {
        let reports = get_all_reports(&conn)?;
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    let summaries = get_report_summaries(&conn)?;
    if summaries.is_empty() {
        println!("No saved reports");
        return Ok(());
    }

    for summary in summaries {
        println!(
            "{}  {}  {}  {} entries, {} flagged",
            summary.created_at.format("%Y-%m-%d %H:%M"),
            summary.id,
            summary.source,
            summary.entry_count,
            summary.flagged_count
        );
    }

    Ok(())
}

fn open_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database: {}", path.display()))?;
    setup_database(&conn)?;
    Ok(conn)
}
