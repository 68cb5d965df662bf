//! # linecheck
//!
//! Command-line front end for the LineCheck inspection records.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  linecheck history --line "Linea 1" --defect-type todos --page 2       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  HistoryArgs ──► HistoryParams::into_query_with_default(page_size)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.history().detail_history(&filter, page)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  {"records": [...], "total": 45, "current_page": 2, "total_pages": 3}  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! JSON goes to stdout; logs go to stderr, filtered by `LINECHECK_LOG`.

mod config;
mod seed;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, LOG_ENV};
use linecheck_core::{HistoryParams, HistorySource, NewDetailRecord, NewSummaryRecord, SuggestField};
use linecheck_db::{load_catalog_file, CatalogLoadError, Database, DbConfig, DbError};

// =============================================================================
// Command Line
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "linecheck", version, about = "Quality-defect inspection records")]
struct Cli {
    /// SQLite database file (overrides LINECHECK_DATABASE_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Import the product catalog from a CSV file
    LoadCatalog { file: PathBuf },

    /// Hourly detail history, newest first
    History(HistoryArgs),

    /// Summary history, newest first
    SummaryHistory(HistoryArgs),

    /// Distinct defect types in use
    DefectTypes {
        #[arg(long, alias = "linea")]
        line: Option<String>,
    },

    /// Autocomplete codes or lots from recorded history
    Suggest {
        term: String,

        #[arg(long, value_enum, default_value_t = FieldArg::Code)]
        field: FieldArg,

        #[arg(long, alias = "linea")]
        line: Option<String>,

        #[arg(long, value_enum, default_value_t = SourceArg::Detail)]
        source: SourceArg,
    },

    /// Look up one catalog product by exact code
    Product { code: String },

    /// Catalog codes containing a term
    SearchProducts { term: String },

    /// Manage the inspector registry
    Inspectors {
        #[command(subcommand)]
        action: InspectorCommand,
    },

    /// Save a JSON array of summary records in one transaction ("-" reads stdin)
    SaveSummaries { file: PathBuf },

    /// Save a JSON array of detail records in one transaction ("-" reads stdin)
    SaveDetails { file: PathBuf },

    /// Fill an empty database with demo data
    SeedDemo {
        /// Number of summary records to generate
        #[arg(long, default_value_t = 200)]
        count: usize,
    },
}

#[derive(Debug, Subcommand)]
enum InspectorCommand {
    List,
    Add { name: String },
    Remove { id: i64 },
}

/// History filters as the web layer receives them: plain strings.
#[derive(Debug, Args)]
struct HistoryArgs {
    #[arg(long, alias = "linea")]
    line: Option<String>,

    /// YYYY-MM-DD, inclusive
    #[arg(long, alias = "fecha-inicio")]
    start_date: Option<String>,

    /// YYYY-MM-DD, inclusive
    #[arg(long, alias = "fecha-fin")]
    end_date: Option<String>,

    /// "todos" means every type
    #[arg(long, alias = "tipo-defecto")]
    defect_type: Option<String>,

    #[arg(long, alias = "lote")]
    lot: Option<String>,

    #[arg(long, alias = "codigo")]
    code: Option<String>,

    /// 1-indexed page number
    #[arg(long, alias = "pagina")]
    page: Option<u64>,

    #[arg(long, alias = "limite")]
    page_size: Option<u32>,
}

impl From<HistoryArgs> for HistoryParams {
    fn from(args: HistoryArgs) -> Self {
        HistoryParams {
            line: args.line,
            start_date: args.start_date,
            end_date: args.end_date,
            defect_type: args.defect_type,
            lot: args.lot,
            code: args.code,
            page: args.page,
            page_size: args.page_size,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FieldArg {
    Code,
    Lot,
}

impl From<FieldArg> for SuggestField {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Code => SuggestField::Code,
            FieldArg::Lot => SuggestField::Lot,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceArg {
    Detail,
    Summary,
}

impl From<SourceArg> for HistorySource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Detail => HistorySource::Detail,
            SourceArg::Summary => HistorySource::Summary,
        }
    }
}

// =============================================================================
// Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .with_target(true)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", user_message(&err));
            ExitCode::FAILURE
        }
    }
}

/// What the user sees for a failed command.
///
/// Database failures that the user cannot fix are logged in full and
/// reported as a generic failure.
fn user_message(err: &anyhow::Error) -> String {
    if let Some(db_err) = err.downcast_ref::<DbError>() {
        return db_err.public_message();
    }
    if let Some(CatalogLoadError::Db(db_err)) =
        err.downcast_ref::<CatalogLoadError>()
    {
        return db_err.public_message();
    }
    format!("{err:#}")
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let database_path = cli.db.unwrap_or(config.database_path);

    info!(path = %database_path.display(), "Opening database");
    let db = Database::new(DbConfig::new(&database_path).max_connections(config.max_connections))
        .await?;

    let result = execute(&db, cli.command, config.page_size).await;
    db.close().await;
    result
}

async fn execute(db: &Database, command: Command, page_size: u32) -> anyhow::Result<()> {
    match command {
        Command::LoadCatalog { file } => {
            let report = load_catalog_file(db, &file).await?;
            print_json(&report)
        }

        Command::History(args) => {
            let (filter, page) = HistoryParams::from(args).into_query_with_default(page_size)?;
            debug!(?filter, "Detail history requested");
            print_json(&db.history().detail_history(&filter, page).await?)
        }

        Command::SummaryHistory(args) => {
            let (filter, page) = HistoryParams::from(args).into_query_with_default(page_size)?;
            debug!(?filter, "Summary history requested");
            print_json(&db.history().summary_history(&filter, page).await?)
        }

        Command::DefectTypes { line } => {
            let line = linecheck_core::validation::non_empty(line.as_deref());
            print_json(&db.history().defect_types(line.as_deref()).await?)
        }

        Command::Suggest {
            term,
            field,
            line,
            source,
        } => {
            let line = linecheck_core::validation::non_empty(line.as_deref());
            let values = db
                .suggestions()
                .suggest(&term, field.into(), line.as_deref(), source.into())
                .await?;
            print_json(&values)
        }

        Command::Product { code } => {
            let product = db
                .catalog()
                .get_by_code(code.trim())
                .await?
                .ok_or_else(|| DbError::not_found("Product", code.trim()))?;
            print_json(&product)
        }

        Command::SearchProducts { term } => print_json(&db.catalog().search_codes(&term).await?),

        Command::Inspectors { action } => match action {
            InspectorCommand::List => print_json(&db.inspectors().list().await?),
            InspectorCommand::Add { name } => print_json(&db.inspectors().create(name.trim()).await?),
            InspectorCommand::Remove { id } => {
                let removed = db.inspectors().delete(id).await?;
                print_json(&serde_json::json!({
                    "message": format!("Inspector '{}' removed", removed.name),
                    "removed": removed,
                }))
            }
        },

        Command::SaveSummaries { file } => {
            let records: Vec<NewSummaryRecord> = read_json(&file)?;
            print_json(&db.summaries().insert_batch(&records).await?)
        }

        Command::SaveDetails { file } => {
            let records: Vec<NewDetailRecord> = read_json(&file)?;
            print_json(&db.details().insert_batch(&records).await?)
        }

        Command::SeedDemo { count } => print_json(&seed::seed_demo(db, count).await?),
    }
}

// =============================================================================
// I/O Helpers
// =============================================================================

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        text
    } else {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
