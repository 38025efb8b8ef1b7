//! REM Query CLI
//!
//! Runs SELECT queries against a JSON database file
//! (`{ "table": [ {..record..}, .. ], .. }`).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use percolate_query::config::{expand_path, Config, OutputFormat};
use percolate_query::output::render;
use percolate_query::{Database, QueryEngine};
use serde_json::json;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// REM Query CLI - SELECT over in-memory JSON tables
#[derive(Parser)]
#[command(name = "rem-query")]
#[command(about = "Run SELECT queries over JSON tables", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (overrides P8_QUERY_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file (overrides the config file)
    #[arg(long, short, global = true, env = "P8_QUERY_DB")]
    db: Option<PathBuf>,

    /// Output format (overrides the config file)
    #[arg(long, short, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute one or more queries
    Run {
        /// Query text, e.g. "SELECT employees.name FROM employees"
        #[arg(required = true)]
        queries: Vec<String>,
    },

    /// Print the parsed form of a query
    Explain {
        /// Query text
        query: String,
    },

    /// List tables with row counts and inferred columns
    Tables,

    /// Run the sample queries against built-in sample data
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(&config);

    let color = std::io::stdout().is_terminal();

    match cli.command {
        Commands::Run { queries } => {
            let engine = QueryEngine::new(open_database(&config)?);
            for (i, query) in queries.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                let rows = engine
                    .execute(query)
                    .with_context(|| format!("Query failed: {}", query.trim()))?;
                println!("{}", render(&rows, config.format, color)?);
            }
        }

        Commands::Explain { query } => {
            let statement = QueryEngine::parse(&query)?;
            println!("{}", serde_json::to_string_pretty(&statement)?);
        }

        Commands::Tables => {
            let db = open_database(&config)?;
            for (name, table) in db.tables() {
                let columns = table
                    .schema()
                    .map(|columns| columns.join(", "))
                    .unwrap_or_else(|| "(empty)".to_string());
                let name = if color { name.bold().to_string() } else { name.to_string() };
                println!("{} [{} rows]: {}", name, table.len(), columns);
            }
        }

        Commands::Demo => {
            let engine = QueryEngine::new(sample_database()?);
            for query in SAMPLE_QUERIES {
                let heading = format!("> {}", query);
                println!("{}", if color { heading.cyan().to_string() } else { heading });
                match engine.execute(query) {
                    Ok(rows) => println!("{}\n", render(&rows, config.format, color)?),
                    Err(err) => println!("error: {}\n", err),
                }
            }
        }
    }

    Ok(())
}

/// Config file, then command-line overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let path = expand_path(path)?;
            Config::load_from(&path)
                .with_context(|| format!("Cannot read config {}", path.display()))?
        }
        None => Config::load()?,
    };

    if let Some(db) = &cli.db {
        config.database = Some(db.clone());
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    if cli.log_json {
        config.log_json = true;
    }
    Ok(config)
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn open_database(config: &Config) -> Result<Database> {
    let path = config
        .database_path()?
        .context("No database given: pass --db, set P8_QUERY_DB, or set `database` in the config")?;
    Database::load(&path).with_context(|| format!("Cannot load database {}", path.display()))
}

const SAMPLE_QUERIES: [&str; 4] = [
    "SELECT employees.name FROM employees",
    "SELECT employees.id, employees.name FROM employees WHERE employees.id = 1",
    "SELECT monsters.id, monsters.name, monsters.home FROM monsters WHERE monsters.home = 'Himalaya Mountains'",
    "SELECT monsters.name, monsters.home FROM monsters WHERE monsters.id = employees.id",
];

fn sample_database() -> Result<Database> {
    Ok(Database::from_value(json!({
        "employees": [
            {"id": 1, "name": "Alice", "phone": "12345678"},
            {"id": 2, "name": "Bob", "phone": "87654321"}
        ],
        "monsters": [
            {"id": 1, "name": "Loch Ness Monster", "home": "Loch Ness, Scotland"},
            {"id": 6, "name": "Yeti", "home": "Himalaya Mountains"}
        ]
    }))?)
}
