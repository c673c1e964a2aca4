use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fieldq::filter::{DateRange, FilterState};
use fieldq::output;
use fieldq::query::{build_query, parse_query_report, scan};
use fieldq::utils::{AppConfig, extract_search_terms, get_config_path, identity, percent_encode};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fieldq")]
#[command(about = "Compile structured search filters to boolean queries and back")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to $FIELDQ_CONFIG, then the app data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a query string from filter state JSON
    Build {
        /// Filter state JSON file ("-" or omitted reads stdin)
        #[arg(short, long)]
        state: Option<PathBuf>,

        /// Start day of the date range (YYYY-MM-DD)
        #[arg(long, requires = "date_max")]
        date_min: Option<String>,

        /// End day of the date range (YYYY-MM-DD)
        #[arg(long, requires = "date_min")]
        date_max: Option<String>,

        /// Field that takes the date range clause
        #[arg(long)]
        date_field: Option<String>,

        /// Percent-encode values for URL transport
        #[arg(short, long)]
        encode: bool,
    },
    /// Parse a query string into filter state JSON
    Parse {
        /// Raw query, percent-encoded or not
        query: String,

        /// Known field (repeatable; defaults to the configured fields)
        #[arg(short, long = "field")]
        fields: Vec<String>,

        /// Field that takes the date range clause
        #[arg(long)]
        date_field: Option<String>,

        /// Print the full parse report instead of just the state
        #[arg(short, long)]
        report: bool,
    },
    /// Show the top-level tokens of a query
    Tokens {
        /// Decoded query
        query: String,
    },
    /// List highlight terms from filter state JSON
    Terms {
        /// Filter state JSON file ("-" or omitted reads stdin)
        #[arg(short, long)]
        state: Option<PathBuf>,
    },
    /// Show the config file location and effective configuration
    Config,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let color = !cli.no_color;
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    match cli.command {
        Commands::Build {
            state,
            date_min,
            date_max,
            date_field,
            encode,
        } => {
            let filters = read_state(state.as_deref())?;
            let date_field = date_field.unwrap_or_else(|| config.date_field.clone());
            let range = date_min.zip(date_max).map(|(min, max)| DateRange::new(min, max));

            let query = if encode {
                build_query(&filters, range.as_ref(), &date_field, percent_encode)
            } else {
                build_query(&filters, range.as_ref(), &date_field, identity)
            };
            println!("{}", query);
        }
        Commands::Parse {
            query,
            fields,
            date_field,
            report,
        } => {
            let fields = if fields.is_empty() {
                config.known_fields.clone()
            } else {
                fields
            };
            if fields.is_empty() {
                log::warn!("no known fields given; every clause will be dropped");
            }
            let date_field = date_field.unwrap_or_else(|| config.date_field.clone());

            let parsed = parse_query_report(&query, &fields, Some(&date_field));
            output::print_warnings(&parsed.skipped, parsed.unbalanced, color)?;

            let json = if report {
                serde_json::to_string_pretty(&parsed)
            } else {
                serde_json::to_string_pretty(&parsed.state)
            }
            .context("Failed to serialize parse result")?;
            println!("{}", json);
        }
        Commands::Tokens { query } => {
            let scanned = scan(&query);
            output::print_tokens(&scanned.tokens, color)?;
            if !scanned.is_balanced() {
                output::print_warnings(&[], true, color)?;
            }
        }
        Commands::Terms { state } => {
            let filters = read_state(state.as_deref())?;
            let matcher = config.date_matcher();
            let terms = extract_search_terms(&filters, |field| matcher.matches(field));
            output::print_terms(&terms)?;
        }
        Commands::Config => {
            let path = match cli.config {
                Some(path) => path,
                None => get_config_path()?,
            };
            println!("Config file: {}", path.display());
            println!(
                "{}",
                serde_json::to_string_pretty(&config).context("Failed to serialize config")?
            );
        }
    }

    Ok(())
}

/// Read filter state JSON from a file, or stdin for `-` / no path
fn read_state(path: Option<&Path>) -> Result<FilterState> {
    let content = match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read state from stdin")?;
            buf
        }
    };

    serde_json::from_str(&content).context("Failed to parse filter state JSON")
}
