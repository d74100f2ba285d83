use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ledger_core::{ParseOptions, ParseResult};
use ledger_finance::{SpendAggregator, compute_monthly_spend_with_options};
use std::path::{Path, PathBuf};

mod config;
mod logging;
mod report;
mod state;

use report::{SortKey, TransactionQuery};

#[derive(Parser, Debug)]
#[command(name = "ledger", version, about = "Monthly card spend from exported transaction files")]
struct Cli {
    /// IANA time zone for dates without an offset (overrides config)
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// Field delimiter: "auto" or a single character (overrides config)
    #[arg(long, global = true)]
    delimiter: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Month totals, row counts, date range and warnings for one export
    Summary {
        file: PathBuf,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List included transactions
    Transactions {
        file: PathBuf,

        /// Only this month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,

        /// Merchant name contains (case-insensitive)
        #[arg(long)]
        merchant: Option<String>,

        #[arg(long, value_enum, default_value_t = SortKey::Date)]
        sort: SortKey,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Net spend per merchant for one month
    Breakdown {
        file: PathBuf,

        /// Month to break down (YYYY-MM)
        #[arg(long)]
        month: String,
    },

    /// Configuration file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.ledger/config.toml with defaults if it does not exist
    Init,
    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    logging::setup_logging(&cfg.log.level);

    if let Command::Config { command } = &cli.command {
        return match command {
            ConfigCommand::Init => config::init_config(),
            ConfigCommand::Show => config::show_config(&cfg),
        };
    }

    let opts = cfg.parse_options(cli.delimiter.as_deref(), cli.timezone.as_deref())?;

    match cli.command {
        Command::Summary { file, json } => {
            let result = load_export(&file, &opts).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!(
                    "{}",
                    report::render_summary(&result, opts.timezone, cfg.display.max_warnings)
                );
            }
        }

        Command::Transactions {
            file,
            month,
            merchant,
            sort,
            limit,
        } => {
            let result = load_export(&file, &opts).await?;
            let query = TransactionQuery {
                month,
                merchant,
                sort,
                limit,
            };
            let picked = report::select_transactions(&result.transactions, &query);
            print!("{}", report::render_transactions(&picked, opts.timezone));
        }

        Command::Breakdown { file, month } => {
            let result = load_export(&file, &opts).await?;
            let merchants = SpendAggregator::merchant_breakdown(&result.transactions, &month);
            print!("{}", report::render_breakdown(&month, &merchants));
        }

        Command::Config { .. } => {}
    }

    Ok(())
}

/// Read an export and run the transformation once over its text.
async fn load_export(path: &Path, opts: &ParseOptions) -> Result<ParseResult> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("could not read {}", path.display()))?;

    let result = compute_monthly_spend_with_options(&text, opts)
        .with_context(|| format!("could not parse {}", path.display()))?;

    tracing::info!(
        file = %path.display(),
        included = result.summary.included_rows,
        ignored = result.summary.ignored_rows,
        warnings = result.summary.warnings.len(),
        "parsed export"
    );
    Ok(result)
}
