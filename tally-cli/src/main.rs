use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tally_core::{identify_payment_processor, mcc_category};
use tally_finance::{
    categorize_ledger, resolve_ledger, write_resolved, CategoryMap, CategorySource, Classifier, LabelSource,
    MerchantResolver,
};
use tally_ingest::{extract_useful_portion, parse_transaction};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod blocking;
mod config;
mod credentials;
mod llm;
mod places;
mod web_search;

use config::{Config, FallbackSource};
use credentials::Credentials;

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Categorize bank-statement transactions")]
struct Cli {
    /// Config file (default: ~/.tally/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill empty categories in a `category,transaction` CSV
    Categorize {
        /// Partially categorized CSV (first row is a header)
        #[arg(long)]
        input: PathBuf,

        /// Where to write the fully categorized CSV
        #[arg(long)]
        output: PathBuf,

        /// External sources to try, in order (overrides config)
        #[arg(long, value_enum, value_delimiter = ',')]
        fallback: Option<Vec<FallbackSource>>,
    },

    /// Look up canonical merchant names for a CSV of transactions (first column)
    Resolve {
        #[arg(long)]
        input: PathBuf,

        /// Write `transaction,merchant,place_id,processor` here instead of printing
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show the fields extracted from one transaction description
    Parse {
        transaction: String,

        /// Print the parsed fields as JSON
        #[arg(long)]
        json: bool,
    },

    /// Categorize one merchant name with the external sources
    Classify {
        merchant: String,

        #[arg(long, value_enum, value_delimiter = ',')]
        fallback: Option<Vec<FallbackSource>>,
    },

    /// Look up processor and merchant-category codes
    Codes {
        #[command(subcommand)]
        command: CodesCommand,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CodesCommand {
    /// Processor prefix, e.g. SQ or TST
    Processor { code: String },
    /// Four-digit merchant category code
    Mcc { code: String },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config (never overwrites)
    Init,
    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Categorize {
            input,
            output,
            fallback,
        } => {
            let cfg = config::load_config(config_path)?;
            let creds = credentials::load_credentials()?;
            let order = fallback.unwrap_or_else(|| cfg.classifier.fallback.clone());
            let sources = build_sources(&order, &cfg, &creds)?;
            let refs: Vec<&dyn CategorySource> = sources.iter().map(|s| s.as_ref()).collect();

            let summary = categorize_ledger(&input, &output, &refs)
                .with_context(|| format!("categorizing {}", input.display()))?;

            println!(
                "Learned {} merchants; classified {} rows (map: {}, external: {}, unknown: {})",
                summary.learned,
                summary.classified(),
                summary.local,
                summary.external,
                summary.unknown
            );
            println!("Wrote {}", output.display());
        }

        Command::Resolve { input, output } => {
            let cfg = config::load_config(config_path)?;
            let creds = credentials::load_credentials()?;
            let places = places::GooglePlaces::new(&cfg.places, creds.require_maps()?);
            let resolver = MerchantResolver::new(places);

            let rows = resolve_ledger(&input, &resolver)?;
            match output {
                Some(path) => {
                    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
                    write_resolved(file, &rows)?;
                    println!("Wrote {} rows to {}", rows.len(), path.display());
                }
                None => write_resolved(io::stdout().lock(), &rows)?,
            }
        }

        Command::Parse { transaction, json } => print_parse(&transaction, json)?,

        Command::Classify { merchant, fallback } => {
            let cfg = config::load_config(config_path)?;
            let creds = credentials::load_credentials()?;
            let order = fallback.unwrap_or_else(|| cfg.classifier.fallback.clone());
            let sources = build_sources(&order, &cfg, &creds)?;
            let refs: Vec<&dyn CategorySource> = sources.iter().map(|s| s.as_ref()).collect();

            let map = CategoryMap::new();
            let result = Classifier::new(&map, refs).classify_merchant(&merchant);
            let via = match &result.source {
                LabelSource::LocalMap => "map",
                LabelSource::External(name) => name.as_str(),
                LabelSource::Fallback => "fallback",
            };
            println!("{} ({})", result.label, via);
        }

        Command::Codes { command } => match command {
            CodesCommand::Processor { code } => println!("{}", identify_payment_processor(&code)),
            CodesCommand::Mcc { code } => println!("{}", mcc_category(&code)),
        },

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(config_path)?,
            ConfigCommand::Show => show_config(config_path)?,
        },
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(io::stderr).compact())
        .init();
}

/// Instantiate the configured external sources; a source whose credential is
/// missing is a fatal error.
fn build_sources(
    order: &[FallbackSource],
    cfg: &Config,
    creds: &Credentials,
) -> Result<Vec<Box<dyn CategorySource>>> {
    let mut sources: Vec<Box<dyn CategorySource>> = Vec::new();
    for source in order {
        match source {
            FallbackSource::LanguageModel => {
                let key = creds.require_openai()?;
                sources.push(Box::new(llm::LanguageModel::new(&cfg.llm, key)));
            }
            FallbackSource::WebSearch => {
                sources.push(Box::new(web_search::WebSearch::new(&cfg.web_search)?));
            }
        }
    }
    Ok(sources)
}

fn print_parse(transaction: &str, json: bool) -> Result<()> {
    match parse_transaction(transaction) {
        Some(txn) if json => {
            println!("{}", serde_json::to_string_pretty(&txn).context("serialize transaction")?);
        }
        Some(txn) => {
            let processor = txn
                .processor_code
                .as_deref()
                .map(|code| format!("{code} ({})", identify_payment_processor(code)))
                .unwrap_or_else(|| "-".to_string());
            println!("type:      {}", txn.kind);
            println!("date:      {}", txn.date);
            println!("processor: {}", processor);
            println!("merchant:  {}", txn.merchant);
            println!("location:  {}", txn.location);
            println!("mid:       {}", txn.mid);
            println!("card:      {}", txn.card_last4);
        }
        None => {
            println!("No match for the transaction grammar.");
            println!("useful portion: {}", extract_useful_portion(transaction));
        }
    }
    Ok(())
}

fn show_config(path: Option<&Path>) -> Result<()> {
    let cfg = config::load_config(path)?;
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}
