use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::error;

use recruit_stats::config::{default_config, EngineConfig};
use recruit_stats::{logging, pipeline};

#[derive(Parser)]
#[command(name = "recruit_stats")]
#[command(about = "Campus recruitment sign-up statistics engine")]
#[command(version = "0.1.0")]
struct Cli {
    /// Engine configuration TOML (built-in defaults when absent)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate, enrich and aggregate a batch of sign-up rows
    Process {
        /// JSON file holding an array of row objects keyed by column label
        #[arg(long)]
        input: PathBuf,
        /// Where to write the statistics bundle JSON (stdout when absent)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Where to write the per-row error report JSON
        #[arg(long)]
        errors: Option<PathBuf>,
    },
    /// Validate and enrich a batch, reporting rejected rows without aggregating
    Validate {
        /// JSON file holding an array of row objects keyed by column label
        #[arg(long)]
        input: PathBuf,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => Ok(EngineConfig::load(path)?),
        None => Ok(default_config().clone()),
    }
}

fn load_rows(path: &Path) -> anyhow::Result<Vec<serde_json::Value>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _log_guard = logging::init_logging("logs");

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Process {
            input,
            output,
            errors,
        } => {
            println!("🔄 Processing batch...");
            let rows = load_rows(&input)?;

            let outcome = match pipeline::process(&rows, &config) {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Batch rejected: {}", e);
                    println!("❌ Batch rejected: {}", e);
                    std::process::exit(1);
                }
            };

            println!("\n📊 Batch results:");
            println!("   Valid records: {}", outcome.bundle.total_valid_records);
            println!("   Rejected rows: {}", outcome.row_errors.len());
            println!("   Bilateral agreements: {}", outcome.bundle.bilateral_count);
            println!("   Trilateral agreements: {}", outcome.bundle.trilateral_count);
            println!("   Batch fingerprint: {}", outcome.bundle.batch_fingerprint);

            if !outcome.row_errors.is_empty() {
                println!("\n⚠️  Rejected rows:");
                for row_error in &outcome.row_errors {
                    println!("   - {}", row_error);
                }
            }

            let bundle_json = serde_json::to_string_pretty(&outcome.bundle)?;
            match &output {
                Some(path) => {
                    fs::write(path, bundle_json)?;
                    println!("\n   Output file: {}", path.display());
                }
                None => println!("\n{}", bundle_json),
            }

            if let Some(path) = &errors {
                fs::write(path, serde_json::to_string_pretty(&outcome.row_errors)?)?;
                println!("   Error report: {}", path.display());
            }
        }
        Commands::Validate { input } => {
            println!("🔍 Validating batch...");
            let rows = load_rows(&input)?;

            match pipeline::validate_and_enrich(&rows, &config) {
                Ok((records, row_errors)) => {
                    println!("\n📊 Validation results:");
                    println!("   Valid records: {}", records.len());
                    println!("   Rejected rows: {}", row_errors.len());
                    for row_error in &row_errors {
                        println!("   - {}", row_error);
                    }
                }
                Err(e) => {
                    error!("Batch rejected: {}", e);
                    println!("❌ Batch rejected: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
