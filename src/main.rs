//! Vehicle Insurance Predictor - Command Line Entry Point
//!
//! Reads customer records as JSON, resolves the serving model and prints one
//! prediction per record.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vehicle_insurance_predictor::{
    config::{LoggingConfig, DEFAULT_CONFIG_PATH},
    AppConfig, ModelResolver, VehicleData,
};

#[derive(Debug, Parser)]
#[command(name = "vehicle-predict", version, about = "Vehicle insurance cross-sell prediction")]
struct Cli {
    /// Configuration file (optional; missing file means defaults)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Predict for a JSON record or array of records
    Predict {
        /// Input file, `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: String,
    },
    /// Show which model would serve a prediction
    Resolve,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Records {
    One(VehicleData),
    Many(Vec<VehicleData>),
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("vehicle_insurance_predictor={}", logging.level).parse()?)
        .add_directive(format!("vehicle_predict={}", logging.level).parse()?);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

fn read_records(input: &str) -> Result<Vec<VehicleData>> {
    let mut raw = String::new();
    if input == "-" {
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read records from stdin")?;
    } else {
        raw = std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read records from {}", input))?;
    }

    let records: Records = serde_json::from_str(&raw).context("Failed to parse vehicle records")?;
    Ok(match records {
        Records::One(record) => vec![record],
        Records::Many(records) => records,
    })
}

fn response_label(label: i64) -> &'static str {
    if label == 1 {
        "Response-Yes"
    } else {
        "Response-No"
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from_path(&cli.config)?;
    init_logging(&config.logging)?;
    info!(config = %cli.config.display(), "Configuration loaded");

    let resolver = ModelResolver::new(&config);

    match cli.command {
        Command::Resolve => {
            let source = resolver.resolve()?;
            println!("{}", source);
        }
        Command::Predict { input } => {
            let records = read_records(&input)?;
            let frame = VehicleData::records_to_frame(&records)?;
            info!(records = records.len(), "Built input frame");

            let predictions = resolver.predict(&frame)?;
            for label in predictions {
                println!("{}\t{}", label, response_label(label));
            }
        }
    }

    Ok(())
}
