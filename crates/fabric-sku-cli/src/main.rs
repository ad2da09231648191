use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use fabric_sku_engine::{
    build_adjustment_source, Estimator, FormInput, Labeled, TierTable, Workload,
};

mod config;
mod render;

use config::{AppConfig, Overrides};

/// Used when `RUST_LOG` is unset or unparsable.
const DEFAULT_LOG_FILTER: &str = "fabric_sku=info";

#[derive(Parser)]
#[command(
    name = "fabric-sku",
    about = "Estimate a Microsoft Fabric capacity SKU from workload parameters",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend a SKU for the given workload
    Estimate(EstimateArgs),
    /// List the capacity tiers and their score bounds
    Tiers,
    /// List the workload names accepted by --workload
    Workloads,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Args)]
struct EstimateArgs {
    /// Data volume in GB
    #[arg(long)]
    data_size: String,
    /// Batch processing cycles per day
    #[arg(long)]
    batch_cycles: String,
    /// Number of tables
    #[arg(long)]
    tables: String,
    /// Number of users
    #[arg(long)]
    users: String,
    /// Copilot and AI features are enabled
    #[arg(long)]
    copilot: bool,
    /// hourly, daily or weekly
    #[arg(long, default_value = "")]
    refresh: String,
    /// 1 year, 5 years or 10 years
    #[arg(long, default_value = "")]
    retention: String,
    /// simple, moderate or complex
    #[arg(long, default_value = "")]
    complexity: String,
    /// Selected workload; repeat for several
    #[arg(short, long = "workload")]
    workloads: Vec<String>,
    /// Weight profile: reference or legacy
    #[arg(long)]
    profile: Option<String>,
    /// TOML file with weight overrides
    #[arg(long)]
    weights: Option<PathBuf>,
    /// JSON endpoint serving external adjustments
    #[arg(long)]
    adjustments_url: Option<String>,
    /// Timeout for the adjustment fetch, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,
    /// Show the per-stage score trace
    #[arg(long)]
    explain: bool,
}

impl EstimateArgs {
    fn form(&self) -> FormInput {
        FormInput {
            data_size: self.data_size.clone(),
            batch_cycles: self.batch_cycles.clone(),
            num_tables: self.tables.clone(),
            copilot_enabled: if self.copilot { "yes" } else { "no" }.to_string(),
            data_refresh_frequency: self.refresh.clone(),
            data_retention_period: self.retention.clone(),
            data_complexity: self.complexity.clone(),
            user_count: self.users.clone(),
            workloads: self.workloads.clone(),
        }
    }

    fn overrides(&self) -> Overrides {
        Overrides {
            profile: self.profile.clone(),
            weights_file: self.weights.clone(),
            adjustments_url: self.adjustments_url.clone(),
            timeout_ms: self.timeout_ms,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Estimate(args) => estimate(&args).await?,
        Commands::Tiers => render::tiers(&TierTable::fabric()),
        Commands::Workloads => Workload::ALL
            .iter()
            .map(|w| format!("{:<24} {}\n", w.key(), w.label()))
            .collect(),
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

async fn estimate(args: &EstimateArgs) -> anyhow::Result<String> {
    let input = args.form().parse().context("invalid estimation input")?;
    let config = AppConfig::resolve(args.overrides())?;
    let source = build_adjustment_source(config.source)
        .context("failed to build adjustment source")?;
    let estimator =
        Estimator::new(source, config.weights).with_fetch_timeout(config.fetch_timeout);

    let report = estimator
        .estimate_detailed(&input)
        .await
        .context("invalid estimation input")?;
    match args.format {
        Format::Text => Ok(render::text(&report, args.explain)),
        Format::Json => render::json(&report, args.explain),
    }
}
