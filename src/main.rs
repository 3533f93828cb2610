use anyhow::Result;
use heatmap_backend::{
    init_logging, open_store, serve, MetricAggregator, ObjectStoreSource, SchoolType,
    ServerConfig, Validator, DEFAULT_HOST, DEFAULT_PORT, VALIDATION_TOLERANCE_PERCENT,
};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::{path::PathBuf, sync::Arc};
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(name = "heatmap")]
#[command(about = "NYC school district heatmap API server")]
struct Cli {
    /// Directory holding the datasets and the boundary file (overrides NYC_DATA_DIR)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        #[arg(short = 'b', long, default_value = DEFAULT_HOST)]
        host: String,
    },
    /// Cross-check numeric district means against column means
    Validate {
        #[arg(short, long)]
        school_type: Option<String>,
    },
    /// Print the metrics of a dataset, or one metric's aggregates, as JSON
    Inspect {
        #[arg(short, long, default_value = "hs")]
        school_type: String,

        #[arg(short, long)]
        metric: Option<String>,
    },
}

fn build_aggregator(config: &ServerConfig) -> Result<Arc<MetricAggregator>> {
    let store = open_store(config)?;
    let source = Arc::new(ObjectStoreSource::new(store, config.registry.clone()));
    Ok(Arc::new(MetricAggregator::new(source)))
}

async fn run_validation(config: &ServerConfig, school_type: Option<String>) -> Result<()> {
    let school_types = match school_type {
        Some(key) => vec![key.parse::<SchoolType>()?],
        None => SchoolType::ALL.to_vec(),
    };

    info!("Running validation for {} datasets", school_types.len());
    let validator = Validator::new(build_aggregator(config)?);

    let results = validator.validate_all(&school_types).await?;

    let mut has_significant_errors = false;
    for (key, stats) in &results {
        if stats.difference_percent.abs() > VALIDATION_TOLERANCE_PERCENT {
            has_significant_errors = true;
            error!(
                "Significant discrepancy for {}: difference of {} ({:.6}%)",
                key, stats.difference, stats.difference_percent
            );
        }
    }

    if has_significant_errors {
        return Err(anyhow::anyhow!("Validation failed with significant discrepancies"));
    }

    if results.is_empty() {
        warn!("No numeric metrics found to validate");
    } else {
        info!("Validated {} numeric metrics with no discrepancies", results.len());
    }

    Ok(())
}

async fn run_inspect(config: &ServerConfig, school_type: String, metric: Option<String>) -> Result<()> {
    let aggregator = build_aggregator(config)?;

    let report = match metric {
        None => json!({
            "schoolType": school_type,
            "metrics": aggregator.list_metrics(&school_type).await?,
        }),
        Some(metric) => json!({
            "schoolType": school_type,
            "metric": metric,
            "kind": aggregator.classify(&school_type, &metric).await?,
            "districtAverages": aggregator.district_aggregates(&school_type, &metric).await?,
            "maxValue": aggregator.max_value(&school_type, &metric).await?,
        }),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables before the log filter reads RUST_LOG
    dotenv::dotenv().ok();

    init_logging();

    let cli = Cli::parse();

    let config = ServerConfig::from_env()?.with_data_dir(cli.data_dir);

    match cli.command {
        Commands::Serve { host, port } => {
            info!("Starting API server using data from {}", config.data_dir.display());
            if let Err(e) = serve(host, port, config).await {
                error!("Server failed: {}", e);
                return Err(e);
            }
        }
        Commands::Validate { school_type } => {
            run_validation(&config, school_type).await?;
        }
        Commands::Inspect { school_type, metric } => {
            run_inspect(&config, school_type, metric).await?;
        }
    }

    Ok(())
}
