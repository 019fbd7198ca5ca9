use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use rustfolio_performance::config::AppConfig;
use rustfolio_performance::external::build_provider;
use rustfolio_performance::logging::{init_logging, LoggingConfig};
use rustfolio_performance::models::{ComparisonResult, PerformanceResult, Period};
use rustfolio_performance::services::csv_import_service::import_positions_file;
use rustfolio_performance::services::performance_service;

const USAGE: &str = "usage: rustfolio-performance <positions.csv> [period] [--compare] [--per-position]";

#[derive(Debug, PartialEq)]
struct CliArgs {
    positions_file: PathBuf,
    period: Period,
    compare: bool,
    per_position: bool,
}

impl CliArgs {
    fn parse<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut positions_file = None;
        let mut period = None;
        let mut compare = false;
        let mut per_position = false;

        for arg in args {
            match arg.as_str() {
                "--compare" => compare = true,
                "--per-position" => per_position = true,
                "-h" | "--help" => bail!(USAGE),
                flag if flag.starts_with("--") => bail!("unknown flag {}\n{}", flag, USAGE),
                _ if positions_file.is_none() => positions_file = Some(PathBuf::from(&arg)),
                _ if period.is_none() => period = Some(Period::from_token(&arg)),
                _ => bail!("unexpected argument {}\n{}", arg, USAGE),
            }
        }

        let Some(positions_file) = positions_file else {
            bail!(USAGE);
        };

        Ok(Self {
            positions_file,
            period: period.unwrap_or_default(),
            compare,
            per_position,
        })
    }
}

#[derive(Debug, Serialize)]
struct PositionReport {
    symbol: String,
    performance: PerformanceResult,
}

#[derive(Debug, Serialize)]
struct Report {
    period: Period,
    portfolio: PerformanceResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    positions: Option<Vec<PositionReport>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comparison: Option<ComparisonResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    rejected_rows: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())?;

    let args = CliArgs::parse(std::env::args().skip(1))?;
    let config = AppConfig::from_env().context("invalid configuration")?;
    let provider = build_provider(&config)?;

    let import = import_positions_file(&args.positions_file)?;
    if import.positions.is_empty() && !import.errors.is_empty() {
        warn!("No valid positions in {:?}", args.positions_file);
    }

    let today = Utc::now().date_naive();
    let portfolio = performance_service::calculate_portfolio_performance(
        provider.as_ref(),
        &import.positions,
        args.period,
        today,
    )
    .await;

    let positions = if args.per_position {
        let mut reports = Vec::with_capacity(import.positions.len());
        for position in &import.positions {
            let performance = performance_service::calculate_position_performance(
                provider.as_ref(),
                position,
                args.period,
                today,
            )
            .await;
            reports.push(PositionReport {
                symbol: position.symbol.clone(),
                performance,
            });
        }
        Some(reports)
    } else {
        None
    };

    let comparison = if args.compare {
        info!("Comparing against {}", config.benchmark_symbol);
        Some(
            performance_service::compare_with_index(
                provider.as_ref(),
                &portfolio.data,
                &config.benchmark_symbol,
                today,
            )
            .await,
        )
    } else {
        None
    };

    let report = Report {
        period: args.period,
        portfolio,
        positions,
        comparison,
        rejected_rows: import.errors,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
