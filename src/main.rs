//! Commute Cost - EV vs gasoline commuting cost analysis
//!
//! Resolves a home/work address pair, finds the nearest charging station to
//! each by road, and projects weekly, monthly and yearly commuting costs.

mod cli;
mod config;
mod error;
mod render;
mod services;
mod types;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command, DatasetArgs};
use config::{Config, DatasetPaths};
use services::analysis::CommuteAnalyzer;
use services::estimator::DEFAULT_GAS_MILEAGE_MPG;
use services::geocoding::NominatimGeocoder;
use services::routing::{OrsClient, OrsConfig};
use services::stations::StationCatalog;
use services::tables::{ReferenceTables, TablePaths};
use types::AnalysisRequest;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs directory - use LOGS_DIR env var or default to ./logs
    let logs_dir = std::env::var("LOGS_DIR").unwrap_or_else(|_| "logs".to_string());
    std::fs::create_dir_all(&logs_dir).ok();

    // File appender for persistent logs (daily rotation)
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &logs_dir, "commute-cost.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Stdout carries the report, so console logs go to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,commute_cost=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    let datasets = override_datasets(config.datasets.clone(), cli.datasets);

    let result = run(cli.command, &config, &datasets).await;
    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}

async fn run(command: Command, config: &Config, datasets: &DatasetPaths) -> Result<()> {
    match command {
        Command::Analyze {
            home,
            work,
            days,
            model,
            gas_mileage,
            gas_type,
            json,
        } => {
            let api_key = config.require_ors_api_key()?.to_string();
            let tables = load_tables(datasets)?;
            let catalog = StationCatalog::load(&datasets.stations)?;
            let analyzer = build_analyzer(config, api_key, catalog, tables)?;

            let request = AnalysisRequest {
                home_address: home,
                work_address: work,
                days_per_week: days,
                ev_model: model,
                include_gas: gas_mileage.is_some() || gas_type.is_some(),
                gas_mileage: gas_mileage.or_else(|| gas_type.map(|_| DEFAULT_GAS_MILEAGE_MPG)),
                gas_type,
            };

            let outcome = analyzer.analyze(&request).await?;
            info!("Analysis complete");

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print!("{}", render::outcome_text(&outcome));
            }
        }
        Command::Models => {
            let tables = load_tables(datasets)?;
            for model in tables.models() {
                println!("{}", model);
            }
        }
        Command::Stations { address, k, json } => {
            let tables = ReferenceTables::default();
            let catalog = StationCatalog::load(&datasets.stations)?;
            // The stations command never routes, so it runs without a key
            let api_key = config.ors_api_key.clone().unwrap_or_default();
            let analyzer = build_analyzer(config, api_key, catalog, tables)?.with_shortlist_size(k);

            let shortlist = analyzer.shortlist(&address).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&shortlist)?);
            } else {
                print!("{}", render::shortlist_text(&shortlist));
            }
        }
    }

    Ok(())
}

fn build_analyzer(
    config: &Config,
    api_key: String,
    catalog: StationCatalog,
    tables: ReferenceTables,
) -> Result<CommuteAnalyzer> {
    let geocoder = NominatimGeocoder::new(
        &config.nominatim_url,
        &config.geocoder_user_agent,
        config.http_timeout,
        config.nominatim_rate_limit,
    )
    .context("Failed to create geocoding client")?;

    let routing = OrsClient::new(OrsConfig {
        base_url: config.ors_base_url.clone(),
        profile: config.ors_profile.clone(),
        timeout_seconds: config.http_timeout.as_secs(),
        ..OrsConfig::new(api_key)
    })
    .context("Failed to create routing client")?;

    Ok(CommuteAnalyzer::new(
        Arc::new(geocoder),
        Arc::new(routing),
        Arc::new(catalog),
        Arc::new(tables),
    ))
}

fn load_tables(datasets: &DatasetPaths) -> Result<ReferenceTables> {
    Ok(ReferenceTables::load(&TablePaths {
        ev_specs: &datasets.ev_specs,
        ev_prices: &datasets.ev_prices,
        gas_prices: &datasets.gas_prices,
    })?)
}

fn override_datasets(base: DatasetPaths, args: DatasetArgs) -> DatasetPaths {
    let pick = |arg: Option<PathBuf>, default: PathBuf| arg.unwrap_or(default);
    DatasetPaths {
        stations: pick(args.stations, base.stations),
        ev_specs: pick(args.ev_specs, base.ev_specs),
        ev_prices: pick(args.ev_prices, base.ev_prices),
        gas_prices: pick(args.gas_prices, base.gas_prices),
    }
}
