//! CLI argument parsing for the commute-cost binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::GasGrade;

#[derive(Parser)]
#[command(name = "commute-cost", about = "EV vs gas commuting cost analysis")]
pub struct Cli {
    #[command(flatten)]
    pub datasets: DatasetArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Dataset path overrides (take precedence over environment)
#[derive(Args, Default)]
pub struct DatasetArgs {
    /// Station catalog CSV
    #[arg(long, global = true)]
    pub stations: Option<PathBuf>,
    /// EV specification CSV
    #[arg(long, global = true)]
    pub ev_specs: Option<PathBuf>,
    /// EV price per kWh by state CSV
    #[arg(long, global = true)]
    pub ev_prices: Option<PathBuf>,
    /// Gas price by state and grade CSV
    #[arg(long, global = true)]
    pub gas_prices: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare commuting costs for a home/work address pair
    Analyze {
        /// Home address, e.g. "6805 Wood Hollow Dr, Austin, TX 78731"
        #[arg(long)]
        home: String,
        /// Work address
        #[arg(long)]
        work: String,
        /// Days commuting per week (1-7)
        #[arg(long)]
        days: u8,
        /// EV model, as listed by `models`
        #[arg(long)]
        model: String,
        /// Gas vehicle mileage in MPG (includes the gas comparison)
        #[arg(long)]
        gas_mileage: Option<f64>,
        /// Gas grade (includes the gas comparison, 27 MPG unless --gas-mileage is given)
        #[arg(long, value_enum)]
        gas_type: Option<GasGrade>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the available EV models
    Models,
    /// Show the nearest stations to an address by straight-line distance
    Stations {
        #[arg(long)]
        address: String,
        /// Number of distinct stations to show
        #[arg(short, default_value_t = 3)]
        k: usize,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_analyze_ev_only_parses() {
        let cli = Cli::parse_from([
            "commute-cost", "analyze",
            "--home", "1 Home St", "--work", "2 Work St",
            "--days", "5", "--model", "Tesla Model 3",
        ]);
        match cli.command {
            Command::Analyze { days, model, gas_mileage, gas_type, json, .. } => {
                assert_eq!(days, 5);
                assert_eq!(model, "Tesla Model 3");
                assert!(gas_mileage.is_none());
                assert!(gas_type.is_none());
                assert!(!json);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_cli_analyze_with_gas_parses() {
        let cli = Cli::parse_from([
            "commute-cost", "analyze",
            "--home", "a", "--work", "b", "--days", "3", "--model", "m",
            "--gas-mileage", "27", "--gas-type", "mid-grade", "--json",
        ]);
        match cli.command {
            Command::Analyze { gas_mileage, gas_type, json, .. } => {
                assert_eq!(gas_mileage, Some(27.0));
                assert_eq!(gas_type, Some(GasGrade::MidGrade));
                assert!(json);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_cli_models_command_parses() {
        let cli = Cli::parse_from(["commute-cost", "models", "--ev-specs", "/tmp/specs.csv"]);
        assert!(matches!(cli.command, Command::Models));
        assert_eq!(cli.datasets.ev_specs, Some(PathBuf::from("/tmp/specs.csv")));
    }

    #[test]
    fn test_cli_stations_default_k() {
        let cli = Cli::parse_from(["commute-cost", "stations", "--address", "a"]);
        assert!(matches!(cli.command, Command::Stations { k: 3, .. }));
    }

    #[test]
    fn test_cli_rejects_unknown_gas_type() {
        let result = Cli::try_parse_from([
            "commute-cost", "analyze", "--home", "a", "--work", "b",
            "--days", "3", "--model", "m", "--gas-type", "diesel",
        ]);
        assert!(result.is_err());
    }
}
