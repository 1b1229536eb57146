//! Static reference tables: EV specifications, EV energy prices, gas prices
//!
//! All currency strings are parsed here, once, at load time.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{CatalogLoadError, LookupError};
use crate::services::dataset;
use crate::types::{EvPriceEntry, GasGrade, GasPriceEntry, VehicleSpec};

const VEHICLE_COLUMNS: [&str; 3] = ["Model", "Battery Capacity (kWh)", "Range (miles)"];
const EV_PRICE_COLUMNS: [&str; 2] = ["State", "Cost per kWh"];
const GAS_PRICE_COLUMNS: [&str; 4] = ["State", "Regular", "Mid-Grade", "Premium"];

#[derive(Debug, Deserialize)]
struct CsvVehicleRow {
    #[serde(rename = "Model")]
    model: String,
    #[serde(rename = "Battery Capacity (kWh)")]
    battery_capacity_kwh: f64,
    #[serde(rename = "Range (miles)")]
    range_miles: f64,
}

#[derive(Debug, Deserialize)]
struct CsvEvPriceRow {
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "Cost per kWh", deserialize_with = "dataset::currency")]
    cost_per_kwh: f64,
}

/// Blank grade cells mean the grade has no published price
#[derive(Debug, Deserialize)]
struct CsvGasPriceRow {
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "Regular", default, deserialize_with = "dataset::optional_currency")]
    regular: Option<f64>,
    #[serde(rename = "Mid-Grade", default, deserialize_with = "dataset::optional_currency")]
    mid_grade: Option<f64>,
    #[serde(rename = "Premium", default, deserialize_with = "dataset::optional_currency")]
    premium: Option<f64>,
}

/// Paths of the three reference CSV files
#[derive(Debug, Clone)]
pub struct TablePaths<'a> {
    pub ev_specs: &'a Path,
    pub ev_prices: &'a Path,
    pub gas_prices: &'a Path,
}

/// Immutable lookup tables shared by all analyses
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    vehicles: Vec<VehicleSpec>,
    ev_prices: HashMap<String, EvPriceEntry>,
    gas_prices: HashMap<String, GasPriceEntry>,
}

impl ReferenceTables {
    pub fn new(
        vehicles: Vec<VehicleSpec>,
        ev_prices: Vec<EvPriceEntry>,
        gas_prices: Vec<GasPriceEntry>,
    ) -> Self {
        Self {
            vehicles,
            ev_prices: ev_prices.into_iter().map(|e| (e.state.clone(), e)).collect(),
            gas_prices: gas_prices.into_iter().map(|e| (e.state.clone(), e)).collect(),
        }
    }

    /// Load all three tables from disk
    pub fn load(paths: &TablePaths<'_>) -> Result<Self, CatalogLoadError> {
        let vehicles = read_vehicle_specs(
            dataset::open(paths.ev_specs)?,
            &paths.ev_specs.display().to_string(),
        )?;
        let ev_prices = read_ev_prices(
            dataset::open(paths.ev_prices)?,
            &paths.ev_prices.display().to_string(),
        )?;
        let gas_prices = read_gas_prices(
            dataset::open(paths.gas_prices)?,
            &paths.gas_prices.display().to_string(),
        )?;

        info!(
            "Loaded reference tables: {} EV models, {} EV price states, {} gas price states",
            vehicles.len(),
            ev_prices.len(),
            gas_prices.len()
        );

        Ok(Self::new(vehicles, ev_prices, gas_prices))
    }

    /// EV model names in table order
    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.vehicles.iter().map(|v| v.model.as_str())
    }

    pub fn vehicle(&self, model: &str) -> Result<&VehicleSpec, LookupError> {
        self.vehicles
            .iter()
            .find(|v| v.model == model)
            .ok_or_else(|| LookupError::VehicleModel(model.to_string()))
    }

    /// EV price per kWh for a full state name
    pub fn ev_price(&self, state: &str) -> Result<f64, LookupError> {
        self.ev_prices
            .get(state)
            .map(|e| e.cost_per_kwh)
            .ok_or_else(|| LookupError::EvPriceState(state.to_string()))
    }

    /// Gas price per gallon for a full state name and grade
    pub fn gas_price(&self, state: &str, grade: GasGrade) -> Result<f64, LookupError> {
        let entry = self
            .gas_prices
            .get(state)
            .ok_or_else(|| LookupError::GasPriceState(state.to_string()))?;

        entry.price(grade).ok_or_else(|| LookupError::GasGrade {
            state: state.to_string(),
            grade: grade.to_string(),
        })
    }
}

/// Parse the EV specification table. Model names must be unique.
pub fn read_vehicle_specs<R: Read>(input: R, source: &str) -> Result<Vec<VehicleSpec>, CatalogLoadError> {
    let rows: Vec<(usize, CsvVehicleRow)> = dataset::read_rows(input, source, &VEHICLE_COLUMNS)?;

    let mut vehicles = Vec::with_capacity(rows.len());
    for (row, csv) in rows {
        if csv.model.is_empty() {
            return Err(dataset::invalid_value(source, row, VEHICLE_COLUMNS[0], ""));
        }
        if !csv.battery_capacity_kwh.is_finite() || csv.battery_capacity_kwh <= 0.0 {
            return Err(dataset::invalid_value(source, row, VEHICLE_COLUMNS[1], csv.battery_capacity_kwh));
        }
        if !csv.range_miles.is_finite() || csv.range_miles <= 0.0 {
            return Err(dataset::invalid_value(source, row, VEHICLE_COLUMNS[2], csv.range_miles));
        }

        vehicles.push(VehicleSpec {
            model: csv.model,
            battery_capacity_kwh: csv.battery_capacity_kwh,
            range_miles: csv.range_miles,
        });
    }

    dataset::ensure_unique(source, vehicles.iter().map(|v| v.model.as_str()))?;
    Ok(vehicles)
}

/// Parse the EV price-per-kWh-by-state table. State names must be unique.
pub fn read_ev_prices<R: Read>(input: R, source: &str) -> Result<Vec<EvPriceEntry>, CatalogLoadError> {
    let rows: Vec<(usize, CsvEvPriceRow)> = dataset::read_rows(input, source, &EV_PRICE_COLUMNS)?;

    let mut prices = Vec::with_capacity(rows.len());
    for (row, csv) in rows {
        if csv.state.is_empty() {
            return Err(dataset::invalid_value(source, row, EV_PRICE_COLUMNS[0], ""));
        }
        prices.push(EvPriceEntry {
            state: csv.state,
            cost_per_kwh: csv.cost_per_kwh,
        });
    }

    dataset::ensure_unique(source, prices.iter().map(|p| p.state.as_str()))?;
    Ok(prices)
}

/// Parse the gas-price-by-state-and-grade table. State names must be unique.
pub fn read_gas_prices<R: Read>(input: R, source: &str) -> Result<Vec<GasPriceEntry>, CatalogLoadError> {
    let rows: Vec<(usize, CsvGasPriceRow)> = dataset::read_rows(input, source, &GAS_PRICE_COLUMNS)?;

    let mut prices = Vec::with_capacity(rows.len());
    for (row, csv) in rows {
        if csv.state.is_empty() {
            return Err(dataset::invalid_value(source, row, GAS_PRICE_COLUMNS[0], ""));
        }

        let price_per_gallon: HashMap<GasGrade, f64> = [
            (GasGrade::Regular, csv.regular),
            (GasGrade::MidGrade, csv.mid_grade),
            (GasGrade::Premium, csv.premium),
        ]
        .into_iter()
        .filter_map(|(grade, price)| price.map(|p| (grade, p)))
        .collect();

        prices.push(GasPriceEntry {
            state: csv.state,
            price_per_gallon,
        });
    }

    dataset::ensure_unique(source, prices.iter().map(|p| p.state.as_str()))?;
    Ok(prices)
}
