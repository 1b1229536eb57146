use serde::{Deserialize, Serialize};

use super::{GasGrade, StationDistance};

/// Input to a full commute analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub home_address: String,
    pub work_address: String,
    pub days_per_week: u8,
    pub ev_model: String,
    pub gas_mileage: Option<f64>,
    pub gas_type: Option<GasGrade>,
    pub include_gas: bool,
}

/// Input to the cost estimator, once the commute distance and state are known
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateInput {
    pub commute_one_way_miles: f64,
    pub days_per_week: u8,
    /// Two-letter postal code or full state name
    pub state: String,
    pub ev_model: String,
    pub gas_mileage: Option<f64>,
    pub gas_type: Option<GasGrade>,
    pub include_gas: bool,
}

/// Inputs echoed back in the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInputs {
    pub home_work_distance: f64,
    pub days_per_week: u8,
    /// Full state name used for the price lookups
    pub state: String,
    pub ev_model: String,
    pub ev_cost_per_kwh: f64,
    pub battery_capacity: f64,
    pub ev_range: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_type: Option<GasGrade>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_mileage: Option<f64>,
}

/// Per-period costs for one vehicle type, in dollars
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub cost_per_mile: f64,
    pub weekly: f64,
    /// 4 weeks
    pub monthly: f64,
    /// 52 weeks
    pub yearly: f64,
}

/// Gas cost minus EV cost. Positive means the EV is cheaper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Savings {
    pub weekly: f64,
    pub monthly: f64,
    pub yearly: f64,
}

impl Savings {
    pub fn ev_is_cheaper(&self) -> bool {
        self.yearly > 0.0
    }
}

/// Final cost report. Gas costs and savings are present iff gas was included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostReport {
    pub inputs: ReportInputs,
    pub ev_costs: CostBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_costs: Option<CostBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings: Option<Savings>,
}

/// Everything the presentation layer needs from one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub report: CostReport,
    /// Nearest station to home by road distance
    pub home_station: StationDistance,
    /// Nearest station to work by road distance
    pub work_station: StationDistance,
}
