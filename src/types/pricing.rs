use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::GasGrade;

/// EV energy price for one state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvPriceEntry {
    /// Full state name, e.g. "Texas"
    pub state: String,
    pub cost_per_kwh: f64,
}

/// Gas prices for one state. A missing grade means no price was published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasPriceEntry {
    pub state: String,
    pub price_per_gallon: HashMap<GasGrade, f64>,
}

impl GasPriceEntry {
    pub fn price(&self, grade: GasGrade) -> Option<f64> {
        self.price_per_gallon.get(&grade).copied()
    }
}
