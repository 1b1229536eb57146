use serde::{Deserialize, Serialize};

/// EV specification row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSpec {
    pub model: String,
    pub battery_capacity_kwh: f64,
    pub range_miles: f64,
}

/// Gasoline grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum GasGrade {
    #[serde(rename = "Regular")]
    #[value(name = "regular")]
    Regular,
    #[serde(rename = "Mid-grade")]
    #[value(name = "mid-grade")]
    MidGrade,
    #[serde(rename = "Premium")]
    #[value(name = "premium")]
    Premium,
}

impl GasGrade {
    pub fn label(&self) -> &'static str {
        match self {
            GasGrade::Regular => "Regular",
            GasGrade::MidGrade => "Mid-grade",
            GasGrade::Premium => "Premium",
        }
    }
}

impl std::fmt::Display for GasGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
