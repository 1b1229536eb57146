use serde::{Deserialize, Serialize};

use super::Coordinates;

/// Charging/fuel station row from the static catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// Street address, also the deduplication key (exact, case-sensitive)
    pub street_address: String,
    pub city: String,
    /// Two-letter postal code
    pub state: String,
    pub zip: String,
    pub lat: f64,
    pub lng: f64,
}

impl Station {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates { lat: self.lat, lng: self.lng }
    }
}

/// A station annotated with a distance in miles.
///
/// Straight-line after shortlisting, road distance after refinement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDistance {
    pub station: Station,
    pub distance_miles: f64,
}

impl StationDistance {
    pub fn new(station: Station, distance_miles: f64) -> Self {
        Self { station, distance_miles }
    }
}

impl std::fmt::Display for StationDistance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {} {} ({:.2} miles)",
            self.station.street_address,
            self.station.city,
            self.station.state,
            self.station.zip,
            self.distance_miles
        )
    }
}
