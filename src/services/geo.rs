//! Geographic calculations

use crate::types::Coordinates;

/// Mean Earth radius in miles
const EARTH_RADIUS_MILES: f64 = 3958.7613;

/// Miles per meter, as used for provider distances
pub const MILES_PER_METER: f64 = 0.000621371;

/// Calculate Haversine (great-circle) distance between two points in miles
pub fn haversine_miles(from: &Coordinates, to: &Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lng - from.lng).to_radians();

    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    // Clamp guards against a > 1.0 from rounding on antipodal points
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_MILES * c
}

/// Convert a provider distance in meters to miles
pub fn meters_to_miles(meters: f64) -> f64 {
    meters * MILES_PER_METER
}
