//! Error types for the analysis pipeline
//!
//! Each external collaborator gets its own error enum so callers can tell a
//! missing geocoding match apart from a dead network, and a lookup miss
//! always carries the key that was not found.

use thiserror::Error;

/// Errors from address resolution.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Provider answered but found nothing for the address.
    #[error("No geocoding match for address '{address}'")]
    NoMatch { address: String },

    /// Request could not be sent or timed out.
    #[error("Geocoding request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider returned a non-success status.
    #[error("Geocoding provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Provider response could not be interpreted.
    #[error("Invalid geocoding response: {message}")]
    Parse { message: String },
}

/// Errors while loading a static reference dataset.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("Failed to read dataset '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in '{path}': {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Dataset '{path}' is missing required column '{column}'")]
    MissingColumn { path: String, column: String },

    #[error("Dataset '{path}' row {row}: invalid value '{value}' in column '{column}'")]
    InvalidValue {
        path: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("Dataset '{path}' lists '{key}' more than once")]
    DuplicateKey { path: String, key: String },
}

/// Errors from road-distance resolution.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Request could not be sent or timed out.
    #[error("Routing request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider returned a non-success status.
    #[error("Routing provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Provider found no route between the two points.
    #[error("No route found between {from} and {to}")]
    NoRoute { from: String, to: String },

    /// Response did not have the expected shape.
    #[error("Malformed routing response: {message}")]
    Malformed { message: String },
}

/// A reference table had no row for the requested key.
#[derive(Debug, Error, PartialEq)]
pub enum LookupError {
    #[error("EV model '{0}' not found in vehicle table")]
    VehicleModel(String),

    #[error("State '{0}' not found in EV price table")]
    EvPriceState(String),

    #[error("State '{0}' not found in gas price table")]
    GasPriceState(String),

    #[error("No {grade} gas price for state '{state}'")]
    GasGrade { state: String, grade: String },
}

/// Request input rejected before any network call.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Days per week must be between 1 and 7, got {0}")]
    DaysOutOfRange(u8),

    #[error("Missing required selection: {0}")]
    MissingSelection(&'static str),

    #[error("Gas mileage must be a positive number of miles per gallon, got {0}")]
    InvalidGasMileage(f64),

    #[error("Commute distance must be a non-negative number of miles, got {0}")]
    InvalidCommuteDistance(f64),

    #[error("Station shortlist size must be at least 1, got {0}")]
    InvalidStationCount(usize),
}

/// Any failure of a commute analysis. There is no partial result.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error(transparent)]
    CatalogLoad(#[from] CatalogLoadError),

    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The station catalog has no rows to choose from.
    #[error("Station catalog is empty")]
    EmptyCatalog,
}
