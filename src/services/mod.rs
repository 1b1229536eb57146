//! Business logic services

pub mod analysis;
pub mod dataset;
pub mod estimator;
pub mod geo;
pub mod geocoding;
pub mod nominatim;
pub mod routing;
pub mod states;
pub mod stations;
pub mod tables;
