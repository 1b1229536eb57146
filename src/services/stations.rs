//! Station catalog and straight-line nearest-station shortlist

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::CatalogLoadError;
use crate::services::dataset;
use crate::services::geo::haversine_miles;
use crate::types::{Coordinates, Station, StationDistance};

/// Default number of stations kept in a shortlist
pub const DEFAULT_SHORTLIST_SIZE: usize = 3;

const COLUMNS: [&str; 6] = ["Street Address", "City", "State", "ZIP", "Latitude", "Longitude"];

/// One row of the station dataset; other columns are ignored
#[derive(Debug, Deserialize)]
struct CsvStationRow {
    #[serde(rename = "Street Address")]
    street_address: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "ZIP")]
    zip: String,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
}

/// Read-only table of candidate stations, in dataset order
#[derive(Debug, Clone, Default)]
pub struct StationCatalog {
    stations: Vec<Station>,
}

impl StationCatalog {
    pub fn new(stations: Vec<Station>) -> Self {
        Self { stations }
    }

    /// Load the catalog from a CSV file
    pub fn load(path: &Path) -> Result<Self, CatalogLoadError> {
        let source = path.display().to_string();
        let catalog = Self::from_reader(dataset::open(path)?, &source)?;
        info!("Loaded {} stations from {}", catalog.len(), source);
        Ok(catalog)
    }

    /// Parse the catalog from any CSV reader. `source` names it in errors.
    pub fn from_reader<R: Read>(input: R, source: &str) -> Result<Self, CatalogLoadError> {
        let rows: Vec<(usize, CsvStationRow)> = dataset::read_rows(input, source, &COLUMNS)?;

        let stations = rows
            .into_iter()
            .map(|(row, station)| station_from_row(source, row, station))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { stations })
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

fn station_from_row(source: &str, row: usize, csv: CsvStationRow) -> Result<Station, CatalogLoadError> {
    if csv.street_address.is_empty() {
        return Err(dataset::invalid_value(source, row, "Street Address", ""));
    }
    if !csv.latitude.is_finite() || csv.latitude.abs() > 90.0 {
        return Err(dataset::invalid_value(source, row, "Latitude", csv.latitude));
    }
    if !csv.longitude.is_finite() || csv.longitude.abs() > 180.0 {
        return Err(dataset::invalid_value(source, row, "Longitude", csv.longitude));
    }

    Ok(Station {
        street_address: csv.street_address,
        city: csv.city,
        state: csv.state,
        zip: csv.zip,
        lat: csv.latitude,
        lng: csv.longitude,
    })
}

/// Top-`k` stations by straight-line distance, one per street address.
///
/// Sorts the whole catalog first, then deduplicates, so the nearest row of
/// a duplicated address wins. Equal distances keep catalog order.
pub fn select_nearest(reference: &Coordinates, catalog: &[Station], k: usize) -> Vec<StationDistance> {
    let mut ranked: Vec<(f64, &Station)> = catalog
        .iter()
        .map(|station| (haversine_miles(reference, &station.coordinates()), station))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut seen: HashSet<&str> = HashSet::new();
    let mut shortlist = Vec::with_capacity(k);

    for (distance, station) in ranked {
        if shortlist.len() >= k {
            break;
        }
        if !seen.insert(station.street_address.as_str()) {
            continue;
        }
        shortlist.push(StationDistance::new(station.clone(), distance));
    }

    debug!(
        "Shortlisted {} of {} stations near {}",
        shortlist.len(),
        catalog.len(),
        reference
    );

    shortlist
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(address: &str, lat: f64, lng: f64) -> Station {
        Station {
            street_address: address.to_string(),
            city: "Austin".to_string(),
            state: "TX".to_string(),
            zip: "78701".to_string(),
            lat,
            lng,
        }
    }

    fn reference() -> Coordinates {
        Coordinates { lat: 30.0, lng: -97.0 }
    }

    #[test]
    fn test_select_nearest_orders_by_distance() {
        let catalog = vec![
            station("far", 30.5, -97.0),
            station("near", 30.01, -97.0),
            station("middle", 30.1, -97.0),
            station("farthest", 31.0, -97.0),
        ];

        let shortlist = select_nearest(&reference(), &catalog, 3);

        let names: Vec<&str> = shortlist.iter().map(|s| s.station.street_address.as_str()).collect();
        assert_eq!(names, vec!["near", "middle", "far"]);
        assert!(shortlist.windows(2).all(|w| w[0].distance_miles <= w[1].distance_miles));
    }

    #[test]
    fn test_select_nearest_skips_duplicate_addresses() {
        let catalog = vec![
            station("1 Main St", 30.02, -97.0),
            station("1 Main St", 30.01, -97.0),
            station("2 Oak Ave", 30.03, -97.0),
            station("1 Main St", 30.001, -97.0),
            station("3 Elm Rd", 30.04, -97.0),
        ];

        let shortlist = select_nearest(&reference(), &catalog, 3);

        let names: Vec<&str> = shortlist.iter().map(|s| s.station.street_address.as_str()).collect();
        assert_eq!(names, vec!["1 Main St", "2 Oak Ave", "3 Elm Rd"]);
        // Nearest duplicate row wins
        assert_eq!(shortlist[0].station.lat, 30.001);
    }

    #[test]
    fn test_select_nearest_dedup_is_case_sensitive() {
        let catalog = vec![
            station("1 Main St", 30.01, -97.0),
            station("1 MAIN ST", 30.02, -97.0),
        ];

        let shortlist = select_nearest(&reference(), &catalog, 3);
        assert_eq!(shortlist.len(), 2);
    }

    #[test]
    fn test_select_nearest_returns_all_distinct_when_fewer_than_k() {
        let catalog = vec![
            station("A", 30.01, -97.0),
            station("A", 30.02, -97.0),
            station("B", 30.03, -97.0),
        ];

        let shortlist = select_nearest(&reference(), &catalog, 3);
        assert_eq!(shortlist.len(), 2);
    }

    #[test]
    fn test_select_nearest_count_is_min_of_k_and_distinct() {
        let catalog: Vec<Station> = (0..20)
            .map(|i| station(&format!("{} Loop", i % 7), 30.0 + i as f64 * 0.01, -97.0))
            .collect();

        for k in 0..10 {
            let shortlist = select_nearest(&reference(), &catalog, k);
            assert_eq!(shortlist.len(), k.min(7));

            let unique: HashSet<&str> = shortlist.iter().map(|s| s.station.street_address.as_str()).collect();
            assert_eq!(unique.len(), shortlist.len());
        }
    }

    #[test]
    fn test_select_nearest_empty_catalog() {
        assert!(select_nearest(&reference(), &[], 3).is_empty());
    }

    #[test]
    fn test_select_nearest_distances_are_straight_line_miles() {
        let catalog = vec![station("A", 31.0, -97.0)];
        let shortlist = select_nearest(&reference(), &catalog, 1);

        // One degree of latitude is about 69 miles
        assert!((shortlist[0].distance_miles - 69.1).abs() < 0.5);
    }

    #[test]
    fn test_catalog_from_reader() {
        let csv = "\
ID,Street Address,City,State,ZIP,Latitude,Longitude,Fuel Type
1,1000 E 41st St,Austin,TX,78751,30.3005,-97.7251,ELEC
2,  6001 Airport Blvd ,Austin,TX,78752,30.3232,-97.7108,ELEC
";
        let catalog = StationCatalog::from_reader(csv.as_bytes(), "stations.csv").unwrap();

        assert_eq!(catalog.len(), 2);
        let second = &catalog.stations()[1];
        assert_eq!(second.street_address, "6001 Airport Blvd");
        assert_eq!(second.state, "TX");
        assert_eq!(second.zip, "78752");
        assert!((second.lng + 97.7108).abs() < 1e-9);
    }

    #[test]
    fn test_catalog_missing_column_fails() {
        let csv = "Street Address,City,State,ZIP,Latitude\n1 Main,Austin,TX,78701,30.0\n";
        let err = StationCatalog::from_reader(csv.as_bytes(), "stations.csv").unwrap_err();
        assert!(matches!(err, CatalogLoadError::MissingColumn { ref column, .. } if column == "Longitude"));
    }

    #[test]
    fn test_catalog_bad_coordinate_fails() {
        let csv = "Street Address,City,State,ZIP,Latitude,Longitude\n1 Main,Austin,TX,78701,thirty,-97.0\n";
        let err = StationCatalog::from_reader(csv.as_bytes(), "stations.csv").unwrap_err();
        assert!(matches!(err, CatalogLoadError::InvalidValue { row: 1, .. }));
    }

    #[test]
    fn test_catalog_rejects_out_of_range_coordinate() {
        let csv = "Street Address,City,State,ZIP,Latitude,Longitude\n1 Main,Austin,TX,78701,30.0,-97.0\n2 Main,Austin,TX,78701,NaN,-97.0\n";
        let err = StationCatalog::from_reader(csv.as_bytes(), "stations.csv").unwrap_err();
        assert!(matches!(err, CatalogLoadError::InvalidValue { row: 2, ref column, .. } if column == "Latitude"));

        let csv = "Street Address,City,State,ZIP,Latitude,Longitude\n1 Main,Austin,TX,78701,30.0,-197.0\n";
        let err = StationCatalog::from_reader(csv.as_bytes(), "stations.csv").unwrap_err();
        assert!(matches!(err, CatalogLoadError::InvalidValue { row: 1, ref column, .. } if column == "Longitude"));
    }

    #[test]
    fn test_catalog_rejects_blank_address() {
        let csv = "Street Address,City,State,ZIP,Latitude,Longitude\n  ,Austin,TX,78701,30.0,-97.0\n";
        let err = StationCatalog::from_reader(csv.as_bytes(), "stations.csv").unwrap_err();
        assert!(matches!(err, CatalogLoadError::InvalidValue { ref column, .. } if column == "Street Address"));
    }

    #[test]
    fn test_catalog_loads_shipped_dataset() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/fuel_stations_cleaned.csv");
        let catalog = StationCatalog::load(&path).unwrap();

        assert!(!catalog.is_empty());
        assert!(catalog.stations().iter().all(|s| s.state == "TX"));
    }

    #[test]
    fn test_catalog_load_missing_file_fails() {
        let err = StationCatalog::load(Path::new("/nonexistent/stations.csv")).unwrap_err();
        assert!(matches!(err, CatalogLoadError::Io { .. }));
    }
}
