//! End-to-end commute analysis
//!
//! geocode both addresses -> straight-line shortlist per address ->
//! road-distance refinement (home and work sides concurrently, plus the
//! home/work commute) -> cost estimate.

use std::sync::Arc;

use tracing::info;

use crate::error::{AnalysisError, ValidationError};
use crate::services::estimator::{estimate, validate_selection};
use crate::services::geocoding::Geocoder;
use crate::services::routing::{road_distance, select_nearest_by_road, RoutingService};
use crate::services::stations::{select_nearest, StationCatalog, DEFAULT_SHORTLIST_SIZE};
use crate::services::tables::ReferenceTables;
use crate::types::{AnalysisOutcome, AnalysisRequest, EstimateInput, StationDistance};

/// Runs analyses against shared, read-only datasets
pub struct CommuteAnalyzer {
    geocoder: Arc<dyn Geocoder>,
    routing: Arc<dyn RoutingService>,
    catalog: Arc<StationCatalog>,
    tables: Arc<ReferenceTables>,
    shortlist_size: usize,
}

impl CommuteAnalyzer {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        routing: Arc<dyn RoutingService>,
        catalog: Arc<StationCatalog>,
        tables: Arc<ReferenceTables>,
    ) -> Self {
        Self {
            geocoder,
            routing,
            catalog,
            tables,
            shortlist_size: DEFAULT_SHORTLIST_SIZE,
        }
    }

    /// Number of straight-line candidates refined by road distance
    pub fn with_shortlist_size(mut self, shortlist_size: usize) -> Self {
        self.shortlist_size = shortlist_size;
        self
    }

    /// Run the full pipeline. Any failure aborts with no partial result.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome, AnalysisError> {
        // Everything checkable offline fails before the first external call
        validate_selection(
            request.days_per_week,
            &request.ev_model,
            request.gas_mileage,
            request.gas_type,
            request.include_gas,
        )?;
        self.check_shortlist_size()?;
        self.tables.vehicle(&request.ev_model)?;
        if self.catalog.is_empty() {
            return Err(AnalysisError::EmptyCatalog);
        }

        info!(
            "Analyzing commute with {} via {} / {}",
            request.ev_model,
            self.geocoder.name(),
            self.routing.name()
        );

        let home = self.geocoder.resolve(&request.home_address).await?;
        let work = self.geocoder.resolve(&request.work_address).await?;

        let home_shortlist = select_nearest(&home, self.catalog.stations(), self.shortlist_size);
        let work_shortlist = select_nearest(&work, self.catalog.stations(), self.shortlist_size);

        let routing = self.routing.as_ref();
        let (home_station, work_station, commute_miles) = tokio::try_join!(
            select_nearest_by_road(routing, &home, &home_shortlist),
            select_nearest_by_road(routing, &work, &work_shortlist),
            road_distance(routing, &home, &work),
        )?;

        let home_station = home_station.ok_or(AnalysisError::EmptyCatalog)?;
        let work_station = work_station.ok_or(AnalysisError::EmptyCatalog)?;

        info!("Home to work distance: {:.2} miles", commute_miles);

        let report = estimate(
            &EstimateInput {
                commute_one_way_miles: commute_miles,
                days_per_week: request.days_per_week,
                state: home_station.station.state.clone(),
                ev_model: request.ev_model.clone(),
                gas_mileage: request.gas_mileage,
                gas_type: request.gas_type,
                include_gas: request.include_gas,
            },
            &self.tables,
        )?;

        Ok(AnalysisOutcome {
            report,
            home_station,
            work_station,
        })
    }

    /// Straight-line shortlist around one address (no routing calls)
    pub async fn shortlist(&self, address: &str) -> Result<Vec<StationDistance>, AnalysisError> {
        self.check_shortlist_size()?;
        let reference = self.geocoder.resolve(address).await?;
        Ok(select_nearest(&reference, self.catalog.stations(), self.shortlist_size))
    }

    fn check_shortlist_size(&self) -> Result<(), ValidationError> {
        if self.shortlist_size == 0 {
            return Err(ValidationError::InvalidStationCount(self.shortlist_size));
        }
        Ok(())
    }
}
