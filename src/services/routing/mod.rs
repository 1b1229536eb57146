//! Road-distance resolution
//!
//! Uses OpenRouteService for production, mock for tests.

mod openrouteservice;

pub use openrouteservice::{OrsClient, OrsConfig};

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::RoutingError;
use crate::services::geo::{haversine_miles, meters_to_miles, MILES_PER_METER};
use crate::types::{Coordinates, StationDistance};

/// Routing service trait for abstraction (ORS, mock, etc.)
#[async_trait]
pub trait RoutingService: Send + Sync {
    /// Driving distance in meters from `from` to `to`
    async fn distance_meters(&self, from: &Coordinates, to: &Coordinates) -> Result<f64, RoutingError>;

    /// Get service name for logging
    fn name(&self) -> &str;
}

/// Driving distance in miles between two points
pub async fn road_distance(
    routing: &dyn RoutingService,
    from: &Coordinates,
    to: &Coordinates,
) -> Result<f64, RoutingError> {
    let meters = routing.distance_meters(from, to).await?;
    let miles = meters_to_miles(meters);
    debug!("{} road distance {} -> {}: {:.2} miles", routing.name(), from, to, miles);
    Ok(miles)
}

/// Pick the shortlisted station with the smallest road distance from `reference`.
///
/// Calls are issued in shortlist order; ties keep the earlier candidate.
/// The returned record carries the road distance, not the straight-line one.
/// Returns `None` only for an empty shortlist.
pub async fn select_nearest_by_road(
    routing: &dyn RoutingService,
    reference: &Coordinates,
    candidates: &[StationDistance],
) -> Result<Option<StationDistance>, RoutingError> {
    let mut best: Option<StationDistance> = None;

    for candidate in candidates {
        let miles = road_distance(routing, reference, &candidate.station.coordinates()).await?;

        let closer = match &best {
            Some(current) => miles < current.distance_miles,
            None => true,
        };
        if closer {
            best = Some(StationDistance::new(candidate.station.clone(), miles));
        }
    }

    if let Some(station) = &best {
        info!("Closest station by road: {}", station);
    }

    Ok(best)
}

/// Mock routing service for tests
///
/// Returns haversine distance × coefficient, unless a fixed distance was
/// registered for the destination.
pub struct MockRoutingService {
    road_coefficient: f64,
    fixed: Vec<(Coordinates, f64)>,
    unroutable: Vec<Coordinates>,
    calls: AtomicUsize,
}

impl Default for MockRoutingService {
    fn default() -> Self {
        Self {
            road_coefficient: 1.3,
            fixed: Vec::new(),
            unroutable: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl MockRoutingService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_coefficient(road_coefficient: f64) -> Self {
        Self {
            road_coefficient,
            ..Self::default()
        }
    }

    /// Always answer `meters` for routes ending at `to`
    pub fn with_distance_to(mut self, to: Coordinates, meters: f64) -> Self {
        self.fixed.push((to, meters));
        self
    }

    /// Answer `NoRoute` for routes ending at `to`
    pub fn with_unroutable(mut self, to: Coordinates) -> Self {
        self.unroutable.push(to);
        self
    }

    /// Number of routing calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RoutingService for MockRoutingService {
    async fn distance_meters(&self, from: &Coordinates, to: &Coordinates) -> Result<f64, RoutingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.unroutable.contains(to) {
            return Err(RoutingError::NoRoute {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        if let Some((_, meters)) = self.fixed.iter().find(|(dest, _)| dest == to) {
            return Ok(*meters);
        }

        let straight_line_miles = haversine_miles(from, to);
        Ok(straight_line_miles * self.road_coefficient / MILES_PER_METER)
    }

    fn name(&self) -> &str {
        "MockRouting"
    }
}
