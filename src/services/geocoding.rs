//! Geocoding abstraction layer
//!
//! - `NominatimGeocoder` for production (rate limited, no retries)
//! - `MockGeocoder` for tests (fixed address table, no network)

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::GeocodeError;
use crate::services::nominatim::NominatimClient;
use crate::types::Coordinates;

/// Geocoder trait - abstraction for all geocoding implementations
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a free-text address to coordinates.
    /// A missing match is `GeocodeError::NoMatch`, never a default coordinate.
    async fn resolve(&self, address: &str) -> Result<Coordinates, GeocodeError>;

    /// Get the name of this geocoder implementation
    fn name(&self) -> &'static str;
}

// ==========================================================================
// NominatimGeocoder
// ==========================================================================

/// Nominatim geocoder with a minimum interval between requests
pub struct NominatimGeocoder {
    client: NominatimClient,
    rate_limiter: RateLimiter,
}

impl NominatimGeocoder {
    pub fn new(
        base_url: &str,
        user_agent: &str,
        timeout: Duration,
        rate_limit_interval: Duration,
    ) -> Result<Self, GeocodeError> {
        Ok(Self {
            client: NominatimClient::new(base_url, user_agent, timeout)?,
            rate_limiter: RateLimiter::new(rate_limit_interval),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        self.rate_limiter.wait().await;

        match self.client.geocode(address).await {
            Ok(Some(coords)) => {
                debug!("Geocoded '{}' to {}", address, coords);
                Ok(coords)
            }
            Ok(None) => {
                warn!("No geocoding match for '{}'", address);
                Err(GeocodeError::NoMatch { address: address.to_string() })
            }
            Err(e) => {
                tracing::error!("Geocoding failed for '{}': {}", address, e);
                Err(e)
            }
        }
    }

    fn name(&self) -> &'static str {
        "nominatim"
    }
}

// ==========================================================================
// MockGeocoder
// ==========================================================================

/// Mock geocoder for testing - resolves only addresses it was given
#[derive(Default)]
pub struct MockGeocoder {
    addresses: HashMap<String, Coordinates>,
    calls: AtomicUsize,
}

impl MockGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_address(mut self, address: &str, coords: Coordinates) -> Self {
        self.addresses.insert(address.to_string(), coords);
        self
    }

    /// Number of `resolve` calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn resolve(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        self.addresses
            .get(address)
            .copied()
            .ok_or_else(|| GeocodeError::NoMatch { address: address.to_string() })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

// ==========================================================================
// RateLimiter
// ==========================================================================

/// Rate limiter that enforces minimum interval between calls
pub struct RateLimiter {
    last_call: Arc<Mutex<Option<Instant>>>,
    min_interval: Duration,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_call: Arc::new(Mutex::new(None)),
            min_interval,
        }
    }

    /// Wait until it's safe to make another call
    pub async fn wait(&self) {
        let mut last = self.last_call.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }
}
