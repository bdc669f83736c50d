use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{error::Result, geo::Coordinates};

/// Device geolocation capability
///
/// Implementations report `PileError::LocationUnavailable` (or
/// `PermissionDenied`) when no fix can be produced.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self, timeout: Duration) -> Result<Coordinates>;
}

/// Resolve the search origin, falling back to `fallback` when the device
/// cannot provide a position within `timeout`.
pub async fn resolve_origin(
    geolocator: &dyn Geolocator,
    timeout: Duration,
    fallback: Coordinates,
) -> Coordinates {
    match tokio::time::timeout(timeout, geolocator.current_position(timeout)).await {
        Ok(Ok(position)) => {
            debug!("Using device position ({:.4}, {:.4})", position.lat, position.lng);
            position
        }
        Ok(Err(e)) => {
            warn!("Geolocation failed ({}), using default origin", e);
            fallback
        }
        Err(_) => {
            warn!("Geolocation timed out after {:?}, using default origin", timeout);
            fallback
        }
    }
}
