//! Async work behind effects, each resolving to the action that reports it

use crate::action::Action;
use crate::api::ForecastGateway;
use crate::geo::Geolocator;
use crate::state::{Coordinates, UnitSystem};

/// Ask the geolocator for a position. Failures are logged, not surfaced.
pub async fn locate_device(geolocator: &dyn Geolocator) -> Action {
    match geolocator.current_position().await {
        Ok(coords) => {
            tracing::info!(
                latitude = coords.latitude,
                longitude = coords.longitude,
                "Device located"
            );
            Action::GeoDidLocate(coords)
        }
        Err(e) => {
            tracing::warn!("Geolocation blocked: {}", e);
            Action::GeoDidFail(e.to_string())
        }
    }
}

/// Forecast for the device position
pub async fn load_forecast(
    gateway: &ForecastGateway,
    coords: Coordinates,
    units: UnitSystem,
) -> Action {
    match gateway
        .fetch_forecast(coords.latitude, coords.longitude, units)
        .await
    {
        Ok(forecast) => Action::ForecastDidLoad(forecast),
        Err(e) => {
            tracing::warn!("Forecast fetch failed: {}", e);
            Action::ForecastDidError(e.to_string())
        }
    }
}

/// Geocode `query`, then fetch the forecast for the first match.
pub async fn search_forecast(gateway: &ForecastGateway, query: &str, units: UnitSystem) -> Action {
    let place = match gateway.resolve_query(query).await {
        Ok(Some(place)) => place,
        Ok(None) => {
            tracing::info!(query, "No geocoding match");
            return Action::SearchDidMiss;
        }
        Err(e) => {
            tracing::warn!("Geocoding failed: {}", e);
            return Action::ForecastDidError(e.to_string());
        }
    };

    tracing::info!(query, label = %place.label, "Resolved place");
    match gateway
        .fetch_forecast(place.latitude, place.longitude, units)
        .await
    {
        Ok(forecast) => Action::SearchDidLoad { place, forecast },
        Err(e) => {
            tracing::warn!("Forecast fetch failed: {}", e);
            Action::ForecastDidError(e.to_string())
        }
    }
}
