//! Device position sources
//!
//! A terminal has no location service, so the position comes from an IP
//! lookup or from coordinates given on the command line. Having no
//! geolocator at all means the capability is unsupported.

use async_trait::async_trait;
use serde::Deserialize;

use crate::state::Coordinates;

pub const IP_LOOKUP_URL: &str = "https://ipapi.co/json/";

#[derive(thiserror::Error, Debug)]
pub enum GeoError {
    #[error("position unavailable: {0}")]
    Denied(String),
    #[error("position request failed: {0}")]
    Request(String),
}

#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, GeoError>;
}

/// A position fixed at startup
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl Geolocator for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, GeoError> {
        Ok(self.0)
    }
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

/// Approximate position from the public IP address
pub struct IpGeolocator {
    client: reqwest::Client,
    url: String,
}

impl IpGeolocator {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl Default for IpGeolocator {
    fn default() -> Self {
        Self::new(IP_LOOKUP_URL)
    }
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn current_position(&self) -> Result<Coordinates, GeoError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| GeoError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeoError::Denied(format!(
                "lookup returned status {}",
                response.status()
            )));
        }

        let body: IpLookupResponse = response
            .json()
            .await
            .map_err(|e| GeoError::Request(e.to_string()))?;

        if body.error {
            return Err(GeoError::Denied(
                body.reason.unwrap_or_else(|| "lookup refused".to_string()),
            ));
        }

        match (body.latitude, body.longitude) {
            (Some(latitude), Some(longitude)) => Ok(Coordinates {
                latitude,
                longitude,
            }),
            _ => Err(GeoError::Denied("lookup returned no coordinates".to_string())),
        }
    }
}
