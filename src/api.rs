//! Nominatim geocoding and Open-Meteo forecast client

use serde::Deserialize;
use serde_json::Value;

use crate::state::{
    CurrentConditions, DailyEntry, ForecastSnapshot, GeocodeResult, HourlyEntry, UnitSystem,
};

pub const GEOCODE_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const USER_AGENT: &str = concat!("weatherdash/", env!("CARGO_PKG_VERSION"));

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m,weather_code";
const HOURLY_FIELDS: &str = "temperature_2m,weather_code,wind_speed_10m";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,weather_code,wind_speed_10m_max";

/// Gateway error type
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{endpoint} request failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} request failed with status {status}: {body}")]
    Network {
        endpoint: &'static str,
        status: u16,
        body: String,
    },
    #[error("invalid JSON in {endpoint} response: {message}")]
    Parse {
        endpoint: &'static str,
        message: String,
    },
}

impl GatewayError {
    /// HTTP status for non-2xx responses
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Network { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Base URLs for the two providers
#[derive(Clone, Debug, PartialEq)]
pub struct Endpoints {
    pub geocode: String,
    pub forecast: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocode: GEOCODE_URL.to_string(),
            forecast: FORECAST_URL.to_string(),
        }
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// Nominatim returns coordinates as numeric strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireCoordinate {
    Text(String),
    Number(f64),
}

impl WireCoordinate {
    fn to_f64(&self) -> Option<f64> {
        match self {
            WireCoordinate::Text(s) => s.trim().parse().ok(),
            WireCoordinate::Number(n) => Some(*n),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeCandidate {
    lat: WireCoordinate,
    lon: WireCoordinate,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentBlock,
    hourly: Option<HourlyBlock>,
    daily: Option<DailyBlock>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: Option<f64>,
    relative_humidity_2m: Option<f64>,
    wind_speed_10m: Option<f64>,
    #[serde(default)]
    weather_code: Value,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    weather_code: Vec<Value>,
    #[serde(default)]
    wind_speed_10m: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    weather_code: Vec<Value>,
    #[serde(default)]
    wind_speed_10m_max: Vec<Option<f64>>,
}

/// Element `index` of a parallel array; short arrays and nulls read as `None`.
fn at<T: Copy>(values: &[Option<T>], index: usize) -> Option<T> {
    values.get(index).copied().flatten()
}

/// WMO code from any JSON value. Integral numbers in `u8` range are kept
/// (`3` and `3.0` alike); anything else reads as `None` so the lookups fall
/// back to their defaults instead of failing the whole forecast.
fn weather_code_of(value: &Value) -> Option<u8> {
    let code = value.as_f64()?;
    if code.fract() != 0.0 {
        return None;
    }
    u8::try_from(code as i64).ok()
}

fn code_at(values: &[Value], index: usize) -> Option<u8> {
    values.get(index).and_then(weather_code_of)
}

impl From<CurrentBlock> for CurrentConditions {
    fn from(block: CurrentBlock) -> Self {
        Self {
            temperature: block.temperature_2m,
            humidity: block.relative_humidity_2m,
            wind_speed: block.wind_speed_10m,
            weather_code: weather_code_of(&block.weather_code),
        }
    }
}

impl HourlyBlock {
    fn into_rows(self) -> Vec<HourlyEntry> {
        self.time
            .iter()
            .enumerate()
            .map(|(i, time)| HourlyEntry {
                time: time.clone(),
                temperature: at(&self.temperature_2m, i),
                weather_code: code_at(&self.weather_code, i),
                wind_speed: at(&self.wind_speed_10m, i),
            })
            .collect()
    }
}

impl DailyBlock {
    fn into_rows(self) -> Vec<DailyEntry> {
        self.time
            .iter()
            .enumerate()
            .map(|(i, date)| DailyEntry {
                date: date.clone(),
                max_temp: at(&self.temperature_2m_max, i),
                min_temp: at(&self.temperature_2m_min, i),
                weather_code: code_at(&self.weather_code, i),
                max_wind_speed: at(&self.wind_speed_10m_max, i),
            })
            .collect()
    }
}

// ============================================================================
// Gateway
// ============================================================================

/// Read-only client for the geocoding and forecast providers
#[derive(Debug, Clone)]
pub struct ForecastGateway {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl ForecastGateway {
    pub fn new() -> Result<Self, GatewayError> {
        Self::with_endpoints(Endpoints::default())
    }

    pub fn with_endpoints(endpoints: Endpoints) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| GatewayError::Request {
                endpoint: "client",
                source,
            })?;
        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// GET `url`, read the body as text, then parse it.
    ///
    /// Malformed bodies are a parse error even when the status is an error;
    /// a well-formed body with a non-2xx status is a network error.
    async fn get_json(&self, endpoint: &'static str, url: &str) -> Result<Value, GatewayError> {
        tracing::debug!(endpoint, url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| GatewayError::Request { endpoint, source })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| GatewayError::Request { endpoint, source })?;

        let parsed: Value = serde_json::from_str(&body).map_err(|e| GatewayError::Parse {
            endpoint,
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(GatewayError::Network {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }
        Ok(parsed)
    }

    /// Resolve free text to the first matching place.
    ///
    /// `Ok(None)` means the provider matched nothing. Blank text returns
    /// `Ok(None)` without a request.
    pub async fn resolve_query(&self, text: &str) -> Result<Option<GeocodeResult>, GatewayError> {
        let query = text.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let url = format!(
            "{}?format=json&q={}",
            self.endpoints.geocode,
            urlencoding::encode(query)
        );
        let parsed = self.get_json("geocode", &url).await?;
        if parsed.is_null() {
            return Ok(None);
        }

        let candidates: Vec<GeocodeCandidate> =
            serde_json::from_value(parsed).map_err(|e| GatewayError::Parse {
                endpoint: "geocode",
                message: e.to_string(),
            })?;
        let Some(first) = candidates.into_iter().next() else {
            return Ok(None);
        };

        let (Some(latitude), Some(longitude)) = (first.lat.to_f64(), first.lon.to_f64()) else {
            return Err(GatewayError::Parse {
                endpoint: "geocode",
                message: "candidate coordinates are not numbers".to_string(),
            });
        };
        let label = first
            .display_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| query.to_string());

        Ok(Some(GeocodeResult {
            latitude,
            longitude,
            label,
        }))
    }

    /// Fetch current, hourly and daily data for a coordinate pair.
    pub async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        units: UnitSystem,
    ) -> Result<ForecastSnapshot, GatewayError> {
        let url = format!(
            "{}?latitude={}&longitude={}&current={}&hourly={}&daily={}&temperature_unit={}&windspeed_unit={}&timezone=auto",
            self.endpoints.forecast,
            latitude,
            longitude,
            CURRENT_FIELDS,
            HOURLY_FIELDS,
            DAILY_FIELDS,
            units.temperature_token(),
            units.wind_token(),
        );
        let parsed = self.get_json("weather", &url).await?;

        let data: ForecastResponse =
            serde_json::from_value(parsed).map_err(|e| GatewayError::Parse {
                endpoint: "weather",
                message: e.to_string(),
            })?;

        Ok(ForecastSnapshot {
            current: data.current.into(),
            hourly: data.hourly.map(HourlyBlock::into_rows).unwrap_or_default(),
            daily: data.daily.map(DailyBlock::into_rows).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_coordinate_accepts_strings_and_numbers() {
        assert_eq!(WireCoordinate::Text("51.5".into()).to_f64(), Some(51.5));
        assert_eq!(WireCoordinate::Number(-0.12).to_f64(), Some(-0.12));
        assert_eq!(WireCoordinate::Text("north".into()).to_f64(), None);
    }

    #[test]
    fn test_daily_rows_tolerate_short_arrays() {
        let block: DailyBlock = serde_json::from_value(serde_json::json!({
            "time": ["2024-01-01", "2024-01-02"],
            "temperature_2m_max": [7.5],
            "temperature_2m_min": [1.0, null],
            "weather_code": [3, 61]
        }))
        .unwrap();

        let rows = block.into_rows();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].max_temp, Some(7.5));
        assert_eq!(rows[1].max_temp, None);
        assert_eq!(rows[1].min_temp, None);
        assert_eq!(rows[1].weather_code, Some(61));
        assert!(rows.iter().all(|r| r.max_wind_speed.is_none()));
    }

    #[test]
    fn test_weather_codes_decode_leniently() {
        assert_eq!(weather_code_of(&serde_json::json!(61)), Some(61));
        assert_eq!(weather_code_of(&serde_json::json!(3.0)), Some(3));
        assert_eq!(weather_code_of(&serde_json::json!(300)), None);
        assert_eq!(weather_code_of(&serde_json::json!(-1)), None);
        assert_eq!(weather_code_of(&serde_json::json!(2.5)), None);
        assert_eq!(weather_code_of(&serde_json::json!("3")), None);
        assert_eq!(weather_code_of(&Value::Null), None);
    }

    #[test]
    fn test_network_error_message_carries_status_and_body() {
        let err = GatewayError::Network {
            endpoint: "geocode",
            status: 503,
            body: "{\"error\":\"busy\"}".into(),
        };
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("busy"));
    }
}
