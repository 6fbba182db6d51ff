//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Label shown when the forecast comes from the device position.
pub const MY_LOCATION: &str = "My Location";

/// Label used when a geocoded name has no usable first segment.
pub const FALLBACK_LABEL: &str = "Result";

/// Error text for a search that matched nothing.
pub const NO_MATCH_MESSAGE: &str = "No matching place";

/// How many entries each tab shows from the loaded snapshot.
pub const HOURLY_WINDOW: usize = 12;
pub const DAILY_WINDOW: usize = 7;

/// Spinner cadence while a fetch is in flight.
pub const SPINNER_TICK_MS: u64 = 80;

/// Measurement convention for temperatures and wind speeds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn toggle(&self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    /// Token persisted in the preference store.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "metric" => Some(UnitSystem::Metric),
            "imperial" => Some(UnitSystem::Imperial),
            _ => None,
        }
    }

    /// Open-Meteo `temperature_unit` token
    pub fn temperature_token(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "celsius",
            UnitSystem::Imperial => "fahrenheit",
        }
    }

    /// Open-Meteo `windspeed_unit` token
    pub fn wind_token(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "kmh",
            UnitSystem::Imperial => "mph",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    pub fn speed_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "km/h",
            UnitSystem::Imperial => "mph",
        }
    }

    /// Values are already in the requested unit; no conversion happens here.
    pub fn format_temperature(&self, value: Option<f64>) -> String {
        match value {
            Some(v) => format!("{}{}", v, self.temperature_suffix()),
            None => format!("—{}", self.temperature_suffix()),
        }
    }

    pub fn format_rounded(&self, value: Option<f64>) -> String {
        match value {
            // + 0.0 turns -0.0 into 0.0
            Some(v) => format!("{}{}", v.round() + 0.0, self.temperature_suffix()),
            None => "—".to_string(),
        }
    }
}

/// Color theme preference
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}

/// Which forecast series the strip shows
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum Tab {
    Hourly,
    #[default]
    Daily,
}

impl Tab {
    pub fn toggle(&self) -> Self {
        match self {
            Tab::Hourly => Tab::Daily,
            Tab::Daily => Tab::Hourly,
        }
    }
}

/// Preferences persisted between sessions
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Preferences {
    pub units: UnitSystem,
    pub theme: Theme,
    pub saved_locations: Vec<String>,
}

/// A device position
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// First candidate of a geocoding search
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeocodeResult {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CurrentConditions {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub weather_code: Option<u8>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HourlyEntry {
    pub time: String,
    pub temperature: Option<f64>,
    pub weather_code: Option<u8>,
    pub wind_speed: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DailyEntry {
    pub date: String,
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
    pub weather_code: Option<u8>,
    pub max_wind_speed: Option<f64>,
}

/// Forecast data from Open-Meteo, reshaped into rows
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastSnapshot {
    pub current: CurrentConditions,
    pub hourly: Vec<HourlyEntry>,
    pub daily: Vec<DailyEntry>,
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    // --- Core data (visible in debug) ---
    /// Display label of the loaded location
    #[debug(section = "Location", label = "Label")]
    pub location_label: String,

    /// Last successfully loaded forecast; kept through later failures
    #[debug(section = "Weather", label = "Forecast", debug_fmt)]
    pub forecast: Option<ForecastSnapshot>,

    #[debug(section = "Weather", label = "Loading")]
    pub loading: bool,

    #[debug(section = "Weather", label = "Error", debug_fmt)]
    pub error: Option<String>,

    #[debug(section = "Preferences", label = "Units", debug_fmt)]
    pub units: UnitSystem,

    #[debug(section = "Preferences", label = "Theme", debug_fmt)]
    pub theme: Theme,

    #[debug(section = "Preferences", label = "Saved", debug_fmt)]
    pub saved_locations: Vec<String>,

    #[debug(section = "View", label = "Tab", debug_fmt)]
    pub active_tab: Tab,

    // --- UI internals (skipped) ---
    /// Highlighted row in the saved-locations panel
    #[debug(skip)]
    pub saved_selected: usize,

    /// Whether the search overlay is open
    #[debug(skip)]
    pub search_mode: bool,

    /// Current search query
    #[debug(skip)]
    pub search_query: String,

    /// Spinner frame counter
    #[debug(skip)]
    pub tick_count: u32,
}

impl AppState {
    /// Create state seeded from persisted preferences
    pub fn new(prefs: Preferences) -> Self {
        Self {
            location_label: MY_LOCATION.to_string(),
            forecast: None,
            loading: false,
            error: None,
            units: prefs.units,
            theme: prefs.theme,
            saved_locations: prefs.saved_locations,
            active_tab: Tab::default(),
            saved_selected: 0,
            search_mode: false,
            search_query: String::new(),
            tick_count: 0,
        }
    }

    pub fn selected_saved(&self) -> Option<&str> {
        self.saved_locations
            .get(self.saved_selected)
            .map(String::as_str)
    }

    /// Hourly rows the strip shows
    pub fn hourly_window(&self) -> &[HourlyEntry] {
        match &self.forecast {
            Some(f) => &f.hourly[..f.hourly.len().min(HOURLY_WINDOW)],
            None => &[],
        }
    }

    /// Daily rows the strip shows
    pub fn daily_window(&self) -> &[DailyEntry] {
        match &self.forecast {
            Some(f) => &f.daily[..f.daily.len().min(DAILY_WINDOW)],
            None => &[],
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Preferences::default())
    }
}

/// Short label for a geocoded place: the first comma-delimited segment.
pub fn display_label(geocode_label: &str) -> String {
    let first = geocode_label.split(',').next().unwrap_or_default().trim();
    if first.is_empty() {
        FALLBACK_LABEL.to_string()
    } else {
        first.to_string()
    }
}
