//! Actions: user intents and async results

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::{Coordinates, ForecastSnapshot, GeocodeResult, Tab};

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Geo category =====
    /// Intent: ask the device for its position (mount, unit toggle, re-locate)
    GeoLocate,

    /// Result: device position known
    GeoDidLocate(Coordinates),

    /// Result: geolocation denied or failed (logged only)
    GeoDidFail(String),

    // ===== Forecast category =====
    /// Result: forecast for the device position loaded
    ForecastDidLoad(ForecastSnapshot),

    /// Result: geocode or forecast request failed
    ForecastDidError(String),

    // ===== Search category =====
    /// Open search overlay
    SearchOpen,

    /// Close search overlay (cancel)
    SearchClose,

    /// Search query text changed
    SearchQueryChange(String),

    /// Submit search query
    SearchSubmit(String),

    /// Result: query resolved and its forecast loaded
    SearchDidLoad {
        place: GeocodeResult,
        forecast: ForecastSnapshot,
    },

    /// Result: geocoder matched nothing
    SearchDidMiss,

    // ===== Saved category =====
    /// Save the current location label
    SavedAdd,

    /// Remove a saved label
    SavedRemove(String),

    /// Highlight a saved label (by index)
    SavedSelect(usize),

    /// Search for the highlighted saved label
    SavedOpen,

    // ===== UI category =====
    /// Toggle between metric and imperial
    UiToggleUnits,

    /// Toggle between dark and light
    UiToggleTheme,

    /// Show the hourly or daily strip
    UiSelectTab(Tab),

    /// Switch to the other strip
    UiToggleTab,

    /// Force a re-render (for cursor movement, etc.)
    Render,

    // ===== Uncategorized (global) =====
    /// Periodic tick for the loading spinner
    Tick,

    /// Exit the application
    Quit,
}
