//! Effects - side effects declared by the reducer

use crate::state::{Coordinates, Theme, UnitSystem};

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Request the device position
    LocateDevice,
    /// Fetch the forecast for a device position
    FetchForecast {
        coords: Coordinates,
        units: UnitSystem,
    },
    /// Geocode a query, then fetch the forecast for the first match
    SearchForecast { query: String, units: UnitSystem },
    /// Persist the unit system
    SaveUnits(UnitSystem),
    /// Persist the theme
    SaveTheme(Theme),
    /// Persist the saved-location list
    SaveLocations(Vec<String>),
}
