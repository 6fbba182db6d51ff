pub mod forecast_strip;
pub mod location_header;
pub mod palette;
pub mod saved_panel;
pub mod search_overlay;
pub mod weather_display;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use forecast_strip::{ForecastStrip, ForecastStripProps};
pub use location_header::{LocationHeader, LocationHeaderProps};
pub use palette::Palette;
pub use saved_panel::{SavedPanel, SavedPanelProps};
pub use search_overlay::{SearchOverlay, SearchOverlayProps};
pub use weather_display::{ERROR_ICON, WeatherDisplay, WeatherDisplayProps};
