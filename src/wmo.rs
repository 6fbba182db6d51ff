//! WMO weather code lookups
//!
//! Both lookups are total: unknown codes and missing values map to a fixed
//! default rather than failing.

/// Text shown when a code is missing or not in the table.
pub const UNKNOWN_TEXT: &str = "—";

/// Icon shown when a code is missing or not in the table.
pub const UNKNOWN_ICON: &str = "\u{1f321}\u{fe0f}";

/// Coarse weather category for a WMO code
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeatherCondition {
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    FreezingRain,
    Snow,
    SnowGrains,
    Showers,
    SnowShowers,
    Thunderstorm,
    SevereThunderstorm,
    Unknown,
}

impl WeatherCondition {
    pub fn from_code(code: Option<u8>) -> Self {
        match code {
            Some(0) => WeatherCondition::Clear,
            Some(1 | 2) => WeatherCondition::PartlyCloudy,
            Some(3) => WeatherCondition::Cloudy,
            Some(45 | 48) => WeatherCondition::Fog,
            Some(51 | 53 | 55) => WeatherCondition::Drizzle,
            Some(61 | 63 | 65) => WeatherCondition::Rain,
            Some(66 | 67) => WeatherCondition::FreezingRain,
            Some(71 | 73 | 75) => WeatherCondition::Snow,
            Some(77) => WeatherCondition::SnowGrains,
            Some(80..=82) => WeatherCondition::Showers,
            Some(85 | 86) => WeatherCondition::SnowShowers,
            Some(95) => WeatherCondition::Thunderstorm,
            Some(96 | 99) => WeatherCondition::SevereThunderstorm,
            _ => WeatherCondition::Unknown,
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::PartlyCloudy => "Partly cloudy",
            WeatherCondition::Cloudy => "Cloudy",
            WeatherCondition::Fog => "Fog",
            WeatherCondition::Drizzle => "Drizzle",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::FreezingRain => "Freezing rain",
            WeatherCondition::Snow => "Snow",
            WeatherCondition::SnowGrains => "Snow grains",
            WeatherCondition::Showers => "Showers",
            WeatherCondition::SnowShowers => "Snow showers",
            WeatherCondition::Thunderstorm => "Thunderstorm",
            WeatherCondition::SevereThunderstorm => "Severe thunderstorm",
            WeatherCondition::Unknown => UNKNOWN_TEXT,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            WeatherCondition::Clear => "\u{2600}\u{fe0f}",
            WeatherCondition::PartlyCloudy => "\u{26c5}",
            WeatherCondition::Cloudy => "\u{2601}\u{fe0f}",
            WeatherCondition::Fog => "\u{1f32b}\u{fe0f}",
            WeatherCondition::Drizzle => "\u{1f326}\u{fe0f}",
            WeatherCondition::Rain | WeatherCondition::FreezingRain | WeatherCondition::Showers => {
                "\u{1f327}\u{fe0f}"
            }
            WeatherCondition::Snow => "\u{2744}\u{fe0f}",
            WeatherCondition::SnowGrains | WeatherCondition::SnowShowers => "\u{1f328}\u{fe0f}",
            WeatherCondition::Thunderstorm | WeatherCondition::SevereThunderstorm => {
                "\u{26c8}\u{fe0f}"
            }
            WeatherCondition::Unknown => UNKNOWN_ICON,
        }
    }
}

/// Human-readable description of a WMO code
pub fn classify_weather_code(code: Option<u8>) -> &'static str {
    WeatherCondition::from_code(code).text()
}

/// Pictographic symbol for a WMO code
pub fn icon_for_weather_code(code: Option<u8>) -> &'static str {
    WeatherCondition::from_code(code).icon()
}
