use artbox::{
    Alignment as ArtAlignment, Color as ArtColor, Fill, LinearGradient, Renderer, fonts,
    integrations::ratatui::ArtBox,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::{Component, Palette};
use crate::action::Action;
use crate::state::{CurrentConditions, UnitSystem};
use crate::wmo;

pub struct LocationHeader;

pub struct LocationHeaderProps<'a> {
    pub label: &'a str,
    pub current: Option<&'a CurrentConditions>,
    pub units: UnitSystem,
    pub palette: Palette,
}

/// Rows below the FIGlet label: temperature, description, details.
pub const HEADER_OVERHEAD: u16 = 3;

fn gradient_colors(celsius: Option<f64>) -> (ArtColor, ArtColor) {
    match celsius {
        Some(t) if t < 0.0 => (
            ArtColor::rgb(150, 200, 255), // Ice blue
            ArtColor::rgb(200, 230, 255), // Light ice
        ),
        Some(t) if t < 15.0 => (
            ArtColor::rgb(100, 180, 255), // Cool blue
            ArtColor::rgb(150, 220, 200), // Teal
        ),
        Some(t) if t < 25.0 => (
            ArtColor::rgb(100, 200, 150), // Green
            ArtColor::rgb(255, 220, 100), // Yellow
        ),
        Some(t) if t < 35.0 => (
            ArtColor::rgb(255, 180, 80),  // Orange
            ArtColor::rgb(255, 120, 80),  // Deep orange
        ),
        Some(_) => (
            ArtColor::rgb(255, 100, 80), // Red-orange
            ArtColor::rgb(255, 60, 60),  // Hot red
        ),
        None => (
            ArtColor::rgb(180, 180, 180), // Gray (no data)
            ArtColor::rgb(220, 220, 220),
        ),
    }
}

/// Gradient bands are in Celsius.
fn to_celsius(value: f64, units: UnitSystem) -> f64 {
    match units {
        UnitSystem::Metric => value,
        UnitSystem::Imperial => (value - 32.0) * 5.0 / 9.0,
    }
}

fn or_dash(value: Option<f64>) -> String {
    value.map_or_else(|| "—".to_string(), |v| v.to_string())
}

impl Component<Action> for LocationHeader {
    type Props<'a> = LocationHeaderProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::vertical([
            Constraint::Fill(1),   // FIGlet label
            Constraint::Length(1), // Temperature
            Constraint::Length(1), // Description
            Constraint::Length(1), // Humidity and wind
        ])
        .split(area);

        let temperature = props.current.and_then(|c| c.temperature);
        let (start, end) = gradient_colors(temperature.map(|t| to_celsius(t, props.units)));
        let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
            .with_plain_fallback()
            .with_alignment(ArtAlignment::Center)
            .with_fill(Fill::Linear(LinearGradient::horizontal(start, end)));
        frame.render_widget(ArtBox::new(&renderer, props.label), chunks[0]);

        let temp_line = Line::from(vec![Span::styled(
            props.units.format_temperature(temperature),
            Style::default()
                .fg(props.palette.fg)
                .add_modifier(Modifier::BOLD),
        )])
        .centered();
        frame.render_widget(Paragraph::new(temp_line), chunks[1]);

        let code = props.current.and_then(|c| c.weather_code);
        let desc_line = Line::from(vec![Span::styled(
            format!(
                "{} {}",
                wmo::icon_for_weather_code(code),
                wmo::classify_weather_code(code)
            ),
            Style::default().fg(props.palette.muted),
        )])
        .centered();
        frame.render_widget(Paragraph::new(desc_line), chunks[2]);

        let details = format!(
            "Humidity {}% · Wind {} {}",
            or_dash(props.current.and_then(|c| c.humidity)),
            or_dash(props.current.and_then(|c| c.wind_speed)),
            props.units.speed_suffix(),
        );
        let details_line =
            Line::from(vec![Span::styled(details, Style::default().fg(props.palette.muted))])
                .centered();
        frame.render_widget(Paragraph::new(details_line), chunks[3]);
    }
}
