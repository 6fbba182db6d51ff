use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Layout};
use ratatui::prelude::{Frame, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::location_header::HEADER_OVERHEAD;
use super::{
    Component, ForecastStrip, ForecastStripProps, LocationHeader, LocationHeaderProps, Palette,
    SavedPanel, SavedPanelProps,
};
use crate::action::Action;
use crate::state::{AppState, Tab, UnitSystem};

pub const ERROR_ICON: &str = "\u{26a0}\u{fe0f}";

const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// Rows reserved for the FIGlet location label.
const FIGLET_ROWS: u16 = 6;
const HEADER_HEIGHT: u16 = FIGLET_ROWS + HEADER_OVERHEAD;
const SAVED_PANEL_WIDTH: u16 = 30;

/// Props for WeatherDisplay - read-only view of state
pub struct WeatherDisplayProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// The dashboard: header, forecast strip, saved locations, status
#[derive(Default)]
pub struct WeatherDisplay;

impl Component<Action> for WeatherDisplay {
    type Props<'a> = WeatherDisplayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let state = props.state;

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Char('/') => Some(Action::SearchOpen),
                KeyCode::Char('u') => Some(Action::UiToggleUnits),
                KeyCode::Char('t') => Some(Action::UiToggleTheme),
                KeyCode::Char('h') => Some(Action::UiSelectTab(Tab::Hourly)),
                KeyCode::Char('d') => Some(Action::UiSelectTab(Tab::Daily)),
                KeyCode::Tab => Some(Action::UiToggleTab),
                KeyCode::Char('s') => Some(Action::SavedAdd),
                KeyCode::Char('j') | KeyCode::Down => {
                    Some(Action::SavedSelect(state.saved_selected + 1))
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    Some(Action::SavedSelect(state.saved_selected.saturating_sub(1)))
                }
                KeyCode::Enter => Some(Action::SavedOpen),
                KeyCode::Char('x') | KeyCode::Delete => state
                    .selected_saved()
                    .map(|label| Action::SavedRemove(label.to_string())),
                KeyCode::Char('r') | KeyCode::F(5) => Some(Action::GeoLocate),
                KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: WeatherDisplayProps<'_>) {
        let state = props.state;
        let palette = Palette::for_theme(state.theme);
        frame.render_widget(
            Block::default().style(Style::default().bg(palette.bg).fg(palette.fg)),
            area,
        );

        let rows = Layout::vertical([
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Loading / error line
            Constraint::Length(1), // Help bar
        ])
        .split(area);

        let columns = Layout::horizontal([
            Constraint::Min(1),
            Constraint::Length(SAVED_PANEL_WIDTH),
        ])
        .split(rows[0]);

        let main = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(columns[0]);

        let mut header = LocationHeader;
        header.render(
            frame,
            main[0],
            LocationHeaderProps {
                label: &state.location_label,
                current: state.forecast.as_ref().map(|f| &f.current),
                units: state.units,
                palette,
            },
        );
        let mut strip = ForecastStrip;
        strip.render(frame, main[2], ForecastStripProps { state, palette });

        let mut saved = SavedPanel;
        saved.render(
            frame,
            columns[1],
            SavedPanelProps {
                labels: &state.saved_locations,
                selected: state.saved_selected,
                palette,
            },
        );

        frame.render_widget(Paragraph::new(status_line(state, palette)), rows[1]);

        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            rows[2],
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&[
                    StatusBarHint::new("/", "search"),
                    StatusBarHint::new("h/d", "tabs"),
                    StatusBarHint::new("u", unit_hint(state)),
                    StatusBarHint::new("t", state.theme.label()),
                    StatusBarHint::new("r", "locate"),
                    StatusBarHint::new("q", "quit"),
                ]),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}

fn unit_hint(state: &AppState) -> &'static str {
    match state.units {
        UnitSystem::Metric => "°C → °F",
        UnitSystem::Imperial => "°F → °C",
    }
}

fn status_line(state: &AppState, palette: Palette) -> Line<'static> {
    let mut spans = Vec::new();
    if state.loading {
        let frame = SPINNER[state.tick_count as usize % SPINNER.len()];
        spans.push(Span::styled(
            format!(" {frame} Loading…"),
            Style::default().fg(palette.accent),
        ));
    }
    if let Some(error) = &state.error {
        spans.push(Span::styled(
            format!(" {ERROR_ICON} {error}"),
            Style::default().fg(palette.error),
        ));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_dispatch::testing::*;

    fn props(state: &AppState) -> WeatherDisplayProps<'_> {
        WeatherDisplayProps {
            state,
            is_focused: true,
        }
    }

    #[test]
    fn test_handle_event_search() {
        let mut component = WeatherDisplay;
        let state = AppState::default();

        let actions: Vec<_> = component
            .handle_event(&EventKind::Key(key("/")), props(&state))
            .into_iter()
            .collect();
        actions.assert_count(1);
        actions.assert_first(Action::SearchOpen);
    }

    #[test]
    fn test_handle_event_remove_selected() {
        let mut component = WeatherDisplay;
        let state = AppState {
            saved_locations: vec!["Rome".into(), "Oslo".into()],
            saved_selected: 1,
            ..Default::default()
        };

        let actions: Vec<_> = component
            .handle_event(&EventKind::Key(key("x")), props(&state))
            .into_iter()
            .collect();
        actions.assert_first(Action::SavedRemove("Oslo".into()));
    }

    #[test]
    fn test_handle_event_remove_with_empty_list() {
        let mut component = WeatherDisplay;
        let state = AppState::default();

        let actions: Vec<_> = component
            .handle_event(&EventKind::Key(key("x")), props(&state))
            .into_iter()
            .collect();
        actions.assert_empty();
    }

    #[test]
    fn test_handle_event_unfocused_ignores() {
        let mut component = WeatherDisplay;
        let state = AppState::default();
        let props = WeatherDisplayProps {
            state: &state,
            is_focused: false,
        };

        let actions: Vec<_> = component
            .handle_event(&EventKind::Key(key("u")), props)
            .into_iter()
            .collect();
        actions.assert_empty();
    }

    #[test]
    fn test_render_loading_line() {
        let mut render = RenderHarness::new(90, 24);
        let mut component = WeatherDisplay;
        let state = AppState {
            loading: true,
            ..Default::default()
        };

        let output = render.render_to_string_plain(|frame| {
            component.render(frame, frame.area(), props(&state));
        });

        assert!(output.contains("Loading"));
    }
}
