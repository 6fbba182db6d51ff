use chrono::NaiveDate;
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use super::{Component, Palette};
use crate::action::Action;
use crate::state::{AppState, Tab};
use crate::wmo;

pub struct ForecastStrip;

pub struct ForecastStripProps<'a> {
    pub state: &'a AppState,
    pub palette: Palette,
}

const CARD_WIDTH: u16 = 12;

/// One card: heading, icon, temperature text
struct Card {
    heading: String,
    icon: &'static str,
    temps: String,
}

fn hourly_cards(state: &AppState) -> Vec<Card> {
    state
        .hourly_window()
        .iter()
        .map(|h| Card {
            heading: hour_of(&h.time).to_string(),
            icon: wmo::icon_for_weather_code(h.weather_code),
            temps: state.units.format_rounded(h.temperature),
        })
        .collect()
}

fn daily_cards(state: &AppState) -> Vec<Card> {
    state
        .daily_window()
        .iter()
        .map(|d| Card {
            heading: weekday_of(&d.date).unwrap_or_else(|| d.date.clone()),
            icon: wmo::icon_for_weather_code(d.weather_code),
            temps: format!(
                "{} / {}",
                state.units.format_rounded(d.max_temp),
                state.units.format_rounded(d.min_temp)
            ),
        })
        .collect()
}

/// `HH:MM` from an ISO local timestamp like `2024-01-01T13:00`
pub fn hour_of(time: &str) -> &str {
    time.get(11..16).unwrap_or(time)
}

/// Short weekday name (`Mon`) for an ISO date; `None` if the date does not exist.
pub fn weekday_of(date: &str) -> Option<String> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%a").to_string())
}

fn render_tabs(frame: &mut Frame, area: Rect, active: Tab, palette: Palette) {
    let tab_span = |label: &'static str, tab: Tab| {
        let style = if tab == active {
            Style::default()
                .fg(palette.fg)
                .bg(palette.selected_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.muted)
        };
        Span::styled(format!(" {label} "), style)
    };
    let line = Line::from(vec![
        tab_span("Hourly", Tab::Hourly),
        Span::raw("  "),
        tab_span("Daily", Tab::Daily),
    ])
    .centered();
    frame.render_widget(Paragraph::new(line), area);
}

impl Component<Action> for ForecastStrip {
    type Props<'a> = ForecastStripProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let palette = props.palette;
        let chunks = Layout::vertical([
            Constraint::Length(1), // Tabs
            Constraint::Length(1), // Caption
            Constraint::Min(3),    // Cards
        ])
        .split(area);

        render_tabs(frame, chunks[0], state.active_tab, palette);

        let (caption, cards) = match state.active_tab {
            Tab::Hourly => ("Next hours", hourly_cards(state)),
            Tab::Daily => ("Next days", daily_cards(state)),
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                caption,
                Style::default().fg(palette.muted),
            ))),
            chunks[1],
        );

        if cards.is_empty() {
            return;
        }

        let fit = (chunks[2].width / CARD_WIDTH).max(1) as usize;
        let shown = cards.len().min(fit);
        let slots = Layout::horizontal(vec![Constraint::Length(CARD_WIDTH); shown])
            .flex(Flex::Start)
            .split(chunks[2]);

        for (card, slot) in cards.iter().zip(slots.iter()) {
            let lines = vec![
                Line::from(Span::styled(
                    card.heading.clone(),
                    Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
                ))
                .centered(),
                Line::from(card.icon).centered(),
                Line::from(Span::styled(card.temps.clone(), Style::default().fg(palette.fg)))
                    .centered(),
            ];
            let card_area = Rect {
                width: slot.width.saturating_sub(1),
                ..*slot
            };
            frame.render_widget(
                Paragraph::new(lines).block(Block::default().style(Style::default().bg(palette.card_bg))),
                card_area,
            );
        }
    }
}
