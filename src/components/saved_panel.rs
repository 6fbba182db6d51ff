use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::{Component, Palette};
use crate::action::Action;

pub const EMPTY_HINT: &str = "No saved locations.";

pub struct SavedPanel;

pub struct SavedPanelProps<'a> {
    pub labels: &'a [String],
    pub selected: usize,
    pub palette: Palette,
}

impl Component<Action> for SavedPanel {
    type Props<'a> = SavedPanelProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let palette = props.palette;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.muted))
            .title(Span::styled(" Saved Locations ", Style::default().fg(palette.fg)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Min(1),    // Labels
            Constraint::Length(1), // Hint
        ])
        .split(inner);

        let lines: Vec<Line> = if props.labels.is_empty() {
            vec![Line::from(Span::styled(
                EMPTY_HINT,
                Style::default().fg(palette.muted),
            ))]
        } else {
            // Keep the highlighted row on screen.
            let height = chunks[0].height.max(1) as usize;
            let offset = props.selected.saturating_sub(height - 1);
            props
                .labels
                .iter()
                .enumerate()
                .skip(offset)
                .take(height)
                .map(|(i, label)| {
                    if i == props.selected {
                        Line::from(Span::styled(
                            format!("› {label}"),
                            Style::default()
                                .fg(palette.fg)
                                .bg(palette.selected_bg)
                                .add_modifier(Modifier::BOLD),
                        ))
                    } else {
                        Line::from(Span::styled(
                            format!("  {label}"),
                            Style::default().fg(palette.fg),
                        ))
                    }
                })
                .collect()
        };
        frame.render_widget(Paragraph::new(lines), chunks[0]);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "s save · x remove · ⏎ open",
                Style::default().fg(palette.muted),
            ))),
            chunks[1],
        );
    }
}
