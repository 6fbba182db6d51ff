use ratatui::style::Color;

use crate::state::Theme;

/// Colors used by every component for one theme
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub accent: Color,
    pub card_bg: Color,
    pub selected_bg: Color,
    pub error: Color,
    pub overlay_bg: Color,
    pub input_bg: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                bg: Color::Rgb(15, 23, 42),
                fg: Color::White,
                muted: Color::Gray,
                accent: Color::Rgb(96, 165, 250),
                card_bg: Color::Rgb(30, 41, 59),
                selected_bg: Color::Rgb(37, 99, 235),
                error: Color::Rgb(252, 165, 165),
                overlay_bg: Color::Rgb(35, 35, 45),
                input_bg: Color::Rgb(50, 50, 60),
            },
            Theme::Light => Self {
                bg: Color::Rgb(243, 244, 246),
                fg: Color::Rgb(17, 24, 39),
                muted: Color::DarkGray,
                accent: Color::Rgb(37, 99, 235),
                card_bg: Color::Rgb(229, 231, 235),
                selected_bg: Color::Rgb(191, 219, 254),
                error: Color::Rgb(185, 28, 28),
                overlay_bg: Color::Rgb(255, 255, 255),
                input_bg: Color::Rgb(229, 231, 235),
            },
        }
    }
}
