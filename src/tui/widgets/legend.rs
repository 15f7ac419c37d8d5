//! Legend widget for contribution levels

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use super::heatmap::LevelColorMap;
use crate::types::ContributionLevel;

/// Legend widget showing the level ramp
pub struct Legend<'a> {
    palette: &'a LevelColorMap,
}

impl<'a> Legend<'a> {
    pub fn new(palette: &'a LevelColorMap) -> Self {
        Self { palette }
    }

    /// Returns the minimum width needed to render the legend
    pub fn min_width() -> u16 {
        // "Less ▪▪ ▪▪ ▪▪ ▪▪ ▪▪ More" = 24 chars (2-char cells with spaces)
        24
    }
}

impl Widget for Legend<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < Self::min_width() || area.height == 0 {
            return;
        }

        // Right-align the legend
        let start_x = area.x + area.width.saturating_sub(Self::min_width());
        let y = area.y;

        let mut x = start_x;

        buf.set_string(x, y, "Less ", Style::default().fg(Color::DarkGray));
        x += 5;

        for level in ContributionLevel::ALL {
            let style = Style::default().fg(self.palette.color(level));
            buf.set_string(x, y, "██", style);
            x += 2;

            if level != ContributionLevel::FourthQuartile {
                buf.set_string(x, y, " ", Style::default());
                x += 1;
            }
        }

        buf.set_string(x, y, " More", Style::default().fg(Color::DarkGray));
    }
}
