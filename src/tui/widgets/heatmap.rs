//! Week-major contribution grid and the level color map

use chrono::NaiveDate;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use crate::types::{ContributionCalendar, ContributionLevel, Theme};

/// Row slots per column
pub const DAYS_PER_WEEK: usize = 7;

/// Glyph for a filled cell
const CELL_GLYPH: &str = "■";

/// Fixed mapping from contribution level to display color.
///
/// Each ramp moves steadily away from its theme background, so visual
/// intensity tracks the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelColorMap {
    pub background: (u8, u8, u8),
    levels: [(u8, u8, u8); 5],
}

impl LevelColorMap {
    pub const LIGHT: LevelColorMap = LevelColorMap {
        background: (0xff, 0xff, 0xff),
        levels: [
            (0xeb, 0xed, 0xf0),
            (0x9b, 0xe9, 0xa8),
            (0x40, 0xc4, 0x63),
            (0x30, 0xa1, 0x4e),
            (0x21, 0x6e, 0x39),
        ],
    };

    pub const DARK: LevelColorMap = LevelColorMap {
        background: (0x0d, 0x11, 0x17),
        levels: [
            (0x16, 0x1b, 0x22),
            (0x0e, 0x44, 0x29),
            (0x00, 0x6d, 0x32),
            (0x26, 0xa6, 0x41),
            (0x39, 0xd3, 0x53),
        ],
    };

    pub fn for_theme(theme: Theme) -> &'static LevelColorMap {
        match theme {
            Theme::Light => &Self::LIGHT,
            Theme::Dark => &Self::DARK,
        }
    }

    pub fn rgb(&self, level: ContributionLevel) -> (u8, u8, u8) {
        self.levels[level.index()]
    }

    pub fn color(&self, level: ContributionLevel) -> Color {
        let (r, g, b) = self.rgb(level);
        Color::Rgb(r, g, b)
    }

    pub fn background_color(&self) -> Color {
        let (r, g, b) = self.background;
        Color::Rgb(r, g, b)
    }
}

/// One rendered day
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub row: usize,
    pub date: NaiveDate,
    pub count: u64,
    pub level: ContributionLevel,
    pub color: Color,
}

impl GridCell {
    /// Hover/inspect text
    pub fn tooltip(&self) -> String {
        format!("{}: {} contributions", self.date, self.count)
    }
}

/// One week column. Cells occupy rows `0..cells.len()`; the remaining
/// slots stay empty.
#[derive(Debug, Clone, PartialEq)]
pub struct GridColumn {
    pub start_date: NaiveDate,
    pub cells: Vec<GridCell>,
}

impl GridColumn {
    pub fn empty_slots(&self) -> usize {
        DAYS_PER_WEEK.saturating_sub(self.cells.len())
    }

    pub fn cell(&self, row: usize) -> Option<&GridCell> {
        self.cells.get(row)
    }
}

/// Week-major layout: oldest week leftmost, earliest day on top
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalendarGrid {
    pub columns: Vec<GridColumn>,
}

impl CalendarGrid {
    pub fn build(calendar: &ContributionCalendar, palette: &LevelColorMap) -> Self {
        let columns = calendar
            .weeks
            .iter()
            .map(|week| GridColumn {
                start_date: week.start_date,
                cells: week
                    .days
                    .iter()
                    .enumerate()
                    .map(|(row, day)| GridCell {
                        row,
                        date: day.date,
                        count: day.count,
                        level: day.level,
                        color: palette.color(day.level),
                    })
                    .collect(),
            })
            .collect();

        Self { columns }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn cell(&self, column: usize, row: usize) -> Option<&GridCell> {
        self.columns.get(column).and_then(|c| c.cell(row))
    }

    /// Position of the most recent day
    pub fn last_position(&self) -> Option<(usize, usize)> {
        let column = self.columns.len().checked_sub(1)?;
        let row = self.columns[column].cells.len().checked_sub(1)?;
        Some((column, row))
    }

    /// Plain-text rendering, one line per row slot
    pub fn to_text(&self) -> String {
        let mut lines = Vec::with_capacity(DAYS_PER_WEEK);
        for row in 0..DAYS_PER_WEEK {
            let line: String = self
                .columns
                .iter()
                .map(|col| col.cell(row).map(|c| c.level.glyph()).unwrap_or(' '))
                .collect();
            lines.push(line.trim_end().to_string());
        }
        lines.join("\n")
    }
}

/// Heatmap widget for ratatui
pub struct Heatmap<'a> {
    grid: &'a CalendarGrid,
    selected: Option<(usize, usize)>,
}

impl<'a> Heatmap<'a> {
    pub fn new(grid: &'a CalendarGrid) -> Self {
        Self {
            grid,
            selected: None,
        }
    }

    pub fn selected(mut self, position: Option<(usize, usize)>) -> Self {
        self.selected = position;
        self
    }

    /// Width of one column including its gap
    fn cell_width(&self, area: Rect) -> u16 {
        if area.width as usize >= self.grid.columns.len() * 2 {
            2
        } else {
            1
        }
    }
}

impl Widget for Heatmap<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let cell_width = self.cell_width(area);
        let capacity = (area.width / cell_width) as usize;
        // Keep the most recent weeks when the area is too narrow
        let first_visible = self.grid.columns.len().saturating_sub(capacity);

        for (offset, column) in self.grid.columns.iter().skip(first_visible).enumerate() {
            let col_idx = first_visible + offset;
            let x = area.x + offset as u16 * cell_width;

            for cell in &column.cells {
                if cell.row >= area.height as usize {
                    break;
                }
                let y = area.y + cell.row as u16;

                let mut style = Style::default().fg(cell.color);
                if self.selected == Some((col_idx, cell.row)) {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                buf.set_string(x, y, CELL_GLYPH, style);
            }
        }
    }
}
