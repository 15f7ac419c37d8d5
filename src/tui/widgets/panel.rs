//! Activity panel: fetch state to display description, and its widget

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::heatmap::{CalendarGrid, Heatmap, LevelColorMap, DAYS_PER_WEEK};
use super::legend::Legend;
use super::spinner::Spinner;
use crate::github::Login;
use crate::types::{FetchState, Theme};

pub const TITLE: &str = "GitHub Activity";
pub const LOADING_HEADER: &str = "Loading…";
pub const UNAVAILABLE_HEADER: &str = "Contributions unavailable";

/// What the panel body shows
#[derive(Debug, Clone, PartialEq)]
pub enum PanelBody {
    /// Single indeterminate progress indicator
    Progress,
    /// Inert body after a failed fetch
    Unavailable,
    Grid(CalendarGrid),
}

/// Display description derived from a fetch state
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub header: String,
    pub body: PanelBody,
}

impl PanelView {
    pub fn grid(&self) -> Option<&CalendarGrid> {
        match &self.body {
            PanelBody::Grid(grid) => Some(grid),
            _ => None,
        }
    }
}

/// Header line for a loaded calendar
pub fn total_header(total: u64) -> String {
    format!("{} contributions in the last year", total)
}

/// Describe the panel for any fetch state. Total over all variants.
pub fn render(state: &FetchState, palette: &LevelColorMap) -> PanelView {
    match state {
        FetchState::Loading => PanelView {
            header: LOADING_HEADER.to_string(),
            body: PanelBody::Progress,
        },
        FetchState::Failed(_) => PanelView {
            header: UNAVAILABLE_HEADER.to_string(),
            body: PanelBody::Unavailable,
        },
        FetchState::Loaded(calendar) => PanelView {
            header: total_header(calendar.total),
            body: PanelBody::Grid(CalendarGrid::build(calendar, palette)),
        },
    }
}

fn text_color(theme: Theme) -> Color {
    match theme {
        Theme::Light => Color::Black,
        Theme::Dark => Color::White,
    }
}

/// Panel widget combining header, grid, legend and inspect line
pub struct ActivityPanel<'a> {
    view: &'a PanelView,
    login: &'a Login,
    theme: Theme,
    spinner_frame: usize,
    selected: Option<(usize, usize)>,
}

impl<'a> ActivityPanel<'a> {
    pub fn new(view: &'a PanelView, login: &'a Login, theme: Theme) -> Self {
        Self {
            view,
            login,
            theme,
            spinner_frame: 0,
            selected: None,
        }
    }

    pub fn spinner_frame(mut self, frame: usize) -> Self {
        self.spinner_frame = frame;
        self
    }

    pub fn selected(mut self, position: Option<(usize, usize)>) -> Self {
        self.selected = position;
        self
    }

    fn palette(&self) -> &'static LevelColorMap {
        LevelColorMap::for_theme(self.theme)
    }
}

impl Widget for ActivityPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(
            area,
            Style::default()
                .bg(self.palette().background_color())
                .fg(text_color(self.theme)),
        );

        let chunks = Layout::vertical([
            Constraint::Length(1),                     // [0] Title + profile
            Constraint::Length(1),                     // [1] Header text
            Constraint::Length(1),                     // [2] Padding
            Constraint::Min(DAYS_PER_WEEK as u16),     // [3] Body
            Constraint::Length(1),                     // [4] Legend
            Constraint::Length(1),                     // [5] Inspect line
            Constraint::Length(1),                     // [6] Key hints
        ])
        .split(area);

        self.render_title(chunks[0], buf);
        self.render_header(chunks[1], buf);
        self.render_body(chunks[3], buf);

        if let Some(grid) = self.view.grid() {
            if !grid.is_empty() {
                Legend::new(self.palette()).render(chunks[4], buf);
            }
        }

        self.render_inspect(chunks[5], buf);
        self.render_hints(chunks[6], buf);
    }
}

impl ActivityPanel<'_> {
    fn render_title(&self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(Span::styled(
            TITLE,
            Style::default()
                .fg(text_color(self.theme))
                .add_modifier(Modifier::BOLD),
        )))
        .render(area, buf);

        Paragraph::new(Line::from(Span::styled(
            format!("@{}", self.login),
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Right)
        .render(area, buf);
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(Span::styled(
            self.view.header.as_str(),
            Style::default().fg(Color::DarkGray),
        )))
        .render(area, buf);
    }

    fn render_body(&self, area: Rect, buf: &mut Buffer) {
        match &self.view.body {
            PanelBody::Progress => Spinner::new(self.spinner_frame).render(area, buf),
            PanelBody::Unavailable => {
                self.render_centered("GitHub activity could not be loaded", area, buf)
            }
            PanelBody::Grid(grid) if grid.is_empty() => {
                self.render_centered("No contributions in this range", area, buf)
            }
            PanelBody::Grid(grid) => Heatmap::new(grid).selected(self.selected).render(area, buf),
        }
    }

    fn render_centered(&self, text: &str, area: Rect, buf: &mut Buffer) {
        let y = area.y + area.height / 2;
        let x = area.x + (area.width.saturating_sub(text.chars().count() as u16)) / 2;
        buf.set_string(x, y, text, Style::default().fg(Color::DarkGray));
    }

    fn render_inspect(&self, area: Rect, buf: &mut Buffer) {
        let tooltip = self.view.grid().and_then(|grid| {
            self.selected
                .and_then(|(col, row)| grid.cell(col, row))
                .map(|cell| cell.tooltip())
        });

        if let Some(text) = tooltip {
            Paragraph::new(Line::from(Span::styled(
                text,
                Style::default().fg(text_color(self.theme)),
            )))
            .render(area, buf);
        }
    }

    fn render_hints(&self, area: Rect, buf: &mut Buffer) {
        let hint = Style::default().fg(Color::DarkGray);
        let key = hint.add_modifier(Modifier::BOLD);
        let line = Line::from(vec![
            Span::styled("q", key),
            Span::styled(" Quit  ", hint),
            Span::styled("t", key),
            Span::styled(format!(" Theme ({})  ", self.theme.as_str()), hint),
            Span::styled("←↑↓→", key),
            Span::styled(" Inspect", hint),
        ]);
        Paragraph::new(line).render(area, buf);
    }
}
