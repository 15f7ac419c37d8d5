//! Indeterminate progress indicator

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Spinner animation frames
const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

const MESSAGE: &str = "Fetching contributions...";

/// Loading spinner widget
pub struct Spinner {
    frame: usize,
}

impl Spinner {
    pub fn new(frame: usize) -> Self {
        Self { frame }
    }

    /// Get the current spinner character
    pub fn current_char(&self) -> char {
        SPINNER_FRAMES[self.frame % SPINNER_FRAMES.len()]
    }

    /// Advance to next frame, returning the new frame index
    pub fn next_frame(frame: usize) -> usize {
        (frame + 1) % SPINNER_FRAMES.len()
    }
}

impl Widget for Spinner {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width < 20 {
            return;
        }

        let text = format!("{} {}", self.current_char(), MESSAGE);

        // Center vertically and horizontally
        let y = area.y + area.height / 2;
        let x = area.x + (area.width.saturating_sub(text.chars().count() as u16)) / 2;

        buf.set_string(x, y, &text, Style::default().fg(Color::Cyan));
    }
}
