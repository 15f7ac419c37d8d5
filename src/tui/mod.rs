//! TUI module for the interactive activity panel

mod app;
pub mod fetch;
pub mod theme;
pub mod widgets;

pub use app::{run, App, TuiConfig};
pub use theme::{detect_theme, ThemeContext};
