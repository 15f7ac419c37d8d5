//! TUI widgets

pub mod heatmap;
pub mod legend;
pub mod panel;
pub mod spinner;
