//! GitHub contribution calendar for the terminal

pub mod cli;
pub mod github;
pub mod services;
pub mod tui;
pub mod types;
