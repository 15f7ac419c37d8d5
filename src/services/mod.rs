//! Services for persistence and process setup

pub mod logging;
pub mod preferences;

pub use preferences::{PreferenceStore, Preferences};
