//! Theme preference owned by the top-level context

use crate::services::PreferenceStore;
use crate::types::Theme;

use super::widgets::heatmap::LevelColorMap;

/// Terminal backgrounds brighter than this are treated as light
const LIGHT_LUMA_THRESHOLD: f32 = 0.6;

/// Guess the theme from the terminal background, defaulting to light
pub fn detect_theme() -> Theme {
    match terminal_light::luma() {
        Ok(luma) if luma > LIGHT_LUMA_THRESHOLD => Theme::Light,
        Ok(_) => Theme::Dark,
        Err(_) => Theme::Light,
    }
}

/// Single owner of the theme cell. Every toggle is written back to the
/// store when one is attached.
#[derive(Debug)]
pub struct ThemeContext {
    theme: Theme,
    store: Option<PreferenceStore>,
}

impl ThemeContext {
    /// Read the stored preference, falling back to terminal detection
    pub fn load(store: PreferenceStore) -> Self {
        let stored = match store.load() {
            Ok(prefs) => prefs.theme,
            Err(e) => {
                tracing::warn!("cannot read theme preference: {}", e);
                None
            }
        };

        Self {
            theme: stored.unwrap_or_else(detect_theme),
            store: Some(store),
        }
    }

    /// Context that never persists
    pub fn in_memory(theme: Theme) -> Self {
        Self { theme, store: None }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn palette(&self) -> &'static LevelColorMap {
        LevelColorMap::for_theme(self.theme)
    }

    /// Flip the theme and persist it. A failed write keeps the new theme
    /// for this session.
    pub fn toggle(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        if let Some(store) = &self.store {
            if let Err(e) = store.set_theme(self.theme) {
                tracing::warn!("cannot persist theme preference: {}", e);
            }
        }
        self.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_in_memory_toggle() {
        let mut ctx = ThemeContext::in_memory(Theme::Light);
        assert_eq!(ctx.toggle(), Theme::Dark);
        assert_eq!(ctx.theme(), Theme::Dark);
        assert_eq!(ctx.palette(), &LevelColorMap::DARK);
    }

    #[test]
    fn test_load_uses_stored_theme() {
        let temp = TempDir::new().unwrap();
        let store = PreferenceStore::with_dir(temp.path().to_path_buf());
        store.set_theme(Theme::Dark).unwrap();

        let ctx = ThemeContext::load(store);
        assert_eq!(ctx.theme(), Theme::Dark);
    }

    #[test]
    fn test_toggle_writes_back() {
        let temp = TempDir::new().unwrap();
        let store = PreferenceStore::with_dir(temp.path().to_path_buf());
        store.set_theme(Theme::Light).unwrap();

        let mut ctx = ThemeContext::load(store.clone());
        ctx.toggle();
        assert_eq!(store.load().unwrap().theme, Some(Theme::Dark));

        ctx.toggle();
        assert_eq!(store.load().unwrap().theme, Some(Theme::Light));
    }
}
