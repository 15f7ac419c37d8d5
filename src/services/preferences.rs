//! Durable user preferences (theme, default login)
//!
//! Stored as JSON under ~/.contribtrack. Writes are serialized across
//! processes with an exclusive lock on a sibling lock file.

use crate::github::Login;
use crate::types::{ContribtrackError, Result, Theme};
use directories::BaseDirs;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

const PREFERENCES_FILE: &str = "preferences.json";
const LOCK_FILE: &str = "preferences.lock";
const LOG_FILE: &str = "contribtrack.log";

/// Persisted preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub login: Option<String>,
    /// Unix timestamp of last write
    #[serde(default)]
    pub updated_at: i64,
}

/// Reads and writes the preferences file
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    dir: PathBuf,
}

impl PreferenceStore {
    /// Store in the default directory (~/.contribtrack)
    pub fn new() -> Result<Self> {
        let base_dirs = BaseDirs::new().ok_or_else(|| {
            ContribtrackError::Preferences("Cannot determine home directory".into())
        })?;
        // Created on first write
        let dir = base_dirs.home_dir().join(".contribtrack");
        Ok(Self { dir })
    }

    /// Store in a custom directory
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(PREFERENCES_FILE)
    }

    /// Log file used while the TUI owns the terminal
    pub fn log_path(&self) -> PathBuf {
        self.dir.join(LOG_FILE)
    }

    /// Load preferences. Missing or corrupted files read as defaults.
    pub fn load(&self) -> Result<Preferences> {
        let path = self.path();
        if !path.exists() {
            return Ok(Preferences::default());
        }

        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(path = %path.display(), "cannot read preferences: {}", e);
                return Ok(Preferences::default());
            }
        };

        match serde_json::from_str(&content) {
            Ok(prefs) => Ok(prefs),
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring corrupted preferences: {}", e);
                Ok(Preferences::default())
            }
        }
    }

    /// Write preferences atomically under the store lock
    pub fn save(&self, prefs: &Preferences) -> Result<()> {
        self.update(|current| *current = prefs.clone()).map(|_| ())
    }

    /// Persist a theme choice, keeping other fields
    pub fn set_theme(&self, theme: Theme) -> Result<Preferences> {
        self.update(|prefs| prefs.theme = Some(theme))
    }

    /// Persist the default login, keeping other fields
    pub fn set_login(&self, login: &Login) -> Result<Preferences> {
        self.update(|prefs| prefs.login = Some(login.as_str().to_string()))
    }

    /// Read-modify-write with the lock held for the whole cycle
    fn update<F>(&self, change: F) -> Result<Preferences>
    where
        F: FnOnce(&mut Preferences),
    {
        fs::create_dir_all(&self.dir)?;

        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.dir.join(LOCK_FILE))?;
        FileExt::lock_exclusive(&lock)?;

        let result = self.load().and_then(|mut prefs| {
            change(&mut prefs);
            prefs.updated_at = chrono::Utc::now().timestamp();
            self.write_unlocked(&prefs)?;
            Ok(prefs)
        });

        FileExt::unlock(&lock)?;
        result
    }

    /// Caller must hold the store lock
    fn write_unlocked(&self, prefs: &Preferences) -> Result<()> {
        let content = serde_json::to_string_pretty(prefs)
            .map_err(|e| ContribtrackError::Preferences(format!("Serialization failed: {}", e)))?;

        let tmp = self.dir.join(format!("{}.tmp", PREFERENCES_FILE));
        fs::write(&tmp, content)?;
        fs::rename(&tmp, self.path())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (PreferenceStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = PreferenceStore::with_dir(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let (store, _temp) = create_test_store();
        assert_eq!(store.load().unwrap(), Preferences::default());
    }

    #[test]
    fn test_set_theme_round_trips() {
        let (store, _temp) = create_test_store();
        store.set_theme(Theme::Dark).unwrap();

        let prefs = store.load().unwrap();
        assert_eq!(prefs.theme, Some(Theme::Dark));
        assert!(prefs.updated_at > 0);
    }

    #[test]
    fn test_set_theme_keeps_login() {
        let (store, _temp) = create_test_store();
        store.set_login(&Login::parse("mrshyspy").unwrap()).unwrap();
        store.set_theme(Theme::Light).unwrap();

        let prefs = store.load().unwrap();
        assert_eq!(prefs.login.as_deref(), Some("mrshyspy"));
        assert_eq!(prefs.theme, Some(Theme::Light));
    }

    #[test]
    fn test_corrupted_file_loads_defaults() {
        let (store, _temp) = create_test_store();
        fs::write(store.path(), "not valid json {{{").unwrap();
        assert_eq!(store.load().unwrap(), Preferences::default());
    }

    #[test]
    fn test_file_format_uses_lowercase_theme() {
        let (store, _temp) = create_test_store();
        store.set_theme(Theme::Dark).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let (store, _temp) = create_test_store();
        fs::write(store.path(), r#"{"theme":"light"}"#).unwrap();

        let prefs = store.load().unwrap();
        assert_eq!(prefs.theme, Some(Theme::Light));
        assert_eq!(prefs.login, None);
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let (store, temp) = create_test_store();
        store.set_theme(Theme::Dark).unwrap();
        assert!(!temp.path().join("preferences.json.tmp").exists());
    }

    #[test]
    fn test_concurrent_writers_keep_both_fields() {
        let (store, _temp) = create_test_store();

        for round in 0..50 {
            store.save(&Preferences::default()).unwrap();
            let login = Login::parse(&format!("user{}", round)).unwrap();

            let theme_store = store.clone();
            let login_store = store.clone();
            let theme_writer = std::thread::spawn(move || theme_store.set_theme(Theme::Dark));
            let login_writer = std::thread::spawn(move || login_store.set_login(&login));
            theme_writer.join().unwrap().unwrap();
            login_writer.join().unwrap().unwrap();

            let prefs = store.load().unwrap();
            assert_eq!(prefs.theme, Some(Theme::Dark), "round {}", round);
            assert_eq!(
                prefs.login,
                Some(format!("user{}", round)),
                "round {}",
                round
            );
        }
    }

    #[test]
    fn test_store_dir_created_on_first_write() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join(".contribtrack");
        let store = PreferenceStore::with_dir(dir.clone());

        assert_eq!(store.load().unwrap(), Preferences::default());
        assert!(!dir.exists());

        store.set_theme(Theme::Light).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_paths_inside_store_dir() {
        let (store, temp) = create_test_store();
        assert_eq!(store.path(), temp.path().join("preferences.json"));
        assert_eq!(store.log_path(), temp.path().join("contribtrack.log"));
    }
}
