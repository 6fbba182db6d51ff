//! Preference persistence over a synchronous key-value store
//!
//! Loads never fail: missing or unrecognized values fall back to defaults.
//! Writes are fire-and-forget; store failures are logged and dropped.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::state::{Preferences, Theme, UnitSystem};

/// Namespace used by the default key set.
pub const DEFAULT_PREFIX: &str = "rw";

/// A synchronous string key-value store
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// Keys under which the three preferences live
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreKeys {
    pub units: String,
    pub theme: String,
    pub locations: String,
}

impl StoreKeys {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            units: format!("{prefix}.units"),
            theme: format!("{prefix}.theme"),
            locations: format!("{prefix}.locations"),
        }
    }
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }
}

/// Typed access to persisted preferences
#[derive(Debug)]
pub struct PreferenceStore<S> {
    store: S,
    keys: StoreKeys,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    pub fn new(store: S, keys: StoreKeys) -> Self {
        Self { store, keys }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn load(&self) -> Preferences {
        Preferences {
            units: self.load_units(),
            theme: self.load_theme(),
            saved_locations: self.load_saved_locations(),
        }
    }

    pub fn load_units(&self) -> UnitSystem {
        self.store
            .get(&self.keys.units)
            .and_then(|v| UnitSystem::parse(&v))
            .unwrap_or_default()
    }

    pub fn save_units(&self, units: UnitSystem) {
        self.store.set(&self.keys.units, units.as_str());
    }

    pub fn load_theme(&self) -> Theme {
        self.store
            .get(&self.keys.theme)
            .and_then(|v| Theme::parse(&v))
            .unwrap_or_default()
    }

    pub fn save_theme(&self, theme: Theme) {
        self.store.set(&self.keys.theme, theme.as_str());
    }

    pub fn load_saved_locations(&self) -> Vec<String> {
        let Some(raw) = self.store.get(&self.keys.locations) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::debug!("Ignoring corrupt saved locations: {}", e);
            Vec::new()
        })
    }

    pub fn save_saved_locations(&self, locations: &[String]) {
        match serde_json::to_string(locations) {
            Ok(json) => self.store.set(&self.keys.locations, &json),
            Err(e) => tracing::warn!("Failed to serialize saved locations: {}", e),
        }
    }
}

// ============================================================================
// Stores
// ============================================================================

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.lock().insert(key.to_string(), value.to_string());
    }
}

/// All keys in one JSON object file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file.
    lock: Mutex<()>,
}

impl FileStore {
    pub const FILE_NAME: &'static str = "prefs.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store at `<dir>/prefs.json`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> HashMap<String, String> {
        let Ok(json) = fs::read_to_string(&self.path) else {
            return HashMap::new();
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            tracing::warn!("Preference file {:?} is corrupted: {}", self.path, e);
            HashMap::new()
        })
    }

    fn write_entries(&self, entries: &HashMap<String, String>) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create preference directory: {}", e))?;
        }
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| format!("Failed to serialize preferences: {}", e))?;
        fs::write(&self.path, json).map_err(|e| format!("Failed to write preference file: {}", e))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock();
        self.read_entries().remove(key)
    }

    fn set(&self, key: &str, value: &str) {
        let _guard = self.lock.lock();
        let mut entries = self.read_entries();
        entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.write_entries(&entries) {
            tracing::warn!("{}", e);
        }
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_prefs() -> PreferenceStore<MemoryStore> {
        PreferenceStore::new(MemoryStore::new(), StoreKeys::default())
    }

    #[test]
    fn test_defaults_when_empty() {
        let prefs = memory_prefs();
        assert_eq!(prefs.load(), Preferences::default());
        assert_eq!(prefs.load_units(), UnitSystem::Metric);
        assert_eq!(prefs.load_theme(), Theme::Dark);
        assert!(prefs.load_saved_locations().is_empty());
    }

    #[test]
    fn test_units_round_trip() {
        let prefs = memory_prefs();
        for units in [UnitSystem::Imperial, UnitSystem::Metric] {
            prefs.save_units(units);
            assert_eq!(prefs.load_units(), units);
        }
        assert_eq!(prefs.store().get("rw.units").as_deref(), Some("metric"));
    }

    #[test]
    fn test_theme_round_trip() {
        let prefs = memory_prefs();
        for theme in [Theme::Light, Theme::Dark] {
            prefs.save_theme(theme);
            assert_eq!(prefs.load_theme(), theme);
        }
    }

    #[test]
    fn test_locations_round_trip() {
        let prefs = memory_prefs();
        let labels = vec!["London".to_string(), "Zürich, \"CH\"".to_string()];
        prefs.save_saved_locations(&labels);
        assert_eq!(prefs.load_saved_locations(), labels);
    }

    #[test]
    fn test_corrupt_values_fall_back() {
        let prefs = memory_prefs();
        prefs.store().set("rw.units", "kelvin");
        prefs.store().set("rw.theme", "Dark");
        prefs.store().set("rw.locations", "[\"unterminated");

        assert_eq!(prefs.load_units(), UnitSystem::Metric);
        assert_eq!(prefs.load_theme(), Theme::Dark);
        assert!(prefs.load_saved_locations().is_empty());

        prefs.store().set("rw.locations", "{\"not\":\"a list\"}");
        assert!(prefs.load_saved_locations().is_empty());
    }

    #[test]
    fn test_prefixes_isolate_stores() {
        let store = MemoryStore::new();
        store.set("a.theme", "light");
        let a = PreferenceStore::new(store, StoreKeys::with_prefix("a"));
        assert_eq!(a.load_theme(), Theme::Light);

        let b = PreferenceStore::new(MemoryStore::new(), StoreKeys::with_prefix("b"));
        assert_eq!(b.load_theme(), Theme::Dark);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");

        let first = PreferenceStore::new(FileStore::in_dir(&nested), StoreKeys::default());
        first.save_units(UnitSystem::Imperial);
        first.save_theme(Theme::Light);
        first.save_saved_locations(&["Oslo".to_string()]);

        let second = PreferenceStore::new(FileStore::in_dir(&nested), StoreKeys::default());
        assert_eq!(
            second.load(),
            Preferences {
                units: UnitSystem::Imperial,
                theme: Theme::Light,
                saved_locations: vec!["Oslo".to_string()],
            }
        );
    }

    #[test]
    fn test_file_store_tolerates_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        fs::write(store.path(), "not json").unwrap();

        let prefs = PreferenceStore::new(store, StoreKeys::default());
        assert_eq!(prefs.load(), Preferences::default());

        prefs.save_theme(Theme::Light);
        assert_eq!(prefs.load_theme(), Theme::Light);
    }
}
