use crate::models::{AccessibilitySettings, FavoriteSet, FontSize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use thiserror::Error;

const FAVORITES_KEY: &str = "savedClassrooms";
const DARK_MODE_KEY: &str = "darkMode";
const FONT_SIZE_KEY: &str = "fontSize";

/// Errors that can occur when persisting preferences
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to persist preferences: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Preference store lock poisoned")]
    LockPoisoned,
}

/// Client-side key-value storage for preferences
///
/// Not authoritative: losing it only resets preferences to defaults.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: String) -> Result<(), PreferenceError>;
}

/// Preferences kept only for the lifetime of the process
#[derive(Default)]
pub struct MemoryPreferences {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> Result<(), PreferenceError> {
        let mut values = self.values.lock().map_err(|_| PreferenceError::LockPoisoned)?;
        values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Preferences stored as a JSON object in a single file
///
/// Every write replaces the file atomically.
pub struct FilePreferences {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl FilePreferences {
    /// Open the file, starting empty if it is missing or unreadable
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match load_from_disk(&path) {
            Ok(values) => values,
            Err(e) => {
                if path.exists() {
                    tracing::warn!("Ignoring unreadable preferences file {}: {}", path.display(), e);
                }
                HashMap::new()
            }
        };

        Self {
            path,
            values: Mutex::new(values),
        }
    }
}

fn load_from_disk(path: &Path) -> Result<HashMap<String, String>, PreferenceError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn save_to_disk(path: &Path, values: &HashMap<String, String>) -> Result<(), PreferenceError> {
    let parent_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        serde_json::to_writer_pretty(&mut writer, values)?;
        writer.flush()?;
    }

    temp_file.persist(path)?;
    Ok(())
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    /// The in-memory map only changes once the file has been replaced
    fn set(&self, key: &str, value: String) -> Result<(), PreferenceError> {
        let mut values = self.values.lock().map_err(|_| PreferenceError::LockPoisoned)?;

        let mut updated = values.clone();
        updated.insert(key.to_string(), value);
        save_to_disk(&self.path, &updated)?;

        *values = updated;
        Ok(())
    }
}

/// Favorites and display settings, loaded at start and saved on every change
pub struct ClientPreferences<S> {
    store: S,
    favorites: FavoriteSet,
    accessibility: AccessibilitySettings,
}

impl<S: PreferenceStore> ClientPreferences<S> {
    /// Load from the store; missing or corrupt entries fall back to defaults
    pub fn load(store: S) -> Self {
        let favorites = store
            .get(FAVORITES_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();

        let dark_mode = store
            .get(DARK_MODE_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or(false);

        let font_size = store
            .get(FONT_SIZE_KEY)
            .and_then(|raw| FontSize::parse(&raw))
            .unwrap_or_default();

        Self {
            store,
            favorites,
            accessibility: AccessibilitySettings { dark_mode, font_size },
        }
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    pub fn accessibility(&self) -> AccessibilitySettings {
        self.accessibility
    }

    pub fn add_favorite(&mut self, id: &str) -> Result<bool, PreferenceError> {
        self.update_favorites(|favorites| favorites.add(id))
    }

    pub fn remove_favorite(&mut self, id: &str) -> Result<bool, PreferenceError> {
        self.update_favorites(|favorites| favorites.remove(id))
    }

    /// Returns whether the classroom is a favorite afterwards
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool, PreferenceError> {
        let now_favorite = !self.favorites.contains(id);
        self.update_favorites(|favorites| {
            favorites.toggle(id);
            true
        })?;
        Ok(now_favorite)
    }

    pub fn set_dark_mode(&mut self, enabled: bool) -> Result<(), PreferenceError> {
        self.store.set(DARK_MODE_KEY, serde_json::to_string(&enabled)?)?;
        self.accessibility.dark_mode = enabled;
        Ok(())
    }

    pub fn set_font_size(&mut self, size: FontSize) -> Result<(), PreferenceError> {
        self.store.set(FONT_SIZE_KEY, size.as_str().to_string())?;
        self.accessibility.font_size = size;
        Ok(())
    }

    /// Apply `change` to a copy of the favorites and keep it only once it is saved
    fn update_favorites<F>(&mut self, change: F) -> Result<bool, PreferenceError>
    where
        F: FnOnce(&mut FavoriteSet) -> bool,
    {
        let mut updated = self.favorites.clone();
        if !change(&mut updated) {
            return Ok(false);
        }

        self.store.set(FAVORITES_KEY, serde_json::to_string(&updated)?)?;
        self.favorites = updated;
        Ok(true)
    }
}
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let prefs = ClientPreferences::load(MemoryPreferences::new());

        assert!(prefs.favorites().is_empty());
        assert_eq!(prefs.accessibility(), AccessibilitySettings::default());
        assert_eq!(prefs.accessibility().font_size, FontSize::Medium);
    }

    #[test]
    fn test_corrupt_entries_reset() {
        let store = MemoryPreferences::new();
        store.set(FAVORITES_KEY, "{not json".to_string()).unwrap();
        store.set(FONT_SIZE_KEY, "huge".to_string()).unwrap();

        let prefs = ClientPreferences::load(store);
        assert!(prefs.favorites().is_empty());
        assert_eq!(prefs.accessibility().font_size, FontSize::Medium);
    }

    #[test]
    fn test_file_store_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs").join("gowhere.json");

        {
            let mut prefs = ClientPreferences::load(FilePreferences::open(&path));
            prefs.add_favorite("RCC-201").unwrap();
            prefs.add_favorite("KHE-123").unwrap();
            prefs.set_dark_mode(true).unwrap();
            prefs.set_font_size(FontSize::Large).unwrap();
        }

        let prefs = ClientPreferences::load(FilePreferences::open(&path));
        assert_eq!(prefs.favorites().ids(), &["RCC-201".to_string(), "KHE-123".to_string()]);
        assert!(prefs.accessibility().dark_mode);
        assert_eq!(prefs.accessibility().font_size, FontSize::Large);
    }

    #[test]
    fn test_unreadable_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gowhere.json");
        fs::write(&path, "garbage").unwrap();

        let prefs = ClientPreferences::load(FilePreferences::open(&path));
        assert!(prefs.favorites().is_empty());
    }

    /// Store whose writes fail while `down` is set
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryPreferences,
        down: std::sync::atomic::AtomicBool,
    }

    impl FlakyStore {
        fn set_down(&self, down: bool) {
            self.down.store(down, std::sync::atomic::Ordering::SeqCst);
        }
    }

    impl PreferenceStore for &FlakyStore {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: String) -> Result<(), PreferenceError> {
            if self.down.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(PreferenceError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk full",
                )));
            }
            self.inner.set(key, value)
        }
    }

    #[test]
    fn test_failed_save_leaves_favorites_unchanged() {
        let store = FlakyStore::default();
        let mut prefs = ClientPreferences::load(&store);

        store.set_down(true);
        assert!(prefs.add_favorite("KHE-123").is_err());
        assert!(!prefs.favorites().contains("KHE-123"));
        assert!(prefs.toggle_favorite("ENG-101").is_err());
        assert!(prefs.favorites().is_empty());
        assert!(prefs.set_dark_mode(true).is_err());
        assert!(!prefs.accessibility().dark_mode);

        // Retrying once the store is back persists the change
        store.set_down(false);
        assert!(prefs.add_favorite("KHE-123").unwrap());
        assert!(prefs.toggle_favorite("ENG-101").unwrap());

        store.set_down(true);
        assert!(prefs.remove_favorite("KHE-123").is_err());
        assert!(prefs.favorites().contains("KHE-123"));
        store.set_down(false);

        let reloaded = ClientPreferences::load(&store);
        assert_eq!(
            reloaded.favorites().ids(),
            &["KHE-123".to_string(), "ENG-101".to_string()]
        );
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let store = std::sync::Arc::new(MemoryPreferences::new());

        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.values.lock().unwrap();
            panic!("poison the preference lock");
        })
        .join();

        assert!(matches!(
            store.set(DARK_MODE_KEY, "true".to_string()),
            Err(PreferenceError::LockPoisoned)
        ));
    }
}
