use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::common::warn;
use crate::config::storagekey;
use crate::storage::Storage;
use crate::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Presentation preferences. Persisted independently from the session;
/// one never touches the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub theme: Theme,
    pub language: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            language: "en".to_owned(),
        }
    }
}

/// Owner of the preferences blob. Mutations overwrite the whole value,
/// last write wins.
pub struct PreferenceStore {
    storage: Arc<dyn Storage>,
    current: Mutex<Preferences>,
}

impl PreferenceStore {
    /// Missing or corrupted blob loads as defaults.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let current = match storage.load(storagekey::PREFERENCES) {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(preferences) => preferences,
                Err(err) => {
                    warn!(%err, "Corrupted preferences blob, using defaults");
                    Preferences::default()
                }
            },
            Ok(None) => Preferences::default(),
            Err(err) => {
                warn!(%err, "Preferences blob unreadable, using defaults");
                Preferences::default()
            }
        };

        Self {
            storage,
            current: Mutex::new(current),
        }
    }

    pub fn current(&self) -> Preferences {
        self.current.lock().unwrap().clone()
    }

    pub fn set_theme(&self, theme: Theme) -> Result<Preferences> {
        self.update(|preferences| preferences.theme = theme)
    }

    pub fn set_language(&self, language: impl Into<String>) -> Result<Preferences> {
        let language = language.into();
        self.update(|preferences| preferences.language = language)
    }

    fn update(&self, apply: impl FnOnce(&mut Preferences)) -> Result<Preferences> {
        let mut current = self.current.lock().unwrap();
        apply(&mut current);
        let blob = serde_json::to_vec(&*current).map_err(crate::common::Error::from)?;
        self.storage.store(storagekey::PREFERENCES, &blob)?;

        Ok(current.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn corrupted_blob_loads_as_defaults() {
        let storage = Arc::new(MemoryStorage::new());
        storage.store(storagekey::PREFERENCES, b"???").unwrap();

        let store = PreferenceStore::load(storage);
        assert_eq!(store.current(), Preferences::default());
    }

    #[test]
    fn mutation_overwrites_whole_blob() {
        let storage = Arc::new(MemoryStorage::new());
        let store = PreferenceStore::load(storage.clone());

        store.set_theme(Theme::Dark).unwrap();
        store.set_language("sq").unwrap();

        // Reload sees the last written value in full.
        let reloaded = PreferenceStore::load(storage);
        assert_eq!(
            reloaded.current(),
            Preferences {
                theme: Theme::Dark,
                language: "sq".to_owned(),
            }
        );
    }

    #[test]
    fn preferences_do_not_touch_the_session_blob() {
        let storage = Arc::new(MemoryStorage::new());
        let store = PreferenceStore::load(storage.clone());

        store.set_theme(Theme::Dark).unwrap();

        assert!(storage.load(storagekey::SESSION).unwrap().is_none());
    }
}
