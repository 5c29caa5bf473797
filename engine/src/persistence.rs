use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::config::{
    ConfigContentProvider, ConfigSerializer, FileContentConfigProvider, YamlConfigSerializer,
};
use crate::log;
use crate::snake::{GameMode, GridSize};

pub const HIGH_SCORE_KEY: &str = "snakeHighScore";
pub const GRID_SIZE_KEY: &str = "gridSize";
pub const GAME_MODE_KEY: &str = "gameMode";
pub const MUTED_KEY: &str = "isSoundMuted";

#[derive(Debug)]
pub enum PreferenceError {
    Storage(String),
    Serialization(String),
    LockPoisoned,
}

impl fmt::Display for PreferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferenceError::Storage(e) => write!(f, "Preference storage error: {}", e),
            PreferenceError::Serialization(e) => write!(f, "Preference format error: {}", e),
            PreferenceError::LockPoisoned => write!(f, "Preference store lock poisoned"),
        }
    }
}

impl std::error::Error for PreferenceError {}

/// String key/value storage for preferences that outlive a session.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Process-local store. Clones share the same map, so a test can keep a
/// handle and inspect what the game saved.
#[derive(Clone, Default)]
pub struct InMemoryPreferenceStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let map = values
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            values: Arc::new(Mutex::new(map)),
        }
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let values = self.values.lock().map_err(|_| PreferenceError::LockPoisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut values = self.values.lock().map_err(|_| PreferenceError::LockPoisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// All preferences kept as one YAML map, rewritten on every change.
pub struct YamlFilePreferenceStore<TContentProvider = FileContentConfigProvider>
where
    TContentProvider: ConfigContentProvider,
{
    content_provider: TContentProvider,
    serializer: YamlConfigSerializer,
    cache: Mutex<Option<BTreeMap<String, String>>>,
}

impl YamlFilePreferenceStore<FileContentConfigProvider> {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(FileContentConfigProvider::new(path))
    }
}

impl<TContentProvider: ConfigContentProvider> YamlFilePreferenceStore<TContentProvider> {
    pub fn new(content_provider: TContentProvider) -> Self {
        Self {
            content_provider,
            serializer: YamlConfigSerializer::new(),
            cache: Mutex::new(None),
        }
    }

    fn with_map<R>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, String>) -> R,
    ) -> Result<R, PreferenceError> {
        let mut cache = self.cache.lock().map_err(|_| PreferenceError::LockPoisoned)?;
        if cache.is_none() {
            let map = match self
                .content_provider
                .get_config_content()
                .map_err(PreferenceError::Storage)?
            {
                Some(content) if !content.trim().is_empty() => self
                    .serializer
                    .deserialize(&content)
                    .map_err(PreferenceError::Serialization)?,
                _ => BTreeMap::new(),
            };
            *cache = Some(map);
        }
        let map = cache.get_or_insert_with(BTreeMap::new);
        Ok(f(map))
    }
}

impl<TContentProvider: ConfigContentProvider> PreferenceStore for YamlFilePreferenceStore<TContentProvider> {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        self.with_map(|map| map.get(key).cloned())
    }

    /// The cached map only changes once the write has succeeded.
    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut updated = self.with_map(|map| map.clone())?;
        updated.insert(key.to_string(), value.to_string());
        let content = self
            .serializer
            .serialize(&updated)
            .map_err(PreferenceError::Serialization)?;
        self.content_provider
            .set_config_content(&content)
            .map_err(PreferenceError::Storage)?;
        self.with_map(|map| *map = updated)
    }
}

/// Values read from the store once, when a game is constructed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Preferences {
    pub high_score: u32,
    pub grid_size: GridSize,
    pub mode: GameMode,
    pub muted: bool,
}

impl Preferences {
    /// Missing or unreadable entries fall back to their defaults.
    pub fn load(store: &impl PreferenceStore) -> Self {
        let defaults = Preferences::default();
        Self {
            high_score: load_parsed(store, HIGH_SCORE_KEY, |s| s.parse::<u32>().map_err(|e| e.to_string()))
                .unwrap_or(defaults.high_score),
            grid_size: load_parsed(store, GRID_SIZE_KEY, |s| s.parse::<GridSize>())
                .unwrap_or(defaults.grid_size),
            mode: load_parsed(store, GAME_MODE_KEY, |s| s.parse::<GameMode>())
                .unwrap_or(defaults.mode),
            muted: load_parsed(store, MUTED_KEY, |s| s.parse::<bool>().map_err(|e| e.to_string()))
                .unwrap_or(defaults.muted),
        }
    }
}

fn load_parsed<T>(
    store: &impl PreferenceStore,
    key: &str,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Option<T> {
    match store.get(key) {
        Ok(Some(raw)) => match parse(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log!("Ignoring stored {} '{}': {}", key, raw, e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            log!("Failed to read {}: {}", key, e);
            None
        }
    }
}

/// Store failures never reach the simulation; they are logged and dropped.
pub fn save_preference(store: &impl PreferenceStore, key: &str, value: &str) {
    if let Err(e) = store.set(key, value) {
        log!("Failed to save {}: {}", key, e);
    }
}
