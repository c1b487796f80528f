/// Key-value persistence for progress that outlives a session.
///
/// The simulation never touches a store.  `ScoreKeeper` subscribes to the
/// game hooks and writes through whatever `KeyValueStore` it was given.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, warn};

use crate::entities::Collectible;
use crate::error::StoreError;
use crate::events::GameHooks;

pub const HIGH_SCORE_KEY: &str = "high_score";
pub const TOTAL_BANANAS_KEY: &str = "total_bananas";
pub const LEVELS_COMPLETED_KEY: &str = "levels_completed";

/// String-keyed, string-valued store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

// ── In-memory ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }
}

// ── JSON file ────────────────────────────────────────────────────────────────

/// Whole-file JSON object, rewritten on every `set`.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open `path`, starting empty if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), keys = entries.len(), "store opened");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value);
        self.flush()
    }
}

// ── Hook subscriber ──────────────────────────────────────────────────────────

/// Records the high score, lifetime bananas and completed levels.
///
/// Hooks cannot fail, so store errors are logged and dropped.
#[derive(Debug)]
pub struct ScoreKeeper<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ScoreKeeper<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn high_score(&self) -> u32 {
        self.read_u32(HIGH_SCORE_KEY)
    }

    pub fn total_bananas(&self) -> u32 {
        self.read_u32(TOTAL_BANANAS_KEY)
    }

    pub fn levels_completed(&self) -> u32 {
        self.read_u32(LEVELS_COMPLETED_KEY)
    }

    /// Missing or unparsable values read as zero.
    fn read_u32(&self, key: &str) -> u32 {
        self.store
            .get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    fn write_u32(&mut self, key: &str, value: u32) {
        if let Err(e) = self.store.set(key, value.to_string()) {
            warn!(key, error = %e, "failed to persist value");
        }
    }

    fn record_score(&mut self, score: u32) {
        if score > self.high_score() {
            self.write_u32(HIGH_SCORE_KEY, score);
            debug!(score, "new high score");
        }
    }
}

impl<S: KeyValueStore> GameHooks for ScoreKeeper<S> {
    fn on_collect(&mut self, item: &Collectible) {
        if item.kind.is_banana() {
            let total = self.total_bananas().saturating_add(1);
            self.write_u32(TOTAL_BANANAS_KEY, total);
        }
    }

    fn on_level_complete(&mut self, final_score: u32, _elapsed: Duration) {
        let completed = self.levels_completed().saturating_add(1);
        self.write_u32(LEVELS_COMPLETED_KEY, completed);
        self.record_score(final_score);
    }

    fn on_game_over(&mut self, final_score: u32) {
        self.record_score(final_score);
    }
}
