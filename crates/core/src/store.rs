//! Persistence of presentations and enhancement settings.
//!
//! Everything lives in a flat string key-value store: one key holding the
//! serialized presentation list, plus scalar keys for the provider settings.
//! Writes are read-modify-write with no locking; two writers of the same
//! store can overwrite each other.

use crate::enhance::{EnhanceSettings, DEFAULT_MODEL};
use crate::error::{Error, Result};
use crate::types::Presentation;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Key holding the serialized presentation list.
pub const PRESENTATIONS_KEY: &str = "presentations";
pub const API_KEY_KEY: &str = "openai-api-key";
pub const MODEL_KEY: &str = "openai-model";
pub const DEFAULT_PROMPT_KEY: &str = "default-prompt";

/// A string key-value store with presentation helpers on top.
pub trait PresentationStore {
    /// Read a raw value.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a raw value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// All saved presentations, oldest first.
    fn load_all(&self) -> Result<Vec<Presentation>> {
        match self.get(PRESENTATIONS_KEY)? {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(Vec::new()),
        }
    }

    /// Replace the whole presentation list.
    fn save_all(&mut self, presentations: &[Presentation]) -> Result<()> {
        let raw = serde_json::to_string(presentations)?;
        self.set(PRESENTATIONS_KEY, &raw)
    }

    /// Append a presentation.
    fn save_presentation(&mut self, presentation: &Presentation) -> Result<()> {
        let mut all = self.load_all()?;
        all.push(presentation.clone());
        self.save_all(&all)
    }

    fn get_presentation(&self, id: &str) -> Result<Option<Presentation>> {
        Ok(self.load_all()?.into_iter().find(|p| p.id == id))
    }

    /// Like [`get_presentation`](Self::get_presentation), but a missing id is
    /// [`Error::NotFound`].
    fn require_presentation(&self, id: &str) -> Result<Presentation> {
        self.get_presentation(id)?
            .ok_or_else(|| Error::NotFound(format!("presentation {}", id)))
    }

    /// Replace one slide's content. Returns false when the presentation or
    /// slide does not exist; nothing is written in that case.
    fn update_slide(&mut self, presentation_id: &str, slide_id: usize, content: &str) -> Result<bool> {
        let mut all = self.load_all()?;
        let updated = all
            .iter_mut()
            .find(|p| p.id == presentation_id)
            .map(|p| p.replace_content(slide_id, content))
            .unwrap_or(false);

        if updated {
            self.save_all(&all)?;
        }
        Ok(updated)
    }

    /// Provider settings, with defaults for missing entries.
    fn settings(&self) -> Result<EnhanceSettings> {
        Ok(EnhanceSettings {
            api_key: self.get(API_KEY_KEY)?.unwrap_or_default(),
            model: self
                .get(MODEL_KEY)?
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            default_prompt: self.get(DEFAULT_PROMPT_KEY)?.unwrap_or_default(),
        })
    }

    fn save_settings(&mut self, settings: &EnhanceSettings) -> Result<()> {
        self.set(API_KEY_KEY, &settings.api_key)?;
        self.set(MODEL_KEY, &settings.model)?;
        self.set(DEFAULT_PROMPT_KEY, &settings.default_prompt)
    }
}

/// In-process store, used by tests and the WASM worker.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PresentationStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a single JSON object file.
///
/// The file is re-read on every access so that separate processes see each
/// other's writes.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(Error::Storage(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        let raw = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, raw)
            .map_err(|e| Error::Storage(format!("Failed to write {}: {}", self.path.display(), e)))
    }
}

impl PresentationStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str) -> Presentation {
        let mut presentation = Presentation::with_id(id, "Demo");
        presentation.push_slide("Slide 1", "Title: Intro");
        presentation.push_slide("Slide 2", "Body");
        presentation
    }

    #[test]
    fn test_memory_store_save_and_get() {
        let mut store = MemoryStore::new();
        assert!(store.load_all().unwrap().is_empty());

        store.save_presentation(&sample("1")).unwrap();
        store.save_presentation(&sample("2")).unwrap();

        assert_eq!(store.load_all().unwrap().len(), 2);
        assert_eq!(store.get_presentation("2").unwrap(), Some(sample("2")));
        assert_eq!(store.get_presentation("3").unwrap(), None);
    }

    #[test]
    fn test_require_presentation() {
        let mut store = MemoryStore::new();
        store.save_presentation(&sample("1")).unwrap();

        assert_eq!(store.require_presentation("1").unwrap(), sample("1"));
        let err = store.require_presentation("404").unwrap_err();
        assert!(matches!(&err, Error::NotFound(what) if what == "presentation 404"));
        assert_eq!(err.to_string(), "Not found: presentation 404");
    }

    #[test]
    fn test_update_slide() {
        let mut store = MemoryStore::new();
        store.save_presentation(&sample("1")).unwrap();

        assert!(store.update_slide("1", 2, "Rewritten").unwrap());
        assert!(!store.update_slide("1", 7, "Nope").unwrap());
        assert!(!store.update_slide("9", 1, "Nope").unwrap());

        let presentation = store.get_presentation("1").unwrap().unwrap();
        assert_eq!(presentation.slides[1].content, "Rewritten");
        assert_eq!(presentation.slides[1].id, 2);
    }

    #[test]
    fn test_settings_defaults_and_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.settings().unwrap(), EnhanceSettings::default());

        let settings = EnhanceSettings {
            api_key: "sk-test".to_string(),
            model: "gpt-4o-mini".to_string(),
            default_prompt: "Be brief.".to_string(),
        };
        store.save_settings(&settings).unwrap();
        assert_eq!(store.settings().unwrap(), settings);
    }

    #[test]
    fn test_corrupt_presentations_is_storage_error() {
        let mut store = MemoryStore::new();
        store.set(PRESENTATIONS_KEY, "{not json").unwrap();
        assert!(matches!(store.load_all(), Err(Error::Storage(_))));
    }

    #[test]
    fn test_json_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let mut store = JsonFileStore::new(&path);
        store.save_presentation(&sample("42")).unwrap();
        store.set(MODEL_KEY, "gpt-4o-mini").unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get_presentation("42").unwrap(), Some(sample("42")));
        assert_eq!(reopened.settings().unwrap().model, "gpt-4o-mini");
    }

    #[test]
    fn test_json_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(store.load_all().unwrap().is_empty());
        assert_eq!(store.get(API_KEY_KEY).unwrap(), None);
    }
}
