// SPDX-License-Identifier: AGPL-3.0
// Fishing Log Core - Document persistence
//
// Two logical documents (app state and fish reference) stored as JSON files
// in one data directory. Every save is a full overwrite.

use crate::types::AppError;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// The documents the application persists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKey {
    AppState,
    FishReference,
}

impl DocumentKey {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::AppState => "saved_data.json",
            Self::FishReference => "fish_data.json",
        }
    }
}

/// Load/save collaborator for whole documents
pub trait Persistence {
    /// `Ok(None)` when the document has never been saved
    fn load(&self, key: DocumentKey) -> Result<Option<Value>, AppError>;

    fn save(&mut self, key: DocumentKey, document: &Value) -> Result<(), AppError>;
}

/// Documents stored as pretty-printed JSON files in a directory
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_of(&self, key: DocumentKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}

impl Persistence for JsonFileStore {
    fn load(&self, key: DocumentKey) -> Result<Option<Value>, AppError> {
        let path = self.path_of(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| AppError::FileIo(format!("Failed to read {}: {}", key.file_name(), e)))?;

        let document = serde_json::from_str(&content).map_err(|e| {
            AppError::Serialization(format!("Failed to parse {}: {}", key.file_name(), e))
        })?;

        Ok(Some(document))
    }

    fn save(&mut self, key: DocumentKey, document: &Value) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| AppError::FileIo(format!("Failed to create data dir: {}", e)))?;

        let content = serde_json::to_string_pretty(document).map_err(|e| {
            AppError::Serialization(format!("Failed to serialize {}: {}", key.file_name(), e))
        })?;

        // Write next to the target, then rename over it
        let path = self.path_of(key);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .map_err(|e| AppError::FileIo(format!("Failed to write {}: {}", key.file_name(), e)))?;
        fs::rename(&tmp_path, &path)
            .map_err(|e| AppError::FileIo(format!("Failed to replace {}: {}", key.file_name(), e)))?;

        tracing::debug!("Saved {:?}", path);
        Ok(())
    }
}

/// In-memory documents, used by tests and embedders without a disk
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: HashMap<DocumentKey, Value>,
    fail_saves: bool,
    save_count: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, key: DocumentKey, document: Value) -> Self {
        self.documents.insert(key, document);
        self
    }

    /// Make every following save fail with a FileIo error
    pub fn set_fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    pub fn document(&self, key: DocumentKey) -> Option<&Value> {
        self.documents.get(&key)
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl Persistence for MemoryStore {
    fn load(&self, key: DocumentKey) -> Result<Option<Value>, AppError> {
        Ok(self.documents.get(&key).cloned())
    }

    fn save(&mut self, key: DocumentKey, document: &Value) -> Result<(), AppError> {
        if self.fail_saves {
            return Err(AppError::FileIo(format!(
                "Failed to write {}: store is read-only",
                key.file_name()
            )));
        }
        self.documents.insert(key, document.clone());
        self.save_count += 1;
        Ok(())
    }
}
