//! Persistent configuration store backed by a single JSON file.
//!
//! Every write replaces the whole file: the document is serialized to a
//! temporary file next to `config.json` and renamed over it, so readers see
//! either the previous document or the new one in full.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;

use crate::config::{default_document, Document, HermesConfig};
use crate::error::{HermesError, HermesResult};
use crate::paths::AppPaths;

#[derive(Debug)]
pub struct ConfigStore {
    dir: PathBuf,
    file: PathBuf,
    document: Document,
}

impl ConfigStore {
    /// Creates a store for `paths`. Nothing touches the disk until
    /// [`ConfigStore::initialize`].
    pub fn open(paths: &AppPaths) -> Self {
        ConfigStore {
            dir: paths.data_dir.clone(),
            file: paths.config_file.clone(),
            document: Document::new(),
        }
    }

    /// Loads the document from disk, creating the directory and a default
    /// file on first run.
    ///
    /// On any failure the error is returned and the in-memory document falls
    /// back to the defaults. The file on disk is left untouched.
    pub fn initialize(&mut self) -> HermesResult<()> {
        let result = self.load();
        if let Err(e) = &result {
            log::error!("Failed to load config, using defaults in memory: {}", e);
            self.document = default_document();
        }
        result
    }

    fn load(&mut self) -> HermesResult<()> {
        fs::create_dir_all(&self.dir)?;
        let content = match fs::read_to_string(&self.file) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {}, writing defaults", self.file.display());
                self.document = default_document();
                return self.write();
            }
            Err(e) => return Err(e.into()),
        };
        self.document = parse_document(&self.file, &content)?;
        Ok(())
    }

    /// The most recently loaded or saved document.
    pub fn get_all(&self) -> &Document {
        &self.document
    }

    pub fn get(&self, key: &str, default: Value) -> Value {
        match self.document.get(key) {
            Some(Value::Null) | None => default,
            Some(v) => v.clone(),
        }
    }

    /// Typed view of the current document with defaults applied.
    pub fn settings(&self) -> HermesConfig {
        HermesConfig::from_document(&self.document)
    }

    /// Sets one field and writes the whole document back. On a failed write
    /// the in-memory change is kept.
    pub fn set(&mut self, key: &str, value: Value) -> HermesResult<()> {
        self.document.insert(key.to_string(), value);
        self.write()
    }

    /// Replaces the whole document.
    pub fn save(&mut self, document: Document) -> HermesResult<()> {
        self.document = document;
        self.write()
    }

    /// Overlays the top-level keys of `overlay` onto the current document and
    /// writes the result. Keys absent from the overlay are kept.
    pub fn merge(&mut self, overlay: Document) -> HermesResult<()> {
        for (key, value) in overlay {
            self.document.insert(key, value);
        }
        self.write()
    }

    /// Ends the store's lifetime, handing back the last known document.
    pub fn close(self) -> Document {
        log::debug!("Closing config store at {}", self.file.display());
        self.document
    }

    fn write(&self) -> HermesResult<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(&self.document)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.file).map_err(|e| HermesError::Io(e.error))?;
        log::debug!("Wrote config to {}", self.file.display());
        Ok(())
    }
}

fn parse_document(path: &Path, content: &str) -> HermesResult<Document> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| HermesError::MalformedConfig {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(HermesError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_rejects_non_objects() {
        let path = Path::new("config.json");
        assert!(matches!(
            parse_document(path, "[1, 2]"),
            Err(HermesError::NotAnObject { .. })
        ));
        assert!(matches!(
            parse_document(path, "{\"buttons\": ["),
            Err(HermesError::MalformedConfig { .. })
        ));
        assert_eq!(
            parse_document(path, "{\"fullscreen\": true}").unwrap()["fullscreen"],
            json!(true)
        );
    }

    #[test]
    fn test_get_treats_null_as_unset() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ConfigStore::open(&AppPaths::from_data_dir(dir.path()));
        store.initialize().unwrap();
        store.set("backgroundImage", Value::Null).unwrap();
        assert_eq!(store.get("backgroundImage", json!("none")), json!("none"));
        assert_eq!(store.get("missing", json!(5)), json!(5));
        assert_eq!(store.get("windowWidth", json!(0)), json!(800));
    }

    #[test]
    fn test_unreadable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::from_data_dir(dir.path());
        fs::create_dir(&paths.config_file).unwrap();

        let mut store = ConfigStore::open(&paths);
        assert!(matches!(store.initialize(), Err(HermesError::Io(_))));
        assert_eq!(store.get_all(), &default_document());
        assert!(paths.config_file.is_dir());
    }
}
