//! Persistence of the raw configuration text behind a key-value contract.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::model::Configuration;

/// The single key the configuration is stored under.
pub const CONFIG_KEY: &str = "config";

pub trait ConfigStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl ConfigStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io(path, e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| Error::io(&self.dir, e))?;
        let path = self.path_for(key);
        fs::write(&path, value).map_err(|e| Error::io(&path, e))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl ConfigStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The stored raw text, provided it parses. Read failures and unparseable
/// text are logged and treated as absent.
pub fn load_raw(store: &impl ConfigStore) -> Option<(String, Configuration)> {
    let raw = match store.get(CONFIG_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, "could not read stored configuration");
            return None;
        }
    };

    match Configuration::from_text(&raw) {
        Ok(config) => Some((raw, config)),
        Err(e) => {
            tracing::warn!(error = %e, "stored configuration does not parse, ignoring it");
            None
        }
    }
}

pub fn load(store: &impl ConfigStore) -> Option<Configuration> {
    load_raw(store).map(|(_, config)| config)
}

pub fn load_or_default(store: &impl ConfigStore) -> Configuration {
    load(store).unwrap_or_else(Configuration::sample)
}

/// Persist `raw` if it parses; returns the parsed configuration.
pub fn save(store: &mut impl ConfigStore, raw: &str) -> Result<Configuration> {
    let config = Configuration::from_text(raw)?;
    store.set(CONFIG_KEY, raw)?;
    tracing::info!(invoice_number = config.invoice_number, "configuration saved");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_loads_sample() {
        let store = MemoryStore::default();
        assert_eq!(load(&store), None);
        assert_eq!(load_or_default(&store), Configuration::sample());
    }

    #[test]
    fn save_then_load() {
        let mut store = MemoryStore::default();
        let raw = r#"{"invoiceNumber": 7, "myCompany": ["Solo Dev"]}"#;
        let saved = save(&mut store, raw).unwrap();

        assert_eq!(saved.invoice_number, 7);
        assert_eq!(store.get(CONFIG_KEY).unwrap().as_deref(), Some(raw));
        assert_eq!(load(&store), Some(saved));
    }

    #[test]
    fn invalid_text_is_not_saved() {
        let mut store = MemoryStore::default();
        save(&mut store, r#"{"invoiceNumber": 2}"#).unwrap();

        assert!(matches!(save(&mut store, "{ broken"), Err(Error::Parse(_))));
        assert_eq!(load(&store).map(|c| c.invoice_number), Some(2));
    }

    #[test]
    fn unparseable_stored_text_falls_back() {
        let mut store = MemoryStore::default();
        store.set(CONFIG_KEY, "not json").unwrap();
        assert_eq!(load_or_default(&store), Configuration::sample());
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));

        assert_eq!(store.get(CONFIG_KEY).unwrap(), None);
        store.set(CONFIG_KEY, "{}").unwrap();
        assert_eq!(store.get(CONFIG_KEY).unwrap().as_deref(), Some("{}"));
        assert!(store.path_for(CONFIG_KEY).ends_with("nested/config.json"));
    }
}
