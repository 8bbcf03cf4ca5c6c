// Author: Dustin Pilgrim
// License: MIT

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use serde_json::{Map, Value};

use crate::core::store::SettingsStore;
use crate::perror;

/// JSON-file-backed settings store.
///
/// The whole map is held in memory and rewritten on every set, which keeps
/// writes synchronous with mutations: whatever the timer last changed is on
/// disk before anyone can observe the change. Write failures are logged and
/// the in-memory value kept; the timer never sees a storage error.
pub struct FileStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl FileStore {
    /// Opens (or starts) the settings file. A missing file starts empty; an
    /// unreadable or unparseable one is logged and also starts empty, since
    /// losing settings beats refusing to run.
    pub fn open(path: PathBuf) -> Self {
        let values = if path.exists() {
            match load_map(&path) {
                Ok(map) => map,
                Err(e) => {
                    perror!("store", "{:#}; starting fresh", e);
                    Map::new()
                }
            }
        } else {
            Map::new()
        };

        Self { path, values }
    }

    fn flush(&self) {
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        let text = match serde_json::to_string_pretty(&Value::Object(self.values.clone())) {
            Ok(t) => t,
            Err(e) => {
                perror!("store", "failed to serialize settings: {}", e);
                return;
            }
        };

        if let Err(e) = fs::write(&self.path, text) {
            perror!("store", "failed to write {}: {}", self.path.display(), e);
        }
    }

    fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
        self.flush();
    }
}

fn load_map(path: &Path) -> Result<Map<String, Value>> {
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read settings file {}", path.display()))?;

    match serde_json::from_str::<Value>(&text)
        .wrap_err_with(|| format!("settings file {} is not valid JSON", path.display()))?
    {
        Value::Object(map) => Ok(map),
        _ => Err(eyre::eyre!(
            "settings file {} is not a JSON object",
            path.display()
        )),
    }
}

impl SettingsStore for FileStore {
    fn get_i64(&self, key: &str) -> Option<i64> {
        self.values.get(key).and_then(|v| v.as_i64())
    }

    fn get_f64(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(|v| v.as_f64())
    }

    fn get_str(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }

    fn set_i64(&mut self, key: &str, value: i64) {
        self.set(key, value.into());
    }

    fn set_f64(&mut self, key: &str, value: f64) {
        self.set(key, value.into());
    }

    fn set_str(&mut self, key: &str, value: &str) {
        self.set(key, value.into());
    }

    fn remove(&mut self, key: &str) {
        if self.values.remove(key).is_some() {
            self.flush();
        }
    }
}
