use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use structprefs_core_store::{LLError, LLReader, LLWriter, StoredValue};

use crate::persisted;
use crate::JsonStoreError;

/// A store whose explicit values live in one JSON file.
///
/// The file is read once by [`JsonFileStore::open`] and rewritten after
/// every change, through a temporary file renamed into place. Registered
/// defaults are kept in memory only; applications register them again on
/// each launch.
///
/// A single process is assumed to own the file. Changes made to it by other
/// processes while the store is open are overwritten.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, StoredValue>>,
    defaults: RwLock<BTreeMap<String, StoredValue>>,
}

impl JsonFileStore {
    /// Open the store backed by `path`, loading it if the file exists.
    ///
    /// A missing file is an empty store; the file and its parent directory
    /// are created on the first write.
    ///
    /// # Errors
    ///
    /// * `JsonStoreError::Malformed` - the file is not a store file.
    /// * `JsonStoreError::Io` - the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, JsonStoreError> {
        let path = path.into();
        let values = match fs::read(&path) {
            Ok(contents) => {
                log::debug!("Loading {}...", path.display());
                persisted::parse_file(&contents).map_err(|message| {
                    JsonStoreError::Malformed {
                        path: path.clone(),
                        message,
                    }
                })?
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => return Err(JsonStoreError::Io { path, error }),
        };

        Ok(Self {
            path,
            values: RwLock::new(values),
            defaults: RwLock::new(BTreeMap::new()),
        })
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, values: &BTreeMap<String, StoredValue>) -> Result<(), JsonStoreError> {
        let contents = persisted::render_file(values)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|error| JsonStoreError::Io {
                path: parent.to_path_buf(),
                error,
            })?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        log::debug!("Writing {}...", self.path.display());

        let write_temp = || -> io::Result<()> {
            let mut f = fs::File::create(&temp_path)?;
            f.write_all(&contents)?;
            f.sync_all()
        };
        write_temp().map_err(|error| JsonStoreError::Io {
            path: temp_path.clone(),
            error,
        })?;

        fs::rename(&temp_path, &self.path).map_err(|error| JsonStoreError::Io {
            path: self.path.clone(),
            error,
        })
    }
}

impl LLReader for JsonFileStore {
    fn ll_get(&self, key: &str) -> Result<Option<StoredValue>, LLError> {
        let values = self.values.read().map_err(|_| LLError::Poisoned)?;
        if let Some(value) = values.get(key) {
            return Ok(Some(value.clone()));
        }
        let defaults = self.defaults.read().map_err(|_| LLError::Poisoned)?;
        Ok(defaults.get(key).cloned())
    }

    fn ll_keys(&self) -> Result<Vec<String>, LLError> {
        let values = self.values.read().map_err(|_| LLError::Poisoned)?;
        let defaults = self.defaults.read().map_err(|_| LLError::Poisoned)?;
        let keys: BTreeSet<&String> = values.keys().chain(defaults.keys()).collect();
        Ok(keys.into_iter().cloned().collect())
    }
}

impl LLWriter for JsonFileStore {
    fn ll_set(&self, key: &str, value: StoredValue) -> Result<(), LLError> {
        let mut values = self.values.write().map_err(|_| LLError::Poisoned)?;
        let previous = values.insert(key.to_string(), value);

        if let Err(e) = self.flush(&values) {
            // Keep memory and file in agreement
            match previous {
                Some(previous) => values.insert(key.to_string(), previous),
                None => values.remove(key),
            };
            return Err(e.into());
        }
        Ok(())
    }

    fn ll_remove(&self, key: &str) -> Result<bool, LLError> {
        let mut values = self.values.write().map_err(|_| LLError::Poisoned)?;
        let previous = match values.remove(key) {
            Some(previous) => previous,
            None => return Ok(false),
        };

        if let Err(e) = self.flush(&values) {
            values.insert(key.to_string(), previous);
            return Err(e.into());
        }
        Ok(true)
    }

    fn ll_register_default(&self, key: &str, value: StoredValue) -> Result<(), LLError> {
        let mut defaults = self.defaults.write().map_err(|_| LLError::Poisoned)?;
        defaults.insert(key.to_string(), value);
        Ok(())
    }

    fn ll_unregister_default(&self, key: &str) -> Result<(), LLError> {
        let mut defaults = self.defaults.write().map_err(|_| LLError::Poisoned)?;
        defaults.remove(key);
        Ok(())
    }
}
