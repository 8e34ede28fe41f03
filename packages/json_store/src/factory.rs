//! Named-store factories.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use structprefs_core_store::{Error, StoreFactory, StoreHandle};

use crate::{InMemoryStore, JsonFileStore, JsonStoreError};

/// Opens every named store as a fresh [`InMemoryStore`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryStoreFactory;

impl StoreFactory for MemoryStoreFactory {
    fn open(&self, name: &str) -> Result<StoreHandle, Error> {
        log::debug!("Opening in-memory store {}", name);
        Ok(Arc::new(InMemoryStore::new()))
    }
}

/// Opens named stores as `<root>/<name>.json`.
///
/// The default store lives in the same directory as
/// [`DEFAULT_STORE_FILE`](Self::DEFAULT_STORE_FILE), so `defaults` is not a
/// valid store name.
#[derive(Debug, Clone)]
pub struct DirectoryStoreFactory {
    root: PathBuf,
}

impl DirectoryStoreFactory {
    pub const DEFAULT_STORE_NAME: &'static str = "defaults";
    pub const DEFAULT_STORE_FILE: &'static str = "defaults.json";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Open the default store of this directory.
    pub fn open_default(&self) -> Result<JsonFileStore, JsonStoreError> {
        self.check_root()?;
        JsonFileStore::open(self.root.join(Self::DEFAULT_STORE_FILE))
    }

    /// The file a named store is kept in.
    pub fn store_path(&self, name: &str) -> Result<PathBuf, JsonStoreError> {
        lazy_static! {
            static ref STORE_NAME: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap();
        }

        let invalid = |message: &str| JsonStoreError::InvalidStoreName {
            name: name.to_string(),
            message: message.to_string(),
        };

        if !STORE_NAME.is_match(name) {
            return Err(invalid(
                "must start with a letter or digit and contain only letters, digits, '.', '_' or '-'",
            ));
        }
        if name.contains("..") {
            return Err(invalid("must not contain '..'"));
        }
        if name == Self::DEFAULT_STORE_NAME {
            return Err(invalid("reserved for the default store"));
        }

        Ok(self.root.join(format!("{}.json", name)))
    }

    fn check_root(&self) -> Result<(), JsonStoreError> {
        match fs::metadata(&self.root) {
            Ok(attr) if !attr.is_dir() => Err(JsonStoreError::RootPathInvalid {
                path: self.root.clone(),
                error: io::Error::other("Root path must be a directory."),
            }),
            Ok(_) => Ok(()),
            // Created on first write
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(JsonStoreError::RootPathInvalid {
                path: self.root.clone(),
                error,
            }),
        }
    }

    fn open_named(&self, name: &str) -> Result<JsonFileStore, JsonStoreError> {
        self.check_root()?;
        let path = self.store_path(name)?;
        log::debug!("Opening store {} at {}", name, path.display());
        JsonFileStore::open(path)
    }
}

impl StoreFactory for DirectoryStoreFactory {
    fn open(&self, name: &str) -> Result<StoreHandle, Error> {
        match self.open_named(name) {
            Ok(store) => Ok(Arc::new(store)),
            Err(e) => Err(Error::configuration(name, e.to_string())),
        }
    }
}
