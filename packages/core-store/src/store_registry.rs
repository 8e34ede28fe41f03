//! Store selection: which physical store backs a key group.
//!
//! Every registry has one default store. Groups that declare a store name
//! get a named store instead, opened through a [`StoreFactory`] the first
//! time it is asked for and cached afterwards.
//!
//! A name that cannot be opened is a configuration error. There is no
//! fallback to the default store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use structprefs_ll_store::{LLError, LLStore};

use crate::namespace::{normalize, HostNamespace, NamespaceConfig};
use crate::Error;

/// A shared store handle.
pub type StoreHandle = Arc<dyn LLStore>;

/// A factory for opening named stores.
pub trait StoreFactory: Send + Sync {
    /// Open (or create) the store with the given name.
    ///
    /// Return `Error::Configuration` when the name is unusable.
    fn open(&self, name: &str) -> Result<StoreHandle, Error>;
}

/// A factory that refuses every name.
///
/// For registries that only ever use the default store.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectNamed;

impl StoreFactory for RejectNamed {
    fn open(&self, name: &str) -> Result<StoreHandle, Error> {
        Err(Error::configuration(name, "named stores are not available"))
    }
}

/// The default store plus lazily opened named stores.
pub struct StoreRegistry {
    default: StoreHandle,
    named: RwLock<HashMap<String, StoreHandle>>,
    factory: Box<dyn StoreFactory>,
}

impl StoreRegistry {
    pub fn new(default: StoreHandle, factory: impl StoreFactory + 'static) -> Self {
        Self {
            default,
            named: RwLock::new(HashMap::new()),
            factory: Box::new(factory),
        }
    }

    /// The process default store.
    pub fn default_store(&self) -> &StoreHandle {
        &self.default
    }

    /// Register a pre-opened store under a name.
    ///
    /// This bypasses the factory, for stores with their own setup
    /// requirements. An existing entry with the same name is replaced.
    pub fn mount(&self, name: &str, store: StoreHandle) -> Result<(), Error> {
        let name = checked_name(name)?;
        let mut named = self.named.write().map_err(|_| LLError::Poisoned)?;
        named.insert(name.to_string(), store);
        Ok(())
    }

    /// Get the named store, opening it on first use.
    pub fn named(&self, name: &str) -> Result<StoreHandle, Error> {
        let name = checked_name(name)?;

        {
            let named = self.named.read().map_err(|_| LLError::Poisoned)?;
            if let Some(store) = named.get(name) {
                return Ok(Arc::clone(store));
            }
        }

        let mut named = self.named.write().map_err(|_| LLError::Poisoned)?;
        // Another thread may have opened it between the two locks
        if let Some(store) = named.get(name) {
            return Ok(Arc::clone(store));
        }

        log::debug!("Opening named store '{}'...", name);
        let store = self.factory.open(name)?;
        named.insert(name.to_string(), Arc::clone(&store));
        Ok(store)
    }

    /// Select the store for a group configuration.
    ///
    /// A store name equal to the host namespace id is rejected: a named
    /// store may not shadow the application's own domain. Both sides are
    /// normalized the same way before comparing.
    pub fn store_for(
        &self,
        config: &NamespaceConfig,
        host: &HostNamespace,
    ) -> Result<StoreHandle, Error> {
        let Some(name) = config.store_name else {
            return Ok(Arc::clone(&self.default));
        };

        if host.id().is_some() && host.id() == normalize(name) {
            return Err(Error::configuration(
                name,
                "store name must differ from the host namespace id",
            ));
        }

        self.named(name)
    }

    /// Names of all stores opened or mounted so far, sorted.
    pub fn opened_names(&self) -> Result<Vec<String>, Error> {
        let named = self.named.read().map_err(|_| LLError::Poisoned)?;
        let mut names: Vec<String> = named.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

fn checked_name(name: &str) -> Result<&str, Error> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::configuration(name, "store name is empty"));
    }
    Ok(trimmed)
}
