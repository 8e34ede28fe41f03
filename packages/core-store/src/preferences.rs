//! The entry point: a store registry plus the host namespace.

use crate::key::{validate_group, KeyGroup};
use crate::namespace::{resolve_prefix, HostNamespace};
use crate::namespaced::Namespaced;
use crate::store_registry::StoreRegistry;
use crate::Error;

/// Resolves key groups to namespaced handles.
///
/// Prefixes and stores are resolved when a handle is acquired, so a
/// misconfigured group fails here rather than on some later read.
pub struct Preferences {
    registry: StoreRegistry,
    host: HostNamespace,
}

impl Preferences {
    pub fn new(registry: StoreRegistry, host: HostNamespace) -> Self {
        Self { registry, host }
    }

    pub fn host(&self) -> &HostNamespace {
        &self.host
    }

    pub fn registry(&self) -> &StoreRegistry {
        &self.registry
    }

    /// The resolved prefix of group `G` under this host namespace.
    pub fn prefix<G: KeyGroup>(&self) -> String {
        resolve_prefix(&G::CONFIG, &self.host)
    }

    /// Acquire the handle for group `G`.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidGroup` - duplicate or empty key names.
    /// * `Error::Configuration` - the group's named store cannot be opened.
    pub fn group<G: KeyGroup>(&self) -> Result<Namespaced<G>, Error> {
        validate_group::<G>()?;
        let prefix = self.prefix::<G>();
        let store = self.registry.store_for(&G::CONFIG, &self.host)?;
        log::debug!("Resolved key group {} to prefix {}", G::NAME, prefix);
        Ok(Namespaced::new(prefix, store))
    }
}
