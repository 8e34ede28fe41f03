//! Configuration for building a `Preferences`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::namespace::HostNamespace;

/// Where preferences live and whose they are.
///
/// Deserializable, so it can be embedded in an application's own config
/// file:
///
/// ```json
/// {"host_namespace": "com.acme.app", "directory": "/var/lib/acme/prefs"}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesConfig {
    /// The host application's namespace id. `None` uses the library fallback prefix.
    pub host_namespace: Option<String>,
    /// Directory for file-backed stores. `None` uses the platform config dir.
    pub directory: Option<PathBuf>,
}

impl PreferencesConfig {
    /// Environment variable overriding `directory`.
    pub const DIR_ENV: &'static str = "STRUCTPREFS_DIR";

    /// Directory name under the platform config dir.
    pub const APP_DIR: &'static str = "structprefs";

    /// Build a configuration from `STRUCTPREFS_HOST_ID` and `STRUCTPREFS_DIR`.
    pub fn from_env() -> Self {
        Self {
            host_namespace: HostNamespace::from_env().id().map(str::to_string),
            directory: std::env::var_os(Self::DIR_ENV).map(PathBuf::from),
        }
    }

    pub fn with_host_namespace(mut self, id: impl Into<String>) -> Self {
        self.host_namespace = Some(id.into());
        self
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub fn host(&self) -> HostNamespace {
        match &self.host_namespace {
            Some(id) => HostNamespace::new(id),
            None => HostNamespace::none(),
        }
    }

    /// The store directory: the configured one, else `<config dir>/structprefs`.
    ///
    /// `None` only when no directory is configured and the platform has no
    /// config dir.
    pub fn resolved_directory(&self) -> Option<PathBuf> {
        self.directory
            .clone()
            .or_else(|| dirs::config_dir().map(|dir| dir.join(Self::APP_DIR)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_partial_config() {
        let config: PreferencesConfig =
            serde_json::from_str(r#"{"host_namespace": "com.acme.app"}"#).unwrap();
        assert_eq!(config.host_namespace.as_deref(), Some("com.acme.app"));
        assert_eq!(config.directory, None);
        assert_eq!(config.host().id(), Some("com.acme.app"));
    }

    #[test]
    fn empty_config_has_no_host() {
        let config: PreferencesConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PreferencesConfig::default());
        assert_eq!(config.host(), HostNamespace::none());
    }

    #[test]
    fn configured_directory_wins() {
        let config = PreferencesConfig::default().with_directory("/tmp/prefs");
        assert_eq!(config.resolved_directory(), Some(PathBuf::from("/tmp/prefs")));
    }

    #[test]
    fn builder_sets_host() {
        let config = PreferencesConfig::default().with_host_namespace("com.acme.app.");
        assert_eq!(config.host().id(), Some("com.acme.app"));
    }
}
