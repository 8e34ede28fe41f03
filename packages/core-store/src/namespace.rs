//! Namespace resolution: where a key group's keys live in the flat key space.

use std::fmt;

/// Separator between prefix segments and between the prefix and a key name.
pub const SEPARATOR: char = '.';

/// Segment appended to the host namespace id for groups without an explicit prefix.
pub const DEFAULTS_SEGMENT: &str = "defaults";

/// Prefix used when a group has no explicit prefix and no host namespace id is known.
pub const FALLBACK_PREFIX: &str = "structprefs.defaults.";

/// Per-group namespace configuration.
///
/// Both fields are optional. The `const` builder methods let the
/// `key_group!` macro assemble a configuration at compile time:
///
/// ```rust
/// use structprefs_core_store::NamespaceConfig;
///
/// const CONFIG: NamespaceConfig = NamespaceConfig::NONE.prefix("custom.prefix").store("suite");
/// assert_eq!(CONFIG.explicit_prefix, Some("custom.prefix"));
/// assert_eq!(CONFIG.store_name, Some("suite"));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NamespaceConfig {
    /// Explicit prefix; takes precedence over the host namespace.
    pub explicit_prefix: Option<&'static str>,
    /// Named store backing the group; `None` selects the default store.
    pub store_name: Option<&'static str>,
}

impl NamespaceConfig {
    pub const NONE: NamespaceConfig = NamespaceConfig {
        explicit_prefix: None,
        store_name: None,
    };

    #[must_use]
    pub const fn prefix(self, prefix: &'static str) -> Self {
        NamespaceConfig {
            explicit_prefix: Some(prefix),
            store_name: self.store_name,
        }
    }

    #[must_use]
    pub const fn store(self, name: &'static str) -> Self {
        NamespaceConfig {
            explicit_prefix: self.explicit_prefix,
            store_name: Some(name),
        }
    }
}

/// The host application's own namespace identifier (bundle / package id).
///
/// This is passed in explicitly rather than looked up behind the caller's
/// back, so a missing host id is just `HostNamespace::none()`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct HostNamespace {
    id: Option<String>,
}

impl HostNamespace {
    /// Environment variable read by `from_env`.
    pub const ENV_VAR: &'static str = "STRUCTPREFS_HOST_ID";

    /// A host namespace with the given id.
    ///
    /// The id is normalized like an explicit prefix; an id that is empty
    /// after normalization is treated as no id at all.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self {
            id: normalize(id.as_ref()).map(str::to_string),
        }
    }

    /// No host namespace id is available.
    pub fn none() -> Self {
        Self { id: None }
    }

    /// Read the host id from `STRUCTPREFS_HOST_ID`, if set.
    pub fn from_env() -> Self {
        match std::env::var(Self::ENV_VAR) {
            Ok(id) => Self::new(id),
            Err(_) => Self::none(),
        }
    }

    /// The normalized id, if any.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl fmt::Display for HostNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => f.write_str(id),
            None => f.write_str("<none>"),
        }
    }
}

/// Trim separators and whitespace from both ends. `None` if nothing is left.
pub(crate) fn normalize(raw: &str) -> Option<&str> {
    let trimmed = raw.trim_matches(|c: char| c == SEPARATOR || c.is_whitespace());
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Resolve the prefix for a key group.
///
/// Precedence, highest first:
/// 1. the group's explicit prefix, normalized, plus `.`
/// 2. the host namespace id plus `.defaults.`
/// 3. [`FALLBACK_PREFIX`]
///
/// A level whose input is empty after normalization is skipped. The result
/// is never empty and always ends in exactly one separator.
///
/// ```rust
/// use structprefs_core_store::{resolve_prefix, HostNamespace, NamespaceConfig};
///
/// let host = HostNamespace::new("com.acme.app");
/// assert_eq!(resolve_prefix(&NamespaceConfig::NONE, &host), "com.acme.app.defaults.");
///
/// let custom = NamespaceConfig::NONE.prefix("custom.prefix.");
/// assert_eq!(resolve_prefix(&custom, &host), "custom.prefix.");
/// ```
pub fn resolve_prefix(config: &NamespaceConfig, host: &HostNamespace) -> String {
    if let Some(prefix) = config.explicit_prefix.and_then(normalize) {
        return format!("{}{}", prefix, SEPARATOR);
    }

    if let Some(id) = host.id() {
        return format!("{id}{SEPARATOR}{DEFAULTS_SEGMENT}{SEPARATOR}");
    }

    FALLBACK_PREFIX.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fallback_without_config_or_host() {
        let prefix = resolve_prefix(&NamespaceConfig::NONE, &HostNamespace::none());
        assert_eq!(prefix, FALLBACK_PREFIX);
        assert!(prefix.ends_with(SEPARATOR));
    }

    #[test]
    fn host_namespace_gets_defaults_segment() {
        let prefix = resolve_prefix(&NamespaceConfig::NONE, &HostNamespace::new("com.acme.app"));
        assert_eq!(prefix, "com.acme.app.defaults.");
    }

    #[test]
    fn explicit_prefix_wins_over_host() {
        let config = NamespaceConfig::NONE.prefix("custom.prefix");
        let prefix = resolve_prefix(&config, &HostNamespace::new("com.acme.app"));
        assert_eq!(prefix, "custom.prefix.");
    }

    #[test]
    fn explicit_prefix_is_normalized() {
        for raw in ["a.b", "a.b.", ".a.b", "..a.b..", " a.b. "] {
            let config = NamespaceConfig::NONE.prefix(raw);
            assert_eq!(resolve_prefix(&config, &HostNamespace::none()), "a.b.", "{raw:?}");
        }
    }

    #[test]
    fn blank_explicit_prefix_falls_through() {
        let config = NamespaceConfig::NONE.prefix("...");
        assert_eq!(
            resolve_prefix(&config, &HostNamespace::new("com.acme.app")),
            "com.acme.app.defaults."
        );
        assert_eq!(resolve_prefix(&config, &HostNamespace::none()), FALLBACK_PREFIX);
    }

    #[test]
    fn blank_host_is_no_host() {
        assert_eq!(HostNamespace::new(" . ").id(), None);
        assert_eq!(HostNamespace::new("com.acme.app.").id(), Some("com.acme.app"));
    }

    #[test]
    fn store_name_does_not_affect_prefix() {
        let config = NamespaceConfig::NONE.store("suite");
        assert_eq!(
            resolve_prefix(&config, &HostNamespace::new("com.acme.app")),
            "com.acme.app.defaults."
        );
    }

    fn segment() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9_-]{1,8}"
    }

    proptest! {
        #[test]
        fn resolved_prefix_has_exactly_one_trailing_separator(
            segments in prop::collection::vec(segment(), 1..4),
            leading in 0usize..3,
            trailing in 0usize..3,
            use_host in any::<bool>(),
        ) {
            let raw = format!(
                "{}{}{}",
                ".".repeat(leading),
                segments.join("."),
                ".".repeat(trailing)
            );
            let leaked: &'static str = Box::leak(raw.into_boxed_str());
            let config = NamespaceConfig::NONE.prefix(leaked);
            let host = if use_host { HostNamespace::new("com.host") } else { HostNamespace::none() };

            let prefix = resolve_prefix(&config, &host);

            prop_assert_eq!(prefix, format!("{}.", segments.join(".")));
        }

        #[test]
        fn resolved_prefix_is_never_empty(
            explicit in proptest::option::of("[. a-z]{0,6}"),
            host in proptest::option::of("[. a-z]{0,6}"),
        ) {
            let config = match explicit {
                Some(p) => NamespaceConfig::NONE.prefix(Box::leak(p.into_boxed_str())),
                None => NamespaceConfig::NONE,
            };
            let host = host.map(HostNamespace::new).unwrap_or_default();

            let prefix = resolve_prefix(&config, &host);

            prop_assert!(prefix.len() > 1);
            prop_assert!(prefix.ends_with(SEPARATOR));
            prop_assert!(!prefix.ends_with(".."));
            prop_assert!(!prefix.starts_with(SEPARATOR));
        }
    }
}
