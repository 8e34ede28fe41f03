//! Key groups and typed logical keys.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::namespace::{resolve_prefix, HostNamespace, NamespaceConfig};

/// A closed, named set of logical keys.
///
/// Implement this with the [`key_group!`](crate::key_group) macro rather than
/// by hand. The trait only carries data; prefix derivation and key mapping
/// are free functions over it.
pub trait KeyGroup: 'static {
    /// The group's name, for diagnostics.
    const NAME: &'static str;

    /// Explicit prefix and/or store name.
    const CONFIG: NamespaceConfig;

    /// Every member key name, in declaration order.
    const KEYS: &'static [&'static str];
}

/// A logical key of group `G` holding values of type `T`.
///
/// Keys are plain `Copy` data; the group and value type exist only at
/// compile time, so a key cannot be read with the wrong type or used
/// against another group's handle.
pub struct Key<G, T> {
    name: &'static str,
    _marker: PhantomData<fn() -> (G, T)>,
}

impl<G, T> Key<G, T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// The logical key name, unique within its group.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

// Manual impls: derives would put bounds on G and T.

impl<G, T> Clone for Key<G, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G, T> Copy for Key<G, T> {}

impl<G, T> PartialEq for Key<G, T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<G, T> Eq for Key<G, T> {}

impl<G, T> Hash for Key<G, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<G: KeyGroup, T> fmt::Debug for Key<G, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({}::{})", G::NAME, self.name)
    }
}

/// Append a logical name to an already resolved prefix.
///
/// The name is not escaped. A name that itself starts with another group's
/// prefix would defeat prefix filtering; avoiding that is up to the caller.
pub fn map_key(prefix: &str, name: &str) -> String {
    let mut key = String::with_capacity(prefix.len() + name.len());
    key.push_str(prefix);
    key.push_str(name);
    key
}

/// The physical store key for a logical name of group `G`.
pub fn physical_key<G: KeyGroup>(host: &HostNamespace, name: &str) -> String {
    map_key(&resolve_prefix(&G::CONFIG, host), name)
}

/// Check the invariants `key_group!` cannot check at compile time.
pub(crate) fn validate_group<G: KeyGroup>() -> Result<(), crate::Error> {
    for (i, name) in G::KEYS.iter().enumerate() {
        if name.is_empty() {
            return Err(crate::Error::InvalidGroup {
                group: G::NAME,
                message: format!("key at position {} has an empty name", i),
            });
        }
        if G::KEYS[..i].contains(name) {
            return Err(crate::Error::InvalidGroup {
                group: G::NAME,
                message: format!("duplicate key name '{}'", name),
            });
        }
    }
    Ok(())
}

/// Declare a key group.
///
/// Generates a unit struct implementing [`KeyGroup`] and one associated
/// `const fn` per key returning its typed [`Key`]. Key names default to the
/// identifier; `=> "name"` overrides it. Namespace options go in
/// parentheses after the group name.
///
/// ```rust
/// use structprefs_core_store::{key_group, KeyGroup};
///
/// key_group! {
///     /// Settings shared with the companion widget.
///     pub struct Shared(prefix = "custom.prefix", store = "group.shared") {
///         user_preference: bool => "userPreference",
///         volume: i64,
///     }
/// }
///
/// assert_eq!(Shared::user_preference().name(), "userPreference");
/// assert_eq!(Shared::KEYS, &["userPreference", "volume"]);
/// assert_eq!(Shared::CONFIG.store_name, Some("group.shared"));
/// ```
#[macro_export]
macro_rules! key_group {
    (@name $key:ident) => {
        stringify!($key)
    };
    (@name $key:ident $name:literal) => {
        $name
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $group:ident $( ( $( $opt:ident = $val:literal ),* $(,)? ) )? {
            $(
                $(#[$kmeta:meta])*
                $key:ident : $ty:ty $( => $name:literal )?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        $vis struct $group;

        impl $crate::KeyGroup for $group {
            const NAME: &'static str = stringify!($group);
            const CONFIG: $crate::NamespaceConfig =
                $crate::NamespaceConfig::NONE $( $( .$opt($val) )* )?;
            const KEYS: &'static [&'static str] =
                &[ $( $crate::key_group!(@name $key $( $name )?) ),* ];
        }

        #[allow(dead_code)]
        impl $group {
            $(
                $(#[$kmeta])*
                $vis const fn $key() -> $crate::Key<$group, $ty> {
                    $crate::Key::new($crate::key_group!(@name $key $( $name )?))
                }
            )*
        }
    };
}
