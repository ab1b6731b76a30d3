//! Dependency descriptors for declared injection points.

use crate::key::{Identifier, Key, Slot, Symbol};

/// One declared injection point: what to resolve and whether absence is fatal.
///
/// Bare identifiers convert into a descriptor with the default key that is
/// required; use [`Dependency::optional`] or [`Dependency::keyed`] for the
/// other combinations.
///
/// # Examples
///
/// ```rust
/// use arbor_di::{Dependency, Key};
///
/// let plain = Dependency::from("database");
/// assert!(plain.required);
/// assert_eq!(plain.key, Key::Default);
///
/// let replica = Dependency::keyed("database", "replica").optional();
/// assert!(!replica.required);
/// assert_eq!(replica.slot().to_string(), "database [replica]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    /// Identifier to resolve
    pub identifier: Identifier,
    /// Secondary key, [`Key::Default`] unless given
    pub key: Key,
    /// Whether a missing binding aborts construction
    pub required: bool,
}

impl Dependency {
    /// Required dependency under the default key.
    pub fn new(identifier: impl Into<Identifier>) -> Self {
        Self {
            identifier: identifier.into(),
            key: Key::Default,
            required: true,
        }
    }

    /// Required dependency under an explicit key.
    pub fn keyed(identifier: impl Into<Identifier>, key: impl Into<Key>) -> Self {
        Self {
            identifier: identifier.into(),
            key: key.into(),
            required: true,
        }
    }

    /// Dependency on the type `T` itself.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(Identifier::of::<T>())
    }

    /// Marks the dependency as optional: a missing binding yields absence.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// The lookup slot of this dependency.
    pub fn slot(&self) -> Slot {
        Slot {
            identifier: self.identifier.clone(),
            key: self.key.clone(),
        }
    }
}

impl From<Identifier> for Dependency {
    fn from(identifier: Identifier) -> Self {
        Dependency::new(identifier)
    }
}

impl From<&'static str> for Dependency {
    fn from(name: &'static str) -> Self {
        Dependency::new(name)
    }
}

impl From<String> for Dependency {
    fn from(name: String) -> Self {
        Dependency::new(name)
    }
}

impl From<i64> for Dependency {
    fn from(n: i64) -> Self {
        Dependency::new(n)
    }
}

impl From<i32> for Dependency {
    fn from(n: i32) -> Self {
        Dependency::new(n)
    }
}

impl From<u32> for Dependency {
    fn from(n: u32) -> Self {
        Dependency::new(n)
    }
}

impl From<Symbol> for Dependency {
    fn from(symbol: Symbol) -> Self {
        Dependency::new(symbol)
    }
}

impl From<Slot> for Dependency {
    fn from(slot: Slot) -> Self {
        Dependency::keyed(slot.identifier, slot.key)
    }
}
