//! Binding scope definitions.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Scopes controlling how produced instances are cached in the container tree
///
/// # Scope Characteristics
///
/// - **Transient**: a fresh instance on every resolution, never cached
/// - **Scoped**: one instance per resolving container, cached where the
///   resolution started (possibly a descendant of the registering container)
/// - **Singleton**: one instance for the whole subtree of the registering
///   container, cached in the registering container
///
/// # Examples
///
/// ```rust
/// use arbor_di::{Container, Scope};
/// use std::rc::Rc;
///
/// struct Connection;
/// struct Request;
/// struct Command;
///
/// let root = Container::new();
/// root.register_singleton("connection", |_| Ok(Connection)).unwrap();
/// root.register_scoped("request", |_| Ok(Request)).unwrap();
/// root.register_transient("command", |_| Ok(Command)).unwrap();
///
/// let child = root.create_child();
///
/// // Singleton: the registering container and all descendants share it
/// let c1 = root.resolve::<Connection>("connection").unwrap();
/// let c2 = child.resolve::<Connection>("connection").unwrap();
/// assert!(Rc::ptr_eq(&c1, &c2));
///
/// // Scoped: same within one resolving container, different across them
/// let r1 = child.resolve::<Request>("request").unwrap();
/// let r2 = child.resolve::<Request>("request").unwrap();
/// let r3 = root.resolve::<Request>("request").unwrap();
/// assert!(Rc::ptr_eq(&r1, &r2));
/// assert!(!Rc::ptr_eq(&r1, &r3));
///
/// // Transient: always different
/// let m1 = child.resolve::<Command>("command").unwrap();
/// let m2 = child.resolve::<Command>("command").unwrap();
/// assert!(!Rc::ptr_eq(&m1, &m2));
/// assert_eq!(Scope::default(), Scope::Transient);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Scope {
    /// New instance per resolution, never cached
    #[default]
    Transient,
    /// Single instance per resolving container
    ///
    /// Discovered through the ancestor walk; the instance is cached in the
    /// container where resolution started, so every descendant that resolves
    /// it gets its own.
    Scoped,
    /// Single instance per registering container and its subtree
    ///
    /// Only matched once resolution delegates back to the registering
    /// container, and cached there.
    Singleton,
}

impl Scope {
    /// Returns `true` if produced instances are cached.
    #[inline]
    pub fn is_cached(&self) -> bool {
        matches!(self, Scope::Scoped | Scope::Singleton)
    }

    /// Scopes discoverable by the ancestor walk.
    #[inline]
    pub(crate) fn walks_ancestors(&self) -> bool {
        matches!(self, Scope::Transient | Scope::Scoped)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Transient => f.write_str("transient"),
            Scope::Scoped => f.write_str("scoped"),
            Scope::Singleton => f.write_str("singleton"),
        }
    }
}
