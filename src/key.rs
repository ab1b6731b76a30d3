//! Identifier and key types for binding lookup.

use std::any::TypeId;
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SYMBOL: AtomicU64 = AtomicU64::new(1);

/// Unique, process-local token usable as an identifier or secondary key.
///
/// Two symbols are equal only if one is a copy of the other; the description
/// is for diagnostics and plays no part in equality.
///
/// # Examples
///
/// ```rust
/// use arbor_di::Symbol;
///
/// let a = Symbol::new("logger");
/// let b = Symbol::new("logger");
/// assert_ne!(a, b);
/// assert_eq!(a, a.clone());
/// assert_eq!(a.description(), "logger");
/// ```
#[derive(Clone, Copy)]
pub struct Symbol {
    id: u64,
    description: &'static str,
}

impl Symbol {
    /// Creates a fresh symbol distinct from every other symbol.
    pub fn new(description: &'static str) -> Self {
        Self {
            id: NEXT_SYMBOL.fetch_add(1, Ordering::Relaxed),
            description,
        }
    }

    /// Diagnostic description given at creation.
    pub fn description(&self) -> &'static str {
        self.description
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({}#{})", self.description, self.id)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description)
    }
}

/// Primary lookup identifier for a binding.
///
/// Identifiers can be names, numeric tags, symbols or class references.
/// Numeric tags are stored as `i64`, so `7`, `7u32` and `7i64` name the same
/// binding.
/// Class references compare by `TypeId` only; the type name is carried for
/// diagnostics.
///
/// # Examples
///
/// ```rust
/// use arbor_di::{Identifier, Symbol};
///
/// struct Database;
///
/// let by_name = Identifier::from("database");
/// let by_number = Identifier::from(7);
/// let by_symbol = Identifier::from(Symbol::new("db"));
/// let by_type = Identifier::of::<Database>();
///
/// assert_eq!(by_name, Identifier::from(String::from("database")));
/// assert_eq!(by_number.to_string(), "7");
/// assert!(by_type.to_string().ends_with("Database"));
/// assert_ne!(by_symbol, Identifier::from(Symbol::new("db")));
/// ```
#[derive(Debug, Clone)]
pub enum Identifier {
    /// String name
    Name(Cow<'static, str>),
    /// Numeric tag
    Number(i64),
    /// Unique symbol
    Symbol(Symbol),
    /// Class reference with TypeId and name for diagnostics
    Type(TypeId, &'static str),
}

impl Identifier {
    /// Identifier referring to the type `T` itself.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Identifier::Type(TypeId::of::<T>(), std::any::type_name::<T>())
    }
}

impl PartialEq for Identifier {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Identifier::Type(a, _), Identifier::Type(b, _)) => a == b,
            (Identifier::Name(a), Identifier::Name(b)) => a == b,
            (Identifier::Number(a), Identifier::Number(b)) => a == b,
            (Identifier::Symbol(a), Identifier::Symbol(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            // TypeId only, the name is diagnostic
            Identifier::Type(id, _) => {
                0u8.hash(state);
                id.hash(state);
            }
            Identifier::Name(name) => {
                1u8.hash(state);
                name.hash(state);
            }
            Identifier::Number(n) => {
                2u8.hash(state);
                n.hash(state);
            }
            Identifier::Symbol(symbol) => {
                3u8.hash(state);
                symbol.hash(state);
            }
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Name(name) => f.write_str(name),
            Identifier::Number(n) => write!(f, "{}", n),
            Identifier::Symbol(symbol) => write!(f, "{}", symbol),
            Identifier::Type(_, name) => f.write_str(name),
        }
    }
}

impl From<&'static str> for Identifier {
    fn from(name: &'static str) -> Self {
        Identifier::Name(Cow::Borrowed(name))
    }
}

impl From<String> for Identifier {
    fn from(name: String) -> Self {
        Identifier::Name(Cow::Owned(name))
    }
}

impl From<i64> for Identifier {
    fn from(n: i64) -> Self {
        Identifier::Number(n)
    }
}

// Unsuffixed literals infer as i32
impl From<i32> for Identifier {
    fn from(n: i32) -> Self {
        Identifier::Number(n.into())
    }
}

impl From<u32> for Identifier {
    fn from(n: u32) -> Self {
        Identifier::Number(n.into())
    }
}

impl From<Symbol> for Identifier {
    fn from(symbol: Symbol) -> Self {
        Identifier::Symbol(symbol)
    }
}

/// Secondary key disambiguating several bindings under one identifier.
///
/// Omitted keys are [`Key::Default`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Key {
    /// The well-known default key
    #[default]
    Default,
    /// String name
    Name(Cow<'static, str>),
    /// Numeric tag
    Number(i64),
    /// Unique symbol
    Symbol(Symbol),
}

impl Key {
    /// Returns `true` for the default key.
    pub fn is_default(&self) -> bool {
        matches!(self, Key::Default)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Default => f.write_str("default"),
            Key::Name(name) => f.write_str(name),
            Key::Number(n) => write!(f, "{}", n),
            Key::Symbol(symbol) => write!(f, "{}", symbol),
        }
    }
}

impl From<&'static str> for Key {
    fn from(name: &'static str) -> Self {
        Key::Name(Cow::Borrowed(name))
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(Cow::Owned(name))
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Number(n)
    }
}

impl From<i32> for Key {
    fn from(n: i32) -> Self {
        Key::Number(n.into())
    }
}

impl From<u32> for Key {
    fn from(n: u32) -> Self {
        Key::Number(n.into())
    }
}

impl From<Symbol> for Key {
    fn from(symbol: Symbol) -> Self {
        Key::Symbol(symbol)
    }
}

/// The full lookup key of a binding: identifier plus secondary key.
///
/// Anything convertible into an [`Identifier`] converts into a slot with the
/// default key; an `(identifier, key)` tuple converts into a keyed slot.
///
/// # Examples
///
/// ```rust
/// use arbor_di::{Key, Slot};
///
/// let plain = Slot::from("cache");
/// assert_eq!(plain.key, Key::Default);
///
/// let keyed = Slot::from(("cache", "redis"));
/// assert_eq!(keyed.key, Key::from("redis"));
/// assert_ne!(plain, keyed);
/// assert_eq!(keyed.to_string(), "cache [redis]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slot {
    /// Primary identifier
    pub identifier: Identifier,
    /// Secondary key
    pub key: Key,
}

impl Slot {
    /// Creates a slot from an identifier and key.
    pub fn new(identifier: impl Into<Identifier>, key: impl Into<Key>) -> Self {
        Self {
            identifier: identifier.into(),
            key: key.into(),
        }
    }

    /// Slot for the type `T` under the default key.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Identifier::of::<T>().into()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.identifier, self.key)
    }
}

impl From<Identifier> for Slot {
    fn from(identifier: Identifier) -> Self {
        Self {
            identifier,
            key: Key::Default,
        }
    }
}

impl From<&'static str> for Slot {
    fn from(name: &'static str) -> Self {
        Identifier::from(name).into()
    }
}

impl From<String> for Slot {
    fn from(name: String) -> Self {
        Identifier::from(name).into()
    }
}

impl From<i64> for Slot {
    fn from(n: i64) -> Self {
        Identifier::from(n).into()
    }
}

impl From<i32> for Slot {
    fn from(n: i32) -> Self {
        Identifier::from(n).into()
    }
}

impl From<u32> for Slot {
    fn from(n: u32) -> Self {
        Identifier::from(n).into()
    }
}

impl From<Symbol> for Slot {
    fn from(symbol: Symbol) -> Self {
        Identifier::from(symbol).into()
    }
}

impl<I, K> From<(I, K)> for Slot
where
    I: Into<Identifier>,
    K: Into<Key>,
{
    fn from((identifier, key): (I, K)) -> Self {
        Slot::new(identifier, key)
    }
}

impl From<&Slot> for Slot {
    fn from(slot: &Slot) -> Self {
        slot.clone()
    }
}
