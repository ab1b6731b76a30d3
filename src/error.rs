//! Error types for the dependency injection container.

use std::fmt;

use crate::key::Slot;

/// Dependency injection errors
///
/// Represents the conditions that can occur during registration, resolution,
/// construction or after a container has been disposed.
///
/// # Examples
///
/// ```rust
/// use arbor_di::{Container, DiError, Slot};
///
/// let container = Container::new();
/// match container.resolve::<String>("missing") {
///     Err(DiError::NotFound(slot)) => assert_eq!(slot, Slot::from("missing")),
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use arbor_di::{DiError, Slot};
///
/// let duplicate = DiError::DuplicateRegistration(Slot::from(("db", "primary")));
/// assert_eq!(duplicate.to_string(), "Binding already registered: db [primary]");
///
/// let circular = DiError::Circular(vec![Slot::from("a"), Slot::from("b"), Slot::from("a")]);
/// assert_eq!(
///     circular.to_string(),
///     "Circular dependency: a [default] -> b [default] -> a [default]"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum DiError {
    /// Slot already occupied in the table being written
    DuplicateRegistration(Slot),
    /// No binding anywhere in the ancestor chain
    NotFound(Slot),
    /// Value resolved for `slot` is not the `expected` type
    TypeMismatch { slot: Slot, expected: &'static str },
    /// Class built without a declared constructor
    NoConstructor(&'static str),
    /// Constructor or method asked for an argument that was not declared
    MissingArgument { index: usize, len: usize },
    /// Circular dependency detected (includes path)
    Circular(Vec<Slot>),
    /// Maximum resolution depth exceeded
    DepthExceeded(usize),
    /// Container was disposed
    Disposed,
    /// Application factory failed
    Factory(String),
    /// Invalid container options
    Config(String),
    /// Snapshot serialization failed
    Export(String),
}

impl DiError {
    /// Builds a [`DiError::Factory`] from any message.
    pub fn factory(message: impl Into<String>) -> Self {
        DiError::Factory(message.into())
    }

    /// Returns `true` for [`DiError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, DiError::NotFound(_))
    }
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::DuplicateRegistration(slot) => {
                write!(f, "Binding already registered: {}", slot)
            }
            DiError::NotFound(slot) => write!(f, "Binding not found: {}", slot),
            DiError::TypeMismatch { slot, expected } => {
                write!(f, "Type mismatch for {}: expected {}", slot, expected)
            }
            DiError::NoConstructor(class) => write!(f, "No constructor declared for {}", class),
            DiError::MissingArgument { index, len } => {
                write!(f, "Argument {} requested but {} declared", index, len)
            }
            DiError::Circular(path) => {
                let path: Vec<String> = path.iter().map(ToString::to_string).collect();
                write!(f, "Circular dependency: {}", path.join(" -> "))
            }
            DiError::DepthExceeded(depth) => write!(f, "Max depth {} exceeded", depth),
            DiError::Disposed => write!(f, "Container has been disposed"),
            DiError::Factory(msg) => write!(f, "Factory failed: {}", msg),
            DiError::Config(msg) => write!(f, "Invalid options: {}", msg),
            DiError::Export(msg) => write!(f, "Snapshot export failed: {}", msg),
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for DI operations
///
/// A convenience alias for `Result<T, DiError>` used throughout arbor-di.
///
/// # Examples
///
/// ```rust
/// use arbor_di::{DiResult, DiError};
///
/// fn connect(url: &str) -> DiResult<String> {
///     if url.is_empty() {
///         return Err(DiError::factory("empty url"));
///     }
///     Ok(format!("connected to {}", url))
/// }
///
/// assert!(connect("").is_err());
/// assert_eq!(connect("db").unwrap(), "connected to db");
/// ```
pub type DiResult<T> = Result<T, DiError>;
