//! Positional values resolved for a constructor or method.

use std::any::Any;
use std::rc::Rc;

use crate::error::{DiError, DiResult};
use crate::key::Slot;
use crate::registration::Instance;

#[cfg(feature = "smallvec")]
type ArgVec<T> = smallvec::SmallVec<[T; 4]>;
#[cfg(not(feature = "smallvec"))]
type ArgVec<T> = Vec<T>;

/// Resolved arguments in declaration order.
///
/// Each position holds the value resolved for the matching declared
/// dependency, or absence when the dependency was optional and unbound.
///
/// # Examples
///
/// ```rust
/// use arbor_di::{Container, Dependency};
///
/// let container = Container::new();
/// container.register_instance(String::from("postgres://localhost"), "url").unwrap();
///
/// let args = container
///     .resolve_arguments(&[Dependency::from("url"), Dependency::from("pool").optional()])
///     .unwrap();
///
/// assert_eq!(args.len(), 2);
/// assert_eq!(args.get::<String>(0).unwrap().as_str(), "postgres://localhost");
/// assert!(args.optional::<u32>(1).unwrap().is_none());
/// assert!(args.get::<u32>(1).is_err());
/// ```
pub struct Arguments {
    values: ArgVec<(Slot, Option<Instance>)>,
}

impl Arguments {
    pub(crate) fn new() -> Self {
        Self {
            values: ArgVec::new(),
        }
    }

    pub(crate) fn push(&mut self, slot: Slot, value: Option<Instance>) {
        self.values.push((slot, value));
    }

    /// Number of declared positions.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing was declared.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns `true` if position `index` holds a value.
    pub fn is_present(&self, index: usize) -> bool {
        matches!(self.values.get(index), Some((_, Some(_))))
    }

    /// Value at `index`, failing with `NotFound` if it is absent.
    pub fn get<V: Any>(&self, index: usize) -> DiResult<Rc<V>> {
        let (slot, value) = self.position(index)?;
        match value {
            Some(value) => downcast(slot, value.clone()),
            None => Err(DiError::NotFound(slot.clone())),
        }
    }

    /// Value at `index`, or `None` if it is absent.
    pub fn optional<V: Any>(&self, index: usize) -> DiResult<Option<Rc<V>>> {
        let (slot, value) = self.position(index)?;
        value.clone().map(|value| downcast(slot, value)).transpose()
    }

    /// Untyped value at `index`.
    pub fn raw(&self, index: usize) -> DiResult<Option<Instance>> {
        let (_, value) = self.position(index)?;
        Ok(value.clone())
    }

    fn position(&self, index: usize) -> DiResult<&(Slot, Option<Instance>)> {
        self.values.get(index).ok_or(DiError::MissingArgument {
            index,
            len: self.values.len(),
        })
    }
}

/// Downcasts the instance resolved for `slot` to `V`.
pub(crate) fn downcast<V: Any>(slot: &Slot, value: Instance) -> DiResult<Rc<V>> {
    value.downcast::<V>().map_err(|_| DiError::TypeMismatch {
        slot: slot.clone(),
        expected: std::any::type_name::<V>(),
    })
}
