//! Diagnostic observers for resolution and lifecycle events.
//!
//! Observers are attached to a container and inherited by every child created
//! from it afterwards. Calls are synchronous; keep implementations cheap.

use std::rc::Rc;
use std::time::Duration;

use crate::container::Container;
use crate::error::DiError;
use crate::key::Slot;

/// Observer trait for container events.
///
/// # Examples
///
/// ```
/// use arbor_di::{Container, ContainerObserver, Slot};
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder {
///     resolved: RefCell<Vec<String>>,
/// }
///
/// impl ContainerObserver for Recorder {
///     fn resolving(&self, _container: &Container, _slot: &Slot) {}
///
///     fn resolved(&self, container: &Container, slot: &Slot, _duration: Duration) {
///         self.resolved
///             .borrow_mut()
///             .push(format!("{}: {}", container.path(), slot));
///     }
/// }
///
/// let recorder = Rc::new(Recorder::default());
/// let container = Container::new();
/// container.add_observer(recorder.clone());
/// container.register_instance(1u8, "one").unwrap();
///
/// container.resolve::<u8>("one").unwrap();
/// assert_eq!(recorder.resolved.borrow().as_slice(), ["root: one [default]"]);
/// ```
pub trait ContainerObserver {
    /// Called before a top-level resolution starts.
    fn resolving(&self, container: &Container, slot: &Slot);

    /// Called after a top-level resolution produced a value.
    fn resolved(&self, container: &Container, slot: &Slot, duration: Duration);

    /// Called when a top-level resolution failed.
    fn failed(&self, _container: &Container, _slot: &Slot, _error: &DiError) {}

    /// Called once when a container is disposed.
    fn disposed(&self, _container: &Container) {}
}

/// Observers attached to one container.
///
/// Cloning is cheap; the list is shared until modified.
#[derive(Clone, Default)]
pub(crate) struct Observers {
    observers: Rc<Vec<Rc<dyn ContainerObserver>>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, observer: Rc<dyn ContainerObserver>) {
        Rc::make_mut(&mut self.observers).push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    pub(crate) fn resolving(&self, container: &Container, slot: &Slot) {
        for observer in self.observers.iter() {
            observer.resolving(container, slot);
        }
    }

    pub(crate) fn resolved(&self, container: &Container, slot: &Slot, duration: Duration) {
        for observer in self.observers.iter() {
            observer.resolved(container, slot, duration);
        }
    }

    pub(crate) fn failed(&self, container: &Container, slot: &Slot, error: &DiError) {
        for observer in self.observers.iter() {
            observer.failed(container, slot, error);
        }
    }

    pub(crate) fn disposed(&self, container: &Container) {
        for observer in self.observers.iter() {
            observer.disposed(container);
        }
    }
}

/// Built-in observer forwarding events to `tracing`.
///
/// # Examples
///
/// ```
/// use arbor_di::{Container, TracingObserver};
/// use std::rc::Rc;
///
/// let container = Container::new();
/// container.add_observer(Rc::new(TracingObserver::new()));
/// ```
pub struct TracingObserver {
    prefix: String,
}

impl TracingObserver {
    /// Creates a tracing observer with the default prefix.
    pub fn new() -> Self {
        Self {
            prefix: "[arbor-di]".to_string(),
        }
    }

    /// Creates a tracing observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerObserver for TracingObserver {
    fn resolving(&self, container: &Container, slot: &Slot) {
        tracing::debug!(prefix = %self.prefix, container = %container.path(), slot = %slot, "resolving");
    }

    fn resolved(&self, container: &Container, slot: &Slot, duration: Duration) {
        tracing::debug!(
            prefix = %self.prefix,
            container = %container.path(),
            slot = %slot,
            ?duration,
            "resolved"
        );
    }

    fn failed(&self, container: &Container, slot: &Slot, error: &DiError) {
        tracing::warn!(prefix = %self.prefix, container = %container.path(), slot = %slot, %error, "resolution failed");
    }

    fn disposed(&self, container: &Container) {
        tracing::info!(prefix = %self.prefix, container = %container.path(), "disposed");
    }
}
