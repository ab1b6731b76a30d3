//! Disposal trait for resource cleanup.

/// Trait for synchronous resource disposal.
///
/// Implement this trait for values that need structured teardown (flushing
/// caches, closing connections). A cached instance is disposed when the
/// container holding it is disposed, provided its type declared the
/// capability through [`Declaration::disposable`](crate::Declaration::disposable)
/// or it was registered with
/// [`Container::register_disposable_instance`](crate::Container::register_disposable_instance).
///
/// # Examples
///
/// ```
/// use arbor_di::{Container, Dispose, Scope};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// struct Cache {
///     flushed: Rc<Cell<bool>>,
/// }
///
/// impl Dispose for Cache {
///     fn dispose(&self) {
///         self.flushed.set(true);
///     }
/// }
///
/// let flushed = Rc::new(Cell::new(false));
/// let container = Container::new();
/// container
///     .register_disposable_instance(Cache { flushed: flushed.clone() }, "cache")
///     .unwrap();
///
/// container.dispose();
/// assert!(flushed.get());
/// ```
pub trait Dispose: 'static {
    /// Perform synchronous cleanup of resources.
    fn dispose(&self);
}
