//! The hierarchical container.
//!
//! A [`Container`] is a node in a tree. It owns its children and refers to its
//! parent weakly, so dropping or disposing a root tears the tree down from the
//! top. Handles are cheap to clone; every clone refers to the same node.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{DiError, DiResult};
use crate::key::{Identifier, Key, Slot};
use crate::metadata::MetadataStore;
use crate::observer::{ContainerObserver, Observers};
use crate::options::ContainerOptions;
use crate::registration::{Entry, FactoryBinding, FactoryFn, Registry};
use crate::scope::Scope;
use crate::traits::Dispose;

mod construct;
mod dispose;
mod resolve;

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

/// Registry and resolver for one node of the container tree.
///
/// # Examples
///
/// ```
/// use arbor_di::{Container, Scope};
/// use std::rc::Rc;
///
/// struct Database {
///     url: String,
/// }
///
/// struct UserService {
///     db: Rc<Database>,
/// }
///
/// let container = Container::new();
/// container
///     .register_instance(Database { url: "postgres://localhost".to_string() }, "db")
///     .unwrap();
/// container
///     .register(
///         "users",
///         |c| Ok(UserService { db: c.resolve::<Database>("db")? }),
///         Scope::Transient,
///     )
///     .unwrap();
///
/// let users = container.resolve::<UserService>("users").unwrap();
/// assert_eq!(users.db.url, "postgres://localhost");
/// ```
#[derive(Clone)]
pub struct Container {
    pub(crate) inner: Rc<ContainerInner>,
}

pub(crate) struct ContainerInner {
    pub(crate) id: u64,
    pub(crate) options: ContainerOptions,
    pub(crate) depth: usize,
    pub(crate) parent: RefCell<Weak<ContainerInner>>,
    pub(crate) children: RefCell<Vec<Container>>,
    pub(crate) registry: RefCell<Registry>,
    pub(crate) metadata: Rc<MetadataStore>,
    pub(crate) observers: RefCell<Observers>,
    pub(crate) disposed: Cell<bool>,
}

impl Container {
    /// Creates a standalone root container with default options.
    pub fn new() -> Self {
        Self::with_options(ContainerOptions::default())
    }

    /// Creates a standalone root container.
    ///
    /// A `max_depth` of zero makes every factory production fail; see
    /// [`ContainerOptions::validate`].
    pub fn with_options(options: ContainerOptions) -> Self {
        Self::with_metadata(Rc::new(MetadataStore::new()), options)
    }

    /// Creates a root container sharing an existing metadata store.
    pub fn with_metadata(metadata: Rc<MetadataStore>, options: ContainerOptions) -> Self {
        let container = Self::build(options, 0, Weak::new(), metadata, Observers::new());
        tracing::debug!(container = %container.path(), "container created");
        container
    }

    /// Creates a child container.
    ///
    /// The child is owned by `self` and disposed with it. It inherits the
    /// metadata store, the observers and the resolution limits.
    ///
    /// A disposed container cannot adopt children: the result is then a
    /// detached root with no ancestors.
    pub fn create_child(&self) -> Container {
        self.spawn_child(None)
    }

    /// Creates a child container with a label used in [`path`](Self::path).
    pub fn create_labeled_child(&self, label: impl Into<String>) -> Container {
        self.spawn_child(Some(label.into()))
    }

    /// Creates a child of `parent`. Same as `parent.create_child()`.
    pub fn child_of(parent: &Container) -> Container {
        parent.create_child()
    }

    fn spawn_child(&self, label: Option<String>) -> Container {
        let options = self.inner.options.for_child(label);
        let metadata = Rc::clone(&self.inner.metadata);
        let observers = self.inner.observers.borrow().clone();

        if self.is_disposed() {
            tracing::warn!(container = %self.path(), "parent is disposed, child created detached");
            return Self::build(options, 0, Weak::new(), metadata, observers);
        }

        let child = Self::build(options, self.inner.depth + 1, Rc::downgrade(&self.inner), metadata, observers);
        self.inner.children.borrow_mut().push(child.clone());
        tracing::debug!(container = %child.path(), "child container created");
        child
    }

    fn build(
        options: ContainerOptions,
        depth: usize,
        parent: Weak<ContainerInner>,
        metadata: Rc<MetadataStore>,
        observers: Observers,
    ) -> Container {
        Container {
            inner: Rc::new(ContainerInner {
                id: NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed),
                options,
                depth,
                parent: RefCell::new(parent),
                children: RefCell::new(Vec::new()),
                registry: RefCell::new(Registry::new()),
                metadata,
                observers: RefCell::new(observers),
                disposed: Cell::new(false),
            }),
        }
    }

    // ----- Registration -----

    /// Registers a pre-built value under `slot`.
    ///
    /// The value is treated as already resolved. It is disposed with the
    /// container if its type declared [`Declaration::disposable`](crate::Declaration::disposable).
    pub fn register_instance<T: 'static>(&self, instance: T, slot: impl Into<Slot>) -> DiResult<()> {
        self.ensure_live()?;
        let hook = self.inner.metadata.dispose_hook::<T>();
        self.insert_instance(slot.into(), Entry::new(instance, hook))
    }

    /// Registers a pre-built value under `(identifier, key)`.
    pub fn register_instance_keyed<T: 'static>(
        &self,
        instance: T,
        identifier: impl Into<Identifier>,
        key: impl Into<Key>,
    ) -> DiResult<()> {
        self.register_instance(instance, Slot::new(identifier, key))
    }

    /// Registers a pre-built value that is disposed with the container.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_di::{Container, Dispose};
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    ///
    /// struct Pool {
    ///     closed: Rc<Cell<bool>>,
    /// }
    ///
    /// impl Dispose for Pool {
    ///     fn dispose(&self) {
    ///         self.closed.set(true);
    ///     }
    /// }
    ///
    /// let closed = Rc::new(Cell::new(false));
    /// let container = Container::new();
    /// container
    ///     .register_disposable_instance(Pool { closed: closed.clone() }, "pool")
    ///     .unwrap();
    ///
    /// container.dispose();
    /// assert!(closed.get());
    /// ```
    pub fn register_disposable_instance<T: Dispose>(&self, instance: T, slot: impl Into<Slot>) -> DiResult<()> {
        self.ensure_live()?;
        let hook: fn(&T) = <T as Dispose>::dispose;
        self.insert_instance(slot.into(), Entry::new(instance, Some(hook)))
    }

    /// Registers an already shared value under `slot`.
    ///
    /// The slot resolves to the same allocation as `instance`. Shared values
    /// are released, never disposed, by the container.
    pub fn register_shared<T: 'static>(&self, instance: Rc<T>, slot: impl Into<Slot>) -> DiResult<()> {
        self.ensure_live()?;
        self.insert_instance(slot.into(), Entry::shared(instance))
    }

    /// Registers a factory producing shared values.
    ///
    /// The returned `Rc` is stored as is, so a factory handing back a value it
    /// resolved elsewhere makes `slot` an alias of that binding. Results are
    /// not auto-wired and not disposed through this binding.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_di::{Container, Scope};
    /// use std::rc::Rc;
    ///
    /// struct SqlStore;
    ///
    /// let container = Container::new();
    /// container.register_singleton("sql", |_| Ok(SqlStore)).unwrap();
    /// container
    ///     .register_rc("store", |c| c.resolve::<SqlStore>("sql"), Scope::Transient)
    ///     .unwrap();
    ///
    /// let store = container.resolve::<SqlStore>("store").unwrap();
    /// assert!(Rc::ptr_eq(&store, &container.resolve::<SqlStore>("sql").unwrap()));
    /// ```
    pub fn register_rc<T, F>(&self, slot: impl Into<Slot>, factory: F, scope: Scope) -> DiResult<()>
    where
        T: 'static,
        F: Fn(&Container) -> DiResult<Rc<T>> + 'static,
    {
        let produce = Rc::new(move |container: &Container| -> DiResult<Entry> {
            factory(container).map(Entry::shared)
        });
        self.insert_factory::<T>(slot.into(), scope, produce)
    }

    /// Makes `alias` resolve to the `T` bound at `target`.
    pub fn register_alias<T: 'static>(
        &self,
        alias: impl Into<Slot>,
        target: impl Into<Slot>,
        scope: Scope,
    ) -> DiResult<()> {
        let target = target.into();
        self.register_rc(alias, move |container| container.resolve::<T>(&target), scope)
    }

    /// Registers a factory under `slot` with the given scope.
    ///
    /// The factory receives the producing container. Its result is auto-wired
    /// before it is shared.
    pub fn register<T, F>(&self, slot: impl Into<Slot>, factory: F, scope: Scope) -> DiResult<()>
    where
        T: 'static,
        F: Fn(&Container) -> DiResult<T> + 'static,
    {
        let produce = Rc::new(move |container: &Container| -> DiResult<Entry> {
            let mut value = factory(container)?;
            container.auto_wire(&mut value)?;
            let hook = container.inner.metadata.dispose_hook::<T>();
            Ok(Entry::new(value, hook))
        });
        self.insert_factory::<T>(slot.into(), scope, produce)
    }

    /// Registers a factory under `(identifier, key)` with the given scope.
    pub fn register_keyed<T, F>(
        &self,
        identifier: impl Into<Identifier>,
        factory: F,
        scope: Scope,
        key: impl Into<Key>,
    ) -> DiResult<()>
    where
        T: 'static,
        F: Fn(&Container) -> DiResult<T> + 'static,
    {
        self.register(Slot::new(identifier, key), factory, scope)
    }

    /// Registers a factory whose cached results are disposed with the container.
    pub fn register_disposable<T, F>(&self, slot: impl Into<Slot>, factory: F, scope: Scope) -> DiResult<()>
    where
        T: Dispose,
        F: Fn(&Container) -> DiResult<T> + 'static,
    {
        let produce = Rc::new(move |container: &Container| -> DiResult<Entry> {
            let mut value = factory(container)?;
            container.auto_wire(&mut value)?;
            let hook: fn(&T) = <T as Dispose>::dispose;
            Ok(Entry::new(value, Some(hook)))
        });
        self.insert_factory::<T>(slot.into(), scope, produce)
    }

    /// Registers a [`Scope::Transient`] factory.
    pub fn register_transient<T, F>(&self, slot: impl Into<Slot>, factory: F) -> DiResult<()>
    where
        T: 'static,
        F: Fn(&Container) -> DiResult<T> + 'static,
    {
        self.register(slot, factory, Scope::Transient)
    }

    /// Registers a [`Scope::Scoped`] factory.
    pub fn register_scoped<T, F>(&self, slot: impl Into<Slot>, factory: F) -> DiResult<()>
    where
        T: 'static,
        F: Fn(&Container) -> DiResult<T> + 'static,
    {
        self.register(slot, factory, Scope::Scoped)
    }

    /// Registers a [`Scope::Singleton`] factory.
    pub fn register_singleton<T, F>(&self, slot: impl Into<Slot>, factory: F) -> DiResult<()>
    where
        T: 'static,
        F: Fn(&Container) -> DiResult<T> + 'static,
    {
        self.register(slot, factory, Scope::Singleton)
    }

    /// Registers `T` built through [`instantiate_class`](Self::instantiate_class).
    ///
    /// Values produced this way get their constructor dependencies from the
    /// declared constructor and are then auto-wired like any factory result.
    pub fn register_class<T: Default + 'static>(&self, slot: impl Into<Slot>, scope: Scope) -> DiResult<()> {
        self.register(slot, |container| container.instantiate_class::<T>(), scope)
    }

    /// Registers `T` built through [`construct_class`](Self::construct_class).
    ///
    /// For classes without a `Default` value. Resolution fails with
    /// [`DiError::NoConstructor`] until a constructor is declared.
    pub fn register_constructed<T: 'static>(&self, slot: impl Into<Slot>, scope: Scope) -> DiResult<()> {
        self.register(slot, |container| container.construct_class::<T>(), scope)
    }

    fn insert_instance(&self, slot: Slot, entry: Entry) -> DiResult<()> {
        let type_name = entry.type_name;
        self.inner.registry.borrow_mut().insert_instance(slot.clone(), entry)?;
        tracing::debug!(container = %self.path(), slot = %slot, type_name, "instance registered");
        Ok(())
    }

    fn insert_factory<T: 'static>(&self, slot: Slot, scope: Scope, factory: FactoryFn) -> DiResult<()> {
        self.ensure_live()?;
        let binding = FactoryBinding {
            scope,
            factory,
            type_name: std::any::type_name::<T>(),
        };
        self.inner.registry.borrow_mut().insert_factory(slot.clone(), binding)?;
        tracing::debug!(container = %self.path(), slot = %slot, %scope, "factory registered");
        Ok(())
    }

    // ----- Tree and introspection -----

    /// Process-unique id of this container.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Options this container was created with.
    pub fn options(&self) -> &ContainerOptions {
        &self.inner.options
    }

    /// Metadata store shared by the whole tree.
    pub fn metadata(&self) -> &Rc<MetadataStore> {
        &self.inner.metadata
    }

    /// Number of ancestors; zero for a root.
    pub fn depth(&self) -> usize {
        self.inner.depth
    }

    /// Parent container, if it is still alive and attached.
    pub fn parent(&self) -> Option<Container> {
        self.inner
            .parent
            .borrow()
            .upgrade()
            .map(|inner| Container { inner })
    }

    /// Owned children in creation order.
    pub fn children(&self) -> Vec<Container> {
        self.inner.children.borrow().clone()
    }

    pub fn child_count(&self) -> usize {
        self.inner.children.borrow().len()
    }

    /// Label of this container.
    ///
    /// Unlabeled roots are `root`; unlabeled children are `#<id>`.
    pub fn label(&self) -> String {
        match &self.inner.options.label {
            Some(label) => label.clone(),
            None if self.inner.depth == 0 => "root".to_string(),
            None => format!("#{}", self.inner.id),
        }
    }

    /// Slash-separated labels from the root down to this container.
    pub fn path(&self) -> String {
        let mut labels = vec![self.label()];
        let mut current = self.parent();
        while let Some(container) = current {
            labels.push(container.label());
            current = container.parent();
        }
        labels.reverse();
        labels.join("/")
    }

    /// Returns `true` if this container's own tables hold `slot`.
    pub fn contains(&self, slot: impl Into<Slot>) -> bool {
        self.inner.registry.borrow().contains(&slot.into())
    }

    pub fn factory_count(&self) -> usize {
        self.inner.registry.borrow().factory_count()
    }

    pub fn instance_count(&self) -> usize {
        self.inner.registry.borrow().instance_count()
    }

    /// Attaches an observer to this container and children created later.
    pub fn add_observer(&self, observer: Rc<dyn ContainerObserver>) {
        self.inner.observers.borrow_mut().add(observer);
    }

    /// Number of observers attached to this container.
    pub fn observer_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }

    /// Returns `true` if both handles refer to the same container.
    pub fn ptr_eq(&self, other: &Container) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn ensure_live(&self) -> DiResult<()> {
        if self.inner.disposed.get() {
            return Err(DiError::Disposed);
        }
        Ok(())
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("path", &self.path())
            .field("factories", &self.factory_count())
            .field("instances", &self.instance_count())
            .field("children", &self.child_count())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
