//! Per-class injection metadata and the store that owns it.
//!
//! Records are keyed by the `TypeId` of the class they describe. The store
//! never holds values of the described type, so an attached record cannot
//! keep any instance alive.

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use crate::arguments::Arguments;
use crate::declaration::{Declaration, Injectable};
use crate::descriptors::Dependency;
use crate::error::DiResult;
use crate::registration::{Instance, Map};

/// Shared handle to the record of `T`.
pub type MetadataRef<T> = Rc<RefCell<InjectMetadata<T>>>;

pub(crate) type Constructor<T> = Rc<dyn Fn(&Arguments) -> DiResult<T>>;
pub(crate) type Assign<T> = Rc<dyn Fn(&mut T, Option<Instance>) -> DiResult<()>>;
pub(crate) type Invoke<T> = Rc<dyn Fn(&mut T, &Arguments) -> DiResult<()>>;

pub(crate) struct PropertyInjection<T> {
    pub(crate) dependency: Dependency,
    pub(crate) assign: Assign<T>,
}

impl<T> Clone for PropertyInjection<T> {
    fn clone(&self) -> Self {
        Self {
            dependency: self.dependency.clone(),
            assign: Rc::clone(&self.assign),
        }
    }
}

pub(crate) struct MethodInjection<T> {
    pub(crate) dependencies: Vec<Dependency>,
    pub(crate) invoke: Invoke<T>,
}

impl<T> Clone for MethodInjection<T> {
    fn clone(&self) -> Self {
        Self {
            dependencies: self.dependencies.clone(),
            invoke: Rc::clone(&self.invoke),
        }
    }
}

/// Declared injection points of one class.
///
/// Holds the ordered constructor dependencies together with the constructor
/// callable, the property bindings and the method bindings, each stored with
/// the callable that applies it.
pub struct InjectMetadata<T> {
    pub(crate) constructor: Vec<Dependency>,
    pub(crate) construct: Option<Constructor<T>>,
    pub(crate) properties: Vec<(Cow<'static, str>, PropertyInjection<T>)>,
    pub(crate) methods: Vec<(Cow<'static, str>, MethodInjection<T>)>,
    pub(crate) dispose_hook: Option<fn(&T)>,
}

impl<T> InjectMetadata<T> {
    fn new() -> Self {
        Self {
            constructor: Vec::new(),
            construct: None,
            properties: Vec::new(),
            methods: Vec::new(),
            dispose_hook: None,
        }
    }

    /// Declared constructor dependencies, in argument order.
    pub fn constructor_dependencies(&self) -> &[Dependency] {
        &self.constructor
    }

    /// Returns `true` if a constructor callable was declared.
    pub fn has_constructor(&self) -> bool {
        self.construct.is_some()
    }

    /// Dependency declared for property `name`.
    pub fn property(&self, name: &str) -> Option<&Dependency> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| &p.dependency)
    }

    /// Declared property names, in first-declaration order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|(n, _)| n.as_ref())
    }

    /// Dependencies declared for method `name`.
    pub fn method(&self, name: &str) -> Option<&[Dependency]> {
        self.methods
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, m)| m.dependencies.as_slice())
    }

    /// Declared method names, in first-declaration order.
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(|(n, _)| n.as_ref())
    }

    /// Returns `true` if instances of `T` expose disposal.
    pub fn is_disposable(&self) -> bool {
        self.dispose_hook.is_some()
    }

    /// Returns `true` if no injection point or capability is declared.
    pub fn is_empty(&self) -> bool {
        self.constructor.is_empty()
            && self.construct.is_none()
            && self.properties.is_empty()
            && self.methods.is_empty()
            && self.dispose_hook.is_none()
    }

    pub(crate) fn set_constructor(&mut self, dependencies: Vec<Dependency>, construct: Constructor<T>) {
        self.constructor = dependencies;
        self.construct = Some(construct);
    }

    pub(crate) fn set_property(&mut self, name: Cow<'static, str>, injection: PropertyInjection<T>) {
        upsert(&mut self.properties, name, injection);
    }

    pub(crate) fn set_method(&mut self, name: Cow<'static, str>, injection: MethodInjection<T>) {
        upsert(&mut self.methods, name, injection);
    }
}

impl<T> fmt::Debug for InjectMetadata<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectMetadata")
            .field("type", &std::any::type_name::<T>())
            .field("constructor", &self.constructor)
            .field("properties", &self.property_names().collect::<Vec<_>>())
            .field("methods", &self.method_names().collect::<Vec<_>>())
            .field("disposable", &self.is_disposable())
            .finish()
    }
}

// Last write wins, position of the first declaration is kept.
fn upsert<V>(entries: &mut Vec<(Cow<'static, str>, V)>, name: Cow<'static, str>, value: V) {
    if let Some(pos) = entries.iter().position(|(n, _)| *n == name) {
        entries[pos].1 = value;
    } else {
        entries.push((name, value));
    }
}

/// Store of injection metadata records, one per class.
///
/// A container tree shares one store; declarations made through it are
/// visible to every container of the tree.
///
/// # Examples
///
/// ```rust
/// use arbor_di::MetadataStore;
/// use std::rc::Rc;
///
/// struct Service;
///
/// let store = MetadataStore::new();
/// assert!(store.get_if_exists::<Service>().is_none());
///
/// let first = store.get_or_create::<Service>();
/// let second = store.get_or_create::<Service>();
/// assert!(Rc::ptr_eq(&first, &second));
/// assert!(store.get_if_exists::<Service>().is_some());
/// ```
#[derive(Default)]
pub struct MetadataStore {
    records: RefCell<Map<TypeId, Rc<dyn Any>>>,
    declared: RefCell<HashSet<TypeId>>,
}

impl MetadataStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record for `T`, created empty and attached if missing.
    pub fn get_or_create<T: 'static>(&self) -> MetadataRef<T> {
        let mut records = self.records.borrow_mut();
        let record = Rc::clone(
            records
                .entry(TypeId::of::<T>())
                .or_insert_with(|| Rc::new(RefCell::new(InjectMetadata::<T>::new())) as Rc<dyn Any>),
        );
        drop(records);
        downcast_record(record)
    }

    /// Record for `T` if one was attached. Never creates.
    pub fn get_if_exists<T: 'static>(&self) -> Option<MetadataRef<T>> {
        let record = self.records.borrow().get(&TypeId::of::<T>()).cloned()?;
        Some(downcast_record(record))
    }

    /// Returns `true` if a record is attached for `T`.
    pub fn contains<T: 'static>(&self) -> bool {
        self.records.borrow().contains_key(&TypeId::of::<T>())
    }

    /// Number of attached records.
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    /// Returns `true` if no record is attached.
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    /// Starts declaring injection points of `T`.
    pub fn declare<T: 'static>(&self) -> Declaration<T> {
        Declaration::new(self.get_or_create::<T>())
    }

    /// Runs the static declaration of `T` once; later calls are no-ops.
    pub fn register<T: Injectable>(&self) {
        let first = self.declared.borrow_mut().insert(TypeId::of::<T>());
        if first {
            let mut declaration = self.declare::<T>();
            T::declare(&mut declaration);
            tracing::debug!(class = std::any::type_name::<T>(), "class metadata declared");
        }
    }

    /// Disposal hook declared for `T`.
    pub(crate) fn dispose_hook<T: 'static>(&self) -> Option<fn(&T)> {
        let record = self.get_if_exists::<T>()?;
        let hook = record.borrow().dispose_hook;
        hook
    }
}

impl fmt::Debug for MetadataStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataStore")
            .field("records", &self.len())
            .finish()
    }
}

fn downcast_record<T: 'static>(record: Rc<dyn Any>) -> MetadataRef<T> {
    match record.downcast::<RefCell<InjectMetadata<T>>>() {
        Ok(record) => record,
        // Records are keyed by TypeId::of::<T>()
        Err(_) => unreachable!("metadata record type differs from {}", std::any::type_name::<T>()),
    }
}
