//! Binding tables.

use std::any::Any;
use std::rc::Rc;

use crate::container::Container;
use crate::error::{DiError, DiResult};
use crate::key::Slot;
use crate::scope::Scope;

#[cfg(feature = "ahash")]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V, ahash::RandomState>;
#[cfg(not(feature = "ahash"))]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V>;

/// Type-erased shared value held by the container.
pub type Instance = Rc<dyn Any>;

pub(crate) type Disposer = Rc<dyn Fn()>;

pub(crate) type FactoryFn = Rc<dyn Fn(&Container) -> DiResult<Entry>>;

/// A produced or registered value plus its disposal hook, if any.
#[derive(Clone)]
pub(crate) struct Entry {
    pub(crate) value: Instance,
    pub(crate) disposer: Option<Disposer>,
    pub(crate) type_name: &'static str,
}

impl Entry {
    pub(crate) fn new<T: 'static>(value: T, dispose_hook: Option<fn(&T)>) -> Self {
        let value = Rc::new(value);
        let disposer = dispose_hook.map(|hook| {
            let target = Rc::clone(&value);
            Rc::new(move || hook(&target)) as Disposer
        });

        Self {
            value,
            disposer,
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Wraps an already shared value without re-allocating it.
    pub(crate) fn shared<T: 'static>(value: Rc<T>) -> Self {
        Self {
            value,
            disposer: None,
            type_name: std::any::type_name::<T>(),
        }
    }
}

/// Factory binding with its scope.
#[derive(Clone)]
pub(crate) struct FactoryBinding {
    pub(crate) scope: Scope,
    pub(crate) factory: FactoryFn,
    pub(crate) type_name: &'static str,
}

/// Per-container factory and instance tables.
#[derive(Default)]
pub(crate) struct Registry {
    factories: Map<Slot, FactoryBinding>,
    instances: Map<Slot, Entry>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts a factory, failing if the slot is taken in the factory table.
    pub(crate) fn insert_factory(&mut self, slot: Slot, binding: FactoryBinding) -> DiResult<()> {
        if self.factories.contains_key(&slot) {
            return Err(DiError::DuplicateRegistration(slot));
        }
        self.factories.insert(slot, binding);
        Ok(())
    }

    /// Inserts an instance, failing if the slot is taken in the instance table.
    pub(crate) fn insert_instance(&mut self, slot: Slot, entry: Entry) -> DiResult<()> {
        if self.instances.contains_key(&slot) {
            return Err(DiError::DuplicateRegistration(slot));
        }
        self.instances.insert(slot, entry);
        Ok(())
    }

    #[inline]
    pub(crate) fn factory(&self, slot: &Slot) -> Option<&FactoryBinding> {
        self.factories.get(slot)
    }

    #[inline]
    pub(crate) fn instance(&self, slot: &Slot) -> Option<&Entry> {
        self.instances.get(slot)
    }

    pub(crate) fn contains(&self, slot: &Slot) -> bool {
        self.factories.contains_key(slot) || self.instances.contains_key(slot)
    }

    pub(crate) fn factory_count(&self) -> usize {
        self.factories.len()
    }

    pub(crate) fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub(crate) fn factories(&self) -> impl Iterator<Item = (&Slot, &FactoryBinding)> {
        self.factories.iter()
    }

    pub(crate) fn instances(&self) -> impl Iterator<Item = (&Slot, &Entry)> {
        self.instances.iter()
    }

    pub(crate) fn has_disposers(&self) -> bool {
        self.instances.values().any(|entry| entry.disposer.is_some())
    }

    /// Removes and returns every cached instance.
    pub(crate) fn take_instances(&mut self) -> Vec<Entry> {
        self.instances.drain().map(|(_, entry)| entry).collect()
    }

    pub(crate) fn clear(&mut self) {
        self.factories.clear();
        self.instances.clear();
    }
}
