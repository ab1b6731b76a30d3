//! Resolution through the container tree.

use std::rc::Rc;
use std::time::Instant;

use super::Container;
use crate::arguments::{downcast, Arguments};
use crate::descriptors::Dependency;
use crate::error::{DiError, DiResult};
use crate::internal::ResolutionGuard;
use crate::key::{Identifier, Key, Slot};
use crate::registration::{Entry, FactoryBinding, Instance};
use crate::scope::Scope;

impl Container {
    /// Resolves `slot` as a `T`, failing with `NotFound` if nothing is bound.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_di::{Container, DiError, Scope, Slot};
    ///
    /// let container = Container::new();
    /// container.register("answer", |_| Ok(42u32), Scope::Singleton).unwrap();
    ///
    /// assert_eq!(*container.resolve::<u32>("answer").unwrap(), 42);
    /// assert_eq!(
    ///     container.resolve::<u32>(("answer", "other")),
    ///     Err(DiError::NotFound(Slot::from(("answer", "other"))))
    /// );
    /// ```
    pub fn resolve<T: 'static>(&self, slot: impl Into<Slot>) -> DiResult<Rc<T>> {
        let slot = slot.into();
        match self.resolve_observed(&slot, true)? {
            Some(value) => downcast(&slot, value),
            None => Err(DiError::NotFound(slot)),
        }
    }

    /// Resolves `(identifier, key)` as a `T`.
    pub fn resolve_keyed<T: 'static>(&self, identifier: impl Into<Identifier>, key: impl Into<Key>) -> DiResult<Rc<T>> {
        self.resolve(Slot::new(identifier, key))
    }

    /// Resolves `slot` as a `T`, yielding `None` if nothing is bound.
    ///
    /// Other failures, such as a failing factory, are still errors.
    pub fn try_resolve<T: 'static>(&self, slot: impl Into<Slot>) -> DiResult<Option<Rc<T>>> {
        let slot = slot.into();
        self.resolve_observed(&slot, false)?
            .map(|value| downcast(&slot, value))
            .transpose()
    }

    /// Resolves `(identifier, key)` as a `T`, yielding `None` if nothing is bound.
    pub fn try_resolve_keyed<T: 'static>(
        &self,
        identifier: impl Into<Identifier>,
        key: impl Into<Key>,
    ) -> DiResult<Option<Rc<T>>> {
        self.try_resolve(Slot::new(identifier, key))
    }

    /// Untyped resolution.
    ///
    /// With `throw_if_missing` an unbound slot is `NotFound`; without it the
    /// result is `Ok(None)`.
    pub fn resolve_any(&self, slot: impl Into<Slot>, throw_if_missing: bool) -> DiResult<Option<Instance>> {
        self.resolve_observed(&slot.into(), throw_if_missing)
    }

    /// Resolves one descriptor, honouring its `required` flag.
    pub fn resolve_dependency(&self, dependency: &Dependency) -> DiResult<Option<Instance>> {
        self.resolve_observed(&dependency.slot(), dependency.required)
    }

    /// Resolves descriptors in order into positional arguments.
    pub fn resolve_arguments(&self, dependencies: &[Dependency]) -> DiResult<Arguments> {
        let mut arguments = Arguments::new();
        for dependency in dependencies {
            let value = self.resolve_dependency(dependency)?;
            arguments.push(dependency.slot(), value);
        }
        Ok(arguments)
    }

    /// Returns `true` if resolving `slot` here would find a binding.
    ///
    /// Nothing is produced; the ancestor chain is inspected the same way
    /// resolution walks it.
    pub fn can_resolve(&self, slot: impl Into<Slot>) -> bool {
        let slot = slot.into();
        if self.find_scoped_or_transient(&slot).is_some() {
            return true;
        }

        let mut current = Some(self.clone());
        while let Some(container) = current {
            if container.contains(&slot) {
                return true;
            }
            current = container.parent();
        }
        false
    }

    fn resolve_observed(&self, slot: &Slot, throw_if_missing: bool) -> DiResult<Option<Instance>> {
        self.ensure_live()?;

        let observers = self.inner.observers.borrow().clone();
        if !observers.has_observers() {
            return self.lookup(slot, throw_if_missing);
        }

        observers.resolving(self, slot);
        let start = Instant::now();
        let result = self.lookup(slot, throw_if_missing);
        match &result {
            Ok(Some(_)) => observers.resolved(self, slot, start.elapsed()),
            Ok(None) => {}
            Err(error) => observers.failed(self, slot, error),
        }
        result
    }

    fn lookup(&self, slot: &Slot, throw_if_missing: bool) -> DiResult<Option<Instance>> {
        match self.resolve_slot(slot, true)? {
            Some(value) => Ok(Some(value)),
            None if throw_if_missing => Err(DiError::NotFound(slot.clone())),
            None => Ok(None),
        }
    }

    /// One resolution step at this container.
    ///
    /// `walk_ancestors` is only granted to the container where resolution
    /// started; parents reached by delegation consult their own tables only,
    /// which is what pins singletons to their registering container.
    fn resolve_slot(&self, slot: &Slot, walk_ancestors: bool) -> DiResult<Option<Instance>> {
        let cached = self
            .inner
            .registry
            .borrow()
            .instance(slot)
            .map(|entry| Rc::clone(&entry.value));
        if let Some(value) = cached {
            tracing::trace!(container = %self.path(), slot = %slot, "cached instance");
            return Ok(Some(value));
        }

        if walk_ancestors {
            if let Some(binding) = self.find_scoped_or_transient(slot) {
                tracing::trace!(container = %self.path(), slot = %slot, scope = %binding.scope, "ancestor factory");
                let entry = self.create_instance(slot, &binding)?;
                let value = Rc::clone(&entry.value);
                if binding.scope == Scope::Scoped {
                    self.cache(slot, entry)?;
                }
                return Ok(Some(value));
            }
        }

        let own = self.inner.registry.borrow().factory(slot).cloned();
        if let Some(binding) = own {
            tracing::trace!(container = %self.path(), slot = %slot, scope = %binding.scope, "own factory");
            let entry = self.create_instance(slot, &binding)?;
            let value = Rc::clone(&entry.value);
            if binding.scope.is_cached() {
                self.cache(slot, entry)?;
            }
            return Ok(Some(value));
        }

        match self.parent() {
            Some(parent) => {
                tracing::trace!(container = %self.path(), slot = %slot, "delegating to parent");
                parent.resolve_slot(slot, false)
            }
            None => Ok(None),
        }
    }

    /// First transient or scoped factory for `slot` from here to the root.
    fn find_scoped_or_transient(&self, slot: &Slot) -> Option<FactoryBinding> {
        let mut current = Some(self.clone());
        while let Some(container) = current {
            let found = container
                .inner
                .registry
                .borrow()
                .factory(slot)
                .filter(|binding| binding.scope.walks_ancestors())
                .cloned();
            if found.is_some() {
                return found;
            }
            current = container.parent();
        }
        None
    }

    /// Runs a factory with `self` as the producing container.
    fn create_instance(&self, slot: &Slot, binding: &FactoryBinding) -> DiResult<Entry> {
        let options = &self.inner.options;
        let _guard = ResolutionGuard::enter(self.inner.id, slot, options.max_depth, options.detect_cycles)?;
        (binding.factory)(self)
    }

    fn cache(&self, slot: &Slot, entry: Entry) -> DiResult<()> {
        self.inner.registry.borrow_mut().insert_instance(slot.clone(), entry)
    }
}
