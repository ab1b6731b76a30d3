//! Container disposal.

use std::rc::{Rc, Weak};

use super::{Container, ContainerInner};

impl Container {
    /// Disposes this container and its subtree.
    ///
    /// Children are disposed first, in creation order. Then every cached
    /// instance with a disposal capability is disposed, both tables are
    /// cleared and the link to the parent is dropped. Calling it again is a
    /// no-op; registration and resolution fail with
    /// [`DiError::Disposed`](crate::DiError::Disposed) afterwards.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_di::Container;
    ///
    /// let root = Container::new();
    /// let child = root.create_child();
    /// root.register_singleton("answer", |_| Ok(42u32)).unwrap();
    /// child.resolve::<u32>("answer").unwrap();
    ///
    /// root.dispose();
    /// assert!(child.is_disposed());
    /// assert_eq!(root.instance_count(), 0);
    /// assert_eq!(root.child_count(), 0);
    ///
    /// root.dispose();
    /// ```
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }

        let children = std::mem::take(&mut *self.inner.children.borrow_mut());
        for child in &children {
            child.dispose();
        }

        let entries = self.inner.registry.borrow_mut().take_instances();
        let mut released = 0usize;
        for entry in &entries {
            if let Some(disposer) = &entry.disposer {
                disposer();
                released += 1;
            }
        }
        drop(entries);
        self.inner.registry.borrow_mut().clear();

        tracing::debug!(
            container = %self.path(),
            children = children.len(),
            released,
            "container disposed"
        );
        let observers = self.inner.observers.borrow().clone();
        observers.disposed(self);

        self.detach();
    }

    /// Returns `true` once [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    fn detach(&self) {
        if let Some(parent) = self.parent() {
            parent
                .inner
                .children
                .borrow_mut()
                .retain(|child| !Rc::ptr_eq(&child.inner, &self.inner));
        }
        *self.inner.parent.borrow_mut() = Weak::new();
    }
}

impl Drop for ContainerInner {
    fn drop(&mut self) {
        if !self.disposed.get() && self.registry.borrow().has_disposers() {
            tracing::warn!(
                container = self.id,
                "container dropped without dispose(); disposable instances were not released"
            );
        }
    }
}
