//! Construction from declared metadata and auto-wiring.

use super::Container;
use crate::error::{DiError, DiResult};

impl Container {
    /// Builds a `T` from its declared constructor.
    ///
    /// Types without a record, or without a declared constructor, are built
    /// with `T::default()`. Declared properties and methods are not applied;
    /// they are applied when the value comes out of a registered factory,
    /// as with [`register_class`](Self::register_class).
    pub fn instantiate_class<T: Default + 'static>(&self) -> DiResult<T> {
        Ok(self.construct_declared::<T>()?.unwrap_or_default())
    }

    /// Builds a `T` from its declared constructor, which must exist.
    ///
    /// Unlike [`instantiate_class`](Self::instantiate_class) there is no
    /// fallback, so `T` need not implement `Default`.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_di::{Container, DiError};
    /// use std::rc::Rc;
    ///
    /// struct Database {
    ///     url: String,
    /// }
    ///
    /// struct Repo {
    ///     db: Rc<Database>,
    /// }
    ///
    /// let container = Container::new();
    /// assert!(matches!(container.construct_class::<Repo>(), Err(DiError::NoConstructor(_))));
    ///
    /// container
    ///     .metadata()
    ///     .declare::<Repo>()
    ///     .constructor(["db"], |args| Ok(Repo { db: args.get(0)? }));
    /// container
    ///     .register_instance(Database { url: "sqlite::memory:".into() }, "db")
    ///     .unwrap();
    ///
    /// let repo = container.construct_class::<Repo>().unwrap();
    /// assert_eq!(repo.db.url, "sqlite::memory:");
    /// ```
    pub fn construct_class<T: 'static>(&self) -> DiResult<T> {
        self.construct_declared::<T>()?
            .ok_or(DiError::NoConstructor(std::any::type_name::<T>()))
    }

    /// Runs the declared constructor of `T`, if any.
    fn construct_declared<T: 'static>(&self) -> DiResult<Option<T>> {
        self.ensure_live()?;

        let record = match self.inner.metadata.get_if_exists::<T>() {
            Some(record) => record,
            None => return Ok(None),
        };

        let (dependencies, construct) = {
            let record = record.borrow();
            (record.constructor.clone(), record.construct.clone())
        };

        let construct = match construct {
            Some(construct) => construct,
            None => return Ok(None),
        };
        let arguments = self.resolve_arguments(&dependencies)?;
        tracing::trace!(
            class = std::any::type_name::<T>(),
            arguments = arguments.len(),
            "constructing"
        );
        construct(&arguments).map(Some)
    }

    /// Applies the declared properties, then the declared methods, of `T`.
    ///
    /// Each property is resolved with its descriptor's `required` flag and
    /// handed to its setter. Each method is invoked once with its resolved
    /// arguments, in declaration order. Types without a record are left
    /// untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_di::{Container, Dependency};
    /// use std::rc::Rc;
    ///
    /// #[derive(Default)]
    /// struct Handler {
    ///     name: Option<Rc<String>>,
    ///     fallback: Option<Rc<String>>,
    /// }
    ///
    /// let container = Container::new();
    /// container
    ///     .metadata()
    ///     .declare::<Handler>()
    ///     .property("name", "name", |h: &mut Handler, v: Option<Rc<String>>| h.name = v)
    ///     .property(
    ///         "fallback",
    ///         Dependency::from("fallback").optional(),
    ///         |h: &mut Handler, v: Option<Rc<String>>| h.fallback = v,
    ///     );
    /// container.register_instance(String::from("index"), "name").unwrap();
    ///
    /// let mut handler = Handler::default();
    /// container.auto_wire(&mut handler).unwrap();
    /// assert_eq!(handler.name.as_deref().map(String::as_str), Some("index"));
    /// assert!(handler.fallback.is_none());
    /// ```
    pub fn auto_wire<T: 'static>(&self, target: &mut T) -> DiResult<()> {
        self.ensure_live()?;

        let record = match self.inner.metadata.get_if_exists::<T>() {
            Some(record) => record,
            None => return Ok(()),
        };

        // Cloned out so setters and methods may touch the store
        let (properties, methods) = {
            let record = record.borrow();
            (record.properties.clone(), record.methods.clone())
        };

        for (name, property) in properties {
            let value = self.resolve_dependency(&property.dependency)?;
            tracing::trace!(class = std::any::type_name::<T>(), property = %name, "injecting property");
            (property.assign)(&mut *target, value)?;
        }

        for (name, method) in methods {
            let arguments = self.resolve_arguments(&method.dependencies)?;
            tracing::trace!(class = std::any::type_name::<T>(), method = %name, "invoking method");
            (method.invoke)(&mut *target, &arguments)?;
        }

        Ok(())
    }
}
