//! Declaration of injection points.
//!
//! A class states what it wants injected either through a [`Declaration`]
//! obtained from [`MetadataStore::declare`](crate::MetadataStore::declare),
//! or by implementing [`Injectable`] and letting
//! [`MetadataStore::register`](crate::MetadataStore::register) run its
//! declaration once.

use std::any::Any;
use std::borrow::Cow;
use std::rc::Rc;

use crate::arguments::{downcast, Arguments};
use crate::descriptors::Dependency;
use crate::error::DiResult;
use crate::metadata::{MetadataRef, MethodInjection, PropertyInjection};
use crate::registration::Instance;
use crate::traits::Dispose;

/// Builder writing injection points of `T` into its metadata record.
///
/// Every form overwrites what was previously declared under the same name;
/// nothing is validated.
///
/// # Examples
///
/// ```rust
/// use arbor_di::{Container, Dependency, Scope};
/// use std::rc::Rc;
///
/// #[derive(Default)]
/// struct Mailer {
///     transport: Rc<String>,
///     sender: Option<Rc<String>>,
///     retries: u32,
/// }
///
/// let container = Container::new();
/// container
///     .metadata()
///     .declare::<Mailer>()
///     .constructor(["transport"], |args| {
///         Ok(Mailer { transport: args.get::<String>(0)?, ..Mailer::default() })
///     })
///     .property("sender", Dependency::from("sender").optional(), |m: &mut Mailer, v: Option<Rc<String>>| {
///         m.sender = v;
///     })
///     .method("configure", ["retries"], |m: &mut Mailer, args| {
///         m.retries = *args.get::<u32>(0)?;
///         Ok(())
///     });
///
/// container.register_instance(String::from("smtp"), "transport").unwrap();
/// container.register_instance(3u32, "retries").unwrap();
/// container.register_class::<Mailer>("mailer", Scope::Singleton).unwrap();
///
/// let mailer = container.resolve::<Mailer>("mailer").unwrap();
/// assert_eq!(mailer.transport.as_str(), "smtp");
/// assert!(mailer.sender.is_none());
/// assert_eq!(mailer.retries, 3);
/// ```
pub struct Declaration<T> {
    record: MetadataRef<T>,
}

impl<T: 'static> Declaration<T> {
    pub(crate) fn new(record: MetadataRef<T>) -> Self {
        Self { record }
    }

    /// Declares the constructor dependencies and the constructor itself.
    ///
    /// The constructor receives the resolved values in declaration order.
    pub fn constructor<I, F>(&mut self, dependencies: I, construct: F) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Dependency>,
        F: Fn(&Arguments) -> DiResult<T> + 'static,
    {
        let dependencies = dependencies.into_iter().map(Into::into).collect();
        self.record
            .borrow_mut()
            .set_constructor(dependencies, Rc::new(construct));
        self
    }

    /// Declares property `name`, filled from `dependency` by `assign`.
    ///
    /// `assign` receives `None` when an optional dependency is unbound.
    pub fn property<V, F>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        dependency: impl Into<Dependency>,
        assign: F,
    ) -> &mut Self
    where
        V: Any,
        F: Fn(&mut T, Option<Rc<V>>) + 'static,
    {
        let dependency = dependency.into();
        let slot = dependency.slot();
        let injection = PropertyInjection {
            dependency,
            assign: Rc::new(move |target: &mut T, value: Option<Instance>| {
                let value = value.map(|value| downcast::<V>(&slot, value)).transpose()?;
                assign(target, value);
                Ok(())
            }),
        };
        self.record.borrow_mut().set_property(name.into(), injection);
        self
    }

    /// Declares method `name`, invoked once with the resolved dependencies.
    pub fn method<I, F>(&mut self, name: impl Into<Cow<'static, str>>, dependencies: I, invoke: F) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Dependency>,
        F: Fn(&mut T, &Arguments) -> DiResult<()> + 'static,
    {
        let injection = MethodInjection {
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            invoke: Rc::new(invoke),
        };
        self.record.borrow_mut().set_method(name.into(), injection);
        self
    }

    /// Handle to the record being written.
    pub fn record(&self) -> &MetadataRef<T> {
        &self.record
    }
}

impl<T: Default + 'static> Declaration<T> {
    /// Declares `T::default()` as a constructor without dependencies.
    pub fn default_constructor(&mut self) -> &mut Self {
        self.record
            .borrow_mut()
            .set_constructor(Vec::new(), Rc::new(|_: &Arguments| -> DiResult<T> { Ok(T::default()) }));
        self
    }
}

impl<T: Dispose> Declaration<T> {
    /// Declares that cached instances of `T` are disposed with their container.
    pub fn disposable(&mut self) -> &mut Self {
        let hook: fn(&T) = <T as Dispose>::dispose;
        self.record.borrow_mut().dispose_hook = Some(hook);
        self
    }
}

/// Static, once-per-class declaration of injection points.
///
/// # Examples
///
/// ```rust
/// use arbor_di::{Container, Declaration, Injectable, Scope};
/// use std::rc::Rc;
///
/// #[derive(Default)]
/// struct Greeter {
///     greeting: Rc<String>,
/// }
///
/// impl Injectable for Greeter {
///     fn declare(declaration: &mut Declaration<Self>) {
///         declaration.constructor(["greeting"], |args| {
///             Ok(Greeter { greeting: args.get::<String>(0)? })
///         });
///     }
/// }
///
/// let container = Container::new();
/// container.metadata().register::<Greeter>();
/// container.register_instance(String::from("hello"), "greeting").unwrap();
///
/// let greeter = container.instantiate_class::<Greeter>().unwrap();
/// assert_eq!(greeter.greeting.as_str(), "hello");
/// ```
pub trait Injectable: Sized + 'static {
    /// Writes the injection points of `Self`.
    fn declare(declaration: &mut Declaration<Self>);
}
