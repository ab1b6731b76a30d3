//! # arbor-di
//!
//! Hierarchical dependency injection for single-threaded Rust applications.
//!
//! ## Features
//!
//! - **Container tree**: children see their ancestors' bindings; parents own
//!   their children and dispose them first
//! - **Three scopes**: Transient, Scoped (one per resolving container) and
//!   Singleton (one per registering container and its subtree)
//! - **Flexible identifiers**: names, numbers, symbols or types, each with an
//!   optional secondary key
//! - **Declared injection**: constructor, property and method injection
//!   points recorded in a metadata store and applied by auto-wiring
//! - **Circular dependency detection**: reported as an error with the path
//!
//! ## Quick Start
//!
//! ```rust
//! use arbor_di::{Container, Scope};
//! use std::rc::Rc;
//!
//! struct Database {
//!     connection_string: String,
//! }
//!
//! struct UserService {
//!     db: Rc<Database>,
//! }
//!
//! let container = Container::new();
//! container
//!     .register_instance(
//!         Database { connection_string: "postgres://localhost".to_string() },
//!         "database",
//!     )
//!     .unwrap();
//! container
//!     .register(
//!         "users",
//!         |c| Ok(UserService { db: c.resolve("database")? }),
//!         Scope::Transient,
//!     )
//!     .unwrap();
//!
//! let users = container.resolve::<UserService>("users").unwrap();
//! assert_eq!(users.db.connection_string, "postgres://localhost");
//! ```
//!
//! ## Scopes
//!
//! - **Transient**: created fresh on every resolution
//! - **Scoped**: created once per container that resolves it
//! - **Singleton**: created once by the registering container, shared with
//!   all of its descendants
//!
//! ## Declared Injection
//!
//! ```rust
//! use arbor_di::{Container, Declaration, Injectable, Scope};
//! use std::rc::Rc;
//!
//! struct Report {
//!     title: Rc<String>,
//!     footer: Option<Rc<String>>,
//!     pages: u32,
//! }
//!
//! impl Injectable for Report {
//!     fn declare(declaration: &mut Declaration<Self>) {
//!         declaration
//!             .constructor(["title"], |args| {
//!                 Ok(Report { title: args.get(0)?, footer: None, pages: 0 })
//!             })
//!             .property("footer", "footer", |r: &mut Report, v| r.footer = v)
//!             .method("paginate", ["pages"], |r: &mut Report, args| {
//!                 r.pages = *args.get::<u32>(0)?;
//!                 Ok(())
//!             });
//!     }
//! }
//!
//! let container = Container::new();
//! container.metadata().register::<Report>();
//! container.register_instance(String::from("Q3"), "title").unwrap();
//! container.register_instance(String::from("confidential"), "footer").unwrap();
//! container.register_instance(12u32, "pages").unwrap();
//! container.register_constructed::<Report>("report", Scope::Transient).unwrap();
//!
//! let report = container.resolve::<Report>("report").unwrap();
//! assert_eq!(report.title.as_str(), "Q3");
//! assert_eq!(report.footer.as_deref().map(String::as_str), Some("confidential"));
//! assert_eq!(report.pages, 12);
//! ```

// Module declarations
pub mod arguments;
pub mod container;
pub mod declaration;
pub mod descriptors;
pub mod error;
pub mod key;
pub mod metadata;
pub mod observer;
pub mod options;
pub mod scope;
pub mod snapshot;
pub mod traits;

// Internal modules
mod internal;
mod registration;

// Re-exports
pub use arguments::Arguments;
pub use container::Container;
pub use declaration::{Declaration, Injectable};
pub use descriptors::Dependency;
pub use error::{DiError, DiResult};
pub use key::{Identifier, Key, Slot, Symbol};
pub use metadata::{InjectMetadata, MetadataRef, MetadataStore};
pub use observer::{ContainerObserver, TracingObserver};
pub use options::{ContainerOptions, DEFAULT_MAX_DEPTH};
pub use registration::Instance;
pub use scope::Scope;
pub use snapshot::{BindingInfo, ContainerSnapshot};
pub use traits::Dispose;
