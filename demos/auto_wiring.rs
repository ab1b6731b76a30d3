//! Auto-wiring demo - declared injection points resolved by the container
//!
//! This example demonstrates:
//! - Constructor, property and method injection declared through `Injectable`
//! - Optional dependencies that stay unset when nothing is bound
//! - Class registration with `register_constructed` for a type without `Default`
//! - Observing resolutions through `TracingObserver`
//!
//! Run with `RUST_LOG=debug cargo run --example auto_wiring` to see the trace.

use arbor_di::*;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

struct Database {
    url: String,
}

struct AuditLog {
    target: String,
}

struct UserService {
    database: Rc<Database>,
    audit: Option<Rc<AuditLog>>,
    cache_size: usize,
}

impl Injectable for UserService {
    fn declare(declaration: &mut Declaration<Self>) {
        declaration
            .constructor(["database"], |args| {
                Ok(UserService {
                    database: args.get(0)?,
                    audit: None,
                    cache_size: 0,
                })
            })
            .property(
                "audit",
                Dependency::from("audit").optional(),
                |service: &mut UserService, audit: Option<Rc<AuditLog>>| service.audit = audit,
            )
            .method("configure", [Dependency::from("cache-size").optional()], |service: &mut UserService, args| {
                service.cache_size = args.optional::<usize>(0)?.map_or(16, |size| *size);
                Ok(())
            });
    }
}

impl UserService {
    fn describe(&self) -> String {
        format!(
            "db={} audit={} cache={}",
            self.database.url,
            self.audit.as_ref().map_or("<none>", |log| log.target.as_str()),
            self.cache_size,
        )
    }
}

fn main() -> DiResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let container = Container::new();
    container.add_observer(Rc::new(TracingObserver::new()));
    container.metadata().register::<UserService>();

    container.register_singleton("database", |_| {
        Ok(Database {
            url: String::from("postgres://localhost/app"),
        })
    })?;
    container.register_constructed::<UserService>("users", Scope::Transient)?;

    println!("Without audit log:");
    println!("  {}", container.resolve::<UserService>("users")?.describe());

    container.register_instance(
        AuditLog {
            target: String::from("stdout"),
        },
        "audit",
    )?;
    container.register_instance(128usize, "cache-size")?;

    println!("With audit log and cache size:");
    println!("  {}", container.resolve::<UserService>("users")?.describe());

    let first = container.resolve::<UserService>("users")?;
    let second = container.resolve::<UserService>("users")?;
    println!(
        "Transient services are distinct: {}, database is shared: {}",
        !Rc::ptr_eq(&first, &second),
        Rc::ptr_eq(&first.database, &second.database)
    );

    container.dispose();
    Ok(())
}
