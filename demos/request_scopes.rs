//! Request scopes demo - one child container per incoming request
//!
//! This example demonstrates:
//! - An application root holding singletons shared by every request
//! - Labeled child containers with their own scoped services
//! - Disposal of request resources when the request finishes
//! - Snapshots of the container tree
//!
//! Run with `RUST_LOG=arbor_di=debug cargo run --example request_scopes`.

use arbor_di::*;
use std::cell::Cell;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

struct ConnectionPool {
    checked_out: Cell<u32>,
}

struct RequestContext {
    request_id: u64,
    pool: Rc<ConnectionPool>,
}

impl Dispose for RequestContext {
    fn dispose(&self) {
        self.pool.checked_out.set(self.pool.checked_out.get() - 1);
        println!("  request {} released its connection", self.request_id);
    }
}

fn main() -> DiResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let app = Container::with_options(ContainerOptions::new().with_label("app"));
    app.register_singleton("pool", |_| {
        Ok(ConnectionPool {
            checked_out: Cell::new(0),
        })
    })?;
    app.register_disposable(
        "context",
        |c| {
            let pool = c.resolve::<ConnectionPool>("pool")?;
            pool.checked_out.set(pool.checked_out.get() + 1);
            Ok(RequestContext {
                request_id: c.id(),
                pool,
            })
        },
        Scope::Scoped,
    )?;

    let requests: Vec<Container> = (1..=3)
        .map(|n| app.create_labeled_child(format!("request-{}", n)))
        .collect();

    for request in &requests {
        let first = request.resolve::<RequestContext>("context")?;
        let again = request.resolve::<RequestContext>("context")?;
        println!(
            "{}: context {} (same within request: {})",
            request.path(),
            first.request_id,
            Rc::ptr_eq(&first, &again)
        );
    }

    let pool = app.resolve::<ConnectionPool>("pool")?;
    println!("Connections checked out: {}", pool.checked_out.get());
    println!("\nContainer tree:\n{}", app.snapshot());

    for request in requests {
        request.dispose();
    }
    println!("Connections checked out after requests: {}", pool.checked_out.get());
    println!("Children left under app: {}", app.child_count());

    app.dispose();
    Ok(())
}
