/// Property-based tests for resolution
///
/// These tests check that scope semantics hold for arbitrary tree shapes,
/// identifiers and resolution orders.
use arbor_di::{Container, Scope, Slot};
use proptest::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

struct Produced {
    serial: u32,
}

fn register_counting(container: &Container, slot: Slot, scope: Scope) -> Rc<Cell<u32>> {
    let counter = Rc::new(Cell::new(0));
    let factory_counter = counter.clone();
    container
        .register(
            slot,
            move |_| {
                factory_counter.set(factory_counter.get() + 1);
                Ok(Produced {
                    serial: factory_counter.get(),
                })
            },
            scope,
        )
        .unwrap();
    counter
}

/// Builds a chain of `depth` descendants below `root`.
fn chain(root: &Container, depth: usize) -> Vec<Container> {
    let mut nodes = vec![root.clone()];
    for _ in 0..depth {
        let next = nodes[nodes.len() - 1].create_child();
        nodes.push(next);
    }
    nodes
}

fn scope_strategy() -> impl Strategy<Value = Scope> {
    prop_oneof![Just(Scope::Transient), Just(Scope::Scoped), Just(Scope::Singleton)]
}

proptest! {
    #[test]
    fn singleton_is_produced_once_for_any_resolution_order(
        depth in 0usize..6,
        order in prop::collection::vec(0usize..6, 1..20),
    ) {
        let root = Container::new();
        let nodes = chain(&root, depth);
        let counter = register_counting(&root, Slot::from("svc"), Scope::Singleton);

        let first = nodes[order[0] % nodes.len()].resolve::<Produced>("svc").unwrap();
        for index in order {
            let value = nodes[index % nodes.len()].resolve::<Produced>("svc").unwrap();
            prop_assert!(Rc::ptr_eq(&first, &value));
        }
        prop_assert_eq!(counter.get(), 1);
    }

    #[test]
    fn scoped_is_produced_once_per_resolving_container(
        depth in 0usize..6,
        order in prop::collection::vec(0usize..6, 1..20),
    ) {
        let root = Container::new();
        let nodes = chain(&root, depth);
        let counter = register_counting(&root, Slot::from("svc"), Scope::Scoped);

        let mut touched = std::collections::BTreeSet::new();
        for index in &order {
            let node = &nodes[index % nodes.len()];
            let a = node.resolve::<Produced>("svc").unwrap();
            let b = node.resolve::<Produced>("svc").unwrap();
            prop_assert!(Rc::ptr_eq(&a, &b));
            touched.insert(index % nodes.len());
        }
        prop_assert_eq!(counter.get() as usize, touched.len());
    }

    #[test]
    fn transient_is_produced_every_time(
        depth in 0usize..6,
        resolutions in 1usize..20,
    ) {
        let root = Container::new();
        let nodes = chain(&root, depth);
        let counter = register_counting(&root, Slot::from("svc"), Scope::Transient);

        let leaf = &nodes[nodes.len() - 1];
        let mut serials = Vec::new();
        for _ in 0..resolutions {
            serials.push(leaf.resolve::<Produced>("svc").unwrap().serial);
        }
        prop_assert_eq!(counter.get() as usize, resolutions);
        prop_assert_eq!(serials, (1..=resolutions as u32).collect::<Vec<_>>());
        prop_assert_eq!(leaf.instance_count(), 0);
    }

    #[test]
    fn distinct_keys_never_interfere(
        keys in prop::collection::btree_set("[a-z]{1,8}", 1..10),
        scope in scope_strategy(),
    ) {
        let container = Container::new();
        for key in &keys {
            let value = key.clone();
            container
                .register(("svc", key.clone()), move |_| Ok(value.clone()), scope)
                .unwrap();
        }

        for key in &keys {
            let resolved = container.resolve::<String>(("svc", key.clone())).unwrap();
            prop_assert_eq!(resolved.as_str(), key.as_str());
        }
        prop_assert!(container.try_resolve::<String>("svc").unwrap().is_none());
    }

    #[test]
    fn unregistered_names_are_absent(name in "\\PC{0,32}") {
        let container = Container::new();
        container.register_instance(0u8, "registered").unwrap();
        prop_assume!(name != "registered");

        prop_assert!(container.try_resolve::<u8>(name.clone()).unwrap().is_none());
        prop_assert!(container.resolve::<u8>(name).unwrap_err().is_not_found());
    }
}
