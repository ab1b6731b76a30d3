use arbor_di::{Container, ContainerOptions, DiError, DiResult, Scope, Slot};

fn expect_circular<T: std::fmt::Debug>(result: DiResult<T>, expected_path: &[&'static str]) {
    match result {
        Err(DiError::Circular(path)) => {
            let expected: Vec<Slot> = expected_path.iter().map(|&s| Slot::from(s)).collect();
            assert_eq!(path, expected, "wrong circular path");
        }
        other => panic!("Expected circular dependency error, got {:?}", other),
    }
}

#[test]
fn test_self_circular_dependency() {
    let container = Container::new();
    container
        .register_transient("self", |c| c.resolve::<u8>("self").map(|v| *v))
        .unwrap();

    expect_circular(container.resolve::<u8>("self").map(|v| *v), &["self", "self"]);
}

#[test]
fn test_three_way_cycle() {
    let container = Container::new();
    container.register_transient("a", |c| c.resolve::<u8>("b").map(|v| *v)).unwrap();
    container.register_transient("b", |c| c.resolve::<u8>("c").map(|v| *v)).unwrap();
    container.register_transient("c", |c| c.resolve::<u8>("a").map(|v| *v)).unwrap();

    expect_circular(container.resolve::<u8>("b").map(|v| *v), &["b", "c", "a", "b"]);
}

#[test]
fn test_singleton_cycle_caches_nothing() {
    let container = Container::new();
    container
        .register("s", |c| c.resolve::<u8>("t").map(|v| *v), Scope::Singleton)
        .unwrap();
    container
        .register("t", |c| c.resolve::<u8>("s").map(|v| *v), Scope::Singleton)
        .unwrap();

    expect_circular(container.resolve::<u8>("s").map(|v| *v), &["s", "t", "s"]);
    assert_eq!(container.instance_count(), 0);
}

#[test]
fn test_optional_lookup_inside_cycle_is_still_an_error() {
    let container = Container::new();
    container
        .register_transient("loop", |c| Ok(c.try_resolve::<u8>("loop")?.map_or(0, |v| *v)))
        .unwrap();

    assert!(matches!(container.try_resolve::<u8>("loop"), Err(DiError::Circular(_))));
}

#[test]
fn test_diamond_is_not_a_cycle() {
    let container = Container::new();
    container.register_singleton("base", |_| Ok(1u32)).unwrap();
    container.register_transient("left", |c| c.resolve::<u32>("base").map(|v| *v + 1)).unwrap();
    container.register_transient("right", |c| c.resolve::<u32>("base").map(|v| *v + 2)).unwrap();
    container
        .register_transient("top", |c| {
            Ok(*c.resolve::<u32>("left")? + *c.resolve::<u32>("right")?)
        })
        .unwrap();

    assert_eq!(*container.resolve::<u32>("top").unwrap(), 5);
}

#[test]
fn test_recovery_after_cycle() {
    let container = Container::new();
    container.register_transient("x", |c| c.resolve::<u8>("x").map(|v| *v)).unwrap();
    container.register_transient("y", |_| Ok(9u8)).unwrap();

    assert!(container.resolve::<u8>("x").is_err());
    assert_eq!(*container.resolve::<u8>("y").unwrap(), 9);
}

#[test]
fn test_depth_limit() {
    let container = Container::with_options(ContainerOptions::new().with_max_depth(3));
    container.register_transient(0i64, |_| Ok(0u32)).unwrap();
    for level in 1..6i64 {
        container
            .register_transient(level, move |c| c.resolve::<u32>(level - 1).map(|v| *v + 1))
            .unwrap();
    }

    assert_eq!(*container.resolve::<u32>(2i64).unwrap(), 2);
    assert_eq!(container.resolve::<u32>(5i64), Err(DiError::DepthExceeded(3)));
}

#[test]
fn test_unbounded_recursion_without_cycle_detection_hits_depth_limit() {
    let options = ContainerOptions::new()
        .with_cycle_detection(false)
        .with_max_depth(16);
    let container = Container::with_options(options);
    container.register_transient("self", |c| c.resolve::<u8>("self").map(|v| *v)).unwrap();

    assert_eq!(container.resolve::<u8>("self"), Err(DiError::DepthExceeded(16)));
}

#[test]
fn test_factory_may_resolve_through_parent_handle() {
    let root = Container::new();
    root.register_singleton("config", |_| Ok(String::from("root"))).unwrap();
    let child = root.create_child();
    // A different container is a different frame
    child
        .register_scoped("wrapped", |c| {
            let parent = c.parent().ok_or_else(|| DiError::factory("no parent"))?;
            Ok(format!("{}+child", parent.resolve::<String>("config")?))
        })
        .unwrap();

    assert_eq!(child.resolve::<String>("wrapped").unwrap().as_str(), "root+child");
}
