use arbor_di::{Container, Declaration, Dependency, DiError, Injectable, MetadataStore, Scope, Slot};
use std::cell::Cell;
use std::rc::Rc;

const TYPE_A: &str = "TypeA";
const TYPE_B: &str = "TypeB";
const TYPE_C: &str = "TypeC";

#[derive(Default)]
struct Widget {
    a: Option<Rc<String>>,
    prop_b: Option<Rc<String>>,
    init_arg: Option<Rc<String>>,
    init_calls: u32,
}

impl Injectable for Widget {
    fn declare(declaration: &mut Declaration<Self>) {
        declaration
            .constructor([TYPE_A], |args| {
                Ok(Widget {
                    a: Some(args.get(0)?),
                    ..Widget::default()
                })
            })
            .property("prop_b", TYPE_B, |w: &mut Widget, v| w.prop_b = v)
            .method("init", [TYPE_C], |w: &mut Widget, args| {
                w.init_arg = Some(args.get(0)?);
                w.init_calls += 1;
                Ok(())
            });
    }
}

fn abc_container() -> Container {
    let container = Container::new();
    container.metadata().register::<Widget>();
    container.register(TYPE_A, |_| Ok(String::from("A")), Scope::Transient).unwrap();
    container.register(TYPE_B, |_| Ok(String::from("B")), Scope::Transient).unwrap();
    container.register(TYPE_C, |_| Ok(String::from("C")), Scope::Transient).unwrap();
    container
}

#[test]
fn constructor_property_and_method_injection() {
    let container = abc_container();
    container.register_class::<Widget>("widget", Scope::Transient).unwrap();

    let widget = container.resolve::<Widget>("widget").unwrap();
    assert_eq!(widget.a.as_deref().map(String::as_str), Some("A"));
    assert_eq!(widget.prop_b.as_deref().map(String::as_str), Some("B"));
    assert_eq!(widget.init_arg.as_deref().map(String::as_str), Some("C"));
    assert_eq!(widget.init_calls, 1);
}

#[test]
fn instantiate_class_only_satisfies_constructor() {
    let container = abc_container();

    let widget = container.instantiate_class::<Widget>().unwrap();
    assert_eq!(widget.a.as_deref().map(String::as_str), Some("A"));
    assert!(widget.prop_b.is_none());
    assert_eq!(widget.init_calls, 0);
}

#[test]
fn auto_wire_applies_properties_and_methods() {
    let container = abc_container();

    let mut widget = Widget::default();
    container.auto_wire(&mut widget).unwrap();
    assert!(widget.a.is_none());
    assert_eq!(widget.prop_b.as_deref().map(String::as_str), Some("B"));
    assert_eq!(widget.init_calls, 1);
}

#[test]
fn factory_results_are_auto_wired() {
    let container = abc_container();
    container
        .register("manual", |_| Ok(Widget::default()), Scope::Singleton)
        .unwrap();

    let widget = container.resolve::<Widget>("manual").unwrap();
    assert!(widget.a.is_none());
    assert_eq!(widget.prop_b.as_deref().map(String::as_str), Some("B"));
    assert_eq!(widget.init_calls, 1);

    // Cached singletons are wired once
    let again = container.resolve::<Widget>("manual").unwrap();
    assert_eq!(again.init_calls, 1);
}

#[test]
fn registered_instances_are_not_auto_wired() {
    let container = abc_container();
    container.register_instance(Widget::default(), "prebuilt").unwrap();

    let widget = container.resolve::<Widget>("prebuilt").unwrap();
    assert!(widget.prop_b.is_none());
    assert_eq!(widget.init_calls, 0);
}

#[test]
fn undeclared_types_are_untouched() {
    #[derive(Default, Debug, PartialEq)]
    struct Plain(u8);

    let container = Container::new();
    let mut plain = Plain(3);
    container.auto_wire(&mut plain).unwrap();
    assert_eq!(plain, Plain(3));
    assert_eq!(container.instantiate_class::<Plain>().unwrap(), Plain(0));
    assert!(container.metadata().get_if_exists::<Plain>().is_none());
}

#[test]
fn missing_required_dependency_aborts() {
    let container = Container::new();
    container.metadata().register::<Widget>();
    container.register(TYPE_A, |_| Ok(String::from("A")), Scope::Transient).unwrap();
    container.register_class::<Widget>("widget", Scope::Transient).unwrap();

    assert_eq!(
        container.resolve::<Widget>("widget").err(),
        Some(DiError::NotFound(Slot::from(TYPE_B)))
    );
}

#[derive(Default)]
struct Reporter {
    sink: Option<Rc<String>>,
    format: Option<Rc<String>>,
    verbosity: Option<u8>,
}

#[test]
fn optional_dependencies_resolve_to_absence() {
    let container = Container::new();
    container
        .metadata()
        .declare::<Reporter>()
        .property("sink", "sink", |r: &mut Reporter, v| r.sink = v)
        .property("format", Dependency::from("format").optional(), |r: &mut Reporter, v| {
            r.format = v
        })
        .method(
            "configure",
            [Dependency::from("verbosity").optional()],
            |r: &mut Reporter, args| {
                r.verbosity = args.optional::<u8>(0)?.map(|v| *v);
                Ok(())
            },
        );
    container.register_instance(String::from("stdout"), "sink").unwrap();
    container.register_class::<Reporter>("reporter", Scope::Transient).unwrap();

    let reporter = container.resolve::<Reporter>("reporter").unwrap();
    assert_eq!(reporter.sink.as_deref().map(String::as_str), Some("stdout"));
    assert!(reporter.format.is_none());
    assert!(reporter.verbosity.is_none());
}

#[test]
fn keyed_dependencies() {
    let container = Container::new();
    container
        .metadata()
        .declare::<Reporter>()
        .property("sink", Dependency::keyed("sink", "audit"), |r: &mut Reporter, v| {
            r.sink = v
        });
    container.register_instance(String::from("default sink"), "sink").unwrap();
    container.register_instance_keyed(String::from("audit sink"), "sink", "audit").unwrap();

    let mut reporter = Reporter::default();
    container.auto_wire(&mut reporter).unwrap();
    assert_eq!(reporter.sink.as_deref().map(String::as_str), Some("audit sink"));
}

#[test]
fn dependencies_resolve_from_the_producing_container() {
    let root = Container::new();
    root.metadata().register::<Widget>();
    root.register_class::<Widget>("widget", Scope::Scoped).unwrap();
    root.register(TYPE_A, |_| Ok(String::from("root A")), Scope::Transient).unwrap();
    root.register_instance(String::from("root B"), TYPE_B).unwrap();
    root.register_instance(String::from("root C"), TYPE_C).unwrap();

    let child = root.create_child();
    child.register_instance(String::from("child B"), TYPE_B).unwrap();

    // Scoped: produced by the child, so the child's B is injected
    let from_child = child.resolve::<Widget>("widget").unwrap();
    assert_eq!(from_child.prop_b.as_deref().map(String::as_str), Some("child B"));
    assert_eq!(from_child.init_arg.as_deref().map(String::as_str), Some("root C"));

    let from_root = root.resolve::<Widget>("widget").unwrap();
    assert_eq!(from_root.prop_b.as_deref().map(String::as_str), Some("root B"));
}

#[test]
fn redeclaration_last_write_wins() {
    let container = Container::new();
    container.register_instance(String::from("first"), "one").unwrap();
    container.register_instance(String::from("second"), "two").unwrap();

    container
        .metadata()
        .declare::<Reporter>()
        .property("sink", "one", |r: &mut Reporter, v| r.sink = v);
    container
        .metadata()
        .declare::<Reporter>()
        .property("sink", "two", |r: &mut Reporter, v| r.sink = v);

    let mut reporter = Reporter::default();
    container.auto_wire(&mut reporter).unwrap();
    assert_eq!(reporter.sink.as_deref().map(String::as_str), Some("second"));

    let record = container.metadata().get_or_create::<Reporter>();
    assert_eq!(record.borrow().property_names().count(), 1);
}

#[test]
fn static_declaration_runs_once() {
    thread_local! {
        static DECLARED: Cell<u32> = Cell::new(0);
    }

    #[derive(Default)]
    struct Once;

    impl Injectable for Once {
        fn declare(_: &mut Declaration<Self>) {
            DECLARED.with(|d| d.set(d.get() + 1));
        }
    }

    let store = MetadataStore::new();
    store.register::<Once>();
    store.register::<Once>();
    assert_eq!(DECLARED.with(Cell::get), 1);
    assert!(store.contains::<Once>());
}

#[test]
fn method_argument_out_of_range() {
    #[derive(Default)]
    struct Greedy;

    let container = Container::new();
    container.metadata().declare::<Greedy>().method("run", ["x"], |_: &mut Greedy, args| {
        args.get::<u8>(1)?;
        Ok(())
    });
    container.register_instance(1u8, "x").unwrap();

    let mut greedy = Greedy;
    assert_eq!(
        container.auto_wire(&mut greedy),
        Err(DiError::MissingArgument { index: 1, len: 1 })
    );
}

#[test]
fn shared_metadata_store_between_roots() {
    let store = Rc::new(MetadataStore::new());
    store.register::<Widget>();

    let first = Container::with_metadata(store.clone(), Default::default());
    let second = Container::with_metadata(store.clone(), Default::default());
    first.register_instance(String::from("A1"), TYPE_A).unwrap();
    second.register_instance(String::from("A2"), TYPE_A).unwrap();

    let a = first.instantiate_class::<Widget>().unwrap();
    let b = second.instantiate_class::<Widget>().unwrap();
    assert_eq!(a.a.as_deref().map(String::as_str), Some("A1"));
    assert_eq!(b.a.as_deref().map(String::as_str), Some("A2"));
}

struct Database {
    url: String,
}

struct Repository {
    db: Rc<Database>,
    cache: Option<Rc<String>>,
    warmed: bool,
}

impl Injectable for Repository {
    fn declare(declaration: &mut Declaration<Self>) {
        declaration
            .constructor(["db"], |args| {
                Ok(Repository {
                    db: args.get(0)?,
                    cache: None,
                    warmed: false,
                })
            })
            .property("cache", Dependency::from("cache").optional(), |r: &mut Repository, v| {
                r.cache = v
            })
            .method("warm", Vec::<Dependency>::new(), |r: &mut Repository, _| {
                r.warmed = true;
                Ok(())
            });
    }
}

#[test]
fn class_without_default_is_built_from_its_constructor() {
    let container = Container::new();
    container.metadata().register::<Repository>();
    container
        .register_singleton("db", |_| {
            Ok(Database {
                url: String::from("postgres://primary"),
            })
        })
        .unwrap();
    container.register_instance(String::from("lru"), "cache").unwrap();
    container.register_constructed::<Repository>("repo", Scope::Singleton).unwrap();

    let repo = container.resolve::<Repository>("repo").unwrap();
    assert_eq!(repo.db.url, "postgres://primary");
    assert!(Rc::ptr_eq(&repo.db, &container.resolve::<Database>("db").unwrap()));
    assert_eq!(repo.cache.as_deref().map(String::as_str), Some("lru"));
    assert!(repo.warmed);
}

#[test]
fn constructed_class_without_constructor_fails_on_resolve() {
    let container = Container::new();
    container.register_constructed::<Database>("db", Scope::Transient).unwrap();

    assert_eq!(
        container.resolve::<Database>("db").err(),
        Some(DiError::NoConstructor(std::any::type_name::<Database>()))
    );
}

#[test]
fn default_constructor_declaration() {
    #[derive(Default)]
    struct Counter {
        start: u32,
    }

    let container = Container::new();
    container.metadata().declare::<Counter>().default_constructor();
    container.register_constructed::<Counter>("counter", Scope::Transient).unwrap();

    assert_eq!(container.resolve::<Counter>("counter").unwrap().start, 0);
    assert!(container
        .metadata()
        .get_if_exists::<Counter>()
        .unwrap()
        .borrow()
        .has_constructor());
}

#[test]
fn property_of_the_wrong_type_names_its_slot() {
    let container = Container::new();
    container
        .metadata()
        .declare::<Reporter>()
        .property("sink", "sink", |r: &mut Reporter, v| r.sink = v);
    container.register_instance(3u8, "sink").unwrap();

    let mut reporter = Reporter::default();
    assert_eq!(
        container.auto_wire(&mut reporter),
        Err(DiError::TypeMismatch {
            slot: Slot::from("sink"),
            expected: std::any::type_name::<String>(),
        })
    );
}
