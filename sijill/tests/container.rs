use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use sijill::prelude::*;

struct Counter {
    value: i64,
    step: i64,
}

#[derive(Default)]
struct Calls {
    built: AtomicUsize,
    step_set: AtomicUsize,
}

fn counter_class(calls: Arc<Calls>) -> Class<Counter> {
    let on_build = Arc::clone(&calls);
    Class::new("Counter", move |args| {
        on_build.built.fetch_add(1, Ordering::SeqCst);
        Ok(Counter {
            value: args.get(0)?,
            step: 1,
        })
    })
    .method("set_step", move |counter: &mut Counter, step: i64| {
        calls.step_set.fetch_add(1, Ordering::SeqCst);
        counter.step = step;
        Ok(())
    })
}

fn scenario(use_singleton: bool) -> (Container, Arc<Calls>) {
    let calls = Arc::new(Calls::default());
    let config = RegistryConfig::from_value(json!({
        "c1": {
            "class": "Counter",
            "constructor_attributes": [10],
            "setter_attributes": { "step": 2 },
            "use_lazyload": true,
            "use_singleton": use_singleton
        }
    }))
    .unwrap();

    let container = Container::builder()
        .class(counter_class(Arc::clone(&calls)))
        .recipes(config)
        .build()
        .unwrap();

    (container, calls)
}

#[test]
fn lazy_singleton_counter() {
    let (container, calls) = scenario(true);
    assert!(!container.object_exists("c1"));
    assert_eq!(calls.built.load(Ordering::SeqCst), 0);

    let first = container.get_as::<Counter>("c1").unwrap();
    assert_eq!((first.value, first.step), (10, 2));
    assert!(container.object_exists("c1"));

    let second = container.get_as::<Counter>("c1").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(calls.built.load(Ordering::SeqCst), 1);
    assert_eq!(calls.step_set.load(Ordering::SeqCst), 1);
}

#[test]
fn lazy_transient_counter() {
    let (container, calls) = scenario(false);

    let first = container.get_as::<Counter>("c1").unwrap();
    assert!(!container.object_exists("c1"));
    let second = container.get_as::<Counter>("c1").unwrap();
    assert!(!container.object_exists("c1"));

    assert!(!Arc::ptr_eq(&first, &second));
    for counter in [&first, &second] {
        assert_eq!((counter.value, counter.step), (10, 2));
    }
    assert_eq!(calls.built.load(Ordering::SeqCst), 2);
    assert_eq!(calls.step_set.load(Ordering::SeqCst), 2);
}

#[test]
fn eager_builds_follow_document_order() {
    let order = Arc::new(Mutex::new(Vec::<String>::new()));

    struct Named;

    let config = RegistryConfig::from_toml_str(
        r#"
        [zeta]
        class = "Named"
        constructor_attributes = ["zeta"]

        [lazy]
        class = "Named"
        constructor_attributes = ["lazy"]
        use_lazyload = true

        [alpha]
        class = "Named"
        constructor_attributes = ["alpha"]
        "#,
    )
    .unwrap();

    let seen = Arc::clone(&order);
    let container = Container::builder()
        .class(Class::new("Named", move |args| {
            seen.lock().unwrap().push(args.get::<String>(0)?);
            Ok(Named)
        }))
        .recipes(config)
        .build()
        .unwrap();

    assert_eq!(*order.lock().unwrap(), vec!["zeta", "alpha"]);
    assert!(container.object_exists("zeta"));
    assert!(container.object_exists("alpha"));
    assert!(!container.object_exists("lazy"));
}

#[test]
fn eager_failure_aborts_construction() {
    let result = Container::builder()
        .class(counter_class(Arc::default()))
        .recipe("good", RawRecipe::new("Counter").arg(1))
        .recipe("bad", RawRecipe::new("Counter").arg(1).attr("missing", 0))
        .build();

    match result {
        Err(RegistryError::AttributeNotFound(e)) => assert_eq!(e.id, "bad"),
        other => panic!("Expected AttributeNotFound, got: {other:?}"),
    }
}

#[test]
fn injection_precedence_end_to_end() {
    #[derive(Default)]
    struct Widget {
        via: Vec<&'static str>,
    }

    fn mark(
        tag: &'static str,
    ) -> impl Fn(&mut Widget, &Value) -> std::result::Result<(), BoxError> + Send + Sync + 'static {
        move |w: &mut Widget, _: &Value| {
            w.via.push(tag);
            Ok(())
        }
    }

    let class = Class::<Widget>::with_default("Widget")
        .raw_field("a", mark("field a"))
        .raw_method("a", mark("method a"))
        .raw_method("b", mark("method b"))
        .raw_method("set_b", mark("set_b"))
        .raw_method("set_c", mark("set_c"))
        .raw_method("setC", mark("setC"))
        .raw_method("setD", mark("setD"));

    let container = Container::builder()
        .class(class)
        .recipe(
            "w",
            RawRecipe::new("Widget")
                .attr("a", 1)
                .attr("b", 1)
                .attr("c", 1)
                .attr("d", 1),
        )
        .build()
        .unwrap();

    let widget = container.get_as::<Widget>("w").unwrap();
    assert_eq!(widget.via, vec!["field a", "method b", "set_c", "setD"]);
}

#[test]
fn must_be_set_then_set() {
    struct Process {
        pid: u32,
    }

    let container = Container::builder()
        .recipe("process", RawRecipe::placeholder())
        .build()
        .unwrap();

    assert!(matches!(
        container.get("process"),
        Err(RegistryError::MustBeSetViolation { .. })
    ));
    assert!(!container.object_exists("process"));

    container.set("process", Arc::new(Process { pid: 1 }));
    assert_eq!(container.get_as::<Process>("process").unwrap().pid, 1);
}

#[test]
fn must_be_set_class_is_never_constructed() {
    let calls = Arc::new(Calls::default());

    let container = Container::builder()
        .class(counter_class(Arc::clone(&calls)))
        .recipe(
            "c1",
            RawRecipe::new("Counter")
                .arg(10)
                .attr("step", 2)
                .lazy(true)
                .must_be_set(true),
        )
        .build()
        .unwrap();

    assert!(matches!(
        container.get("c1"),
        Err(RegistryError::MustBeSetViolation { .. })
    ));

    container.set("c1", Arc::new(Counter { value: 1, step: 1 }));
    let counter = container.get_as::<Counter>("c1").unwrap();

    assert_eq!((counter.value, counter.step), (1, 1));
    assert_eq!(calls.built.load(Ordering::SeqCst), 0);
    assert_eq!(calls.step_set.load(Ordering::SeqCst), 0);
}

#[test]
fn recipes_wire_instances_by_id() {
    struct Report {
        counter: Arc<Counter>,
        title: String,
    }

    let calls = Arc::new(Calls::default());
    let config = RegistryConfig::from_toml_str(
        r#"
        [report]
        class = "Report"
        constructor_attributes = ["c1", "daily"]

        [c1]
        class = "Counter"
        constructor_attributes = [10]
        setter_attributes = { step = 2 }
        use_lazyload = true
        "#,
    )
    .unwrap();

    let container = Container::builder()
        .class(counter_class(Arc::clone(&calls)))
        .class(Class::new("Report", |args| {
            Ok(Report {
                counter: args.reference(0)?,
                title: args.get(1)?,
            })
        }))
        .recipes(config)
        .build()
        .unwrap();

    // the eager report pulled the lazy counter in
    assert!(container.object_exists("c1"));

    let report = container.get_as::<Report>("report").unwrap();
    assert_eq!(report.title, "daily");
    assert_eq!((report.counter.value, report.counter.step), (10, 2));
    assert!(Arc::ptr_eq(
        &report.counter,
        &container.get_as::<Counter>("c1").unwrap()
    ));
    assert_eq!(calls.built.load(Ordering::SeqCst), 1);
}

#[test]
fn concurrent_gets_build_singleton_once() {
    let (container, calls) = scenario(true);

    let instances: Vec<Instance> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| container.get("c1").unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(calls.built.load(Ordering::SeqCst), 1);
    assert!(instances.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[test]
fn provider_supplies_classes() {
    struct CounterProvider(Arc<Calls>);

    impl ClassProvider for CounterProvider {
        fn register(&self, classes: &mut ClassRegistry) {
            classes.register(counter_class(Arc::clone(&self.0)));
        }
    }

    let container = Container::builder()
        .add_provider(&CounterProvider(Arc::default()))
        .recipe("c", RawRecipe::new("Counter").arg(3))
        .build()
        .unwrap();

    assert_eq!(container.get_as::<Counter>("c").unwrap().value, 3);
    assert_eq!(container.classes().names(), vec!["Counter"]);
}

#[test]
fn logging_bootstrap_is_idempotent() {
    let _ = sijill::logging::init_logging("sijill=debug");
    assert!(!sijill::logging::init_logging("sijill=trace"));

    let (container, _) = scenario(true);
    assert!(container.get("c1").is_ok());
}
