use std::sync::Arc;

use sijill::global;
use sijill::prelude::*;

#[derive(Default)]
struct Clock;

// One test only: the global container is shared by the whole test binary.
#[test]
fn global_container_lifecycle() {
    assert!(!global::is_initialized());

    global::configure(|| {
        let recipes = RegistryConfig::from_json_str(
            r#"{ "clock": { "class": "Clock" } }"#,
        )?;
        Container::builder()
            .class(Class::<Clock>::with_default("Clock"))
            .recipes(recipes)
            .recipe("process", RawRecipe::placeholder())
            .build()
    })
    .unwrap();

    assert!(matches!(
        global::configure(|| Container::builder().build()),
        Err(RegistryError::GlobalAlreadyInitialized)
    ));

    global::init().unwrap();
    assert!(global::is_initialized());

    let container = global::instance().unwrap();
    assert!(container.object_exists("clock"));
    assert!(std::ptr::eq(container, global::instance().unwrap()));

    container.set("process", Arc::new(std::process::id()));
    assert_eq!(
        *global::instance().unwrap().get_as::<u32>("process").unwrap(),
        std::process::id()
    );

    global::instance().unwrap().set_config("env", "test");
    assert_eq!(container.get_config("env"), Some(json!("test")));
}
