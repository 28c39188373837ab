//! Basic example of the Sijill registry.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use sijill::logging::init_logging;
use sijill::prelude::*;

// === Define your types ===

struct Mailer {
    host: String,
    retries: u32,
}

impl Mailer {
    fn send(&self, to: &str) -> String {
        format!("mail to {to} via {} ({} retries)", self.host, self.retries)
    }
}

struct Counter {
    value: AtomicU64,
    step: u64,
}

impl Counter {
    fn tick(&self) -> u64 {
        self.value.fetch_add(self.step, Ordering::SeqCst) + self.step
    }
}

struct RequestInfo {
    path: String,
}

const REGISTRY: &str = r#"
[mailer]
class = "Mailer"
constructor_attributes = ["smtp.example.org"]
setter_attributes = { retries = 3 }

[hits]
class = "Counter"
constructor_attributes = [0]
setter_attributes = { step = 1 }
use_lazyload = true

[scratch]
class = "Counter"
constructor_attributes = [100]
use_singleton = false
use_lazyload = true

[request]
use_lazyload = true
must_be_set = true
"#;

fn main() -> Result<()> {
    init_logging("sijill=debug");

    // Build the container
    let container = Container::builder()
        // Mailer: constructor argument + public field
        .class(
            Class::new("Mailer", |args| {
                Ok(Mailer {
                    host: args.get(0)?,
                    retries: 0,
                })
            })
            .field("retries", |m: &mut Mailer, retries: u32| m.retries = retries),
        )
        // Counter: constructor argument + setter method
        .class(
            Class::new("Counter", |args| {
                Ok(Counter {
                    value: AtomicU64::new(args.get(0)?),
                    step: 1,
                })
            })
            .method("setStep", |c: &mut Counter, step: u64| {
                c.step = step;
                Ok(())
            }),
        )
        .recipes(RegistryConfig::from_toml_str(REGISTRY)?)
        .build()?;

    println!("✅ Container built successfully!");
    println!("{container:?}");

    // mailer is eager: already built
    let mailer: Arc<Mailer> = container.get_as("mailer")?;
    println!("📮 {}", mailer.send("ops@example.org"));

    // hits is a lazy singleton: the same counter every time
    let hits: Arc<Counter> = container.get_as("hits")?;
    hits.tick();
    let again: Arc<Counter> = container.get_as("hits")?;
    println!("🔢 hits = {}", again.tick());

    // scratch is transient: never cached
    let scratch: Arc<Counter> = container.get_as("scratch")?;
    println!("🧮 scratch = {}, cached = {}", scratch.tick(), container.object_exists("scratch"));

    // request can only come from outside
    container.set(
        "request",
        Arc::new(RequestInfo {
            path: "/users/42".into(),
        }),
    );
    let request: Arc<RequestInfo> = container.get_as("request")?;
    println!("🌐 request = {}", request.path);

    container.set_config("started", true);
    println!("⚙️  config = {:?}", container.config_to_array());

    println!("\n🎉 Everything works!");
    Ok(())
}
