//! Module lifecycle: idempotent enable/disable transitions, name-based
//! management, replacement semantics, and introspection snapshots.

use ircmod::{
    Dispatcher, EventKind, EventPayload, HandlerResult, Manifest, Message, Module, ModuleKind,
    Runtime, RuntimeConfig,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
struct Hooked {
    inits: Arc<AtomicUsize>,
    deinits: Arc<AtomicUsize>,
}

impl Hooked {
    fn on_private_msg(&mut self, payload: EventPayload) -> HandlerResult {
        Some(payload)
    }
}

impl Module for Hooked {
    const MANIFEST: Manifest = Manifest::module("Hooked", 0.2, "tests");

    fn declare(dispatcher: &mut Dispatcher) {
        dispatcher.register::<Hooked>(
            EventKind::PrivateMsg,
            None,
            "on_private_msg",
            Hooked::on_private_msg,
        );
    }

    fn init(&mut self) {
        self.inits.fetch_add(1, Ordering::SeqCst);
    }

    fn deinit(&mut self) {
        self.deinits.fetch_add(1, Ordering::SeqCst);
    }
}

// Tags each instance so dispatch reveals which one is bound.
struct Tagged {
    tag: &'static str,
    seen: Arc<AtomicUsize>,
    last: Arc<std::sync::Mutex<&'static str>>,
}

impl Tagged {
    fn on_private_msg(&mut self, payload: EventPayload) -> HandlerResult {
        self.seen.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().expect("lock") = self.tag;
        Some(payload)
    }
}

impl Module for Tagged {
    const MANIFEST: Manifest = Manifest::bot("Tagged", 1.0, "tests");

    fn declare(dispatcher: &mut Dispatcher) {
        dispatcher.register::<Tagged>(
            EventKind::PrivateMsg,
            None,
            "on_private_msg",
            Tagged::on_private_msg,
        );
    }
}

#[test]
fn enable_twice_runs_init_once() {
    let mut runtime = Runtime::new(RuntimeConfig::default());
    runtime.install::<Hooked>().expect("install");
    let module = Hooked::default();
    let inits = module.inits.clone();
    let deinits = module.deinits.clone();
    runtime.register_module(module);

    runtime.enable_module("Hooked").expect("enable");
    runtime.enable_module("Hooked").expect("enable again");
    assert_eq!(inits.load(Ordering::SeqCst), 1);
    assert_eq!(deinits.load(Ordering::SeqCst), 0);

    runtime.disable_module("Hooked").expect("disable");
    runtime.disable_module("Hooked").expect("disable again");
    assert_eq!(inits.load(Ordering::SeqCst), 1);
    assert_eq!(deinits.load(Ordering::SeqCst), 1);

    // A fresh transition runs the hook again, once.
    runtime.enable_module("Hooked").expect("re-enable");
    assert_eq!(inits.load(Ordering::SeqCst), 2);
}

#[test]
fn enabling_unknown_module_is_not_found() {
    let runtime = Runtime::new(RuntimeConfig::default());
    let err = runtime.enable_module("Missing").unwrap_err();
    assert_eq!(err.error_code(), "module_not_found");
    assert_eq!(err.to_string(), "module 'Missing' is not registered");

    let err = runtime.disable_module("Missing").unwrap_err();
    assert_eq!(err.error_code(), "module_not_found");
}

#[test]
fn same_type_registration_replaces_and_rebinds() {
    let mut runtime = Runtime::new(RuntimeConfig::default());
    runtime.install::<Tagged>().expect("install");

    let seen = Arc::new(AtomicUsize::new(0));
    let last = Arc::new(std::sync::Mutex::new(""));

    runtime.register_module(Tagged {
        tag: "first",
        seen: seen.clone(),
        last: last.clone(),
    });
    runtime.register_module(Tagged {
        tag: "second",
        seen: seen.clone(),
        last: last.clone(),
    });
    runtime.enable_module("Tagged").expect("enable");

    let result = runtime.dispatch(
        EventKind::PrivateMsg,
        EventPayload::PrivateMsg(Message::new("ping")),
    );
    assert!(result.is_some());
    assert_eq!(seen.load(Ordering::SeqCst), 1);
    assert_eq!(*last.lock().expect("lock"), "second");
    // Still a single registration under the name.
    assert_eq!(runtime.list_modules().len(), 1);
}

#[test]
fn list_modules_reports_metadata_state_and_handlers() {
    let mut runtime = Runtime::new(RuntimeConfig::default());
    runtime.install::<Hooked>().expect("install");
    runtime.install::<Tagged>().expect("install");
    runtime.register_module(Hooked::default());
    runtime.register_module(Tagged {
        tag: "only",
        seen: Arc::new(AtomicUsize::new(0)),
        last: Arc::new(std::sync::Mutex::new("")),
    });
    runtime.enable_module("Tagged").expect("enable");

    let listed = runtime.list_modules();
    assert_eq!(listed.len(), 2);

    // Name order.
    assert_eq!(listed[0].name, "Hooked");
    assert_eq!(listed[1].name, "Tagged");

    let hooked = &listed[0];
    assert!(!hooked.enabled);
    assert_eq!(hooked.kind, Some(ModuleKind::Module));
    assert_eq!(hooked.author, "tests");
    assert_eq!(hooked.handlers.len(), 1);
    assert_eq!(hooked.handlers[0].method, "on_private_msg");
    assert_eq!(hooked.handlers[0].event, EventKind::PrivateMsg);

    let tagged = &listed[1];
    assert!(tagged.enabled);
    assert_eq!(tagged.kind, Some(ModuleKind::Bot));

    // Snapshots are host-facing: they must serialize cleanly.
    let json = serde_json::to_value(&listed).expect("serializes");
    assert_eq!(json[1]["kind"], "bot");
    assert_eq!(json[1]["enabled"], true);
}

#[test]
fn install_failure_prevents_any_registration() {
    struct NoMeta;

    impl Module for NoMeta {
        const MANIFEST: Manifest = Manifest {
            name: "NoMeta",
            version: 0.1,
            author: "tests",
            kind: None,
            mode: None,
        };

        fn declare(_dispatcher: &mut Dispatcher) {
            panic!("declare must not run for invalid metadata");
        }
    }

    let mut runtime = Runtime::new(RuntimeConfig::default());
    let err = runtime.install::<NoMeta>().unwrap_err();
    assert_eq!(err.error_code(), "missing_metadata");
    assert!(err.to_string().contains("kind, mode"));
}
