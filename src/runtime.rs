//! Runtime facade.
//!
//! Owns the configuration, the dispatcher, and the module registry, and
//! wires them together: registering a module instance stores it and binds
//! its declared handlers in one step. Hosts running multiple workers create
//! one `Runtime` per worker; instances share nothing.

use crate::config::RuntimeConfig;
use crate::dispatch::{Dispatcher, HandlerResult};
use crate::error::{DispatchError, ModuleError, RegistryError};
use crate::event::{EventKind, EventPayload};
use crate::module::{Module, ModuleCell, ModuleDescription};
use crate::registry::ModuleRegistry;
use serde_json::Value;
use std::sync::Arc;

/// An event-dispatch runtime for one worker.
pub struct Runtime {
    config: RuntimeConfig,
    dispatcher: Dispatcher,
    modules: ModuleRegistry,
}

impl Runtime {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            dispatcher: Dispatcher::new(config),
            modules: ModuleRegistry::new(),
        }
    }

    /// Install a module type: validate its metadata and record its handler
    /// declarations as unbound entries. Fails before any instance exists if
    /// required metadata is missing.
    pub fn install<M: Module>(&mut self) -> Result<(), ModuleError> {
        self.dispatcher.install::<M>()
    }

    /// Register a module instance: store it by name and bind its type's
    /// declared handlers to it. The instance starts disabled.
    pub fn register_module<M: Module>(&mut self, module: M) -> Arc<ModuleCell> {
        let cell = ModuleCell::new(module);
        self.dispatcher.bind(&cell);
        self.modules.register(cell.clone());
        cell
    }

    /// Enable a registered module by name.
    pub fn enable_module(&self, name: &str) -> Result<(), RegistryError> {
        self.modules.enable(name)
    }

    /// Disable a registered module by name.
    pub fn disable_module(&self, name: &str) -> Result<(), RegistryError> {
        self.modules.disable(name)
    }

    /// Describe every registered module, in name order.
    pub fn list_modules(&self) -> Vec<ModuleDescription> {
        self.modules
            .iter()
            .map(|cell| cell.describe(self.dispatcher.handlers_for(cell.module_type_id())))
            .collect()
    }

    /// Dispatch a typed payload through `kind`'s handler chain.
    pub fn dispatch(&self, kind: EventKind, payload: EventPayload) -> HandlerResult {
        self.dispatcher.dispatch(kind, payload)
    }

    /// Hydrate raw positional JSON values and dispatch them.
    pub fn dispatch_raw(
        &self,
        kind: EventKind,
        args: &[Value],
    ) -> Result<HandlerResult, DispatchError> {
        self.dispatcher.dispatch_raw(kind, args)
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn is_debug(&self) -> bool {
        self.config.debug
    }

    pub fn worker_index(&self) -> i32 {
        self.config.worker_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DEFAULT_HANDLER_BUDGET;
    use crate::entity::Message;
    use crate::module::Manifest;

    struct Echo;

    impl Echo {
        fn on_private_msg(&mut self, payload: EventPayload) -> HandlerResult {
            Some(payload)
        }
    }

    impl Module for Echo {
        const MANIFEST: Manifest = Manifest::bot("Echo", 1.0, "tests");

        fn declare(dispatcher: &mut Dispatcher) {
            dispatcher.register::<Echo>(
                EventKind::PrivateMsg,
                Some(DEFAULT_HANDLER_BUDGET),
                "on_private_msg",
                Echo::on_private_msg,
            );
        }
    }

    #[test]
    fn config_accessors() {
        let runtime = Runtime::new(RuntimeConfig {
            debug: true,
            worker_index: 2,
        });
        assert!(runtime.is_debug());
        assert_eq!(runtime.worker_index(), 2);
    }

    #[test]
    fn list_modules_includes_handlers() {
        let mut runtime = Runtime::new(RuntimeConfig::default());
        runtime.install::<Echo>().expect("install");
        runtime.register_module(Echo);

        let listed = runtime.list_modules();
        assert_eq!(listed.len(), 1);
        let desc = &listed[0];
        assert_eq!(desc.name, "Echo");
        assert!(!desc.enabled);
        assert_eq!(desc.handlers.len(), 1);
        assert_eq!(desc.handlers[0].method, "on_private_msg");
        assert_eq!(desc.handlers[0].event, EventKind::PrivateMsg);
    }

    #[test]
    fn register_then_enable_dispatches() {
        let mut runtime = Runtime::new(RuntimeConfig::default());
        runtime.install::<Echo>().expect("install");
        runtime.register_module(Echo);
        runtime.enable_module("Echo").expect("enable");

        let result = runtime.dispatch(
            EventKind::PrivateMsg,
            EventPayload::PrivateMsg(Message::new("ping")),
        );
        assert!(result.is_some());
    }
}
