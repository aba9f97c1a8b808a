//! Module contract and lifecycle.
//!
//! A module is a unit of handler logic with declared metadata and an
//! enable/disable lifecycle. Types implement [`Module`]; the runtime wraps
//! each registered instance in a [`ModuleCell`] that owns the enabled flag
//! and drives the init/deinit hooks.

use crate::dispatch::{Dispatcher, HandlerInfo};
use crate::error::ModuleError;
use parking_lot::{Mutex, MutexGuard};
use serde::Serialize;
use std::any::{Any, TypeId};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Category of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    /// Extends server behavior (filters, policy, transforms).
    Module,
    /// Acts as a virtual participant.
    Bot,
}

/// How a module's handlers may be scheduled by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyMode {
    /// Safe to run alongside other modules' handlers.
    Concurrent,
    /// Requires exclusive access while running.
    Exclusive,
}

/// Declared metadata of a module type.
///
/// `kind` and `mode` are required: a manifest without them fails
/// [`validate`](Manifest::validate) when the type is installed, before any
/// instance exists. The `module` and `bot` constructors fill the defaults.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Manifest {
    pub name: &'static str,
    pub version: f32,
    pub author: &'static str,
    pub kind: Option<ModuleKind>,
    pub mode: Option<ConcurrencyMode>,
}

impl Manifest {
    /// A standard module manifest (concurrent, kind = module).
    pub const fn module(name: &'static str, version: f32, author: &'static str) -> Self {
        Self {
            name,
            version,
            author,
            kind: Some(ModuleKind::Module),
            mode: Some(ConcurrencyMode::Concurrent),
        }
    }

    /// A bot manifest (concurrent, kind = bot).
    pub const fn bot(name: &'static str, version: f32, author: &'static str) -> Self {
        Self {
            name,
            version,
            author,
            kind: Some(ModuleKind::Bot),
            mode: Some(ConcurrencyMode::Concurrent),
        }
    }

    /// Check that all required metadata is present.
    ///
    /// `module` names the offending type in the error; the manifest name may
    /// itself be the missing piece.
    pub fn validate(&self, module: &str) -> Result<(), ModuleError> {
        let mut fields = Vec::new();
        if self.name.is_empty() {
            fields.push("name");
        }
        if self.kind.is_none() {
            fields.push("kind");
        }
        if self.mode.is_none() {
            fields.push("mode");
        }
        if fields.is_empty() {
            Ok(())
        } else {
            Err(ModuleError::MissingMetadata {
                module: module.to_string(),
                fields,
            })
        }
    }
}

/// Contract every module type satisfies.
///
/// `declare` runs when the type is installed into a dispatcher, before any
/// instance exists; it registers the type's handlers as unbound entries.
/// `init` and `deinit` fire on the disabled→enabled and enabled→disabled
/// transitions respectively, exactly once per transition.
pub trait Module: Send + 'static {
    const MANIFEST: Manifest;

    /// Register this type's event handlers. Runs once per dispatcher,
    /// at install time.
    fn declare(dispatcher: &mut Dispatcher);

    /// Called when the module transitions to enabled.
    fn init(&mut self) {}

    /// Called when the module transitions to disabled.
    fn deinit(&mut self) {}
}

/// Object-safe shim over [`Module`] so cells can box heterogeneous types.
pub(crate) trait AnyModule: Any + Send {
    fn init_hook(&mut self);
    fn deinit_hook(&mut self);
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<M: Module> AnyModule for M {
    fn init_hook(&mut self) {
        self.init();
    }

    fn deinit_hook(&mut self) {
        self.deinit();
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Runtime slot for one registered module instance.
///
/// Owns the enabled flag and the boxed instance. Handler chain entries hold
/// an `Arc` to the cell of the instance they are bound to, so a toggle is
/// immediately visible to dispatch.
pub struct ModuleCell {
    manifest: Manifest,
    type_id: TypeId,
    enabled: AtomicBool,
    module: Mutex<Box<dyn AnyModule>>,
}

impl ModuleCell {
    /// Wrap an instance for registration. The cell starts disabled.
    pub fn new<M: Module>(module: M) -> Arc<Self> {
        Arc::new(Self {
            manifest: M::MANIFEST,
            type_id: TypeId::of::<M>(),
            enabled: AtomicBool::new(false),
            module: Mutex::new(Box::new(module)),
        })
    }

    pub fn name(&self) -> &'static str {
        self.manifest.name
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// `TypeId` of the wrapped module type. Named to avoid colliding with
    /// `Any::type_id`, which an `Any` import would otherwise resolve first
    /// on an `Arc<ModuleCell>` receiver.
    pub(crate) fn module_type_id(&self) -> TypeId {
        self.type_id
    }

    /// Observed enabled state. Modules start disabled.
    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Idempotent enable/disable transition.
    ///
    /// Toggling to the current state is a no-op; a real transition runs
    /// `init` or `deinit` exactly once.
    pub fn set_enabled(&self, on: bool) {
        if self.enabled.swap(on, Ordering::AcqRel) == on {
            return;
        }
        let mut module = self.module.lock();
        if on {
            module.init_hook();
        } else {
            module.deinit_hook();
        }
    }

    pub(crate) fn lock_instance(&self) -> MutexGuard<'_, Box<dyn AnyModule>> {
        self.module.lock()
    }

    /// Structured snapshot for host introspection, with the handlers the
    /// dispatcher has recorded for this module type.
    pub fn describe(&self, handlers: Vec<HandlerInfo>) -> ModuleDescription {
        ModuleDescription {
            name: self.manifest.name.to_string(),
            version: self.manifest.version,
            author: self.manifest.author.to_string(),
            kind: self.manifest.kind,
            mode: self.manifest.mode,
            enabled: self.enabled(),
            handlers,
        }
    }
}

impl std::fmt::Debug for ModuleCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleCell")
            .field("name", &self.manifest.name)
            .field("enabled", &self.enabled())
            .finish_non_exhaustive()
    }
}

/// Introspection snapshot of one registered module.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleDescription {
    pub name: String,
    pub version: f32,
    pub author: String,
    pub kind: Option<ModuleKind>,
    pub mode: Option<ConcurrencyMode>,
    pub enabled: bool,
    pub handlers: Vec<HandlerInfo>,
}
