//! Event dispatcher.
//!
//! Holds the event → ordered-handler-chain table and runs the dispatch
//! algorithm. Handlers are recorded in two phases: installing a module type
//! appends *unbound* entries tagged with the owning type, and registering an
//! instance later binds the matching entries to it. Entries keep their
//! registration order; dispatch walks a chain in that order, skips entries
//! whose owner is unbound or disabled, threads the payload through the
//! invoked handlers, and short-circuits as soon as one returns an empty
//! result.

use crate::config::RuntimeConfig;
use crate::error::{DispatchError, ModuleError};
use crate::event::{EventKind, EventPayload};
use crate::module::{Module, ModuleCell};
use serde::Serialize;
use serde_json::Value;
use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// Default per-handler execution budget, matching the reference behavior.
pub const DEFAULT_HANDLER_BUDGET: Duration = Duration::from_millis(1500);

/// A handler bound to a module instance: receives the current payload,
/// returns the payload for the next entry, or `None` to cancel the rest of
/// the chain.
pub type HandlerResult = Option<EventPayload>;

type RawHandler = Box<dyn Fn(&mut dyn Any, EventPayload) -> HandlerResult + Send + Sync>;

/// One registered handler in a chain.
struct HandlerEntry {
    owner_type: TypeId,
    owner_name: &'static str,
    method: &'static str,
    /// Declared execution budget. Overruns are logged, never enforced by
    /// cancellation.
    timeout: Option<Duration>,
    func: RawHandler,
    /// Bound module instance; `None` until a matching instance registers.
    owner: Option<Arc<ModuleCell>>,
}

/// Introspection record for one handler, as reported by
/// [`ModuleCell::describe`](crate::module::ModuleCell::describe).
#[derive(Debug, Clone, Serialize)]
pub struct HandlerInfo {
    pub event: EventKind,
    pub method: String,
    pub timeout: Option<Duration>,
}

/// Registry of event handler chains plus the dispatch algorithm.
pub struct Dispatcher {
    config: RuntimeConfig,
    chains: HashMap<EventKind, Vec<HandlerEntry>>,
    installed: HashSet<TypeId>,
}

impl Dispatcher {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            chains: HashMap::new(),
            installed: HashSet::new(),
        }
    }

    /// Install a module type: validate its manifest, then run its
    /// declarations.
    ///
    /// This is the load-time gate — a type with incomplete metadata fails
    /// here, before any instance exists. Installing a type twice is a no-op
    /// so chains never hold duplicate declarations.
    pub fn install<M: Module>(&mut self) -> Result<(), ModuleError> {
        M::MANIFEST.validate(short_type_name::<M>())?;
        if self.installed.insert(TypeId::of::<M>()) {
            M::declare(self);
        }
        Ok(())
    }

    /// Append an unbound handler entry to `kind`'s chain.
    ///
    /// Called from [`Module::declare`], before any instance of `M` exists.
    /// `method` names the handler for introspection. Chain position is
    /// registration order and is significant.
    pub fn register<M: Module>(
        &mut self,
        kind: EventKind,
        timeout: Option<Duration>,
        method: &'static str,
        handler: fn(&mut M, EventPayload) -> HandlerResult,
    ) {
        let func: RawHandler = Box::new(move |instance, payload| {
            // Owner type is matched by TypeId at bind time, so the downcast
            // cannot miss for a bound entry.
            match instance.downcast_mut::<M>() {
                Some(module) => handler(module, payload),
                None => {
                    error!(module = M::MANIFEST.name, "bound handler owner has wrong type");
                    Some(payload)
                }
            }
        });
        self.chains.entry(kind).or_default().push(HandlerEntry {
            owner_type: TypeId::of::<M>(),
            owner_name: M::MANIFEST.name,
            method,
            timeout,
            func,
            owner: None,
        });
    }

    /// Bind every unbound entry declared by `cell`'s exact type to `cell`.
    ///
    /// Idempotent: rebinding the same instance is harmless, and a later
    /// instance of the same type takes over its predecessor's entries.
    /// Entries of other types are never touched, even when method names
    /// collide.
    pub fn bind(&mut self, cell: &Arc<ModuleCell>) {
        for chain in self.chains.values_mut() {
            for entry in chain.iter_mut() {
                if entry.owner_type == cell.module_type_id() {
                    entry.owner = Some(Arc::clone(cell));
                }
            }
        }
    }

    /// Run the handler chain for `kind`.
    ///
    /// Entries run in registration order. Unbound entries are inert;
    /// entries whose module is disabled are skipped without interrupting
    /// their neighbors. Each invoked handler receives the payload returned
    /// by its predecessor; a `None` return cancels the remainder of the
    /// chain. An absent chain, like a chain in which nothing ran, yields
    /// the empty result — neither is an error.
    pub fn dispatch(&self, kind: EventKind, payload: EventPayload) -> HandlerResult {
        let chain = match self.chains.get(&kind) {
            Some(chain) if !chain.is_empty() => chain,
            _ => {
                if self.config.debug {
                    debug!(
                        worker = self.config.worker_index,
                        event = ?kind,
                        "no handler for event"
                    );
                }
                return None;
            }
        };

        let mut payload = payload;
        let mut invoked = false;
        for entry in chain {
            let Some(cell) = &entry.owner else {
                // Declared but never activated.
                continue;
            };
            if !cell.enabled() {
                if self.config.debug {
                    debug!(
                        worker = self.config.worker_index,
                        module = entry.owner_name,
                        method = entry.method,
                        "skipping disabled module"
                    );
                }
                continue;
            }

            let started = Instant::now();
            let result = {
                let mut instance = cell.lock_instance();
                (entry.func)(instance.as_any_mut(), payload)
            };
            if let Some(budget) = entry.timeout {
                let elapsed = started.elapsed();
                if elapsed > budget {
                    warn!(
                        worker = self.config.worker_index,
                        module = entry.owner_name,
                        method = entry.method,
                        elapsed_ms = elapsed.as_millis() as u64,
                        budget_ms = budget.as_millis() as u64,
                        "handler exceeded declared budget"
                    );
                }
            }

            invoked = true;
            match result {
                Some(next) => payload = next,
                None => {
                    if self.config.debug {
                        debug!(
                            worker = self.config.worker_index,
                            module = entry.owner_name,
                            method = entry.method,
                            "handler cancelled the chain"
                        );
                    }
                    return None;
                }
            }
        }

        if invoked { Some(payload) } else { None }
    }

    /// Hydrate raw positional JSON values into a typed payload, then
    /// dispatch.
    ///
    /// The only error on this path is a payload structurally incompatible
    /// with the event kind; chain outcomes are the same as
    /// [`dispatch`](Self::dispatch).
    pub fn dispatch_raw(
        &self,
        kind: EventKind,
        args: &[Value],
    ) -> Result<HandlerResult, DispatchError> {
        let payload = EventPayload::hydrate(kind, args)?;
        Ok(self.dispatch(kind, payload))
    }

    /// Handlers declared by the given module type, for describe snapshots.
    pub fn handlers_for(&self, type_id: TypeId) -> Vec<HandlerInfo> {
        let mut infos: Vec<HandlerInfo> = Vec::new();
        for (kind, chain) in &self.chains {
            for entry in chain {
                if entry.owner_type == type_id {
                    infos.push(HandlerInfo {
                        event: *kind,
                        method: entry.method.to_string(),
                        timeout: entry.timeout,
                    });
                }
            }
        }
        // Chain iteration order is map order; sort for a stable snapshot.
        infos.sort_by(|a, b| a.method.cmp(&b.method));
        infos
    }

    /// Number of entries (bound or not) registered for `kind`.
    pub fn chain_len(&self, kind: EventKind) -> usize {
        self.chains.get(&kind).map_or(0, Vec::len)
    }
}

/// Last path segment of a type name, for error messages.
fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
