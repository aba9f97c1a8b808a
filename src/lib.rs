//! ircmod — embeddable event-dispatch and module-lifecycle runtime for
//! IRC-style daemons.
//!
//! The host server raises typed events (channel messages, private messages,
//! joins, leaves, authentication attempts); the runtime routes each through
//! an ordered chain of handlers contributed by independently loaded modules
//! and produces a single, possibly transformed or cancelled, result.
//!
//! ## Model
//!
//! - A module type declares its handlers up front via [`Module::declare`],
//!   producing *unbound* chain entries; registering an instance binds the
//!   matching entries to it ([`Runtime::register_module`]).
//! - Dispatch walks a chain in registration order, skips unbound or
//!   disabled entries, threads the payload through the rest, and stops the
//!   moment a handler returns an empty result.
//! - Domain records ([`Account`], [`Channel`], [`Message`]) track which
//!   fields were mutated since construction so the host can diff and
//!   persist.
//!
//! ## Example
//!
//! ```
//! use ircmod::{
//!     Dispatcher, EventKind, EventPayload, HandlerResult, Manifest, Module, Runtime,
//!     RuntimeConfig,
//! };
//!
//! struct Shout;
//!
//! impl Shout {
//!     fn on_channel_msg(&mut self, mut payload: EventPayload) -> HandlerResult {
//!         if let Some(ev) = payload.as_channel_msg_mut() {
//!             let upper = ev.message.text().to_uppercase();
//!             ev.message.set_text(upper);
//!         }
//!         Some(payload)
//!     }
//! }
//!
//! impl Module for Shout {
//!     const MANIFEST: Manifest = Manifest::module("Shout", 0.1, "straylight");
//!
//!     fn declare(dispatcher: &mut Dispatcher) {
//!         dispatcher.register::<Shout>(
//!             EventKind::ChannelMsg,
//!             None,
//!             "on_channel_msg",
//!             Shout::on_channel_msg,
//!         );
//!     }
//! }
//!
//! let mut runtime = Runtime::new(RuntimeConfig::default());
//! runtime.install::<Shout>().unwrap();
//! runtime.register_module(Shout);
//! runtime.enable_module("Shout").unwrap();
//! ```
//!
//! Registration and binding happen during a quiescent startup phase;
//! dispatch itself is synchronous and sequential within one call. Hosts
//! with multiple workers run one independent [`Runtime`] per worker.

pub mod auth;
pub mod config;
pub mod dispatch;
pub mod entity;
pub mod error;
pub mod event;
pub mod module;
pub mod registry;
pub mod runtime;

pub use auth::{Principal, require_auth};
pub use config::{ConfigError, RuntimeConfig};
pub use dispatch::{DEFAULT_HANDLER_BUDGET, Dispatcher, HandlerInfo, HandlerResult};
pub use entity::{Account, Channel, DirtySet, Entity, Message};
pub use error::{AuthError, DispatchError, ModuleError, RegistryError};
pub use event::{
    AuthAttempt, AuthOutcome, ChannelEvent, EventKind, EventMask, EventPayload, Membership,
};
pub use module::{ConcurrencyMode, Manifest, Module, ModuleCell, ModuleDescription, ModuleKind};
pub use registry::ModuleRegistry;
pub use runtime::Runtime;
