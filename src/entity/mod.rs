//! Domain entities with field-level change tracking.
//!
//! Every mutable record (account, channel, message) carries a [`DirtySet`]
//! recording which fields changed since construction, so the host's
//! persistence layer can diff and flush only what moved. Construction —
//! including hydration from raw payloads — never marks anything dirty;
//! internal bookkeeping fields are never tracked.
//!
//! Mutation goes through generated setters that compare-and-record; direct
//! field access is not exposed.

mod account;
mod channel;
mod message;

pub use account::Account;
pub use channel::Channel;
pub use message::Message;

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use uuid::Uuid;

/// Set of field names mutated since construction.
///
/// Add-only from the entity's point of view: repeated changes to one field
/// record it once, and setting a field back to its original value does not
/// un-mark it. The host clears the set after a successful flush.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtySet(HashSet<&'static str>);

impl DirtySet {
    pub(crate) fn mark(&mut self, field: &'static str) {
        self.0.insert(field);
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().copied()
    }

    /// Forget all recorded changes. Called by the host after a flush.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Common surface of all tracked domain records.
pub trait Entity {
    /// Opaque per-instance identifier, generated at construction if absent.
    fn id(&self) -> Uuid;

    /// When this record was constructed.
    fn created_at(&self) -> DateTime<Utc>;

    /// Fields mutated since construction (or since the last clear).
    fn dirty_fields(&self) -> &DirtySet;

    /// Forget recorded changes after the host has flushed them.
    fn clear_dirty(&mut self);
}

pub(crate) fn new_id() -> Uuid {
    Uuid::new_v4()
}

pub(crate) fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Generates a getter and a compare-and-record setter per field.
///
/// The setter marks the field dirty only when the new value differs from the
/// current one.
macro_rules! tracked_setters {
    ($ty:ty { $($(#[$meta:meta])* $field:ident : $t:ty => $setter:ident),+ $(,)? }) => {
        impl $ty {
            $(
                $(#[$meta])*
                pub fn $field(&self) -> &$t {
                    &self.$field
                }

                pub fn $setter(&mut self, value: $t) {
                    if self.$field != value {
                        self.dirty.mark(stringify!($field));
                        self.$field = value;
                    }
                }
            )+
        }
    };
}

pub(crate) use tracked_setters;
