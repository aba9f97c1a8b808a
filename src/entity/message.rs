//! Message record.

use super::{Account, DirtySet, Entity, tracked_setters};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A message in flight through the daemon.
///
/// Carries protocol metadata tags, the sender prefix pieces, targets, and
/// the body text. `raw` keeps the original wire form when the host captured
/// one. Cancellation state is internal bookkeeping for the final consumer
/// and is exempt from dirty tracking; the dispatcher never consults it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    #[serde(default = "super::new_id")]
    id: Uuid,
    /// Protocol metadata tags (e.g. `time`, `msgid`, `account`).
    #[serde(default)]
    tags: HashMap<String, Option<String>>,
    #[serde(default)]
    nick: Option<String>,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    host: Option<String>,
    /// Target channel or nick names.
    #[serde(default)]
    targets: Vec<String>,
    #[serde(default)]
    account: Option<Account>,
    #[serde(default)]
    text: String,
    /// Original wire form, if the host captured it.
    #[serde(default)]
    raw: Option<Vec<u8>>,
    /// Message originates from the server itself (notices and the like).
    #[serde(default)]
    from_server: bool,
    #[serde(default = "super::now")]
    created_at: DateTime<Utc>,
    #[serde(skip)]
    cancelled: bool,
    #[serde(skip)]
    cancel_reason: Option<String>,
    #[serde(skip)]
    dirty: DirtySet,
}

impl Message {
    /// Create a message with a fresh id and creation time.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: super::new_id(),
            tags: HashMap::new(),
            nick: None,
            user: None,
            host: None,
            targets: Vec::new(),
            account: None,
            text: text.into(),
            raw: None,
            from_server: false,
            created_at: super::now(),
            cancelled: false,
            cancel_reason: None,
            dirty: DirtySet::default(),
        }
    }

    pub fn tags(&self) -> &HashMap<String, Option<String>> {
        &self.tags
    }

    pub fn set_tag(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        if self.tags.get(&key) != Some(&value) {
            self.dirty.mark("tags");
            self.tags.insert(key, value);
        }
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn add_target(&mut self, target: impl Into<String>) {
        self.dirty.mark("targets");
        self.targets.push(target.into());
    }

    /// Mark this message cancelled, with an optional reason. Empty reasons
    /// are discarded. Informational only: a handler that wants to halt the
    /// chain must still return an empty result.
    pub fn cancel(&mut self, reason: impl Into<String>) {
        self.cancelled = true;
        let reason = reason.into();
        if !reason.is_empty() {
            self.cancel_reason = Some(reason);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn cancel_reason(&self) -> Option<&str> {
        self.cancel_reason.as_deref()
    }
}

tracked_setters!(Message {
    nick: Option<String> => set_nick,
    user: Option<String> => set_user,
    host: Option<String> => set_host,
    account: Option<Account> => set_account,
    text: String => set_text,
    raw: Option<Vec<u8>> => set_raw,
    from_server: bool => set_from_server,
});

impl Entity for Message {
    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn dirty_fields(&self) -> &DirtySet {
        &self.dirty
    }

    fn clear_dirty(&mut self) {
        self.dirty.clear();
    }
}
