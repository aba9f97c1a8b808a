//! Account record.

use super::{DirtySet, Entity, tracked_setters};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account known to the daemon.
///
/// `channels` holds back-references by channel id; the symmetric member list
/// lives on [`super::Channel`] and an external index keeps the two
/// consistent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    name: String,
    nick: String,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    host: Option<String>,
    #[serde(default = "super::new_id")]
    id: Uuid,
    #[serde(default = "super::now")]
    created_at: DateTime<Utc>,
    #[serde(default)]
    channels: Vec<Uuid>,
    #[serde(default)]
    connection_count: u32,
    #[serde(skip)]
    dirty: DirtySet,
}

impl Account {
    /// Create an account with a fresh id and creation time.
    pub fn new(name: impl Into<String>, nick: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nick: nick.into(),
            password: None,
            host: None,
            id: super::new_id(),
            created_at: super::now(),
            channels: Vec::new(),
            connection_count: 0,
            dirty: DirtySet::default(),
        }
    }

    /// `nick!name@host`, the wire-visible source prefix. Host defaults to
    /// `localhost` when the account has none.
    pub fn prefix(&self) -> String {
        let host = self.host.as_deref().unwrap_or("localhost");
        format!("{}!{}@{}", self.nick, self.name, host)
    }

    /// Channel ids this account belongs to.
    pub fn channels(&self) -> &[Uuid] {
        &self.channels
    }

    /// Record membership in a channel.
    pub fn add_channel(&mut self, channel_id: Uuid) {
        if !self.channels.contains(&channel_id) {
            self.dirty.mark("channels");
            self.channels.push(channel_id);
        }
    }

    /// Drop membership in a channel.
    pub fn remove_channel(&mut self, channel_id: Uuid) {
        if let Some(pos) = self.channels.iter().position(|id| *id == channel_id) {
            self.dirty.mark("channels");
            self.channels.remove(pos);
        }
    }

    pub fn connection_count(&self) -> u32 {
        self.connection_count
    }

    pub fn set_connection_count(&mut self, count: u32) {
        if self.connection_count != count {
            self.dirty.mark("connection_count");
            self.connection_count = count;
        }
    }
}

tracked_setters!(Account {
    name: String => set_name,
    nick: String => set_nick,
    password: Option<String> => set_password,
    host: Option<String> => set_host,
});

impl Entity for Account {
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
