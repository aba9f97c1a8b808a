//! Channel record.

use super::{DirtySet, Entity, tracked_setters};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// A channel with topic, members, modes, and ban masks.
///
/// `members` holds back-references by account id; referential integrity with
/// [`super::Account::channels`] is the host index's job, not this record's.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Channel {
    #[serde(default = "super::new_id")]
    id: Uuid,
    #[serde(default)]
    name: String,
    #[serde(default)]
    topic: String,
    #[serde(default)]
    key: Option<String>,
    /// Account id of the channel owner, if it has one.
    #[serde(default)]
    owner: Option<Uuid>,
    #[serde(default = "super::now")]
    created_at: DateTime<Utc>,
    #[serde(default)]
    members: Vec<Uuid>,
    /// Mode letter to optional mode argument, like `k` -> key or `m` -> none.
    #[serde(default)]
    modes: HashMap<char, Option<String>>,
    #[serde(default)]
    ban_masks: HashSet<String>,
    /// Member limit when the limit mode is set.
    #[serde(default)]
    limit: Option<u32>,
    #[serde(skip)]
    dirty: DirtySet,
}

impl Channel {
    /// Create a channel with a fresh id and creation time.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: super::new_id(),
            name: name.into(),
            topic: String::new(),
            key: None,
            owner: None,
            created_at: super::now(),
            members: Vec::new(),
            modes: HashMap::new(),
            ban_masks: HashSet::new(),
            limit: None,
            dirty: DirtySet::default(),
        }
    }

    /// Account ids of the current members.
    pub fn members(&self) -> &[Uuid] {
        &self.members
    }

    pub fn add_member(&mut self, account_id: Uuid) {
        if !self.members.contains(&account_id) {
            self.dirty.mark("members");
            self.members.push(account_id);
        }
    }

    pub fn remove_member(&mut self, account_id: Uuid) {
        if let Some(pos) = self.members.iter().position(|id| *id == account_id) {
            self.dirty.mark("members");
            self.members.remove(pos);
        }
    }

    pub fn modes(&self) -> &HashMap<char, Option<String>> {
        &self.modes
    }

    /// Set a mode letter with an optional argument.
    pub fn set_mode(&mut self, letter: char, arg: Option<String>) {
        if self.modes.get(&letter) != Some(&arg) {
            self.dirty.mark("modes");
            self.modes.insert(letter, arg);
        }
    }

    pub fn unset_mode(&mut self, letter: char) {
        if self.modes.remove(&letter).is_some() {
            self.dirty.mark("modes");
        }
    }

    pub fn ban_masks(&self) -> &HashSet<String> {
        &self.ban_masks
    }

    pub fn add_ban_mask(&mut self, mask: impl Into<String>) {
        if self.ban_masks.insert(mask.into()) {
            self.dirty.mark("ban_masks");
        }
    }

    pub fn remove_ban_mask(&mut self, mask: &str) {
        if self.ban_masks.remove(mask) {
            self.dirty.mark("ban_masks");
        }
    }
}

tracked_setters!(Channel {
    name: String => set_name,
    topic: String => set_topic,
    key: Option<String> => set_key,
    owner: Option<Uuid> => set_owner,
    limit: Option<u32> => set_limit,
});

impl Entity for Channel {
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
