//! Group store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::record::{GroupId, GroupRecord, MoteId};
use crate::MOTES_PER_GROUP;

/// Fixed table of group slots.
///
/// The number of slots is decided once at bootstrap and never changes;
/// dismantled groups are reset in place and their slot is reused.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStore {
    /// Slot `i` holds `GroupId(i + 1)`.
    slots: Vec<GroupRecord>,
}

impl GroupStore {
    /// Allocate `num_groups` empty slots.
    pub fn with_groups(num_groups: usize) -> Self {
        let slots = (1..=num_groups as u32)
            .map(|n| GroupRecord::empty(GroupId(n)))
            .collect();
        Self { slots }
    }

    /// Allocate one slot per three motes (`floor(num_motes / 3)`).
    pub fn bootstrap(num_motes: usize) -> Self {
        let store = Self::with_groups(num_motes / MOTES_PER_GROUP);
        info!(
            "Bootstrapped group store: {} motes, {} group slots",
            num_motes,
            store.len()
        );
        store
    }

    fn slot(id: GroupId) -> Option<usize> {
        (id.0 as usize).checked_sub(1)
    }

    /// Get a group by id.
    pub fn get(&self, id: GroupId) -> Option<&GroupRecord> {
        Self::slot(id).and_then(|i| self.slots.get(i))
    }

    /// Get a group by id for mutation.
    pub fn get_mut(&mut self, id: GroupId) -> Option<&mut GroupRecord> {
        Self::slot(id).and_then(move |i| self.slots.get_mut(i))
    }

    /// Replace the record in the slot named by `record.id`.
    ///
    /// Returns false (and stores nothing) if no such slot exists.
    pub fn set(&mut self, record: GroupRecord) -> bool {
        match self.get_mut(record.id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// All groups in slot order.
    pub fn groups(&self) -> impl Iterator<Item = &GroupRecord> {
        self.slots.iter()
    }

    /// All groups in slot order, mutably.
    pub fn groups_mut(&mut self) -> impl Iterator<Item = &mut GroupRecord> {
        self.slots.iter_mut()
    }

    /// Groups that currently have members.
    pub fn populated(&self) -> impl Iterator<Item = &GroupRecord> {
        self.slots.iter().filter(|g| !g.is_free())
    }

    /// First free slot in ascending id order.
    pub fn first_free(&self) -> Option<GroupId> {
        self.slots.iter().find(|g| g.is_free()).map(|g| g.id)
    }

    /// Ids of every group listing `mote` as a member.
    pub fn containing(&self, mote: &MoteId) -> Vec<GroupId> {
        self.slots
            .iter()
            .filter(|g| g.contains(mote))
            .map(|g| g.id)
            .collect()
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the store has no slots at all.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Copy of every record, keyed by id.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            groups: self.slots.iter().map(|g| (g.id, g.clone())).collect(),
        }
    }
}

/// Point-in-time copy of the store.
///
/// Serializes as a JSON object keyed by `group{n}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreSnapshot {
    groups: BTreeMap<GroupId, GroupRecord>,
}

impl StoreSnapshot {
    pub fn get(&self, id: GroupId) -> Option<&GroupRecord> {
        self.groups.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupId, &GroupRecord)> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
