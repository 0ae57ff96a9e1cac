//! Group records and membership reports.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;
use crate::error::Error;

/// Identity of a mote, as reported upstream (typically its trimmed IPv6 address).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoteId(pub String);

impl MoteId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MoteId {
    fn from(s: &str) -> Self {
        MoteId(s.to_string())
    }
}

impl From<String> for MoteId {
    fn from(s: String) -> Self {
        MoteId(s)
    }
}

/// A group slot number, 1-based.
///
/// Renders as `group{n}`, which is also its key in serialized snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct GroupId(pub u32);

impl GroupId {
    pub const PREFIX: &'static str = "group";

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

impl FromStr for GroupId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(Self::PREFIX)
            .and_then(|n| n.parse().ok())
            .map(GroupId)
            .ok_or_else(|| Error::MalformedReport(format!("not a group id: {s:?}")))
    }
}

impl From<GroupId> for String {
    fn from(id: GroupId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for GroupId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// One member of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: MoteId,
    /// Last time this mote reported; `None` until it has reported itself.
    pub last_active: Option<Timestamp>,
}

impl MemberRecord {
    pub fn new(id: MoteId, last_active: Option<Timestamp>) -> Self {
        Self { id, last_active }
    }
}

/// Running statistics over the cardinality observations since the last reset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupStatistics {
    pub maximum: usize,
    /// `None` until the first observation; written as `0` on the wire.
    #[serde(with = "minimum_or_zero")]
    pub minimum: Option<usize>,
    pub average: f64,
    /// Number of observations folded into `average`.
    pub index: u64,
}

impl GroupStatistics {
    /// Fold one cardinality observation in.
    pub fn observe(&mut self, cardinality: usize) {
        let n = self.index as f64;
        self.maximum = self.maximum.max(cardinality);
        self.minimum = Some(self.minimum.map_or(cardinality, |m| m.min(cardinality)));
        self.average = (self.average * n + cardinality as f64) / (n + 1.0);
        self.index += 1;
    }

    /// True if nothing has been observed since the last reset.
    pub fn is_empty(&self) -> bool {
        self.index == 0
    }
}

/// Snapshots carry `minimum: 0` for a group with no observations. A live
/// group never rests at a minimum of 0: draining it dismantles it.
mod minimum_or_zero {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(minimum: &Option<usize>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(minimum.unwrap_or(0) as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<usize>, D::Error> {
        Ok(Option::<usize>::deserialize(deserializer)?.filter(|&m| m != 0))
    }
}

/// State of one group slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: GroupId,
    pub members: Vec<MemberRecord>,
    pub cardinality: usize,
    #[serde(flatten)]
    pub stats: GroupStatistics,
    /// When the group was last populated from empty.
    pub created_at: Timestamp,
    pub lifetime_seconds: f64,
    /// When the group was last dismantled; 0 if never.
    pub dismantle_timer: Timestamp,
}

impl GroupRecord {
    /// A never-used slot, as allocated at bootstrap.
    pub fn empty(id: GroupId) -> Self {
        Self {
            id,
            members: Vec::new(),
            cardinality: 0,
            stats: GroupStatistics::default(),
            created_at: 0,
            lifetime_seconds: 0.0,
            dismantle_timer: 0,
        }
    }

    /// Return this slot to the empty baseline, stamping the dismantle time.
    pub fn reset(&mut self, now: Timestamp) {
        *self = Self {
            created_at: now,
            dismantle_timer: now,
            ..Self::empty(self.id)
        };
    }

    /// True if the slot is at the empty baseline: no members, no observations.
    pub fn is_baseline(&self) -> bool {
        self.members.is_empty() && self.stats.is_empty()
    }

    /// True if the slot can be handed to a new group.
    pub fn is_free(&self) -> bool {
        self.cardinality == 0
    }

    pub fn contains(&self, mote: &MoteId) -> bool {
        self.members.iter().any(|m| &m.id == mote)
    }

    pub fn member(&self, mote: &MoteId) -> Option<&MemberRecord> {
        self.members.iter().find(|m| &m.id == mote)
    }

    pub fn member_mut(&mut self, mote: &MoteId) -> Option<&mut MemberRecord> {
        self.members.iter_mut().find(|m| &m.id == mote)
    }

    /// Member ids as an order-independent set.
    pub fn member_ids(&self) -> BTreeSet<&MoteId> {
        self.members.iter().map(|m| &m.id).collect()
    }

    /// Reference time for a member's inactivity; falls back to `created_at`.
    pub fn last_seen(&self, member: &MemberRecord) -> Timestamp {
        member.last_active.unwrap_or(self.created_at)
    }
}

/// A normalized membership report: `sender` hears every mote in `members`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipReport {
    pub sender: MoteId,
    pub members: Vec<MoteId>,
}

impl MembershipReport {
    pub fn new<S, I, M>(sender: S, members: I) -> Self
    where
        S: Into<MoteId>,
        I: IntoIterator<Item = M>,
        M: Into<MoteId>,
    {
        Self {
            sender: sender.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// `members ∪ {sender}`, deduplicated, in first-seen order.
    pub fn effective_members(&self) -> Vec<MoteId> {
        let mut seen = BTreeSet::new();
        self.members
            .iter()
            .chain(std::iter::once(&self.sender))
            .filter(|id| seen.insert(*id))
            .cloned()
            .collect()
    }
}
