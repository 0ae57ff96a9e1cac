//! Group lifecycle: the viability check and dismantling.
//!
//! ```text
//!            reconcile (free slot)
//!   Empty ──────────────────────────▶ Populated
//!     ▲                                   │
//!     └──────── cardinality < min ────────┘
//! ```
//!
//! Viability is re-evaluated after every reconciliation (the survivability
//! pass) and on every sweep. There is no grace period: a group formed from
//! an undersized report is dismantled in the same cycle.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::clock::Timestamp;
use crate::record::{GroupId, GroupRecord};
use crate::store::GroupStore;

/// Why a group was dismantled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DismantleReason {
    /// Fewer members than the minimum viable size.
    Undersized,
}

impl std::fmt::Display for DismantleReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undersized => write!(f, "insufficient members"),
        }
    }
}

/// A group was reset to its empty baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct Dismantled {
    pub group: GroupId,
    pub reason: DismantleReason,
    pub timestamp: Timestamp,
}

/// Dismantle `group` if it has left the empty baseline and is below `min_size`.
pub fn check_viability(
    group: &mut GroupRecord,
    min_size: usize,
    now: Timestamp,
) -> Option<Dismantled> {
    if group.is_baseline() || group.cardinality >= min_size {
        return None;
    }

    let event = Dismantled {
        group: group.id,
        reason: DismantleReason::Undersized,
        timestamp: now,
    };
    group.reset(now);

    warn!(
        "Group {} has been dismantled due to {} (min {})",
        event.group, event.reason, min_size
    );
    Some(event)
}

/// Run the viability check over every group.
pub fn survivability_pass(store: &mut GroupStore, min_size: usize, now: Timestamp) -> Vec<Dismantled> {
    store
        .groups_mut()
        .filter_map(|group| check_viability(group, min_size, now))
        .collect()
}
