//! Periodic liveness sweep.

use serde::Serialize;
use tracing::debug;

use crate::clock::Timestamp;
use crate::lifecycle::{self, Dismantled};
use crate::record::{GroupId, MoteId};
use crate::stats;
use crate::store::GroupStore;

/// What a sweep changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SweepReport {
    /// Members removed for inactivity.
    pub expired: Vec<(GroupId, MoteId)>,
    /// Groups reset by the viability check.
    pub dismantled: Vec<Dismantled>,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.expired.is_empty() && self.dismantled.is_empty()
    }
}

/// Expire members silent for at least `timeout_ms`, then check viability.
pub fn sweep(store: &mut GroupStore, timeout_ms: u64, min_size: usize, now: Timestamp) -> SweepReport {
    let mut report = SweepReport::default();

    for group in store.groups_mut() {
        if group.is_baseline() {
            continue;
        }

        let created_at = group.created_at;
        let id = group.id;
        group.members.retain(|member| {
            let last_seen = member.last_active.unwrap_or(created_at);
            let alive = now.saturating_sub(last_seen) < timeout_ms;
            if !alive {
                debug!("Member {} of group {} timed out", member.id, id);
                report.expired.push((id, member.id.clone()));
            }
            alive
        });

        if group.members.len() != group.cardinality {
            stats::update(group, group.members.len(), now);
        }

        match lifecycle::check_viability(group, min_size, now) {
            Some(event) => report.dismantled.push(event),
            None => stats::refresh_lifetime(group, now),
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{GroupRecord, MemberRecord};

    fn group(id: u32, created_at: Timestamp, members: &[(&str, Option<Timestamp>)]) -> GroupRecord {
        let mut group = GroupRecord::empty(GroupId(id));
        group.created_at = created_at;
        group.members = members
            .iter()
            .map(|(m, t)| MemberRecord::new(MoteId::from(*m), *t))
            .collect();
        stats::update(&mut group, members.len(), created_at);
        group
    }

    #[test]
    fn fresh_members_survive() {
        let mut store = GroupStore::with_groups(1);
        store.set(group(1, 0, &[("a", Some(0)), ("b", None), ("c", None)]));

        let report = sweep(&mut store, 60_000, 3, 59_999);
        assert!(report.is_empty());

        let g = store.get(GroupId(1)).unwrap();
        assert_eq!(g.cardinality, 3);
        assert_eq!(g.stats.index, 1);
        assert!((g.lifetime_seconds - 59.999).abs() < 1e-9);
    }

    #[test]
    fn timeout_boundary_is_inclusive() {
        let mut store = GroupStore::with_groups(1);
        store.set(group(
            1,
            0,
            &[("a", Some(10_000)), ("b", Some(10_000)), ("c", Some(10_000)), ("d", None)],
        ));

        let report = sweep(&mut store, 60_000, 3, 60_000);
        assert_eq!(report.expired, [(GroupId(1), MoteId::from("d"))]);
        assert!(report.dismantled.is_empty());

        let g = store.get(GroupId(1)).unwrap();
        assert_eq!(g.cardinality, 3);
        assert_eq!(g.stats.index, 2);
        assert_eq!(g.stats.minimum, Some(3));
        assert_eq!(g.stats.maximum, 4);
    }

    #[test]
    fn shrinking_below_minimum_dismantles() {
        let mut store = GroupStore::with_groups(2);
        store.set(group(1, 0, &[("a", Some(70_000)), ("b", Some(70_000)), ("c", Some(0))]));
        store.set(group(2, 0, &[("d", Some(70_000)), ("e", Some(70_000)), ("f", Some(70_000))]));

        let report = sweep(&mut store, 60_000, 3, 80_000);
        assert_eq!(report.expired.len(), 1);
        assert_eq!(report.dismantled.len(), 1);
        assert_eq!(report.dismantled[0].group, GroupId(1));

        let g = store.get(GroupId(1)).unwrap();
        assert!(g.is_baseline());
        assert_eq!(g.dismantle_timer, 80_000);
        assert_eq!(store.get(GroupId(2)).unwrap().cardinality, 3);
    }

    #[test]
    fn baseline_slots_are_skipped() {
        let mut store = GroupStore::with_groups(2);
        let before = store.clone();

        assert!(sweep(&mut store, 60_000, 3, 1_000_000).is_empty());
        assert_eq!(store, before);
    }
}
