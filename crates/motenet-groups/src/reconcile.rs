//! Membership reconciliation.
//!
//! Applies one [`MembershipReport`] to the store:
//!
//! 1. Find every group that already lists the sender.
//! 2. None: claim the first free slot for `members ∪ {sender}`.
//! 3. Some: for each match, compare member sets ignoring order. A changed
//!    set replaces the membership and records a statistics observation. An
//!    unchanged set only refreshes the sender's activity time and the
//!    group's lifetime.
//!
//! Member timestamps are carried over for motes that stay in a group, so
//! silent motes still age out through the sweeper.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::clock::Timestamp;
use crate::error::{Error, Result};
use crate::record::{GroupId, GroupRecord, MemberRecord, MembershipReport};
use crate::stats;
use crate::store::GroupStore;

/// Apply `report` and return the ids of the groups it touched, in slot order.
///
/// Fails with [`Error::NoCapacity`] when the sender is in no group and
/// every slot is taken; the store is not modified in that case.
pub fn reconcile(store: &mut GroupStore, report: &MembershipReport, now: Timestamp) -> Result<Vec<GroupId>> {
    let matches = store.containing(&report.sender);

    if matches.is_empty() {
        let id = store.first_free().ok_or_else(|| Error::NoCapacity {
            sender: report.sender.clone(),
        })?;
        if let Some(group) = store.get_mut(id) {
            form_group(group, report, now);
        }
        return Ok(vec![id]);
    }

    for &id in &matches {
        if let Some(group) = store.get_mut(id) {
            merge_report(group, report, now);
        }
    }
    Ok(matches)
}

/// Populate a free slot from `report`.
fn form_group(group: &mut GroupRecord, report: &MembershipReport, now: Timestamp) {
    group.members = report
        .effective_members()
        .into_iter()
        .map(|id| {
            let last_active = (id == report.sender).then_some(now);
            MemberRecord::new(id, last_active)
        })
        .collect();
    group.created_at = now;
    stats::update(group, group.members.len(), now);

    info!(
        "Group {} formed by {} with {} members",
        group.id, report.sender, group.cardinality
    );
}

/// Fold `report` into a group that already contains the sender.
fn merge_report(group: &mut GroupRecord, report: &MembershipReport, now: Timestamp) {
    let reported = report.effective_members();
    let reported_set: BTreeSet<_> = reported.iter().collect();

    if group.member_ids() == reported_set {
        if let Some(sender) = group.member_mut(&report.sender) {
            sender.last_active = Some(now);
        }
        stats::refresh_lifetime(group, now);
        debug!("Group {} unchanged by report from {}", group.id, report.sender);
        return;
    }

    let members: Vec<_> = reported
        .into_iter()
        .map(|id| {
            let last_active = if id == report.sender {
                Some(now)
            } else {
                group.member(&id).map_or(Some(now), |m| m.last_active)
            };
            MemberRecord::new(id, last_active)
        })
        .collect();

    debug!(
        "Group {} membership changed by {}: {} -> {} members",
        group.id,
        report.sender,
        group.members.len(),
        members.len()
    );

    group.members = members;
    stats::update(group, group.members.len(), now);
}
