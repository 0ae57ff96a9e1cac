//! Motenet Groups - Membership Reconciliation for Mote Swarms
//!
//! Motes periodically report which other motes they can currently hear.
//! This crate folds those reports into a fixed set of group slots, keeps
//! running cardinality statistics per group, expires members that went
//! quiet, and dismantles groups that became too small to be viable.
//!
//! # Components
//!
//! - **Store**: fixed-size table of [`GroupRecord`]s, allocated once at bootstrap
//! - **Stats**: incremental min/max/mean over cardinality observations
//! - **Reconcile**: applies one [`MembershipReport`] to the store
//! - **Sweep**: periodic liveness pass that expires silent members
//! - **Lifecycle**: resets undersized groups and reports [`Dismantled`] events
//!
//! [`GroupEngine`] ties them together around an injectable [`Clock`].
//!
//! # Example
//!
//! ```
//! use motenet_groups::{GroupEngine, GroupsConfig, ManualClock, MembershipReport};
//!
//! let clock = ManualClock::new(1_000);
//! let mut engine = GroupEngine::new(GroupsConfig::default(), clock.clone()).unwrap();
//!
//! let report = MembershipReport::new("m1", ["m1", "m2", "m3"]);
//! let outcome = engine.handle_report(&report).unwrap();
//! assert!(outcome.dismantled.is_empty());
//!
//! clock.advance(60_000);
//! let sweep = engine.tick();
//! assert_eq!(sweep.dismantled.len(), 1);
//! ```

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod lifecycle;
pub mod reconcile;
pub mod record;
pub mod stats;
pub mod store;
pub mod sweep;

pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use config::GroupsConfig;
pub use engine::{GroupEngine, ReportOutcome};
pub use error::{Error, Result};
pub use ingest::RawMessage;
pub use lifecycle::{DismantleReason, Dismantled};
pub use record::{GroupId, GroupRecord, GroupStatistics, MemberRecord, MembershipReport, MoteId};
pub use store::{GroupStore, StoreSnapshot};
pub use sweep::SweepReport;

/// Motes per group used to size the store: `floor(num_motes / 3)` slots.
pub const MOTES_PER_GROUP: usize = 3;

/// Default member inactivity timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Default minimum number of members for a group to stay alive.
pub const DEFAULT_MIN_GROUP_SIZE: usize = 3;
