//! The group engine: one store, one clock, one configuration.
//!
//! Both entry points run to completion against `&mut self`. Callers that
//! share an engine across tasks serialize access with a single lock.

use serde::Serialize;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::config::GroupsConfig;
use crate::error::Result;
use crate::ingest::RawMessage;
use crate::lifecycle::{self, Dismantled};
use crate::reconcile;
use crate::record::{GroupId, MembershipReport};
use crate::store::{GroupStore, StoreSnapshot};
use crate::sweep::{self, SweepReport};

/// Result of handling one report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportOutcome {
    /// Groups the report was applied to.
    pub touched: Vec<GroupId>,
    /// Groups reset by the survivability pass that followed.
    pub dismantled: Vec<Dismantled>,
    /// Full store after both steps.
    pub snapshot: StoreSnapshot,
}

/// Tracks groups for a fixed mote population.
#[derive(Debug)]
pub struct GroupEngine<C = SystemClock> {
    store: GroupStore,
    config: GroupsConfig,
    clock: C,
}

impl GroupEngine<SystemClock> {
    /// Engine on the system clock.
    pub fn with_system_clock(config: GroupsConfig) -> Result<Self> {
        Self::new(config, SystemClock)
    }
}

impl<C: Clock> GroupEngine<C> {
    /// Validate `config` and bootstrap an empty store.
    pub fn new(config: GroupsConfig, clock: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store: GroupStore::bootstrap(config.num_motes),
            config,
            clock,
        })
    }

    /// Reconcile `report`, then run the survivability pass.
    ///
    /// A rejected report leaves the store exactly as it was.
    pub fn handle_report(&mut self, report: &MembershipReport) -> Result<ReportOutcome> {
        let now = self.clock.now();
        let touched = reconcile::reconcile(&mut self.store, report, now)?;
        let dismantled = lifecycle::survivability_pass(&mut self.store, self.config.minimum_viable_size, now);

        debug!(
            "Report from {} touched {:?}, dismantled {}",
            report.sender,
            touched,
            dismantled.len()
        );

        Ok(ReportOutcome {
            touched,
            dismantled,
            snapshot: self.store.snapshot(),
        })
    }

    /// Normalize a raw broker message and handle it.
    pub fn handle_message(&mut self, message: RawMessage) -> Result<ReportOutcome> {
        let report = message.into_report()?;
        self.handle_report(&report)
    }

    /// Run one liveness sweep.
    pub fn tick(&mut self) -> SweepReport {
        let now = self.clock.now();
        sweep::sweep(
            &mut self.store,
            self.config.timeout_ms(),
            self.config.minimum_viable_size,
            now,
        )
    }

    pub fn store(&self) -> &GroupStore {
        &self.store
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.store.snapshot()
    }

    pub fn config(&self) -> &GroupsConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
