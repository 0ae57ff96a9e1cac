//! Group service - the shared engine plus the tasks that drive it.
//!
//! Architecture:
//! - One `GroupEngine` behind a single `tokio::sync::Mutex`; every report
//!   and every sweep runs to completion while holding it
//! - A background sweeper task ticking at the configured interval
//! - A broadcast channel of dismantle events for anyone interested

use std::sync::Arc;
use std::time::Duration;

use motenet_groups::{
    Clock, Dismantled, GroupEngine, GroupsConfig, RawMessage, ReportOutcome, StoreSnapshot,
    SweepReport, SystemClock,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::shutdown::ShutdownSignal;

/// Capacity of the dismantle event channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Shared handle to the group engine.
pub struct GroupService<C = SystemClock> {
    engine: Arc<Mutex<GroupEngine<C>>>,
    events: broadcast::Sender<Dismantled>,
}

impl<C> Clone for GroupService<C> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            events: self.events.clone(),
        }
    }
}

impl GroupService<SystemClock> {
    /// Service on the system clock.
    pub fn with_system_clock(config: GroupsConfig) -> Result<Self> {
        Self::new(config, SystemClock)
    }
}

impl<C: Clock + 'static> GroupService<C> {
    /// Bootstrap the engine and wrap it for sharing.
    pub fn new(config: GroupsConfig, clock: C) -> Result<Self> {
        let engine = GroupEngine::new(config, clock)?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Ok(Self {
            engine: Arc::new(Mutex::new(engine)),
            events,
        })
    }

    /// Run `f` with exclusive access to the engine.
    pub async fn with_engine<R>(&self, f: impl FnOnce(&mut GroupEngine<C>) -> R) -> R {
        let mut engine = self.engine.lock().await;
        f(&mut engine)
    }

    /// Subscribe to dismantle events.
    pub fn subscribe(&self) -> broadcast::Receiver<Dismantled> {
        self.events.subscribe()
    }

    /// Handle one broker message.
    pub async fn handle_message(&self, message: RawMessage) -> Result<ReportOutcome> {
        let outcome = self.with_engine(|engine| engine.handle_message(message)).await?;
        self.publish(&outcome.dismantled);
        Ok(outcome)
    }

    /// Handle one JSON line (`{"topic": ..., "payload": ...}`).
    pub async fn handle_line(&self, line: &str) -> Result<ReportOutcome> {
        let message = RawMessage::from_json(line)?;
        self.handle_message(message).await
    }

    /// Run one liveness sweep now.
    pub async fn sweep(&self) -> SweepReport {
        let report = self.with_engine(|engine| engine.tick()).await;
        self.publish(&report.dismantled);
        report
    }

    /// Current store contents.
    pub async fn snapshot(&self) -> StoreSnapshot {
        self.with_engine(|engine| engine.snapshot()).await
    }

    fn publish(&self, dismantled: &[Dismantled]) {
        for event in dismantled {
            // No subscribers is fine; events are also logged by the engine.
            let _ = self.events.send(event.clone());
        }
    }

    /// Spawn the periodic sweep; it stops when `shutdown` fires.
    pub fn spawn_sweeper(&self, period: Duration, shutdown: &ShutdownSignal) -> JoinHandle<()> {
        let service = self.clone();
        let mut stop = shutdown.listen();

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!("Sweeper started (every {:?})", period);

            loop {
                tokio::select! {
                    _ = stop.stopped() => break,
                    _ = ticker.tick() => {
                        let report = service.sweep().await;
                        if !report.is_empty() {
                            debug!(
                                "Sweep expired {} members, dismantled {} groups",
                                report.expired.len(),
                                report.dismantled.len()
                            );
                        }
                    }
                }
            }

            info!("Sweeper stopped");
        })
    }

    /// Feed every line of `reader` through the engine.
    ///
    /// Bad lines and rejected reports are logged and skipped. When `output`
    /// is given, the snapshot after each handled line is written to it as one
    /// JSON line. Returns the number of lines that were applied.
    pub async fn run_lines<R, W>(&self, reader: R, mut output: Option<W>) -> Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut applied = 0;

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match self.handle_line(line).await {
                Ok(outcome) => {
                    applied += 1;
                    if let Some(out) = output.as_mut() {
                        let mut json = serde_json::to_vec(&outcome.snapshot)?;
                        json.push(b'\n');
                        out.write_all(&json).await?;
                        out.flush().await?;
                    }
                }
                Err(e) if e.is_recoverable() => warn!("Dropped message: {}", e),
                Err(e) => return Err(e),
            }
        }

        Ok(applied)
    }
}
