//! Motenet Node - Group Tracker Service
//!
//! Runs the [`motenet_groups`] engine as a long-lived process:
//!
//! - **Input**: broker messages handed over as JSON lines
//!   (`{"topic": "nsds/contacts/<mote>", "payload": {...}}`)
//! - **Sweeper**: background task running the liveness sweep on a fixed interval
//! - **Output**: a store snapshot per handled message, plus a broadcast
//!   stream of dismantle events
//!
//! # Example
//!
//! ```no_run
//! use motenet_node::{GroupService, NodeConfig, ShutdownSignal};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = NodeConfig::from_env()?;
//!     let service = GroupService::with_system_clock(config.groups.clone())?;
//!     let shutdown = ShutdownSignal::new();
//!     let sweeper = service.spawn_sweeper(config.groups.sweep_interval, &shutdown);
//!
//!     let stdin = tokio::io::BufReader::new(tokio::io::stdin());
//!     service.run_lines(stdin, Some(tokio::io::stdout())).await?;
//!
//!     shutdown.shutdown();
//!     sweeper.await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod service;
pub mod shutdown;

pub use config::{NodeConfig, DEFAULT_LOG_FILTER};
pub use error::{Error, Result};
pub use service::GroupService;
pub use shutdown::{ShutdownListener, ShutdownSignal};
