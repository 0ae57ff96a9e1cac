//! Motenet node binary
//!
//! Reads broker messages as JSON lines on stdin, prints a group snapshot
//! per message on stdout, and sweeps for inactive members in the background.
//! Stops on end of input or Ctrl-C.

use motenet_node::{GroupService, NodeConfig, ShutdownSignal, DEFAULT_LOG_FILTER};
use tokio::io::{stdin, stdout, BufReader, Stdout};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries snapshots.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = NodeConfig::from_env()?;
    tracing::info!(
        "Starting motenet node: {} motes, {} group slots, timeout {:?}, min size {}",
        config.groups.num_motes,
        config.groups.num_groups(),
        config.groups.timeout_threshold,
        config.groups.minimum_viable_size
    );

    let service = GroupService::with_system_clock(config.groups.clone())?;
    let shutdown = ShutdownSignal::new();
    let sweeper = service.spawn_sweeper(config.groups.sweep_interval, &shutdown);

    let output: Option<Stdout> = config.print_snapshots.then(stdout);
    let input = BufReader::new(stdin());

    let interrupted = tokio::select! {
        result = service.run_lines(input, output) => {
            let applied = result?;
            tracing::info!("Input closed after {} messages", applied);
            false
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted");
            true
        }
    };

    shutdown.shutdown();
    sweeper.await?;

    if interrupted {
        // A pending stdin read would otherwise keep the runtime from shutting down.
        std::process::exit(0);
    }

    Ok(())
}
