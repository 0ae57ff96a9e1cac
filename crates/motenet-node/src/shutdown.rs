//! Stop flag for the node's background tasks.

use std::sync::Arc;
use tokio::sync::watch;

/// Latched stop flag shared by the node and its tasks.
///
/// Once raised it stays raised, so a task that starts listening after
/// [`shutdown`](Self::shutdown) still stops.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    raised: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (raised, _) = watch::channel(false);
        Self {
            raised: Arc::new(raised),
        }
    }

    /// Raise the flag.
    pub fn shutdown(&self) {
        self.raised.send_replace(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.raised.borrow()
    }

    /// Handle for one task to wait on.
    pub fn listen(&self) -> ShutdownListener {
        ShutdownListener {
            raised: self.raised.subscribe(),
        }
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Waits for a [`ShutdownSignal`].
#[derive(Debug)]
pub struct ShutdownListener {
    raised: watch::Receiver<bool>,
}

impl ShutdownListener {
    /// Resolves once the flag is raised, or once every signal is dropped.
    pub async fn stopped(&mut self) {
        let _ = self.raised.wait_for(|raised| *raised).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn listeners_see_shutdown() {
        let signal = ShutdownSignal::new();
        let mut early = signal.listen();

        let task = tokio::spawn(async move { early.stopped().await });

        signal.shutdown();
        assert!(signal.is_shutdown());
        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn late_listener_stops_immediately() {
        let signal = ShutdownSignal::new();
        signal.clone().shutdown();

        let mut late = signal.listen();
        tokio::time::timeout(Duration::from_secs(5), late.stopped())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn dropped_signal_releases_listeners() {
        let signal = ShutdownSignal::new();
        let mut listener = signal.listen();
        drop(signal);

        tokio::time::timeout(Duration::from_secs(5), listener.stopped())
            .await
            .unwrap();
    }
}
