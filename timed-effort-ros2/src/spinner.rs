use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::{task::JoinHandle, time::MissedTickBehavior};

/// Background task spinning one `r2r::Node`. Aborted when dropped.
pub(crate) struct Spinner {
    handle: JoinHandle<()>,
}

impl Spinner {
    /// Must be called within a tokio runtime.
    pub(crate) fn start(node: Arc<Mutex<r2r::Node>>, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                // Zero timeout: blocking here would stall the runtime with the lock held.
                node.lock().spin_once(Duration::ZERO);
            }
        });
        Self { handle }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
