//! Bounded fire-and-forget execution of sink sends.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use f1_ingest_packets::PacketKind;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::error::SinkError;

/// Default number of concurrent in-flight sends.
pub const DEFAULT_SEND_POOL_SIZE: usize = 40;

/// Runs sink sends as detached tokio tasks, at most `capacity` at a time.
///
/// A send submitted while the pool is full is dropped and counted; nothing
/// queues and the caller never waits.
#[derive(Debug, Clone)]
pub struct SendPool {
    permits: Arc<Semaphore>,
    capacity: u32,
    dropped: Arc<AtomicU64>,
    failed: Arc<AtomicU64>,
}

impl SendPool {
    pub fn new(capacity: usize) -> Self {
        let capacity = u32::try_from(capacity.clamp(1, Semaphore::MAX_PERMITS))
            .unwrap_or(u32::MAX)
            .max(1);
        Self {
            permits: Arc::new(Semaphore::new(capacity as usize)),
            capacity,
            dropped: Arc::new(AtomicU64::new(0)),
            failed: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Spawn `send` if a slot is free. Returns `false` when it was dropped.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(&self, kind: PacketKind, sink: &'static str, send: F) -> bool
    where
        F: Future<Output = Result<(), SinkError>> + Send + 'static,
    {
        let permit = match Arc::clone(&self.permits).try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                debug!(kind = %kind, sink, "send pool saturated, dropping send");
                return false;
            }
        };

        let failed = Arc::clone(&self.failed);
        tokio::spawn(async move {
            if let Err(err) = send.await {
                failed.fetch_add(1, Ordering::Relaxed);
                warn!(kind = %kind, sink, error = %err, "failed to forward packet");
            }
            drop(permit);
        });
        true
    }

    /// Sends dropped because the pool was saturated.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Sends that ran and returned an error.
    pub fn failed_count(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn in_flight(&self) -> usize {
        (self.capacity as usize).saturating_sub(self.permits.available_permits())
    }

    /// Wait until every in-flight send has finished, up to `timeout`.
    /// Returns `false` on timeout.
    pub async fn flush(&self, timeout: Duration) -> bool {
        match tokio::time::timeout(timeout, self.permits.acquire_many(self.capacity)).await {
            Ok(Ok(_all)) => true,
            Ok(Err(_closed)) => true,
            Err(_elapsed) => false,
        }
    }
}

impl Default for SendPool {
    fn default() -> Self {
        Self::new(DEFAULT_SEND_POOL_SIZE)
    }
}
