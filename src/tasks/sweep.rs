//! Window Sweep Task
//!
//! Background task that periodically removes closed rate-limit windows, so
//! identities that go quiet do not keep a record alive.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::limiter::RateLimiter;

/// Spawns a background task that periodically sweeps expired windows.
///
/// The task runs in an infinite loop, sleeping for `interval` between
/// sweeps. It takes the limiter's write lock for each sweep, which orders
/// expiry against concurrent admissions.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let limiter = Arc::new(RwLock::new(RateLimiter::new(Duration::from_secs(60), 100)));
/// let sweep_handle = spawn_sweep_task(limiter.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(limiter: Arc<RwLock<RateLimiter>>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "Starting rate-limit window sweep");

        loop {
            tokio::time::sleep(interval).await;

            let (removed, active) = {
                let mut guard = limiter.write().await;
                let removed = guard.sweep_expired();
                (removed, guard.stats().active_windows)
            };

            if removed > 0 {
                info!(removed, active, "Window sweep: removed expired windows");
            } else {
                debug!(active, "Window sweep: no expired windows");
            }
        }
    })
}
