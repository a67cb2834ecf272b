//! Reaper Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cache::{remove_expired, EntryMap};

/// Spawns a background task that removes expired entries once per `interval`.
///
/// The first sweep happens one full interval after the task starts. Each
/// sweep holds the write lock only while scanning the current entry set.
///
/// # Arguments
/// * `runtime` - Runtime to spawn onto
/// * `entries` - Shared entry map, the same one the cache reads and writes
/// * `interval` - Sweep period, also the maximum entry age
/// * `shutdown` - The task exits once `true` is sent or the sender is dropped
///
/// # Returns
/// A JoinHandle for the spawned task, which can also be used to abort it.
pub fn spawn_reaper_task(
    runtime: &Handle,
    entries: Arc<RwLock<EntryMap>>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    runtime.spawn(async move {
        info!(
            interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            "Starting cache reaper task"
        );

        let Some(first_sweep) = Instant::now().checked_add(interval) else {
            warn!("Cache reaper: interval too large to schedule, not reaping");
            return;
        };
        let mut ticker = time::interval_at(first_sweep, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                tick = ticker.tick() => {
                    let removed = {
                        let mut guard = entries.write().await;
                        remove_expired(&mut guard, tick, interval)
                    };

                    if removed > 0 {
                        info!("Cache reaper: removed {} expired entries", removed);
                    } else {
                        debug!("Cache reaper: no expired entries found");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Cache reaper task stopped");
    })
}
