//! Periodic refresh of the ranking charts
//!
//! A background task re-runs [`Dashboard::top_universities`] on a fixed
//! interval with the most recently requested range and publishes each result
//! as a [`RankingSnapshot`]. A range change re-queries immediately.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::views::{Dashboard, RankRange, RankingCharts};

/// Ranking charts as of one refresh
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingSnapshot {
    pub range: RankRange,
    pub charts: RankingCharts,
    pub refreshed_at: DateTime<Utc>,
}

/// Handle to a running refresh task; stopping or dropping the handle ends the task
pub struct RefreshTask {
    range: watch::Sender<RankRange>,
    snapshots: watch::Receiver<Option<RankingSnapshot>>,
    task: JoinHandle<()>,
}

impl RefreshTask {
    /// Start refreshing `range` every `period`, beginning immediately
    pub fn spawn(dashboard: Dashboard, range: RankRange, period: Duration) -> Self {
        let (range_tx, mut range_rx) = watch::channel(range);
        let (snapshot_tx, snapshot_rx) = watch::channel(None);

        info!("Ranking refresh every {:?} starting with range {}", period, range);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    changed = range_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        ticker.reset();
                    }
                }
                let range = *range_rx.borrow_and_update();
                let charts = dashboard.top_universities(range).await;
                debug!("Refreshed rankings for {}", range);
                let snapshot = RankingSnapshot {
                    range,
                    charts,
                    refreshed_at: Utc::now(),
                };
                if snapshot_tx.send(Some(snapshot)).is_err() {
                    break;
                }
            }
        });

        Self {
            range: range_tx,
            snapshots: snapshot_rx,
            task,
        }
    }

    /// Switch the refreshed range. Returns whether it changed; only a change
    /// wakes the task for an immediate re-query.
    pub fn set_range(&self, range: RankRange) -> bool {
        self.range
            .send_if_modified(|current| std::mem::replace(current, range) != range)
    }

    /// Range currently being refreshed
    pub fn range(&self) -> RankRange {
        *self.range.borrow()
    }

    /// Most recent snapshot, if a refresh has completed
    pub fn latest(&self) -> Option<RankingSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified on every new snapshot
    pub fn subscribe(&self) -> watch::Receiver<Option<RankingSnapshot>> {
        self.snapshots.clone()
    }

    pub fn stop(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        self.task.abort();
    }
}
