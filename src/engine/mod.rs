//! Alert generation and notification-state engine.
//!
//! `refresh_feed` is a pure pull: fetch snapshots, run detectors, merge,
//! then filter and stamp against the persisted read/dismissed sets. The
//! mutation methods write those sets and patch the caller's feed in place.

pub mod aggregator;
pub mod detectors;
pub mod feed;
pub mod format;
pub mod identity;
pub mod snapshot;
pub mod state;
pub mod thresholds;
pub mod types;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use detectors::{DetectContext, Detector};
use feed::AlertFeed;
use format::Formatter;
use snapshot::{Snapshot, SnapshotProvider};
use state::NotificationStore;
use types::Alert;

pub struct AlertEngine {
    provider: Arc<dyn SnapshotProvider>,
    formatter: Arc<dyn Formatter>,
    store: NotificationStore,
    detectors: Vec<Box<dyn Detector>>,
}

impl AlertEngine {
    pub fn new(
        provider: Arc<dyn SnapshotProvider>,
        formatter: Arc<dyn Formatter>,
        store: NotificationStore,
    ) -> Self {
        Self {
            provider,
            formatter,
            store,
            detectors: detectors::registry(),
        }
    }

    /// Recompute the feed from live data. Never fails: every error path
    /// degrades to fewer alerts.
    #[tracing::instrument(skip(self))]
    pub async fn refresh_feed(&self, now: DateTime<Utc>) -> AlertFeed {
        let snapshot = snapshot::fetch_snapshot(self.provider.as_ref()).await;

        // Everything below is synchronous: detectors and the state load see
        // one consistent view, with no await in between.
        let candidates = self.candidates(&snapshot, now);
        let state = self.store.load();
        let alerts = NotificationStore::assemble_feed(candidates, &state);

        tracing::info!(
            dismissed = state.dismissed.len(),
            shown = alerts.len(),
            "Alert feed refreshed"
        );
        AlertFeed::new(alerts)
    }

    /// Ranked candidates for a snapshot, before read/dismiss reconciliation.
    pub fn candidates(&self, snapshot: &Snapshot, now: DateTime<Utc>) -> Vec<Alert> {
        let ctx = DetectContext {
            now,
            formatter: self.formatter.as_ref(),
        };
        aggregator::merge(detectors::run_all(&self.detectors, snapshot, &ctx))
    }

    pub fn mark_read(&self, feed: &mut AlertFeed, id: &str) {
        self.store.add_read([id]);
        feed.mark_read(id);
    }

    /// Mark every alert currently in `feed` as read, in one write.
    pub fn mark_all_read(&self, feed: &mut AlertFeed) {
        self.store.add_read(feed.ids());
        feed.mark_all_read();
    }

    pub fn dismiss(&self, feed: &mut AlertFeed, id: &str) {
        self.store.add_dismissed([id]);
        feed.remove(id);
    }

    /// Dismiss every alert currently in `feed`, in one write.
    pub fn clear_all(&self, feed: &mut AlertFeed) {
        self.store.add_dismissed(feed.ids());
        feed.clear();
    }
}
