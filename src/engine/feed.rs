use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::types::{Alert, Severity};

/// The ranked, filtered, read-stamped feed handed to the UI. A plain value
/// owned by the caller; the engine keeps no copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertFeed {
    alerts: Vec<Alert>,
}

/// Badge and header counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FeedSummary {
    pub total: usize,
    pub unread: usize,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub successes: usize,
}

impl AlertFeed {
    pub fn new(alerts: Vec<Alert>) -> Self {
        Self { alerts }
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn ids(&self) -> Vec<String> {
        self.alerts.iter().map(|a| a.id.clone()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.alerts.iter().filter(|a| !a.read).count()
    }

    pub fn summary(&self) -> FeedSummary {
        let mut summary = FeedSummary {
            total: self.alerts.len(),
            unread: self.unread_count(),
            ..Default::default()
        };
        for alert in &self.alerts {
            match alert.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Info => summary.infos += 1,
                Severity::Success => summary.successes += 1,
            }
        }
        summary
    }

    // Optimistic patches applied by the mutation API.

    pub(crate) fn mark_read(&mut self, id: &str) {
        if let Some(alert) = self.alerts.iter_mut().find(|a| a.id == id) {
            alert.read = true;
        }
    }

    pub(crate) fn mark_all_read(&mut self) {
        self.alerts.iter_mut().for_each(|a| a.read = true);
    }

    pub(crate) fn remove(&mut self, id: &str) {
        self.alerts.retain(|a| a.id != id);
    }

    pub(crate) fn clear(&mut self) {
        self.alerts.clear();
    }
}
