//! Alert detectors: one pure rule function per financial domain.
//!
//! No DB or async dependencies. Each detector reads the snapshot and `now`,
//! and returns candidate alerts. Detectors never see each other's output.

mod bill;
mod budget;
mod debt;
mod goal;
mod spending;
mod subscription;

pub use bill::BillDetector;
pub use budget::BudgetDetector;
pub use debt::DebtDetector;
pub use goal::GoalDetector;
pub use spending::SpendingDetector;
pub use subscription::SubscriptionDetector;

use chrono::{DateTime, Utc};

use super::format::Formatter;
use super::identity::alert_id;
use super::snapshot::Snapshot;
use super::thresholds::DAY_MS;
use super::types::{Alert, AlertCategory, Severity};
use crate::error::AppError;

/// Inputs shared by every detector run.
pub struct DetectContext<'a> {
    pub now: DateTime<Utc>,
    pub formatter: &'a dyn Formatter,
}

impl DetectContext<'_> {
    pub fn money(&self, amount: f64) -> String {
        self.formatter.format_currency(amount)
    }

    pub fn percent(&self, value: f64, decimals: usize) -> String {
        self.formatter.format_percent(value, decimals)
    }

    pub fn t(&self, key: &str, params: &[(&str, String)]) -> String {
        self.formatter.translate(key, params)
    }
}

pub trait Detector: Send + Sync {
    /// Label for logs.
    fn name(&self) -> &'static str;

    fn detect(&self, snapshot: &Snapshot, ctx: &DetectContext<'_>) -> Result<Vec<Alert>, AppError>;
}

/// The registry, in the fixed order the aggregator concatenates them.
pub fn registry() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(BudgetDetector),
        Box::new(GoalDetector),
        Box::new(SubscriptionDetector),
        Box::new(BillDetector),
        Box::new(DebtDetector),
        Box::new(SpendingDetector),
    ]
}

/// Run every detector in order. A detector that fails contributes nothing;
/// the others still run.
pub fn run_all(
    detectors: &[Box<dyn Detector>],
    snapshot: &Snapshot,
    ctx: &DetectContext<'_>,
) -> Vec<Vec<Alert>> {
    detectors
        .iter()
        .map(|detector| match detector.detect(snapshot, ctx) {
            Ok(alerts) => {
                tracing::debug!(detector = detector.name(), count = alerts.len(), "Detector finished");
                alerts
            }
            Err(e) => {
                tracing::warn!(detector = detector.name(), error = %e, "Detector failed, skipping");
                Vec::new()
            }
        })
        .collect()
}

/// Iterate the entities that pass `validate`, logging the ones that don't.
pub(crate) fn well_formed<'a, T, F>(
    detector: &'static str,
    items: &'a [T],
    validate: F,
) -> impl Iterator<Item = &'a T> + 'a
where
    F: Fn(&T) -> Result<(), AppError> + 'a,
{
    items.iter().filter(move |item| match validate(*item) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(detector, error = %e, "Skipping malformed entity");
            false
        }
    })
}

/// Everything a detector decides about one alert; `build` derives the id
/// and the display time.
pub(crate) struct NewAlert<'a> {
    pub category: AlertCategory,
    pub entity_id: &'a str,
    pub bucket: String,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub route: Option<String>,
    pub rank: DateTime<Utc>,
}

impl NewAlert<'_> {
    pub fn build(self, ctx: &DetectContext<'_>) -> Alert {
        let rank = self.rank.timestamp_millis();
        Alert {
            id: alert_id(self.category, self.entity_id, &self.bucket),
            category: self.category,
            severity: self.severity,
            title: self.title,
            message: self.message,
            display_time: relative_time(ctx, rank),
            route: self.route,
            rank,
            read: false,
        }
    }
}

/// "Just now", "5m ago", "3h ago", "2d ago".
pub(crate) fn relative_time(ctx: &DetectContext<'_>, rank_ms: i64) -> String {
    let elapsed = ctx.now.timestamp_millis() - rank_ms;
    let minutes = elapsed / 60_000;
    if minutes < 1 {
        ctx.t("time.just_now", &[])
    } else if minutes < 60 {
        ctx.t("time.minutes_ago", &[("count", minutes.to_string())])
    } else if elapsed < DAY_MS {
        ctx.t("time.hours_ago", &[("count", (minutes / 60).to_string())])
    } else {
        ctx.t("time.days_ago", &[("count", (elapsed / DAY_MS).to_string())])
    }
}

/// Shared wording for "today" / "tomorrow" / "in N days" message variants.
pub(crate) fn when_key(prefix: &str, days: i64) -> String {
    match days {
        0 => format!("{prefix}.today"),
        1 => format!("{prefix}.tomorrow"),
        _ => format!("{prefix}.days"),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    struct Broken;

    impl Detector for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn detect(&self, _: &Snapshot, _: &DetectContext<'_>) -> Result<Vec<Alert>, AppError> {
            Err(AppError::Detector("boom".into()))
        }
    }

    #[test]
    fn test_failing_detector_yields_empty_slot() {
        let f = formatter();
        let ctx = ctx("2026-03-10T12:00:00Z", &f);
        let detectors: Vec<Box<dyn Detector>> = vec![Box::new(Broken), Box::new(DebtDetector)];
        let out = run_all(&detectors, &Snapshot::default(), &ctx);
        assert_eq!(out.len(), 2);
        assert!(out[0].is_empty());
    }

    #[test]
    fn test_registry_order() {
        let names: Vec<_> = registry().iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["budget", "goal", "subscription", "bill", "debt", "spending"]);
    }

    #[test]
    fn test_relative_time_labels() {
        let f = formatter();
        let ctx = ctx("2026-03-10T12:00:00Z", &f);
        let now = ctx.now.timestamp_millis();
        assert_eq!(relative_time(&ctx, now), "Just now");
        assert_eq!(relative_time(&ctx, now + 60_000), "Just now");
        assert_eq!(relative_time(&ctx, now - 5 * 60_000), "5m ago");
        assert_eq!(relative_time(&ctx, now - 3 * 3_600_000), "3h ago");
        assert_eq!(relative_time(&ctx, now - 2 * DAY_MS), "2d ago");
    }

    #[test]
    fn test_when_key() {
        assert_eq!(when_key("alerts.bill.upcoming", 0), "alerts.bill.upcoming.today");
        assert_eq!(when_key("alerts.bill.upcoming", 1), "alerts.bill.upcoming.tomorrow");
        assert_eq!(when_key("alerts.bill.upcoming", 4), "alerts.bill.upcoming.days");
    }
}
