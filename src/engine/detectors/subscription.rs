use chrono::Duration;

use super::{well_formed, when_key, DetectContext, Detector, NewAlert};
use crate::db::models::{Subscription, SubscriptionStatus};
use crate::engine::identity::day_bucket;
use crate::engine::snapshot::Snapshot;
use crate::engine::thresholds::{
    days_since_floor, days_until_ceil, RENEWAL_WINDOW_DAYS, SUBSCRIPTION_UNUSED_DAYS, URGENT_DAYS,
};
use crate::engine::types::{Alert, AlertCategory, Severity};
use crate::error::AppError;

/// Upcoming renewals and subscriptions that look abandoned. One subscription
/// may produce both.
pub struct SubscriptionDetector;

impl Detector for SubscriptionDetector {
    fn name(&self) -> &'static str {
        "subscription"
    }

    fn detect(&self, snapshot: &Snapshot, ctx: &DetectContext<'_>) -> Result<Vec<Alert>, AppError> {
        let mut alerts = Vec::new();

        for sub in well_formed(self.name(), &snapshot.subscriptions, Subscription::validate)
            .filter(|s| s.status == SubscriptionStatus::Active)
        {
            if let Some(alert) = renewal_alert(sub, ctx) {
                alerts.push(alert);
            }
            if let Some(alert) = unused_alert(sub, ctx) {
                alerts.push(alert);
            }
        }

        Ok(alerts)
    }
}

fn renewal_alert(sub: &Subscription, ctx: &DetectContext<'_>) -> Option<Alert> {
    let next = sub.next_billing_date?;
    let days = days_until_ceil(next, ctx.now);
    if !(0..=RENEWAL_WINDOW_DAYS).contains(&days) {
        return None;
    }

    let severity = if days <= URGENT_DAYS {
        Severity::Warning
    } else {
        Severity::Info
    };
    let params = [
        ("name", sub.name.clone()),
        ("amount", ctx.money(sub.amount)),
        ("days", days.to_string()),
    ];

    Some(
        NewAlert {
            category: AlertCategory::SubscriptionRenewal,
            entity_id: &sub.id,
            // One alert per billing cycle.
            bucket: day_bucket(next),
            severity,
            title: ctx.t("alerts.subscription.renewal.title", &params),
            message: ctx.t(&when_key("alerts.subscription.renewal", days), &params),
            route: Some(format!("/subscriptions/{}", sub.id)),
            rank: ctx.now - Duration::hours(days),
        }
        .build(ctx),
    )
}

fn unused_alert(sub: &Subscription, ctx: &DetectContext<'_>) -> Option<Alert> {
    let last_used = sub.last_used_at?;
    let days = days_since_floor(last_used, ctx.now);
    if days < SUBSCRIPTION_UNUSED_DAYS {
        return None;
    }

    let params = [
        ("name", sub.name.clone()),
        ("amount", ctx.money(sub.amount)),
        ("days", days.to_string()),
    ];

    Some(
        NewAlert {
            category: AlertCategory::SubscriptionUnused,
            entity_id: &sub.id,
            bucket: "unused".into(),
            severity: Severity::Info,
            title: ctx.t("alerts.subscription.unused.title", &params),
            message: ctx.t("alerts.subscription.unused.message", &params),
            route: Some(format!("/subscriptions/{}", sub.id)),
            rank: ctx.now - Duration::hours(12),
        }
        .build(ctx),
    )
}
