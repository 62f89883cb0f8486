use chrono::{Datelike, Duration};

use super::{well_formed, when_key, DetectContext, Detector, NewAlert};
use crate::db::models::Bill;
use crate::engine::identity::month_bucket;
use crate::engine::snapshot::Snapshot;
use crate::engine::thresholds::{BILL_UPCOMING_WINDOW_DAYS, URGENT_DAYS};
use crate::engine::types::{Alert, AlertCategory, Severity};
use crate::error::AppError;

/// Bills keyed by day of month, compared against today within the current
/// month. A due day earlier than today is overdue; there is no rollover.
pub struct BillDetector;

impl Detector for BillDetector {
    fn name(&self) -> &'static str {
        "bill"
    }

    fn detect(&self, snapshot: &Snapshot, ctx: &DetectContext<'_>) -> Result<Vec<Alert>, AppError> {
        let today = i64::from(ctx.now.day());

        let alerts = well_formed(self.name(), &snapshot.bills, Bill::validate)
            .filter(|b| !b.is_paid)
            .filter_map(|bill| {
                let days_until_due = i64::from(bill.due_date) - today;
                if days_until_due < 0 {
                    Some(overdue_alert(bill, -days_until_due, ctx))
                } else if days_until_due <= BILL_UPCOMING_WINDOW_DAYS {
                    Some(upcoming_alert(bill, days_until_due, ctx))
                } else {
                    None
                }
            })
            .collect();

        Ok(alerts)
    }
}

fn overdue_alert(bill: &Bill, days_overdue: i64, ctx: &DetectContext<'_>) -> Alert {
    let params = [
        ("name", bill.name.clone()),
        ("amount", ctx.money(bill.amount)),
        ("days", days_overdue.to_string()),
    ];

    NewAlert {
        category: AlertCategory::BillOverdue,
        entity_id: &bill.id,
        bucket: month_bucket(ctx.now),
        severity: Severity::Error,
        title: ctx.t("alerts.bill.overdue.title", &params),
        message: ctx.t("alerts.bill.overdue.message", &params),
        route: Some(format!("/bills/{}", bill.id)),
        rank: ctx.now,
    }
    .build(ctx)
}

fn upcoming_alert(bill: &Bill, days: i64, ctx: &DetectContext<'_>) -> Alert {
    let severity = if days <= URGENT_DAYS {
        Severity::Warning
    } else {
        Severity::Info
    };
    let params = [
        ("name", bill.name.clone()),
        ("amount", ctx.money(bill.amount)),
        ("days", days.to_string()),
    ];

    NewAlert {
        category: AlertCategory::BillUpcoming,
        entity_id: &bill.id,
        bucket: month_bucket(ctx.now),
        severity,
        title: ctx.t("alerts.bill.upcoming.title", &params),
        message: ctx.t(&when_key("alerts.bill.upcoming", days), &params),
        route: Some(format!("/bills/{}", bill.id)),
        rank: ctx.now - Duration::hours(days),
    }
    .build(ctx)
}
