use super::{well_formed, DetectContext, Detector, NewAlert};
use crate::db::models::Transaction;
use crate::engine::identity::{iso_week_bucket, WEEKLY_SPENDING_ENTITY};
use crate::engine::snapshot::Snapshot;
use crate::engine::thresholds::{
    percentage, within_trailing_days, LARGE_TRANSACTION_DAILY_MULTIPLIER,
    LARGE_TRANSACTION_MAX_ALERTS, LARGE_TRANSACTION_MIN_AMOUNT, SPENDING_LOOKBACK_DAYS,
    SPENDING_WEEK_DAYS, UNUSUAL_WEEK_PERCENT,
};
use crate::engine::types::{Alert, AlertCategory, Severity};
use crate::error::AppError;

/// Spending anomalies measured against the trailing 30-day daily average.
pub struct SpendingDetector;

impl Detector for SpendingDetector {
    fn name(&self) -> &'static str {
        "spending"
    }

    fn detect(&self, snapshot: &Snapshot, ctx: &DetectContext<'_>) -> Result<Vec<Alert>, AppError> {
        let outflows: Vec<&Transaction> =
            well_formed(self.name(), &snapshot.transactions, Transaction::validate)
                .filter(|t| t.is_outflow())
                .collect();

        let monthly_total: f64 = outflows
            .iter()
            .filter(|t| within_trailing_days(t.date, ctx.now, SPENDING_LOOKBACK_DAYS))
            .map(|t| t.amount.abs())
            .sum();
        let daily_avg = monthly_total / SPENDING_LOOKBACK_DAYS as f64;

        let week: Vec<&Transaction> = outflows
            .iter()
            .copied()
            .filter(|t| within_trailing_days(t.date, ctx.now, SPENDING_WEEK_DAYS))
            .collect();

        let large_threshold =
            (daily_avg * LARGE_TRANSACTION_DAILY_MULTIPLIER).max(LARGE_TRANSACTION_MIN_AMOUNT);

        // Snapshot order, not sorted by size.
        let mut alerts: Vec<Alert> = week
            .iter()
            .filter(|t| t.amount.abs() >= large_threshold)
            .take(LARGE_TRANSACTION_MAX_ALERTS)
            .map(|t| large_transaction_alert(t, ctx))
            .collect();

        let weekly_total: f64 = week.iter().map(|t| t.amount.abs()).sum();
        let weekly_avg = daily_avg * SPENDING_WEEK_DAYS as f64;
        if weekly_avg > 0.0 {
            let pct = percentage(weekly_total, weekly_avg);
            if pct >= UNUSUAL_WEEK_PERCENT {
                alerts.push(unusual_week_alert(weekly_total, pct, ctx));
            }
        }

        Ok(alerts)
    }
}

fn large_transaction_alert(txn: &Transaction, ctx: &DetectContext<'_>) -> Alert {
    let description = txn
        .description
        .clone()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| txn.category.clone());
    let params = [
        ("amount", ctx.money(txn.amount.abs())),
        ("description", description),
    ];

    NewAlert {
        category: AlertCategory::LargeTransaction,
        entity_id: &txn.id,
        bucket: "large".into(),
        severity: Severity::Info,
        title: ctx.t("alerts.spending.large.title", &params),
        message: ctx.t("alerts.spending.large.message", &params),
        route: Some(format!("/transactions/{}", txn.id)),
        rank: txn.date,
    }
    .build(ctx)
}

fn unusual_week_alert(weekly_total: f64, pct: f64, ctx: &DetectContext<'_>) -> Alert {
    let params = [
        ("total", ctx.money(weekly_total)),
        ("percent", ctx.percent(pct - 100.0, 0)),
    ];

    NewAlert {
        category: AlertCategory::UnusualSpendingWeek,
        entity_id: WEEKLY_SPENDING_ENTITY,
        bucket: iso_week_bucket(ctx.now),
        severity: Severity::Warning,
        title: ctx.t("alerts.spending.unusual_week.title", &params),
        message: ctx.t("alerts.spending.unusual_week.message", &params),
        route: Some("/transactions".into()),
        rank: ctx.now,
    }
    .build(ctx)
}
