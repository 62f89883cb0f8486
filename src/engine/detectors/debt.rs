use chrono::Duration;

use super::{well_formed, DetectContext, Detector, NewAlert};
use crate::db::models::Debt;
use crate::engine::identity::{month_bucket, ALL_DEBTS_ENTITY};
use crate::engine::snapshot::Snapshot;
use crate::engine::thresholds::DEBT_HIGH_INTEREST_RATE;
use crate::engine::types::{Alert, AlertCategory, Severity};
use crate::error::AppError;

/// Portfolio-level debt alerts: at most one high-interest warning (for the
/// worst debt) and at most one monthly payment reminder.
pub struct DebtDetector;

impl Detector for DebtDetector {
    fn name(&self) -> &'static str {
        "debt"
    }

    fn detect(&self, snapshot: &Snapshot, ctx: &DetectContext<'_>) -> Result<Vec<Alert>, AppError> {
        let debts: Vec<&Debt> = well_formed(self.name(), &snapshot.debts, Debt::validate).collect();
        let mut alerts = Vec::new();

        if let Some(worst) = worst_high_interest(&debts) {
            let params = [
                ("name", worst.name.clone()),
                ("rate", ctx.percent(worst.interest_rate, 1)),
                ("balance", ctx.money(worst.balance)),
            ];
            alerts.push(
                NewAlert {
                    category: AlertCategory::DebtHighInterest,
                    entity_id: &worst.id,
                    bucket: "high-interest".into(),
                    severity: Severity::Warning,
                    title: ctx.t("alerts.debt.high_interest.title", &params),
                    message: ctx.t("alerts.debt.high_interest.message", &params),
                    route: Some(format!("/debts/{}", worst.id)),
                    rank: ctx.now - Duration::hours(1),
                }
                .build(ctx),
            );
        }

        let total_minimum: f64 = debts.iter().map(|d| d.minimum_payment).sum();
        if !debts.is_empty() && total_minimum > 0.0 {
            let total_balance: f64 = debts.iter().map(|d| d.balance).sum();
            let params = [
                ("total", ctx.money(total_minimum)),
                ("count", debts.len().to_string()),
                ("balance", ctx.money(total_balance)),
            ];
            alerts.push(
                NewAlert {
                    category: AlertCategory::DebtMonthlyReminder,
                    entity_id: ALL_DEBTS_ENTITY,
                    bucket: month_bucket(ctx.now),
                    severity: Severity::Info,
                    title: ctx.t("alerts.debt.reminder.title", &params),
                    message: ctx.t("alerts.debt.reminder.message", &params),
                    route: Some("/debts".into()),
                    rank: ctx.now - Duration::hours(2),
                }
                .build(ctx),
            );
        }

        Ok(alerts)
    }
}

/// Highest-rate debt at or above the threshold. Ties keep the first seen.
fn worst_high_interest<'a>(debts: &[&'a Debt]) -> Option<&'a Debt> {
    debts
        .iter()
        .copied()
        .filter(|d| d.interest_rate >= DEBT_HIGH_INTEREST_RATE)
        .fold(None::<&'a Debt>, |worst, d| match worst {
            Some(w) if w.interest_rate >= d.interest_rate => Some(w),
            _ => Some(d),
        })
}
