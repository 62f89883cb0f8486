use super::{well_formed, DetectContext, Detector, NewAlert};
use crate::db::models::{Budget, Transaction};
use crate::engine::identity::month_bucket;
use crate::engine::snapshot::Snapshot;
use crate::engine::thresholds::{
    days_left_in_month, percentage, same_month, BUDGET_EXCEEDED_PERCENT,
    DEFAULT_BUDGET_ALERT_THRESHOLD,
};
use crate::engine::types::{Alert, AlertCategory, Severity};
use crate::error::AppError;

/// At most one alert per active budget: exceeded, else warning, else nothing.
pub struct BudgetDetector;

impl Detector for BudgetDetector {
    fn name(&self) -> &'static str {
        "budget"
    }

    fn detect(&self, snapshot: &Snapshot, ctx: &DetectContext<'_>) -> Result<Vec<Alert>, AppError> {
        let month_outflows: Vec<&Transaction> =
            well_formed(self.name(), &snapshot.transactions, Transaction::validate)
                .filter(|t| t.is_outflow() && same_month(t.date, ctx.now))
                .collect();

        let alerts = well_formed(self.name(), &snapshot.budgets, Budget::validate)
            .filter(|b| b.is_active)
            .filter_map(|budget| {
                let spent: f64 = month_outflows
                    .iter()
                    .filter(|t| t.category == budget.category)
                    .map(|t| t.amount.abs())
                    .sum();
                evaluate(budget, spent, ctx)
            })
            .collect();

        Ok(alerts)
    }
}

fn evaluate(budget: &Budget, spent: f64, ctx: &DetectContext<'_>) -> Option<Alert> {
    let pct = percentage(spent, budget.amount);
    let threshold = budget.alert_threshold.unwrap_or(DEFAULT_BUDGET_ALERT_THRESHOLD);

    let (category, severity, title, message) = if pct >= BUDGET_EXCEEDED_PERCENT {
        let params = [
            ("name", budget.name.clone()),
            ("spent", ctx.money(spent)),
            ("limit", ctx.money(budget.amount)),
            ("over", ctx.money(spent - budget.amount)),
        ];
        (
            AlertCategory::BudgetExceeded,
            Severity::Error,
            ctx.t("alerts.budget.exceeded.title", &params),
            ctx.t("alerts.budget.exceeded.message", &params),
        )
    } else if pct >= threshold {
        let params = [
            ("name", budget.name.clone()),
            ("percent", ctx.percent(pct, 0)),
            ("limit", ctx.money(budget.amount)),
            ("remaining", ctx.money(budget.amount - spent)),
            ("days", days_left_in_month(ctx.now).to_string()),
        ];
        (
            AlertCategory::BudgetWarning,
            Severity::Warning,
            ctx.t("alerts.budget.warning.title", &params),
            ctx.t("alerts.budget.warning.message", &params),
        )
    } else {
        return None;
    };

    Some(
        NewAlert {
            category,
            entity_id: &budget.id,
            bucket: month_bucket(ctx.now),
            severity,
            title,
            message,
            route: Some(format!("/budgets/{}", budget.id)),
            rank: ctx.now,
        }
        .build(ctx),
    )
}
