use chrono::Duration;

use super::{well_formed, DetectContext, Detector, NewAlert};
use crate::db::models::{Goal, GoalStatus};
use crate::engine::snapshot::Snapshot;
use crate::engine::thresholds::{
    days_until_ceil, percentage, GOAL_COMPLETE_PERCENT, GOAL_DEADLINE_MAX_PERCENT,
    GOAL_DEADLINE_WINDOW_DAYS, GOAL_MILESTONE_50_PERCENT, GOAL_MILESTONE_75_PERCENT,
};
use crate::engine::types::{Alert, AlertCategory, Milestone, Severity};
use crate::error::AppError;

/// Per active goal: at most one milestone alert, plus at most one of
/// deadline-approaching / overdue.
pub struct GoalDetector;

impl Detector for GoalDetector {
    fn name(&self) -> &'static str {
        "goal"
    }

    fn detect(&self, snapshot: &Snapshot, ctx: &DetectContext<'_>) -> Result<Vec<Alert>, AppError> {
        let mut alerts = Vec::new();

        for goal in well_formed(self.name(), &snapshot.goals, Goal::validate)
            .filter(|g| g.status == GoalStatus::Active)
        {
            let pct = percentage(goal.current_amount, goal.target_amount);

            if let Some(milestone) = milestone_for(pct) {
                alerts.push(milestone_alert(goal, milestone, pct, ctx));
            }
            if let Some(alert) = deadline_alert(goal, pct, ctx) {
                alerts.push(alert);
            }
        }

        Ok(alerts)
    }
}

/// Highest milestone reached. Completion is terminal: no lower milestone
/// is reported alongside it.
fn milestone_for(pct: f64) -> Option<Milestone> {
    if pct >= GOAL_COMPLETE_PERCENT {
        Some(Milestone::Complete)
    } else if pct >= GOAL_MILESTONE_75_PERCENT {
        Some(Milestone::ThreeQuarters)
    } else if pct >= GOAL_MILESTONE_50_PERCENT {
        Some(Milestone::Half)
    } else {
        None
    }
}

fn milestone_alert(goal: &Goal, milestone: Milestone, pct: f64, ctx: &DetectContext<'_>) -> Alert {
    let params = [
        ("name", goal.name.clone()),
        ("percent", ctx.percent(pct, 0)),
        ("current", ctx.money(goal.current_amount)),
        ("target", ctx.money(goal.target_amount)),
        ("remaining", ctx.money((goal.target_amount - goal.current_amount).max(0.0))),
    ];
    let (key, severity) = match milestone {
        Milestone::Complete => ("alerts.goal.complete", Severity::Success),
        Milestone::ThreeQuarters => ("alerts.goal.milestone_75", Severity::Success),
        Milestone::Half => ("alerts.goal.milestone_50", Severity::Info),
    };

    NewAlert {
        category: AlertCategory::GoalMilestone(milestone),
        entity_id: &goal.id,
        bucket: milestone.percent().to_string(),
        severity,
        title: ctx.t(&format!("{key}.title"), &params),
        message: ctx.t(&format!("{key}.message"), &params),
        route: Some(format!("/goals/{}", goal.id)),
        rank: ctx.now,
    }
    .build(ctx)
}

fn deadline_alert(goal: &Goal, pct: f64, ctx: &DetectContext<'_>) -> Option<Alert> {
    let target_date = goal.target_date?;
    let days = days_until_ceil(target_date, ctx.now);

    let (category, severity, bucket, key) =
        if days > 0 && days <= GOAL_DEADLINE_WINDOW_DAYS && pct < GOAL_DEADLINE_MAX_PERCENT {
            (AlertCategory::GoalDeadlineApproaching, Severity::Warning, "deadline", "alerts.goal.deadline")
        } else if days <= 0 && pct < GOAL_COMPLETE_PERCENT {
            (AlertCategory::GoalOverdue, Severity::Error, "overdue", "alerts.goal.overdue")
        } else {
            return None;
        };

    let params = [
        ("name", goal.name.clone()),
        ("days", days.to_string()),
        ("percent", ctx.percent(pct, 0)),
        ("remaining", ctx.money((goal.target_amount - goal.current_amount).max(0.0))),
    ];

    Some(
        NewAlert {
            category,
            entity_id: &goal.id,
            bucket: bucket.to_string(),
            severity,
            title: ctx.t(&format!("{key}.title"), &params),
            message: ctx.t(&format!("{key}.message"), &params),
            route: Some(format!("/goals/{}", goal.id)),
            // Sorts just behind the goal's milestone alert.
            rank: ctx.now - Duration::minutes(1),
        }
        .build(ctx),
    )
}
