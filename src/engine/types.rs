use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Severity tier. Declaration order is the feed order: errors first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Success,
}

impl Severity {
    /// Primary sort key of the feed.
    pub fn tier(&self) -> u8 {
        match self {
            Severity::Error => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
            Severity::Success => 3,
        }
    }
}

/// Goal progress milestones that produce a celebration alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Milestone {
    Half,
    ThreeQuarters,
    Complete,
}

impl Milestone {
    pub fn percent(&self) -> u8 {
        match self {
            Milestone::Half => 50,
            Milestone::ThreeQuarters => 75,
            Milestone::Complete => 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AlertCategory {
    BudgetExceeded,
    BudgetWarning,
    GoalMilestone(Milestone),
    GoalDeadlineApproaching,
    GoalOverdue,
    SubscriptionRenewal,
    SubscriptionUnused,
    BillUpcoming,
    BillOverdue,
    DebtHighInterest,
    DebtMonthlyReminder,
    LargeTransaction,
    UnusualSpendingWeek,
}

impl AlertCategory {
    /// Stable slug used as the first segment of alert ids. Never change these:
    /// persisted read/dismiss state is keyed on them.
    pub fn slug(&self) -> &'static str {
        match self {
            AlertCategory::BudgetExceeded => "budget-exceeded",
            AlertCategory::BudgetWarning => "budget-warning",
            AlertCategory::GoalMilestone(_) => "goal-milestone",
            AlertCategory::GoalDeadlineApproaching => "goal-deadline",
            AlertCategory::GoalOverdue => "goal-overdue",
            AlertCategory::SubscriptionRenewal => "subscription-renewal",
            AlertCategory::SubscriptionUnused => "subscription-unused",
            AlertCategory::BillUpcoming => "bill-upcoming",
            AlertCategory::BillOverdue => "bill-overdue",
            AlertCategory::DebtHighInterest => "debt-high-interest",
            AlertCategory::DebtMonthlyReminder => "debt-reminder",
            AlertCategory::LargeTransaction => "large-transaction",
            AlertCategory::UnusualSpendingWeek => "unusual-spending",
        }
    }
}

/// One derived notification. Recomputed on every refresh; only `id` is ever
/// persisted (through the read/dismissed sets).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Alert {
    pub id: String,
    pub category: AlertCategory,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub display_time: String,
    pub route: Option<String>,
    /// Logical recency in epoch milliseconds. Tie-breaker within a tier only.
    #[ts(type = "number")]
    pub rank: i64,
    /// Stamped at feed assembly from the read set.
    pub read: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_follow_declaration_order() {
        let mut all = vec![Severity::Success, Severity::Info, Severity::Error, Severity::Warning];
        all.sort();
        assert_eq!(all, vec![Severity::Error, Severity::Warning, Severity::Info, Severity::Success]);
        assert!(all.windows(2).all(|w| w[0].tier() < w[1].tier()));
    }

    #[test]
    fn test_milestone_percent() {
        assert_eq!(Milestone::Half.percent(), 50);
        assert_eq!(Milestone::Complete.percent(), 100);
    }

    #[test]
    fn test_alert_serializes_camel_case() {
        let alert = Alert {
            id: "bill-overdue:b1:2026-03".into(),
            category: AlertCategory::BillOverdue,
            severity: Severity::Error,
            title: "Rent is overdue".into(),
            message: "m".into(),
            display_time: "Just now".into(),
            route: Some("/bills/b1".into()),
            rank: 1,
            read: false,
        };
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["displayTime"], "Just now");
        assert_eq!(json["category"], "bill_overdue");
        assert_eq!(json["severity"], "error");
    }
}
