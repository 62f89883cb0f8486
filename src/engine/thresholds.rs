//! Fixed detector thresholds and the day arithmetic they are applied with.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};

pub const DAY_MS: i64 = 86_400_000;

// ── Budgets ─────────────────────────────────────────────────────────────

pub const BUDGET_EXCEEDED_PERCENT: f64 = 100.0;
/// Used when a budget carries no `alertThreshold`.
pub const DEFAULT_BUDGET_ALERT_THRESHOLD: f64 = 80.0;

// ── Goals ───────────────────────────────────────────────────────────────

pub const GOAL_COMPLETE_PERCENT: f64 = 100.0;
pub const GOAL_MILESTONE_75_PERCENT: f64 = 75.0;
pub const GOAL_MILESTONE_50_PERCENT: f64 = 50.0;
pub const GOAL_DEADLINE_WINDOW_DAYS: i64 = 30;
/// Goals at or above this progress don't get a deadline nudge.
pub const GOAL_DEADLINE_MAX_PERCENT: f64 = 80.0;

// ── Subscriptions and bills ─────────────────────────────────────────────

pub const RENEWAL_WINDOW_DAYS: i64 = 7;
pub const BILL_UPCOMING_WINDOW_DAYS: i64 = 7;
/// At or below this many days an upcoming charge is a warning.
pub const URGENT_DAYS: i64 = 1;
pub const SUBSCRIPTION_UNUSED_DAYS: i64 = 30;

// ── Debts ───────────────────────────────────────────────────────────────

pub const DEBT_HIGH_INTEREST_RATE: f64 = 15.0;

// ── Spending ────────────────────────────────────────────────────────────

pub const SPENDING_LOOKBACK_DAYS: i64 = 30;
pub const SPENDING_WEEK_DAYS: i64 = 7;
pub const LARGE_TRANSACTION_DAILY_MULTIPLIER: f64 = 3.0;
pub const LARGE_TRANSACTION_MIN_AMOUNT: f64 = 100.0;
pub const LARGE_TRANSACTION_MAX_ALERTS: usize = 3;
pub const UNUSUAL_WEEK_PERCENT: f64 = 120.0;

/// `part / whole * 100`, or 0 when `whole <= 0`.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// Whole days until `target`, rounded up: anything later today counts as 1.
pub fn days_until_ceil(target: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let ms = (target - now).num_milliseconds();
    (ms as f64 / DAY_MS as f64).ceil() as i64
}

/// Whole days elapsed since `then`, rounded down.
pub fn days_since_floor(then: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - then).num_milliseconds().div_euclid(DAY_MS)
}

/// Days remaining in `now`'s month, not counting today.
pub fn days_left_in_month(now: DateTime<Utc>) -> i64 {
    i64::from(last_day_of_month(now.year(), now.month())) - i64::from(now.day())
}

fn last_day_of_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

pub fn same_month(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// `true` when `at` lies in the trailing window `(now - days, now]`.
pub fn within_trailing_days(at: DateTime<Utc>, now: DateTime<Utc>, days: i64) -> bool {
    at <= now && now - at < chrono::Duration::days(days)
}
