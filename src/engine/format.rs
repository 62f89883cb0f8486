//! Formatting collaborators injected into every detector.
//!
//! Detectors never build display strings on their own beyond calling these,
//! so hosts can swap in their own locale and currency handling.

use std::collections::HashMap;

pub trait Formatter: Send + Sync {
    fn format_currency(&self, amount: f64) -> String;

    /// Render a percentage or rate as a bare number. Templates carry the `%`.
    fn format_percent(&self, value: f64, decimals: usize) -> String;

    /// Resolve `key` and interpolate `{param}` placeholders.
    fn translate(&self, key: &str, params: &[(&str, String)]) -> String;
}

/// Built-in English catalog with a configurable currency symbol.
pub struct EnglishFormatter {
    currency_symbol: String,
    catalog: HashMap<&'static str, &'static str>,
}

impl EnglishFormatter {
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
            catalog: CATALOG.iter().copied().collect(),
        }
    }
}

impl Default for EnglishFormatter {
    fn default() -> Self {
        Self::new("$")
    }
}

impl Formatter for EnglishFormatter {
    fn format_currency(&self, amount: f64) -> String {
        if !amount.is_finite() {
            return format!("{}-", self.currency_symbol);
        }
        let cents = (amount.abs() * 100.0).round() as u128;
        let whole = group_thousands(cents / 100);
        let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
        format!("{sign}{}{whole}.{:02}", self.currency_symbol, cents % 100)
    }

    fn format_percent(&self, value: f64, decimals: usize) -> String {
        if !value.is_finite() {
            return "-".to_string();
        }
        let rendered = format!("{value:.decimals$}");
        // "-0" reads badly for values that round to zero.
        match rendered.strip_prefix('-') {
            Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
            _ => rendered,
        }
    }

    fn translate(&self, key: &str, params: &[(&str, String)]) -> String {
        let Some(template) = self.catalog.get(key) else {
            tracing::debug!(key, "Missing translation key");
            return key.to_string();
        };
        interpolate(template, params)
    }
}

/// Replace each `{name}` with its param in one left-to-right pass.
/// Substituted values are copied verbatim, never re-scanned. Unknown
/// placeholders are left as-is.
pub fn interpolate(template: &str, params: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let Some(close) = tail.find('}') else {
            rest = tail;
            break;
        };
        let name = &tail[1..close];
        match params.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&tail[..=close]),
        }
        rest = &tail[close + 1..];
    }
    out.push_str(rest);
    out
}

fn group_thousands(n: u128) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

const CATALOG: &[(&str, &str)] = &[
    // Budgets
    ("alerts.budget.exceeded.title", "{name} budget exceeded"),
    ("alerts.budget.exceeded.message", "You've spent {spent} of your {limit} budget, {over} over the limit."),
    ("alerts.budget.warning.title", "{name} budget at {percent}%"),
    ("alerts.budget.warning.message", "You've used {percent}% of your {limit} budget. {remaining} left with {days} days remaining this month."),
    // Goals
    ("alerts.goal.milestone_50.title", "Halfway to {name}"),
    ("alerts.goal.milestone_50.message", "You've saved {current} of {target}. Keep going!"),
    ("alerts.goal.milestone_75.title", "{name} is {percent}% funded"),
    ("alerts.goal.milestone_75.message", "Only {remaining} to go before you reach {target}."),
    ("alerts.goal.complete.title", "Goal reached: {name}"),
    ("alerts.goal.complete.message", "You saved {target}. Congratulations!"),
    ("alerts.goal.deadline.title", "{name} deadline approaching"),
    ("alerts.goal.deadline.message", "{days} days left and {percent}% saved. {remaining} still needed."),
    ("alerts.goal.overdue.title", "{name} is past its target date"),
    ("alerts.goal.overdue.message", "{percent}% saved, {remaining} still needed."),
    // Subscriptions
    ("alerts.subscription.renewal.title", "{name} renews soon"),
    ("alerts.subscription.renewal.today", "{amount} will be charged today."),
    ("alerts.subscription.renewal.tomorrow", "{amount} will be charged tomorrow."),
    ("alerts.subscription.renewal.days", "{amount} will be charged in {days} days."),
    ("alerts.subscription.unused.title", "Still using {name}?"),
    ("alerts.subscription.unused.message", "You haven't used it in {days} days. It costs {amount} per cycle."),
    // Bills
    ("alerts.bill.overdue.title", "{name} is overdue"),
    ("alerts.bill.overdue.message", "{amount} was due {days} days ago."),
    ("alerts.bill.upcoming.title", "{name} due soon"),
    ("alerts.bill.upcoming.today", "{amount} is due today."),
    ("alerts.bill.upcoming.tomorrow", "{amount} is due tomorrow."),
    ("alerts.bill.upcoming.days", "{amount} is due in {days} days."),
    // Debts
    ("alerts.debt.high_interest.title", "High interest on {name}"),
    ("alerts.debt.high_interest.message", "{rate}% interest on a {balance} balance. Paying this down first saves the most."),
    ("alerts.debt.reminder.title", "Monthly debt payments"),
    ("alerts.debt.reminder.message", "{total} in minimum payments across {count} debts ({balance} total balance)."),
    // Spending
    ("alerts.spending.large.title", "Large transaction"),
    ("alerts.spending.large.message", "{amount} for {description}."),
    ("alerts.spending.unusual_week.title", "Spending is up this week"),
    ("alerts.spending.unusual_week.message", "You've spent {total} in the last 7 days, {percent}% above your normal week."),
    // Relative time
    ("time.just_now", "Just now"),
    ("time.minutes_ago", "{count}m ago"),
    ("time.hours_ago", "{count}h ago"),
    ("time.days_ago", "{count}d ago"),
];
