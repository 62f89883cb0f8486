//! Deterministic alert identity.
//!
//! An id depends only on `(category, entity, bucket)`, never on amounts,
//! percentages or wall-clock time, so a regeneration over the same qualifying
//! condition reproduces it and persisted read/dismiss state keeps applying.

use chrono::{DateTime, Datelike, Utc};

use super::types::AlertCategory;

/// Entity id for the single debt-reminder alert that summarizes all debts.
pub const ALL_DEBTS_ENTITY: &str = "all-debts";
/// Entity id for the weekly spending comparison.
pub const WEEKLY_SPENDING_ENTITY: &str = "weekly-spending";

pub fn alert_id(category: AlertCategory, entity_id: &str, bucket: &str) -> String {
    format!("{}:{}:{}", category.slug(), entity_id, bucket)
}

/// Calendar-month bucket, e.g. `2026-03`.
pub fn month_bucket(at: DateTime<Utc>) -> String {
    at.format("%Y-%m").to_string()
}

/// Calendar-day bucket, e.g. `2026-03-15`.
pub fn day_bucket(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// ISO-week bucket, e.g. `2026-W11`.
pub fn iso_week_bucket(at: DateTime<Utc>) -> String {
    let week = at.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}
