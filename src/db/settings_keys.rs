/// Canonical settings key constants for the `app_settings` table.
///
/// Use these instead of raw string literals to prevent typo-based key mismatches.

/// JSON array of alert ids the user dismissed.
pub const DISMISSED_ALERT_IDS: &str = "dismissed-alert-ids";

/// JSON array of alert ids the user has read.
pub const READ_ALERT_IDS: &str = "read-alert-ids";
