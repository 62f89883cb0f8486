use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{ensure_finite, ensure_id};
use crate::error::AppError;

// ============================================================================
// Budgets
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Budget {
    pub id: String,
    pub name: String,
    /// Transaction category this budget caps.
    pub category: String,
    /// Monthly limit.
    pub amount: f64,
    /// Warning threshold in percent. Falls back to 80 when absent.
    #[serde(default)]
    pub alert_threshold: Option<f64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Budget {
    pub fn validate(&self) -> Result<(), AppError> {
        ensure_id("budget", &self.id)?;
        ensure_finite("budget", &self.id, "amount", self.amount)?;
        if let Some(threshold) = self.alert_threshold {
            ensure_finite("budget", &self.id, "alertThreshold", threshold)?;
        }
        Ok(())
    }
}
