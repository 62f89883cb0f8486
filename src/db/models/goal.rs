use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{ensure_finite, ensure_id};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum GoalStatus {
    Active,
    Completed,
    Paused,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    #[serde(default)]
    pub target_date: Option<DateTime<Utc>>,
    pub status: GoalStatus,
}

impl Goal {
    pub fn validate(&self) -> Result<(), AppError> {
        ensure_id("goal", &self.id)?;
        ensure_finite("goal", &self.id, "targetAmount", self.target_amount)?;
        ensure_finite("goal", &self.id, "currentAmount", self.current_amount)
    }
}
