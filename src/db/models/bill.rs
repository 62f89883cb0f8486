use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{ensure_finite, ensure_id};
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Bill {
    pub id: String,
    pub name: String,
    pub amount: f64,
    /// Day of month the bill falls due (1-31).
    pub due_date: u32,
    #[serde(default)]
    pub is_paid: bool,
}

impl Bill {
    pub fn validate(&self) -> Result<(), AppError> {
        ensure_id("bill", &self.id)?;
        ensure_finite("bill", &self.id, "amount", self.amount)?;
        if !(1..=31).contains(&self.due_date) {
            return Err(AppError::Validation(format!(
                "bill {}: dueDate {} is not a day of month",
                self.id, self.due_date
            )));
        }
        Ok(())
    }
}
