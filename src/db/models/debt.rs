use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{ensure_finite, ensure_id};
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Debt {
    pub id: String,
    pub name: String,
    pub balance: f64,
    /// Annual rate in percent (e.g. `19.99`).
    pub interest_rate: f64,
    #[serde(default)]
    pub minimum_payment: f64,
}

impl Debt {
    pub fn validate(&self) -> Result<(), AppError> {
        ensure_id("debt", &self.id)?;
        ensure_finite("debt", &self.id, "balance", self.balance)?;
        ensure_finite("debt", &self.id, "interestRate", self.interest_rate)?;
        ensure_finite("debt", &self.id, "minimumPayment", self.minimum_payment)
    }
}
