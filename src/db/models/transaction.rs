use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{ensure_finite, ensure_id};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TransactionKind {
    Purchase,
    Income,
    Transfer,
    Refund,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Transaction {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Signed amount. Negative values are outflows regardless of `kind`.
    pub amount: f64,
    pub category: String,
    pub kind: TransactionKind,
    pub date: DateTime<Utc>,
}

impl Transaction {
    /// Money leaving the account: an explicit purchase or any negative amount.
    pub fn is_outflow(&self) -> bool {
        self.kind == TransactionKind::Purchase || self.amount < 0.0
    }

    pub fn validate(&self) -> Result<(), AppError> {
        ensure_id("transaction", &self.id)?;
        ensure_finite("transaction", &self.id, "amount", self.amount)
    }
}
