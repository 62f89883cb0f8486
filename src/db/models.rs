//! Snapshot entities handed to the detectors by the data layer.
//!
//! All of them are read-only views: the alert engine never writes them back.

mod bill;
mod budget;
mod debt;
mod goal;
mod subscription;
mod transaction;

pub use bill::Bill;
pub use budget::Budget;
pub use debt::Debt;
pub use goal::{Goal, GoalStatus};
pub use subscription::{Subscription, SubscriptionStatus};
pub use transaction::{Transaction, TransactionKind};

use crate::error::AppError;

/// Reject NaN and infinities; everything else is a usable amount.
pub(crate) fn ensure_finite(entity: &str, id: &str, field: &str, value: f64) -> Result<(), AppError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{entity} {id}: {field} is not a finite number"
        )))
    }
}

pub(crate) fn ensure_id(entity: &str, id: &str) -> Result<(), AppError> {
    if id.trim().is_empty() {
        Err(AppError::Validation(format!("{entity} has an empty id")))
    } else {
        Ok(())
    }
}
