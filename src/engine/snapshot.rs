//! Snapshot providers: the read-only data layer the detectors consume.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::db::models::{Bill, Budget, Debt, Goal, Subscription, SubscriptionStatus, Transaction};
use crate::error::AppError;

/// Point-in-time view of every domain the detectors look at.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
    #[serde(default)]
    pub bills: Vec<Bill>,
    #[serde(default)]
    pub debts: Vec<Debt>,
}

/// Data-layer collaborator. Every call may fail independently.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    async fn budgets(&self) -> Result<Vec<Budget>, AppError>;
    async fn transactions(&self) -> Result<Vec<Transaction>, AppError>;
    async fn goals(&self) -> Result<Vec<Goal>, AppError>;
    async fn subscriptions(&self, status: SubscriptionStatus) -> Result<Vec<Subscription>, AppError>;
    async fn bills(&self) -> Result<Vec<Bill>, AppError>;
    async fn debts(&self) -> Result<Vec<Debt>, AppError>;

    /// Fetch every domain for one refresh. The default fans the per-domain
    /// calls out concurrently. Providers backed by a single document
    /// override this to read it once.
    async fn snapshot(&self) -> Snapshot {
        join_domains(self).await
    }
}

/// Fetch a full snapshot. A failed domain becomes an empty collection; the
/// others are unaffected.
pub async fn fetch_snapshot(provider: &dyn SnapshotProvider) -> Snapshot {
    provider.snapshot().await
}

async fn join_domains<P: SnapshotProvider + ?Sized>(provider: &P) -> Snapshot {
    let (budgets, transactions, goals, subscriptions, bills, debts) = tokio::join!(
        provider.budgets(),
        provider.transactions(),
        provider.goals(),
        provider.subscriptions(SubscriptionStatus::Active),
        provider.bills(),
        provider.debts(),
    );

    Snapshot {
        budgets: or_empty("budgets", budgets),
        transactions: or_empty("transactions", transactions),
        goals: or_empty("goals", goals),
        subscriptions: or_empty("subscriptions", subscriptions),
        bills: or_empty("bills", bills),
        debts: or_empty("debts", debts),
    }
}

fn or_empty<T>(domain: &'static str, result: Result<Vec<T>, AppError>) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(domain, error = %e, "Snapshot fetch failed, treating as empty");
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory provider
// ---------------------------------------------------------------------------

/// Serves a fixed snapshot. Used by embedding hosts that already hold their
/// data, and by tests.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    snapshot: Snapshot,
}

impl StaticProvider {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl SnapshotProvider for StaticProvider {
    async fn budgets(&self) -> Result<Vec<Budget>, AppError> {
        Ok(self.snapshot.budgets.clone())
    }

    async fn transactions(&self) -> Result<Vec<Transaction>, AppError> {
        Ok(self.snapshot.transactions.clone())
    }

    async fn goals(&self) -> Result<Vec<Goal>, AppError> {
        Ok(self.snapshot.goals.clone())
    }

    async fn subscriptions(&self, status: SubscriptionStatus) -> Result<Vec<Subscription>, AppError> {
        Ok(self
            .snapshot
            .subscriptions
            .iter()
            .filter(|s| s.status == status)
            .cloned()
            .collect())
    }

    async fn bills(&self) -> Result<Vec<Bill>, AppError> {
        Ok(self.snapshot.bills.clone())
    }

    async fn debts(&self) -> Result<Vec<Debt>, AppError> {
        Ok(self.snapshot.debts.clone())
    }
}

// ---------------------------------------------------------------------------
// JSON file provider
// ---------------------------------------------------------------------------

/// Reads a snapshot document: `{ "budgets": [...], "transactions": [...], ... }`.
///
/// Entities are decoded one by one so a single malformed record (say a
/// string where an amount belongs) only drops that record.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<serde_json::Value, AppError> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    async fn domain<T: DeserializeOwned>(&self, field: &'static str) -> Result<Vec<T>, AppError> {
        let doc = self.load().await?;
        decode_domain(&doc, field)
    }
}

/// Decode every domain from one parsed document. A domain that isn't an
/// array is empty; the rest still decode.
pub(crate) fn snapshot_from_document(doc: &serde_json::Value) -> Snapshot {
    let subscriptions = decode_domain::<Subscription>(doc, "subscriptions").map(|all| {
        all.into_iter()
            .filter(|s| s.status == SubscriptionStatus::Active)
            .collect()
    });

    Snapshot {
        budgets: or_empty("budgets", decode_domain(doc, "budgets")),
        transactions: or_empty("transactions", decode_domain(doc, "transactions")),
        goals: or_empty("goals", decode_domain(doc, "goals")),
        subscriptions: or_empty("subscriptions", subscriptions),
        bills: or_empty("bills", decode_domain(doc, "bills")),
        debts: or_empty("debts", decode_domain(doc, "debts")),
    }
}

pub(crate) fn decode_domain<T: DeserializeOwned>(
    doc: &serde_json::Value,
    field: &'static str,
) -> Result<Vec<T>, AppError> {
    let items = match doc.get(field) {
        None | Some(serde_json::Value::Null) => return Ok(Vec::new()),
        Some(serde_json::Value::Array(items)) => items,
        Some(_) => {
            return Err(AppError::Provider(format!("`{field}` is not an array")));
        }
    };

    let mut decoded = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match serde_json::from_value::<T>(item.clone()) {
            Ok(entity) => decoded.push(entity),
            Err(e) => {
                tracing::warn!(domain = field, index, error = %e, "Skipping malformed entity");
            }
        }
    }
    Ok(decoded)
}

#[async_trait]
impl SnapshotProvider for JsonFileProvider {
    async fn budgets(&self) -> Result<Vec<Budget>, AppError> {
        self.domain("budgets").await
    }

    async fn transactions(&self) -> Result<Vec<Transaction>, AppError> {
        self.domain("transactions").await
    }

    async fn goals(&self) -> Result<Vec<Goal>, AppError> {
        self.domain("goals").await
    }

    async fn subscriptions(&self, status: SubscriptionStatus) -> Result<Vec<Subscription>, AppError> {
        let all: Vec<Subscription> = self.domain("subscriptions").await?;
        Ok(all.into_iter().filter(|s| s.status == status).collect())
    }

    async fn bills(&self) -> Result<Vec<Bill>, AppError> {
        self.domain("bills").await
    }

    async fn debts(&self) -> Result<Vec<Debt>, AppError> {
        self.domain("debts").await
    }

    /// One read and one parse per refresh, so every domain comes from the
    /// same version of the file.
    async fn snapshot(&self) -> Snapshot {
        match self.load().await {
            Ok(doc) => snapshot_from_document(&doc),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Snapshot file unreadable, treating every domain as empty"
                );
                Snapshot::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    struct BillsDown {
        inner: StaticProvider,
    }

    #[async_trait]
    impl SnapshotProvider for BillsDown {
        async fn budgets(&self) -> Result<Vec<Budget>, AppError> {
            self.inner.budgets().await
        }
        async fn transactions(&self) -> Result<Vec<Transaction>, AppError> {
            self.inner.transactions().await
        }
        async fn goals(&self) -> Result<Vec<Goal>, AppError> {
            self.inner.goals().await
        }
        async fn subscriptions(&self, status: SubscriptionStatus) -> Result<Vec<Subscription>, AppError> {
            self.inner.subscriptions(status).await
        }
        async fn bills(&self) -> Result<Vec<Bill>, AppError> {
            Err(AppError::Provider("bills service unreachable".into()))
        }
        async fn debts(&self) -> Result<Vec<Debt>, AppError> {
            self.inner.debts().await
        }
    }

    fn sample() -> Snapshot {
        Snapshot {
            debts: vec![Debt {
                id: "d1".into(),
                name: "Card".into(),
                balance: 1000.0,
                interest_rate: 20.0,
                minimum_payment: 35.0,
            }],
            bills: vec![Bill {
                id: "b1".into(),
                name: "Rent".into(),
                amount: 900.0,
                due_date: 5,
                is_paid: false,
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_failed_domain_is_isolated() {
        let provider = BillsDown {
            inner: StaticProvider::new(sample()),
        };
        let snapshot = fetch_snapshot(&provider).await;
        assert!(snapshot.bills.is_empty());
        assert_eq!(snapshot.debts.len(), 1);
    }

    #[tokio::test]
    async fn test_static_provider_filters_subscription_status() {
        let mut snap = Snapshot::default();
        for (id, status) in [("s1", SubscriptionStatus::Active), ("s2", SubscriptionStatus::Cancelled)] {
            snap.subscriptions.push(Subscription {
                id: id.into(),
                name: id.into(),
                amount: 9.99,
                status,
                next_billing_date: None,
                last_used_at: None,
            });
        }
        let fetched = fetch_snapshot(&StaticProvider::new(snap)).await;
        assert_eq!(fetched.subscriptions.len(), 1);
        assert_eq!(fetched.subscriptions[0].id, "s1");
    }

    #[tokio::test]
    async fn test_json_provider_skips_malformed_entities() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "debts": [
                    {{"id":"d1","name":"Card","balance":500,"interestRate":22.5,"minimumPayment":25}},
                    {{"id":"d2","name":"Loan","balance":"lots","interestRate":5}}
                ],
                "bills": null
            }}"#
        )
        .unwrap();

        let provider = JsonFileProvider::new(file.path());
        let snapshot = fetch_snapshot(&provider).await;
        assert_eq!(snapshot.debts.len(), 1);
        assert_eq!(snapshot.debts[0].id, "d1");
        assert!(snapshot.bills.is_empty());
        assert!(snapshot.goals.is_empty());
    }

    #[tokio::test]
    async fn test_json_provider_missing_file_yields_empty_snapshot() {
        let provider = JsonFileProvider::new("/definitely/not/here.json");
        let snapshot = fetch_snapshot(&provider).await;
        assert!(snapshot.budgets.is_empty());
        assert!(snapshot.debts.is_empty());
    }

    #[tokio::test]
    async fn test_json_provider_snapshot_decodes_one_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "bills": {{"id": "b1"}},
                "debts": [{{"id":"d1","name":"Card","balance":500,"interestRate":22.5,"minimumPayment":25}}],
                "subscriptions": [
                    {{"id":"s1","name":"Music","amount":9.99,"status":"active"}},
                    {{"id":"s2","name":"Video","amount":15,"status":"paused"}}
                ]
            }}"#
        )
        .unwrap();

        let provider = JsonFileProvider::new(file.path());
        let snapshot = provider.snapshot().await;
        assert!(snapshot.bills.is_empty());
        assert_eq!(snapshot.debts.len(), 1);
        assert_eq!(snapshot.subscriptions.len(), 1);
        assert_eq!(snapshot.subscriptions[0].id, "s1");

        // Per-domain calls still work on their own.
        assert_eq!(provider.debts().await.unwrap().len(), 1);
        assert!(provider.bills().await.is_err());
    }

    #[test]
    fn test_non_array_domain_is_an_error() {
        let doc = serde_json::json!({ "bills": { "id": "b1" } });
        assert!(decode_domain::<Bill>(&doc, "bills").is_err());
    }
}
