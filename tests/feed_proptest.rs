//! Property tests for feed ranking and identity.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use alerts_lib::db::models::{
    Bill, Budget, Debt, Goal, GoalStatus, Subscription, SubscriptionStatus, Transaction,
    TransactionKind,
};
use alerts_lib::db::repos::settings::KeyValueStore;
use alerts_lib::engine::format::EnglishFormatter;
use alerts_lib::engine::snapshot::{Snapshot, StaticProvider};
use alerts_lib::engine::state::NotificationStore;
use alerts_lib::engine::AlertEngine;
use alerts_lib::error::AppError;
use alerts_lib::{Alert, AlertCategory};
use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;

#[derive(Default)]
struct MemoryKv(Mutex<HashMap<String, String>>);

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.0.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.0.lock().unwrap().insert(key.into(), value.into());
        Ok(())
    }
}

fn now() -> DateTime<Utc> {
    "2026-03-18T12:00:00Z".parse().unwrap()
}

fn engine(snapshot: Snapshot) -> AlertEngine {
    AlertEngine::new(
        Arc::new(StaticProvider::new(snapshot)),
        Arc::new(EnglishFormatter::default()),
        NotificationStore::new(Arc::new(MemoryKv::default())),
    )
}

prop_compose! {
    fn budget()(amount in 0.0f64..2000.0, threshold in proptest::option::of(50.0f64..100.0),
                category in 0usize..3, active in any::<bool>()) -> Budget {
        Budget {
            id: String::new(),
            name: "Budget".into(),
            category: format!("cat-{category}"),
            amount,
            alert_threshold: threshold,
            is_active: active,
        }
    }
}

prop_compose! {
    fn transaction()(amount in -800.0f64..800.0, category in 0usize..3,
                     kind in prop_oneof![
                         Just(TransactionKind::Purchase),
                         Just(TransactionKind::Income),
                         Just(TransactionKind::Transfer),
                         Just(TransactionKind::Refund),
                     ],
                     hours_ago in 0i64..(40 * 24)) -> Transaction {
        Transaction {
            id: String::new(),
            description: None,
            amount,
            category: format!("cat-{category}"),
            kind,
            date: now() - Duration::hours(hours_ago),
        }
    }
}

prop_compose! {
    fn goal()(target in 0.0f64..2000.0, current in 0.0f64..2500.0,
              offset_hours in proptest::option::of(-(40 * 24i64)..(60 * 24))) -> Goal {
        Goal {
            id: String::new(),
            name: "Goal".into(),
            target_amount: target,
            current_amount: current,
            target_date: offset_hours.map(|h| now() + Duration::hours(h)),
            status: GoalStatus::Active,
        }
    }
}

prop_compose! {
    fn subscription()(next_hours in proptest::option::of(-(48i64)..(10 * 24)),
                      used_days in proptest::option::of(0i64..90)) -> Subscription {
        Subscription {
            id: String::new(),
            name: "Sub".into(),
            amount: 9.99,
            status: SubscriptionStatus::Active,
            next_billing_date: next_hours.map(|h| now() + Duration::hours(h)),
            last_used_at: used_days.map(|d| now() - Duration::days(d)),
        }
    }
}

prop_compose! {
    fn bill()(due in 1u32..=31, paid in any::<bool>()) -> Bill {
        Bill { id: String::new(), name: "Bill".into(), amount: 100.0, due_date: due, is_paid: paid }
    }
}

prop_compose! {
    fn debt()(rate in 0.0f64..30.0, min in 0.0f64..200.0, balance in 0.0f64..10_000.0) -> Debt {
        Debt { id: String::new(), name: "Debt".into(), balance, interest_rate: rate, minimum_payment: min }
    }
}

/// Give every entity a unique id within its domain.
fn with_ids<T>(mut items: Vec<T>, prefix: &str, set: impl Fn(&mut T, String)) -> Vec<T> {
    for (i, item) in items.iter_mut().enumerate() {
        set(item, format!("{prefix}-{i}"));
    }
    items
}

prop_compose! {
    fn snapshot()(
        budgets in proptest::collection::vec(budget(), 0..4),
        transactions in proptest::collection::vec(transaction(), 0..25),
        goals in proptest::collection::vec(goal(), 0..4),
        subscriptions in proptest::collection::vec(subscription(), 0..4),
        bills in proptest::collection::vec(bill(), 0..4),
        debts in proptest::collection::vec(debt(), 0..4),
    ) -> Snapshot {
        Snapshot {
            budgets: with_ids(budgets, "budget", |b, id| b.id = id),
            transactions: with_ids(transactions, "txn", |t, id| t.id = id),
            goals: with_ids(goals, "goal", |g, id| g.id = id),
            subscriptions: with_ids(subscriptions, "sub", |s, id| s.id = id),
            bills: with_ids(bills, "bill", |b, id| b.id = id),
            debts: with_ids(debts, "debt", |d, id| d.id = id),
        }
    }
}

fn entity_of(alert: &Alert) -> &str {
    alert.id.split(':').nth(1).unwrap_or_default()
}

proptest! {
    #[test]
    fn candidates_are_deterministic(snap in snapshot()) {
        let engine = engine(snap.clone());
        let first: Vec<String> = engine.candidates(&snap, now()).into_iter().map(|a| a.id).collect();
        let second: Vec<String> = engine.candidates(&snap, now()).into_iter().map(|a| a.id).collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn candidates_are_ranked(snap in snapshot()) {
        let alerts = engine(snap.clone()).candidates(&snap, now());
        for pair in alerts.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.severity.tier() <= b.severity.tier());
            if a.severity == b.severity {
                prop_assert!(a.rank >= b.rank);
            }
        }
    }

    #[test]
    fn ids_are_unique(snap in snapshot()) {
        let alerts = engine(snap.clone()).candidates(&snap, now());
        let unique: HashSet<&str> = alerts.iter().map(|a| a.id.as_str()).collect();
        prop_assert_eq!(unique.len(), alerts.len());
    }

    #[test]
    fn exclusive_budget_and_milestone_alerts(snap in snapshot()) {
        let alerts = engine(snap.clone()).candidates(&snap, now());
        let mut budget_alerts: HashMap<&str, usize> = HashMap::new();
        let mut milestones: HashMap<&str, usize> = HashMap::new();
        for alert in &alerts {
            match alert.category {
                AlertCategory::BudgetExceeded | AlertCategory::BudgetWarning => {
                    *budget_alerts.entry(entity_of(alert)).or_default() += 1;
                }
                AlertCategory::GoalMilestone(_) => {
                    *milestones.entry(entity_of(alert)).or_default() += 1;
                }
                _ => {}
            }
        }
        prop_assert!(budget_alerts.values().all(|&n| n == 1));
        prop_assert!(milestones.values().all(|&n| n == 1));
    }

    #[test]
    fn at_most_three_large_transactions(snap in snapshot()) {
        let alerts = engine(snap.clone()).candidates(&snap, now());
        let large = alerts.iter().filter(|a| a.category == AlertCategory::LargeTransaction).count();
        prop_assert!(large <= 3);
    }
}

#[tokio::test]
async fn dismissed_alert_stays_hidden_across_refreshes() {
    let snap = Snapshot {
        bills: vec![Bill {
            id: "rent".into(),
            name: "Rent".into(),
            amount: 1500.0,
            due_date: 5,
            is_paid: false,
        }],
        ..Default::default()
    };
    let engine = engine(snap);

    let mut feed = engine.refresh_feed(now()).await;
    let id = "bill-overdue:rent:2026-03";
    assert!(feed.get(id).is_some());

    engine.dismiss(&mut feed, id);
    engine.dismiss(&mut feed, id);

    let later = now() + Duration::hours(3);
    assert!(engine.refresh_feed(later).await.get(id).is_none());
}
