use super::types::Alert;

/// Concatenate detector outputs (already in registry order) and rank them:
/// severity tier ascending, then `rank` descending. The sort is stable, so
/// equal keys keep detector-then-insertion order.
pub fn merge(per_detector: Vec<Vec<Alert>>) -> Vec<Alert> {
    let mut all: Vec<Alert> = per_detector.into_iter().flatten().collect();
    sort_alerts(&mut all);
    all
}

pub fn sort_alerts(alerts: &mut [Alert]) {
    alerts.sort_by(|a, b| {
        a.severity
            .tier()
            .cmp(&b.severity.tier())
            .then_with(|| b.rank.cmp(&a.rank))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{AlertCategory, Severity};

    fn alert(id: &str, severity: Severity, rank: i64) -> Alert {
        Alert {
            id: id.into(),
            category: AlertCategory::LargeTransaction,
            severity,
            title: String::new(),
            message: String::new(),
            display_time: String::new(),
            route: None,
            rank,
            read: false,
        }
    }

    fn ids(alerts: &[Alert]) -> Vec<&str> {
        alerts.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_reverse_severity_input_is_reordered() {
        let merged = merge(vec![vec![
            alert("success", Severity::Success, 10),
            alert("info", Severity::Info, 10),
            alert("warning", Severity::Warning, 10),
            alert("error", Severity::Error, 10),
        ]]);
        assert_eq!(ids(&merged), vec!["error", "warning", "info", "success"]);
    }

    #[test]
    fn test_newer_first_within_tier() {
        let merged = merge(vec![
            vec![alert("old", Severity::Info, 1)],
            vec![alert("new", Severity::Info, 5)],
        ]);
        assert_eq!(ids(&merged), vec!["new", "old"]);
    }

    #[test]
    fn test_ties_keep_detector_then_insertion_order() {
        let merged = merge(vec![
            vec![alert("budget-1", Severity::Warning, 7), alert("budget-2", Severity::Warning, 7)],
            vec![],
            vec![alert("sub-1", Severity::Warning, 7)],
        ]);
        assert_eq!(ids(&merged), vec!["budget-1", "budget-2", "sub-1"]);
    }

    #[test]
    fn test_empty() {
        assert!(merge(vec![vec![], vec![]]).is_empty());
    }
}
