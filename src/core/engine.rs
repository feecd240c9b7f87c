use crate::core::{FileHost, ObjectStore, RelocationReport, RelocationRule, RuleOutcome};
use crate::core::mover::Mover;
use chrono::{DateTime, Utc};

pub struct RelocationEngine<S: ObjectStore, H: FileHost> {
    mover: Mover<S, H>,
    rules: Vec<RelocationRule>,
}

impl<S: ObjectStore, H: FileHost> RelocationEngine<S, H> {
    pub fn new(store: S, host: H, rules: Vec<RelocationRule>) -> Self {
        Self {
            mover: Mover::new(store, host),
            rules,
        }
    }

    pub async fn run(&self) -> RelocationReport {
        self.run_at(Utc::now()).await
    }

    /// Runs every rule in order. A failing rule is recorded in the report and
    /// does not stop the rules after it.
    pub async fn run_at(&self, now: DateTime<Utc>) -> RelocationReport {
        tracing::info!("Starting relocation pass with {} rule(s)", self.rules.len());

        let mut report = RelocationReport::default();
        for rule in &self.rules {
            let result = match self.mover.relocate(rule, now).await {
                Ok(moved) => {
                    tracing::info!("✅ Rule {}: moved {} file(s)", rule.name, moved);
                    Ok(moved)
                }
                Err(e) => {
                    tracing::error!(
                        "❌ Rule {} failed: {} (Category: {:?}, Severity: {:?})",
                        rule.name,
                        e,
                        e.category(),
                        e.severity()
                    );
                    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
                    Err(e.to_string())
                }
            };
            report.outcomes.push(RuleOutcome {
                rule: rule.clone(),
                result,
            });
        }

        tracing::info!(
            "Relocation pass finished: {} file(s) moved",
            report.total_moved()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mover::testing::{MemoryHost, MemoryStore};
    use chrono::{TimeDelta, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 10, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_report_for_default_rules() {
        let store = MemoryStore::default();
        let host = MemoryHost::default();
        store.put("plates/car.jpg", now() - TimeDelta::hours(25), b"jpg");
        store.put("plates/fresh.jpg", now() - TimeDelta::hours(1), b"jpg");
        store.put("exports/a.xlsx", now() - TimeDelta::minutes(2), b"x");
        store.put("exports/b.xlsx", now() - TimeDelta::minutes(3), b"x");

        let engine = RelocationEngine::new(store.clone(), host.clone(), RelocationRule::defaults());
        let report = engine.run_at(now()).await;

        assert_eq!(
            report.to_string(),
            "🖼 1 plate image(s) moved to Drive.\n📊 2 Excel file(s) moved to Drive."
        );
        assert_eq!(report.total_moved(), 3);
        assert_eq!(store.names(), vec!["plates/fresh.jpg"]);

        let folders: Vec<String> = host.uploads().into_iter().map(|u| u.folder_id).collect();
        assert_eq!(
            folders,
            vec![
                "1ExA39KIUe2X6IxS3KwFO5JXhwHMJc_wH",
                "1rl00BNY_r_pIznT1Vedb-h9bP8kgXgC8",
                "1rl00BNY_r_pIznT1Vedb-h9bP8kgXgC8",
            ]
        );
    }

    #[tokio::test]
    async fn test_failing_rule_does_not_stop_later_rules() {
        let store = MemoryStore::default();
        let host = MemoryHost::default();
        store.put("plates/car.jpg", now() - TimeDelta::hours(25), b"jpg");
        store.put("exports/a.xlsx", now() - TimeDelta::minutes(2), b"x");
        store.fail_listing_of("plates/");

        let engine = RelocationEngine::new(store.clone(), host, RelocationRule::defaults());
        let report = engine.run_at(now()).await;

        assert!(report.has_failures());
        assert_eq!(
            report.to_string(),
            "🚨 Plate move error: Cloud Storage API returned 503: backend unavailable\n\
             📊 1 Excel file(s) moved to Drive."
        );
        assert_eq!(store.names(), vec!["plates/car.jpg"]);
    }

    #[tokio::test]
    async fn test_nothing_due() {
        let store = MemoryStore::default();
        store.put("exports/a.xlsx", now() - TimeDelta::seconds(10), b"x");

        let engine = RelocationEngine::new(store, MemoryHost::default(), RelocationRule::defaults());
        let report = engine.run_at(now()).await;

        assert!(!report.has_failures());
        assert_eq!(
            report.to_string(),
            "🖼 0 plate image(s) moved to Drive.\n📊 0 Excel file(s) moved to Drive."
        );
    }
}
