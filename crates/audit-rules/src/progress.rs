//! Progress findings computed over the findings of earlier groups.

use crate::config::AuditConfig;
use crate::finding::{Category, CheckCode, Finding, Status};

/// Percentage of findings in `categories` that passed; 0 when there are none.
pub fn pass_rate(findings: &[Finding], categories: &[Category]) -> f64 {
    let relevant: Vec<&Finding> = findings
        .iter()
        .filter(|f| categories.contains(&f.category))
        .collect();
    if relevant.is_empty() {
        return 0.0;
    }
    let passed = relevant.iter().filter(|f| f.status == Status::Pass).count();
    passed as f64 / relevant.len() as f64 * 100.0
}

/// Runs the progress checks over `findings`.
pub fn check(findings: &[Finding], config: &AuditConfig) -> Vec<Finding> {
    let consolidation = pass_rate(
        findings,
        &[Category::PageConsolidation, Category::ComponentConsolidation],
    );
    let readiness = pass_rate(findings, &[Category::Utilities, Category::DesignSystem]);

    vec![
        Finding::new(
            CheckCode::ConsolidationProgress,
            Category::Progress,
            config
                .thresholds
                .consolidation_progress
                .at_least_percent(consolidation),
            "Consolidation Completion",
            format!("{consolidation:.1}% complete (page + component consolidation)"),
        ),
        Finding::new(
            CheckCode::SystemReadiness,
            Category::Progress,
            config.thresholds.system_readiness.at_least_percent(readiness),
            "Next Phase Readiness",
            format!("{readiness:.1}% system health (utilities + design system)"),
        ),
    ]
}
