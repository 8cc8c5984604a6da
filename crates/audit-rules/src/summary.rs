//! Audit totals, grade and recommendation.

use crate::finding::{Category, Finding, Status};
use indexmap::IndexMap;
use serde::Serialize;

/// Warnings tolerated before a clean audit stops counting as excellent.
const EXCELLENT_MAX_WARNINGS: usize = 8;

/// Overall standing of an audit by success rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Grade {
    Excellent,
    Good,
    NeedsWork,
    Critical,
}

impl Grade {
    pub fn from_rate(rate: f64) -> Self {
        if rate >= 90.0 {
            Grade::Excellent
        } else if rate >= 75.0 {
            Grade::Good
        } else if rate >= 50.0 {
            Grade::NeedsWork
        } else {
            Grade::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Excellent => "EXCELLENT",
            Grade::Good => "GOOD",
            Grade::NeedsWork => "NEEDS WORK",
            Grade::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do next, judged from the failure and warning counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Recommendation {
    Excellent,
    FixFailures,
    MinorImprovements,
}

impl Recommendation {
    pub fn from_counts(failed: usize, warned: usize) -> Self {
        if failed == 0 && warned <= EXCELLENT_MAX_WARNINGS {
            Recommendation::Excellent
        } else if failed > 0 {
            Recommendation::FixFailures
        } else {
            Recommendation::MinorImprovements
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Recommendation::Excellent => "🎉",
            Recommendation::FixFailures => "❌",
            Recommendation::MinorImprovements => "⚠️",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Recommendation::Excellent => "design system is in excellent condition",
            Recommendation::FixFailures => "critical issues detected, fix failed checks first",
            Recommendation::MinorImprovements => "good progress with minor improvements needed",
        }
    }
}

/// Counts for one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub passed: usize,
    pub warned: usize,
    pub failed: usize,
}

impl Tally {
    fn add(&mut self, status: Status) {
        match status {
            Status::Pass => self.passed += 1,
            Status::Warn => self.warned += 1,
            Status::Fail => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.warned + self.failed
    }

    /// Percentage passed; 100 when there is nothing to count.
    pub fn success_rate(&self) -> f64 {
        match self.total() {
            0 => 100.0,
            total => self.passed as f64 / total as f64 * 100.0,
        }
    }
}

/// Totals of an audit run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditSummary {
    pub passed: usize,
    pub warned: usize,
    pub failed: usize,
    pub total: usize,
    pub success_rate: f64,
    pub grade: Grade,
    /// Per-category counts in first-seen order.
    pub categories: IndexMap<Category, Tally>,
    pub recommendation: Recommendation,
}

impl AuditSummary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut overall = Tally::default();
        let mut categories: IndexMap<Category, Tally> = IndexMap::new();
        for finding in findings {
            overall.add(finding.status);
            categories.entry(finding.category).or_default().add(finding.status);
        }

        let success_rate = overall.success_rate();
        Self {
            passed: overall.passed,
            warned: overall.warned,
            failed: overall.failed,
            total: overall.total(),
            success_rate,
            grade: Grade::from_rate(success_rate),
            categories,
            recommendation: Recommendation::from_counts(overall.failed, overall.warned),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::CheckCode;
    use pretty_assertions::assert_eq;

    fn finding(category: Category, status: Status) -> Finding {
        Finding::new(CheckCode::TokenValue, category, status, "t", "m")
    }

    #[test]
    fn test_grades() {
        assert_eq!(Grade::from_rate(90.0), Grade::Excellent);
        assert_eq!(Grade::from_rate(89.9), Grade::Good);
        assert_eq!(Grade::from_rate(75.0), Grade::Good);
        assert_eq!(Grade::from_rate(50.0), Grade::NeedsWork);
        assert_eq!(Grade::from_rate(49.9), Grade::Critical);
    }

    #[test]
    fn test_recommendations() {
        assert_eq!(Recommendation::from_counts(0, 8), Recommendation::Excellent);
        assert_eq!(Recommendation::from_counts(0, 9), Recommendation::MinorImprovements);
        assert_eq!(Recommendation::from_counts(1, 0), Recommendation::FixFailures);
    }

    #[test]
    fn test_summary_from_findings() {
        let findings = vec![
            finding(Category::Tokens, Status::Pass),
            finding(Category::Buttons, Status::Fail),
            finding(Category::Tokens, Status::Warn),
            finding(Category::Tokens, Status::Pass),
        ];
        let summary = AuditSummary::from_findings(&findings);

        assert_eq!((summary.passed, summary.warned, summary.failed), (2, 1, 1));
        assert_eq!(summary.total, 4);
        assert_eq!(summary.success_rate, 50.0);
        assert_eq!(summary.grade, Grade::NeedsWork);
        assert_eq!(summary.recommendation, Recommendation::FixFailures);
        assert_eq!(
            summary.categories.keys().copied().collect::<Vec<_>>(),
            vec![Category::Tokens, Category::Buttons]
        );
        assert_eq!(summary.categories[&Category::Tokens].total(), 3);
    }

    #[test]
    fn test_empty_audit_is_excellent() {
        let summary = AuditSummary::from_findings(&[]);
        assert_eq!(summary.success_rate, 100.0);
        assert_eq!(summary.grade, Grade::Excellent);
    }
}
