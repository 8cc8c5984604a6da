//! Stylesheet statistics and code quality totals.

use crate::config::AuditConfig;
use crate::finding::{Category, CheckCode, Finding, Status};
use crate::project::{Project, StylesheetFile};
use regex::Regex;
use std::sync::OnceLock;

/// Declarations that usually mean a shared utility is being restated.
fn repeated_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"backdrop-filter:\s*blur\(\d+px\)",
            r"border:\s*1px\s*solid\s*rgba\(255,\s*255,\s*255,\s*0\.\d+\)",
            r"box-shadow:\s*0\s*\d+px\s*\d+px\s*rgba\(0,\s*0,\s*0,\s*0\.\d+\)",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("built-in pattern is valid"))
        .collect()
    })
}

fn repeated_in(file: &StylesheetFile) -> usize {
    file.sheet()
        .declarations()
        .map(|(_, decl)| {
            let text = decl.text();
            repeated_patterns()
                .iter()
                .map(|regex| regex.find_iter(&text).count())
                .sum::<usize>()
        })
        .sum()
}

/// Runs the statistics checks.
pub fn check(project: &Project, config: &AuditConfig) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut total_lines = 0;
    let mut total_bytes = 0;
    let mut repeated = 0;

    for file in &project.stylesheets {
        let sheet = file.sheet();
        let bytes = project.file_size(file);
        let lines = file.line_count();
        total_lines += lines;
        total_bytes += bytes;
        repeated += repeated_in(file);

        findings.push(Finding::new(
            CheckCode::FileStats,
            Category::CodeQuality,
            Status::Pass,
            format!("{} Statistics", file.file_name()),
            format!(
                "{bytes} bytes, {lines} lines ({} non-empty), {} rules, {} var() references, {} classes",
                file.non_empty_lines(),
                sheet.rules.len(),
                sheet.var_references().len(),
                sheet.classes().len()
            ),
        ));
    }

    findings.push(Finding::new(
        CheckCode::TotalSize,
        Category::CodeQuality,
        config.thresholds.total_lines.at_most(total_lines),
        "Total CSS Size",
        format!(
            "{total_lines} total lines ({total_bytes} bytes) across {} files",
            project.stylesheets.len()
        ),
    ));

    findings.push(Finding::new(
        CheckCode::DuplicatePattern,
        Category::CodeQuality,
        config.thresholds.duplicate_patterns.at_most(repeated),
        "Duplicate Pattern Analysis",
        format!("{repeated} potential duplicate patterns found"),
    ));

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Band;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_statistics() {
        let mut project = Project::new(
            vec![StylesheetFile::stylesheet(
                "static/css/cards.css",
                ".card { padding: var(--space-md); backdrop-filter: blur(10px); }\n\n.card-title { color: var(--color-text); }\n"
                    .into(),
            )],
            Vec::new(),
        );
        project
            .file_sizes
            .insert("static/css/cards.css".into(), 2048);

        let mut config = AuditConfig::default();
        config.thresholds.total_lines = Band::new(3, usize::MAX);
        let findings = check(&project, &config);

        let summary: Vec<(Status, &str)> = findings
            .iter()
            .map(|f| (f.status, f.message.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (
                    Status::Pass,
                    "2048 bytes, 4 lines (2 non-empty), 2 rules, 2 var() references, 2 classes"
                ),
                (Status::Warn, "4 total lines (2048 bytes) across 1 files"),
                (Status::Pass, "1 potential duplicate patterns found"),
            ]
        );
    }
}
