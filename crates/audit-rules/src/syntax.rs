//! Syntax checks: scan errors reported as findings.

use crate::finding::{Category, CheckCode, Finding, Status};
use crate::project::Project;
use css_scanner::{ScanError, ScanErrorKind};

fn code(kind: &ScanErrorKind) -> CheckCode {
    match kind {
        ScanErrorKind::UnclosedBlock { .. } | ScanErrorKind::UnexpectedCloseBrace => {
            CheckCode::UnbalancedBraces
        }
        ScanErrorKind::UnterminatedComment => CheckCode::UnterminatedComment,
        ScanErrorKind::UnterminatedString => CheckCode::UnterminatedString,
        ScanErrorKind::EmptyRule { .. } => CheckCode::EmptyRule,
        ScanErrorKind::DuplicateSemicolon => CheckCode::DuplicateSemicolon,
        ScanErrorKind::InvalidDeclaration { .. } => CheckCode::InvalidDeclaration,
    }
}

fn title(kind: &ScanErrorKind) -> &'static str {
    match kind {
        ScanErrorKind::UnclosedBlock { .. } => "Unclosed Block",
        ScanErrorKind::UnexpectedCloseBrace => "Unexpected Closing Brace",
        ScanErrorKind::UnterminatedComment => "Unterminated Comment",
        ScanErrorKind::UnterminatedString => "Unterminated String",
        ScanErrorKind::EmptyRule { .. } => "Empty Rule",
        ScanErrorKind::DuplicateSemicolon => "Duplicate Semicolon",
        ScanErrorKind::InvalidDeclaration { .. } => "Invalid Declaration",
    }
}

/// Structural errors fail; the rest are style problems and warn.
fn status(error: &ScanError) -> Status {
    if error.kind.is_structural() {
        Status::Fail
    } else {
        Status::Warn
    }
}

/// Runs the syntax checks.
pub fn check(project: &Project) -> Vec<Finding> {
    let mut findings = Vec::new();

    for file in &project.stylesheets {
        let errors = &file.parsed.errors;
        if errors.is_empty() {
            findings.push(Finding::new(
                CheckCode::SyntaxValid,
                Category::Syntax,
                Status::Pass,
                format!("{} Syntax", file.file_name()),
                format!("{} rules scanned without errors", file.sheet().rules.len()),
            ));
            continue;
        }

        tracing::debug!(file = %file.path, errors = errors.len(), "stylesheet has scan errors");
        findings.extend(errors.iter().map(|error| {
            Finding::new(
                code(&error.kind),
                Category::Syntax,
                status(error),
                title(&error.kind),
                error.to_string(),
            )
            .at(file.location(error.span))
        }));
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::StylesheetFile;
    use insta::assert_snapshot;

    #[test]
    fn test_scan_errors_become_findings() {
        let project = Project::new(
            vec![
                StylesheetFile::stylesheet(
                    "static/css/broken.css",
                    ".a { color: red;; }\n.b { }\n}\n.c { padding: 0;".into(),
                ),
                StylesheetFile::stylesheet("static/css/clean.css", ".ok { color: red; }".into()),
            ],
            Vec::new(),
        );
        let rendered: Vec<String> = check(&project)
            .iter()
            .map(|f| {
                let at = f
                    .location
                    .as_ref()
                    .map(|l| format!("{}:{}", l.line, l.column))
                    .unwrap_or_default();
                format!("{} {} {at} {}", f.status, f.code, f.message)
            })
            .collect();

        assert_snapshot!(rendered.join("\n"), @r"
        WARN duplicate-semicolon 1:17 duplicate semicolon
        WARN empty-rule 2:1 empty rule: `.b` has no declarations
        FAIL unbalanced-braces 3:1 unexpected `}` with no open block
        FAIL unbalanced-braces 4:4 unclosed block: `.c` is never closed
        PASS syntax-valid  1 rules scanned without errors
        ");
    }
}
