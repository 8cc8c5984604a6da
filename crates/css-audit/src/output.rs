//! Output formatting.

use crate::cli::{ColorChoice, OutputFormat};
use audit_rules::{AuditSummary, Category, Finding, Project, Status};
use indexmap::IndexMap;
use serde::Serialize;
use std::io::IsTerminal;

const RULE: &str = "====================================";

/// ANSI styling, applied only when enabled.
#[derive(Debug, Clone, Copy)]
struct Paint {
    enabled: bool,
}

impl Paint {
    fn wrap(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1B[{code}m{text}\x1B[0m")
        } else {
            text.to_string()
        }
    }

    fn status(&self, status: Status, text: &str) -> String {
        let code = match status {
            Status::Pass => "32",
            Status::Warn => "33",
            Status::Fail => "31",
        };
        self.wrap(code, text)
    }

    fn bold(&self, text: &str) -> String {
        self.wrap("1", text)
    }

    fn dim(&self, text: &str) -> String {
        self.wrap("2", text)
    }
}

/// Whether human output should be colored.
pub fn use_color(choice: ColorChoice) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => {
            std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
        }
    }
}

/// JSON report: every finding plus the summary.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub findings: &'a [Finding],
    pub summary: &'a AuditSummary,
    pub file_count: usize,
}

/// Formats audit results for output.
pub struct Formatter {
    format: OutputFormat,
    paint: Paint,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat, color: bool) -> Self {
        let color = color && matches!(format, OutputFormat::Human | OutputFormat::HumanVerbose);
        Self {
            format,
            paint: Paint { enabled: color },
        }
    }

    /// Formats findings, ending with the summary.
    pub fn format(&self, findings: &[Finding], summary: &AuditSummary, project: &Project) -> String {
        let file_count = project.stylesheets.len() + project.templates.len();
        match self.format {
            OutputFormat::Human => self.format_human(findings, summary, project, file_count, false),
            OutputFormat::HumanVerbose => {
                self.format_human(findings, summary, project, file_count, true)
            }
            OutputFormat::Json => Self::format_json(findings, summary, file_count),
            OutputFormat::Machine => Self::format_machine(findings, summary),
        }
    }

    /// Findings grouped by category, sections and findings in first-seen
    /// order.
    fn group(findings: &[Finding]) -> IndexMap<Category, Vec<&Finding>> {
        let mut groups: IndexMap<Category, Vec<&Finding>> = IndexMap::new();
        for finding in findings {
            groups.entry(finding.category).or_default().push(finding);
        }
        groups
    }

    fn format_human(
        &self,
        findings: &[Finding],
        summary: &AuditSummary,
        project: &Project,
        file_count: usize,
        verbose: bool,
    ) -> String {
        let paint = self.paint;
        let mut output = String::new();

        output.push_str(&paint.bold("🎨 Design System Audit"));
        output.push('\n');
        output.push_str(RULE);
        output.push_str("\n\n");

        for (category, group) in Self::group(findings) {
            let tally = &summary.categories[&category];
            output.push_str(&format!(
                "{} {}\n",
                paint.bold(category.title()),
                paint.dim(&format!("({}/{} passed)", tally.passed, tally.total()))
            ));
            output.push_str(&"-".repeat(40));
            output.push('\n');

            for finding in group {
                output.push_str(&format!(
                    "  {} {}: {}\n",
                    finding.status.icon(),
                    finding.name,
                    paint.status(finding.status, &finding.message)
                ));

                if verbose && finding.status != Status::Pass {
                    if let Some(location) = &finding.location {
                        output.push_str(&format!(
                            "     {} {}:{}:{}\n",
                            paint.dim("-->"),
                            location.file,
                            location.line,
                            location.column
                        ));
                        output.push_str(&snippet(project, finding));
                    }
                }
            }
            output.push('\n');
        }

        output.push_str(&summary_text(summary, file_count, paint));
        output
    }

    fn format_json(findings: &[Finding], summary: &AuditSummary, file_count: usize) -> String {
        let report = JsonReport {
            findings,
            summary,
            file_count,
        };
        serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
    }

    /// One line per finding: `STATUS category code file:line:col message`.
    fn format_machine(findings: &[Finding], summary: &AuditSummary) -> String {
        let mut output = String::new();

        for finding in findings {
            let location = finding
                .location
                .as_ref()
                .map(|l| format!("{}:{}:{}", l.file, l.line, l.column))
                .unwrap_or_else(|| "-".to_string());
            output.push_str(&format!(
                "{} {} {} {} {}: {}\n",
                finding.status,
                finding.category.as_str(),
                finding.code,
                location,
                finding.name,
                finding.message
            ));
        }

        output.push_str(&format!(
            "SUMMARY passed={} warned={} failed={} total={} rate={:.1} grade={}\n",
            summary.passed,
            summary.warned,
            summary.failed,
            summary.total,
            summary.success_rate,
            summary.grade.as_str().replace(' ', "-")
        ));
        output
    }
}

/// The source line a finding points at, with a caret under its column.
fn snippet(project: &Project, finding: &Finding) -> String {
    let Some(location) = &finding.location else {
        return String::new();
    };
    let Some((source, line_index)) = project.source_of(&location.file) else {
        return String::new();
    };
    let Some(text) = line_index.line_text(location.line.saturating_sub(1), source) else {
        return String::new();
    };

    let number = location.line.to_string();
    let gutter = " ".repeat(number.len());
    let caret_pad: String = text
        .chars()
        .take(location.column.saturating_sub(1) as usize)
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect();

    format!(
        "     {gutter} |\n     {number} | {text}\n     {gutter} | {caret_pad}^\n"
    )
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

fn summary_text(summary: &AuditSummary, file_count: usize, paint: Paint) -> String {
    let mut output = String::new();
    output.push_str(RULE);
    output.push('\n');
    output.push_str(&format!(
        "📊 css-audit ran {} in {}: {} passed, {}, {} ({:.1}% success)\n",
        plural(summary.total, "check"),
        plural(file_count, "file"),
        summary.passed,
        plural(summary.warned, "warning"),
        plural(summary.failed, "failure"),
        summary.success_rate
    ));
    output.push_str(&format!("Grade: {}\n", paint.bold(summary.grade.as_str())));
    output.push_str(&format!(
        "{} {}\n",
        summary.recommendation.icon(),
        summary.recommendation.message()
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use audit_rules::{CheckCode, StylesheetFile};
    use insta::assert_snapshot;

    fn project() -> Project {
        Project::new(
            vec![StylesheetFile::stylesheet(
                "static/css/utilities.css",
                ".glass-card {\n  background: rgba(255, 255, 255, 0.9);\n}\n".into(),
            )],
            Vec::new(),
        )
    }

    fn findings(project: &Project) -> Vec<Finding> {
        let file = &project.stylesheets[0];
        let rule = &file.sheet().rules[0];
        vec![
            Finding::new(
                CheckCode::TokenValue,
                Category::Tokens,
                Status::Pass,
                "--nav-gap",
                "15px",
            ),
            Finding::new(
                CheckCode::UtilityStyle,
                Category::Utilities,
                Status::Fail,
                ".glass-card has backdrop blur",
                "backdrop-filter not set (expected: contains \"blur\")",
            )
            .at(file.location(rule.declarations[0].span)),
        ]
    }

    #[test]
    fn test_format_human() {
        let project = project();
        let findings = findings(&project);
        let summary = AuditSummary::from_findings(&findings);
        let output = Formatter::new(OutputFormat::Human, false).format(&findings, &summary, &project);

        assert_snapshot!(output, @r#"
        🎨 Design System Audit
        ====================================

        Design Tokens (1/1 passed)
        ----------------------------------------
          ✅ --nav-gap: 15px

        Utilities (0/1 passed)
        ----------------------------------------
          ❌ .glass-card has backdrop blur: backdrop-filter not set (expected: contains "blur")

        ====================================
        📊 css-audit ran 2 checks in 1 file: 1 passed, 0 warnings, 1 failure (50.0% success)
        Grade: NEEDS WORK
        ❌ critical issues detected, fix failed checks first
        "#);
    }

    #[test]
    fn test_format_human_verbose_snippet() {
        let project = project();
        let findings = findings(&project);
        let summary = AuditSummary::from_findings(&findings);
        let output =
            Formatter::new(OutputFormat::HumanVerbose, false).format(&findings, &summary, &project);

        assert!(output.contains("     --> static/css/utilities.css:2:3\n"));
        assert!(output.contains("     2 |   background: rgba(255, 255, 255, 0.9);\n"));
        assert!(output.contains("       |   ^\n"));
    }

    #[test]
    fn test_format_machine() {
        let project = project();
        let findings = findings(&project);
        let summary = AuditSummary::from_findings(&findings);
        let output = Formatter::new(OutputFormat::Machine, true).format(&findings, &summary, &project);

        assert_snapshot!(output, @r#"
        PASS tokens token-value - --nav-gap: 15px
        FAIL utilities utility-style static/css/utilities.css:2:3 .glass-card has backdrop blur: backdrop-filter not set (expected: contains "blur")
        SUMMARY passed=1 warned=0 failed=1 total=2 rate=50.0 grade=NEEDS-WORK
        "#);
    }

    #[test]
    fn test_format_json() {
        let project = project();
        let findings = findings(&project);
        let summary = AuditSummary::from_findings(&findings);
        let output = Formatter::new(OutputFormat::Json, true).format(&findings, &summary, &project);

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["file_count"], 1);
        assert_eq!(value["findings"][1]["status"], "FAIL");
        assert_eq!(value["findings"][1]["code"], "utility-style");
        assert_eq!(value["findings"][1]["location"]["line"], 2);
        assert_eq!(value["summary"]["grade"], "needs-work");
        assert!(!output.contains('\x1B'));
    }

    #[test]
    fn test_colored_status() {
        let paint = Paint { enabled: true };
        assert_eq!(paint.status(Status::Fail, "x"), "\x1B[31mx\x1B[0m");
        assert_eq!(Paint { enabled: false }.bold("x"), "x");
    }
}
