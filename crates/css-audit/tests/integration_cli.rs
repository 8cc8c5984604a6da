//! End-to-end tests running the css-audit binary over temporary workspaces.
//!
//! Every test writes a small design system to disk, runs the binary with
//! JSON or machine output and checks exit codes and selected findings.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

// ============================================================================
// TEST INFRASTRUCTURE
// ============================================================================

/// A finding from the JSON output
#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
struct JsonFinding {
    code: String,
    category: String,
    status: String,
    name: String,
    message: String,
    location: Option<JsonLocation>,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
struct JsonLocation {
    file: String,
    line: u32,
    column: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
struct JsonSummary {
    passed: usize,
    warned: usize,
    failed: usize,
    total: usize,
    grade: String,
}

#[derive(Debug, Clone, Deserialize)]
struct JsonReport {
    findings: Vec<JsonFinding>,
    summary: JsonSummary,
    file_count: usize,
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// A workspace with variables, utilities, one template and an ignored vendor file.
fn design_system() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "static/css/variables.css",
        ":root {\n  --color-primary: #6441a5;\n  --nav-gap: 15px;\n  --radius-button: 8px;\n}\n",
    );
    write(
        root,
        "static/css/utilities.css",
        ".btn-base { padding: 10px 20px; border: none; cursor: pointer; }\n\
         .btn-primary { background: linear-gradient(135deg, #6441a5, #2a0845); border-radius: var(--radius-button); }\n",
    );
    write(
        root,
        "templates/home.html",
        "<button class=\"btn-base btn-primary\">Go</button>\n",
    );
    write(root, "node_modules/lib/theme.css", ".broken { color: red;");
    dir
}

fn run(workspace: &Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_css-audit"))
        .arg("--workspace")
        .arg(workspace)
        .args(extra)
        .env("CSS_AUDIT_LOG", "off")
        .output()
        .expect("failed to run css-audit")
}

fn run_json(workspace: &Path, extra: &[&str]) -> (i32, JsonReport) {
    let mut args = vec!["--output", "json"];
    args.extend_from_slice(extra);
    let output = run(workspace, &args);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let report: JsonReport = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("invalid JSON output ({e}):\n{stdout}"));
    (output.status.code().unwrap_or(-1), report)
}

fn find<'a>(report: &'a JsonReport, code: &str, name: &str) -> &'a JsonFinding {
    report
        .findings
        .iter()
        .find(|f| f.code == code && f.name == name)
        .unwrap_or_else(|| panic!("no {code} finding named {name}"))
}

// ============================================================================
// TESTS
// ============================================================================

#[test]
fn test_json_report() {
    let workspace = design_system();
    let (code, report) = run_json(workspace.path(), &["--checks", "tokens,syntax"]);

    // Defaults expect more tokens than the fixture defines.
    assert_eq!(code, 1);
    assert_eq!(report.file_count, 3);
    assert_eq!(report.summary.total, report.findings.len());

    let gap = find(&report, "token-value", "--nav-gap");
    assert_eq!(gap.status, "PASS");
    let location = gap.location.as_ref().unwrap();
    assert_eq!(location.file, "static/css/variables.css");
    assert_eq!((location.line, location.column), (3, 3));

    assert!(report
        .findings
        .iter()
        .all(|f| f.category == "tokens" || f.category == "syntax"));
    assert!(!report
        .findings
        .iter()
        .any(|f| f.location.as_ref().is_some_and(|l| l.file.contains("node_modules"))));
}

#[test]
fn test_clean_selection_exits_zero() {
    let workspace = design_system();
    let (code, report) = run_json(workspace.path(), &["--checks", "syntax"]);

    assert_eq!(code, 0);
    assert_eq!(report.summary.failed, 0);
    assert!(report.findings.iter().all(|f| f.status == "PASS"));
}

#[test]
fn test_threshold_and_fail_on_warnings() {
    let workspace = design_system();
    write(
        workspace.path(),
        "static/css/extra.css",
        ".card { color: red;; }\n",
    );

    let (code, report) = run_json(workspace.path(), &["--checks", "syntax"]);
    assert_eq!(code, 0);
    assert_eq!(report.summary.warned, 1);
    let warning = find(&report, "duplicate-semicolon", "Duplicate Semicolon");
    assert_eq!(warning.location.as_ref().unwrap().file, "static/css/extra.css");

    let (code, _) = run_json(workspace.path(), &["--checks", "syntax", "--fail-on-warnings"]);
    assert_eq!(code, 1);

    let (code, report) = run_json(
        workspace.path(),
        &["--checks", "syntax", "--fail-on-warnings", "--threshold", "fail"],
    );
    assert_eq!(code, 0);
    assert_eq!(report.summary.warned, 0);
}

#[test]
fn test_config_file_and_ignore() {
    let workspace = design_system();
    write(
        workspace.path(),
        "css-audit.json",
        r#"{
            // only the variables file is audited
            "stylesheets": ["static/css/variables.css"],
            "templates": [],
            "tokens": [{ "name": "--nav-gap", "equals": "15px", "category": "spacing" }]
        }"#,
    );

    let (code, report) = run_json(workspace.path(), &["--checks", "tokens"]);
    assert_eq!(code, 0);
    assert_eq!(report.file_count, 1);
    assert_eq!(
        report
            .findings
            .iter()
            .map(|f| (f.name.as_str(), f.message.as_str()))
            .collect::<Vec<_>>(),
        vec![("--nav-gap", "15px"), ("spacing tokens", "1/1 (100%)")]
    );

    let (_, report) = run_json(
        workspace.path(),
        &["--checks", "tokens", "--ignore", "static/**"],
    );
    assert_eq!(report.file_count, 0);
    assert_eq!(report.findings[0].message, "not defined (expected: 15px)");
}

#[test]
fn test_machine_output() {
    let workspace = design_system();
    let output = run(workspace.path(), &["--output", "machine", "--checks", "syntax"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout
        .lines()
        .any(|line| line.starts_with("PASS syntax syntax-valid - utilities.css Syntax: ")));
    assert!(stdout.lines().last().unwrap().starts_with("SUMMARY passed="));
}

#[test]
fn test_showcase_written() {
    let workspace = design_system();
    let output = run(
        workspace.path(),
        &["--checks", "buttons", "--showcase", "docs/showcase.html"],
    );
    // The docs directory does not exist yet.
    assert_eq!(output.status.code(), Some(1));

    fs::create_dir_all(workspace.path().join("docs")).unwrap();
    let output = run(
        workspace.path(),
        &["--checks", "buttons", "--showcase", "docs/showcase.html"],
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("showcase written to"));

    let html = fs::read_to_string(workspace.path().join("docs/showcase.html")).unwrap();
    assert!(html.contains("href=\"../static/css/utilities.css\""));
    assert!(html.contains("class=\"btn-base btn-primary\""));
}

#[test]
fn test_invalid_inputs() {
    let workspace = design_system();

    let output = run(workspace.path(), &["--ignore", "a/["]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid glob pattern"));

    write(workspace.path(), "css-audit.json", "{ \"stylesheets\": 1 }");
    let output = run(workspace.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid config"));

    let output = run(&workspace.path().join("missing"), &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("workspace not found"));
}
