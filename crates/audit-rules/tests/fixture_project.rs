//! Runs the full audit over a small design-system workspace.

use audit_rules::{
    audit, AuditConfig, AuditOptions, AuditSummary, Category, CheckCode, Finding, Project, Status,
    StylesheetFile, TemplateFile,
};
use pretty_assertions::assert_eq;

const VARIABLES: &str = r#"
:root {
    --color-primary: #6441a5;
    --color-secondary: #667eea;
    --color-primary-gradient: linear-gradient(135deg, var(--color-primary) 0%, #2a0845 100%);
    --space-sm: 10px;
    --nav-link-padding: var(--space-sm) 20px;
    --nav-gap: 15px;
    --radius-card: 15px;
    --radius-button: 8px;
}
"#;

const BASE: &str = r#"
body { font-family: system-ui, sans-serif; }
.primary-gradient { background: var(--color-primary-gradient); }
.hero { padding: 40px; }
"#;

const UTILITIES: &str = r#"
.btn-base { display: inline-flex; padding: 10px 20px; border: none; cursor: pointer; }
.btn-base:focus-visible { outline: 2px solid var(--color-primary); }
.btn-primary { background: var(--color-primary-gradient); border-radius: var(--radius-button); padding: 10px 20px; }
.btn-secondary { background: var(--color-secondary); border-radius: var(--radius-button); }
.btn-small { padding: 4px 8px; }
.btn-large { padding: 14px 28px; }
.glass-card { background: rgba(255, 255, 255, 0.95); backdrop-filter: blur(10px); }
.nav-link { display: flex; padding: var(--nav-link-padding); border-radius: var(--radius-card); }
"#;

const HOME: &str = r#"
.hero { padding: 60px; }
@media (max-width: 768px) { .glass-card { padding: 1rem; } }
"#;

const SEARCH: &str = r#"
<div class="glass-card">
  <form class="glass-card">
    <button class="btn-base btn-primary">Search</button>
    <button type="button" class="reset">Reset</button>
  </form>
</div>
"#;

fn project() -> Project {
    Project::new(
        vec![
            StylesheetFile::stylesheet("static/css/variables.css", VARIABLES.into()),
            StylesheetFile::stylesheet("static/css/base.css", BASE.into()),
            StylesheetFile::stylesheet("static/css/utilities.css", UTILITIES.into()),
            StylesheetFile::stylesheet("static/css/home-pages.css", HOME.into()),
        ],
        vec![TemplateFile::template("templates/search.html", SEARCH.into())],
    )
}

fn named<'a>(findings: &'a [Finding], code: CheckCode, name: &str) -> &'a Finding {
    findings
        .iter()
        .find(|f| f.code == code && f.name == name)
        .unwrap_or_else(|| panic!("no {code} finding named {name}"))
}

#[test]
fn test_tokens_resolve_through_variables() {
    let findings = audit(&project(), &AuditOptions::all(), &AuditConfig::default());

    let padding = named(&findings, CheckCode::TokenValue, "--nav-link-padding");
    assert_eq!(padding.status, Status::Pass);
    assert_eq!(padding.message, "10px 20px");

    let gradient = named(&findings, CheckCode::TokenValue, "--color-primary-gradient");
    assert_eq!(gradient.status, Status::Pass);

    let missing = named(&findings, CheckCode::TokenValue, "--font-size-sm");
    assert_eq!(missing.status, Status::Fail);
    assert_eq!(missing.message, "not defined (expected: 14px)");
}

#[test]
fn test_utilities_see_variables() {
    let findings = audit(&project(), &AuditOptions::all(), &AuditConfig::default());

    for name in [
        ".btn-primary has gradient background",
        ".btn-primary has proper border radius",
        ".nav-link uses CSS variable padding",
        ".nav-link uses CSS variable radius",
        ".glass-card has backdrop blur",
    ] {
        assert_eq!(
            named(&findings, CheckCode::UtilityStyle, name).status,
            Status::Pass,
            "{name}"
        );
    }
}

#[test]
fn test_duplicates_and_buttons() {
    let findings = audit(&project(), &AuditOptions::all(), &AuditConfig::default());

    let hero = named(&findings, CheckCode::DuplicateClass, ".hero");
    assert_eq!(hero.status, Status::Fail);
    assert!(hero.message.starts_with(
        "defined in base.css, home-pages.css with conflicting values for padding"
    ));
    let location = hero.location.as_ref().expect("duplicate has a location");
    assert_eq!(location.file, "static/css/home-pages.css");
    assert_eq!(location.line, 2);

    let glass = named(&findings, CheckCode::DuplicateClass, ".glass-card");
    assert_eq!(glass.status, Status::Pass);
    assert_eq!(glass.message, "legitimate: context-specific (*-card)");

    let template_buttons = named(
        &findings,
        CheckCode::ButtonTemplateClass,
        "search.html Button Classes",
    );
    assert_eq!(template_buttons.status, Status::Warn);
    assert_eq!(template_buttons.message, "1/2 buttons use btn-* utility classes");
}

#[test]
fn test_summary_matches_findings() {
    let findings = audit(&project(), &AuditOptions::all(), &AuditConfig::default());
    let summary = AuditSummary::from_findings(&findings);

    assert_eq!(summary.total, findings.len());
    assert_eq!(summary.passed + summary.warned + summary.failed, summary.total);
    assert!(summary.failed > 0);
    assert_eq!(
        summary.categories.keys().next().copied(),
        Some(Category::Tokens)
    );
    assert_eq!(
        findings.last().map(|f| f.category),
        Some(Category::Progress)
    );
}
