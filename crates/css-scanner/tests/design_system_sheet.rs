//! Scans a stylesheet shaped like a real design-system utilities file.

use css_scanner::{scan, selectors, ScanErrorKind, Template};
use pretty_assertions::assert_eq;

const UTILITIES: &str = r#"/* ===== Buttons ===== */
.btn-base {
    padding: var(--button-padding);
    border: none;
    cursor: pointer;
    transition: var(--transition-all);
}

.btn-primary,
.search-btn {
    background: var(--color-primary-gradient);
    color: white;
}

.btn-primary:hover { transform: translateY(-2px); }

/* ===== Glass ===== */
.glass-card {
    background: rgba(255, 255, 255, 0.95);
    backdrop-filter: blur(10px);
    border: 1px solid rgba(255, 255, 255, 0.2);
}

@media (max-width: 768px) {
    .btn-base { padding: 6px 12px; }
}

@font-face {
    font-family: "Inter";
    src: url("inter.woff2") format("woff2");
}
"#;

fn outline(source: &str) -> String {
    scan(source)
        .stylesheet
        .rules
        .iter()
        .map(|rule| {
            let context = rule.at_rules.join(" ");
            let prefix = if context.is_empty() {
                String::new()
            } else {
                format!("{context} ")
            };
            format!("{prefix}{} [{}]", rule.selector, rule.declarations.len())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_outline() {
    insta::assert_snapshot!(outline(UTILITIES), @r"
    .btn-base [4]
    .btn-primary, .search-btn [2]
    .btn-primary:hover [1]
    .glass-card [3]
    @media (max-width: 768px) .btn-base [1]
    ");
}

#[test]
fn test_no_errors_in_clean_sheet() {
    assert_eq!(scan(UTILITIES).errors, vec![]);
}

#[test]
fn test_class_queries() {
    let sheet = scan(UTILITIES).stylesheet;

    assert!(sheet.has_class("btn-base"));
    assert!(sheet.has_class("search-btn"));
    assert!(!sheet.has_class("btn-secondary"));

    let padding = sheet.declared_value("btn-base", "padding");
    assert_eq!(
        padding.map(|d| d.value.as_str()),
        Some("var(--button-padding)")
    );

    let defining: Vec<&str> = sheet
        .rules_defining("btn-primary")
        .map(|r| r.selector.as_str())
        .collect();
    assert_eq!(defining, vec![".btn-primary, .search-btn"]);
}

#[test]
fn test_modifier_classification() {
    let sheet = scan(UTILITIES).stylesheet;
    let flags: Vec<(String, bool)> = sheet
        .rules
        .iter()
        .flat_map(|rule| rule.selectors().into_iter().map(String::from).collect::<Vec<_>>())
        .map(|selector| {
            let modifier = selectors::is_modifier_selector(&selector);
            (selector, modifier)
        })
        .collect();

    assert_eq!(
        flags,
        vec![
            (".btn-base".to_string(), false),
            (".btn-primary".to_string(), false),
            (".search-btn".to_string(), false),
            (".btn-primary:hover".to_string(), true),
            (".glass-card".to_string(), false),
            (".btn-base".to_string(), false),
        ]
    );
}

#[test]
fn test_broken_sheet_reports_and_recovers() {
    let broken = ".a { color: red;; }\n.b { }\n}\n.c { padding: 4px; /* open";
    let result = scan(broken);
    let kinds: Vec<ScanErrorKind> = result.errors.iter().map(|e| e.kind.clone()).collect();

    assert_eq!(
        kinds,
        vec![
            ScanErrorKind::DuplicateSemicolon,
            ScanErrorKind::EmptyRule {
                selector: ".b".to_string()
            },
            ScanErrorKind::UnexpectedCloseBrace,
            ScanErrorKind::UnclosedBlock {
                prelude: ".c".to_string()
            },
            ScanErrorKind::UnterminatedComment,
        ]
    );
    assert_eq!(result.stylesheet.rules.len(), 3);
}

#[test]
fn test_template_pairs_with_sheet() {
    let template = Template::scan(
        r#"<div class="glass-card"><button class="btn-base btn-primary">Go</button></div>"#,
    );
    let sheet = scan(UTILITIES).stylesheet;
    let undefined: Vec<&str> = template
        .classes
        .iter()
        .map(|c| c.name.as_str())
        .filter(|name| !sheet.classes().contains(*name))
        .collect();
    assert!(undefined.is_empty());
    assert_eq!(template.buttons.len(), 1);
}
