//! Component rule checks.

use crate::config::{AuditConfig, ComponentExpectation};
use crate::finding::{Category, CheckCode, Finding, Status};
use crate::project::Project;
use css_scanner::{selectors, Rule};

/// Returns true for declarations that give a component visible styling:
/// a background or box layout.
fn is_styling(property: &str) -> bool {
    property.starts_with("background")
        || property.starts_with("padding")
        || property.starts_with("margin")
        || property == "border-radius"
}

/// Returns true when a selector in the rule's list targets `selector`
/// itself, in any state.
fn targets(rule: &Rule, selector: &str) -> bool {
    rule.selectors()
        .iter()
        .any(|part| selectors::strip_pseudo(part).trim() == selector)
}

/// Counts every rule whose selector text mentions the component, variants
/// and descendants included, and fails above the configured ceiling.
fn rule_count(project: &Project, component: &ComponentExpectation, max: usize) -> Finding {
    let mut count = 0;
    let mut sources: Vec<&str> = Vec::new();
    let mut first = None;

    for file in &project.stylesheets {
        for rule in &file.sheet().rules {
            if !rule.selector.contains(component.selector.as_str()) {
                continue;
            }
            count += 1;
            first.get_or_insert_with(|| file.location(rule.selector_span));
            if !sources.contains(&file.file_name()) {
                sources.push(file.file_name());
            }
        }
    }

    let mut message = format!("{} {count} rules (expected ≤{max})", component.selector);
    if !sources.is_empty() {
        message.push_str(&format!(", sources: {}", sources.join(", ")));
    }

    Finding::new(
        CheckCode::ComponentRuleCount,
        Category::Components,
        Status::check(count <= max, Status::Fail),
        format!("{} Rule Count", component.description),
        message,
    )
    .at_opt(first)
}

/// Runs the component checks.
pub fn check(project: &Project, config: &AuditConfig) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut found = 0;
    let mut styled = 0;

    for component in &config.components {
        let matching: Vec<_> = project
            .stylesheets
            .iter()
            .flat_map(|file| {
                file.sheet()
                    .rules
                    .iter()
                    .filter(|rule| targets(rule, &component.selector))
                    .map(move |rule| (file, rule))
            })
            .collect();

        let Some((first_file, first_rule)) = matching.first() else {
            findings.push(Finding::new(
                CheckCode::ComponentStyled,
                Category::Components,
                Status::Warn,
                component.description.clone(),
                format!("{} not found in any stylesheet", component.selector),
            ));
            continue;
        };

        found += 1;
        let is_styled = matching.iter().any(|(_, rule)| {
            !rule.is_responsive()
                && rule
                    .declarations
                    .iter()
                    .any(|decl| is_styling(&decl.property))
        });
        if is_styled {
            styled += 1;
        }

        let rules = matching.len();
        let noun = if rules == 1 { "rule" } else { "rules" };
        findings.push(
            Finding::new(
                CheckCode::ComponentStyled,
                Category::Components,
                Status::check(is_styled, Status::Warn),
                component.description.clone(),
                format!(
                    "{} {rules} {noun}, {}",
                    component.selector,
                    if is_styled { "styled" } else { "basic styling" }
                ),
            )
            .at(first_file.location(first_rule.selector_span)),
        );
    }

    if !config.components.is_empty() {
        findings.push(Finding::new(
            CheckCode::ComponentSummary,
            Category::Components,
            Status::check(found > 0 && styled == found, Status::Warn),
            "Component Styling",
            format!("{styled}/{found} components properly styled"),
        ));
    }

    for component in &config.components {
        if let Some(max) = component.max_rules {
            findings.push(rule_count(project, component, max));
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::StylesheetFile;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_components() {
        let project = Project::new(
            vec![StylesheetFile::stylesheet(
                "static/css/components.css",
                ".skill-card { padding: 1rem; }\n\
                 .skill-card:hover { transform: scale(1.02); }\n\
                 .skill-tile { color: red; }\n\
                 .nav .nav-link.active { background: #6441a5; }\n\
                 .nav-link.active:focus-visible { outline: none; }"
                    .into(),
            )],
            Vec::new(),
        );
        let findings = check(&project, &AuditConfig::default());
        let summary: Vec<(Status, &str)> = findings
            .iter()
            .map(|f| (f.status, f.message.as_str()))
            .collect();

        assert_eq!(
            summary,
            vec![
                (Status::Pass, ".skill-card 2 rules, styled"),
                (Status::Warn, ".skill-tile 1 rule, basic styling"),
                (Status::Warn, ".filters-card not found in any stylesheet"),
                (Status::Warn, ".message-nav not found in any stylesheet"),
                (Status::Warn, ".profile-completion not found in any stylesheet"),
                (Status::Warn, ".nav-link.active 1 rule, basic styling"),
                (Status::Warn, ".skill-meta not found in any stylesheet"),
                (Status::Warn, ".filter-group not found in any stylesheet"),
                (Status::Warn, ".active-filters not found in any stylesheet"),
                (Status::Warn, "1/3 components properly styled"),
                (Status::Pass, ".skill-card 2 rules (expected ≤25), sources: components.css"),
                (Status::Pass, ".filters-card 0 rules (expected ≤2)"),
                (Status::Pass, ".skill-meta 0 rules (expected ≤3)"),
                (Status::Pass, ".filter-group 0 rules (expected ≤6)"),
                (Status::Pass, ".active-filters 0 rules (expected ≤2)"),
            ]
        );
        assert_eq!(findings[0].location.as_ref().map(|l| l.line), Some(1));
    }

    #[test]
    fn test_rule_count_ceiling() {
        let project = Project::new(
            vec![
                StylesheetFile::stylesheet(
                    "static/css/components.css",
                    ".filters-card { padding: 25px; }\n.filters-card h3 { margin: 0; }".into(),
                ),
                StylesheetFile::stylesheet(
                    "static/css/search-page.css",
                    "@media (max-width: 768px) {\n  .filters-card { padding: 15px; }\n}".into(),
                ),
            ],
            Vec::new(),
        );
        let config = AuditConfig {
            components: vec![ComponentExpectation {
                selector: ".filters-card".into(),
                description: "Filter card styling".into(),
                max_rules: Some(2),
            }],
            ..AuditConfig::default()
        };
        let findings = check(&project, &config);
        let count = findings
            .iter()
            .find(|f| f.code == CheckCode::ComponentRuleCount)
            .unwrap();

        assert_eq!(count.status, Status::Fail);
        assert_eq!(count.name, "Filter card styling Rule Count");
        assert_eq!(
            count.message,
            ".filters-card 3 rules (expected ≤2), sources: components.css, search-page.css"
        );
        assert_eq!(
            count.location.as_ref().map(|l| l.file.as_str()),
            Some("static/css/components.css")
        );
    }
}
