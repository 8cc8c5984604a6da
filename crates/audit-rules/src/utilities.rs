//! Utility class checks: expected styles, availability and coverage.

use crate::config::AuditConfig;
use crate::finding::{Category, CheckCode, Finding, Status};
use crate::project::{Project, StylesheetFile};
use crate::resolve::{truncate, Resolver};
use css_scanner::Declaration;

/// Values longer than this are shortened in messages.
const DISPLAY_WIDTH: usize = 25;

/// Unused classes listed by name before the rest are summarised.
const LISTED_UNUSED: usize = 5;

/// The declaration that sets `property` for an element carrying only
/// `.class`, searching every stylesheet in order.
///
/// Later stylesheets win, except that `!important` beats anything that is
/// not.
pub(crate) fn class_declaration<'p>(
    project: &'p Project,
    class: &str,
    property: &str,
) -> Option<(&'p StylesheetFile, &'p Declaration)> {
    let candidates: Vec<(&StylesheetFile, &Declaration)> = project
        .stylesheets
        .iter()
        .filter_map(|file| {
            file.sheet()
                .declared_value(class, property)
                .map(|decl| (file, decl))
        })
        .collect();

    candidates
        .iter()
        .rev()
        .find(|(_, decl)| decl.important)
        .or_else(|| candidates.last())
        .copied()
}

/// Like [`class_declaration`], falling back between `background` and its
/// longhands the way computed styles would expose them.
pub(crate) fn effective_declaration<'p>(
    project: &'p Project,
    class: &str,
    property: &str,
) -> Option<(&'p StylesheetFile, &'p Declaration)> {
    if let Some(found) = class_declaration(project, class, property) {
        return Some(found);
    }

    match property {
        "background-color" => class_declaration(project, class, "background").filter(|(_, decl)| {
            let value = decl.value.to_ascii_lowercase();
            !value.contains("gradient(") && !value.contains("url(")
        }),
        "background" => class_declaration(project, class, "background-image")
            .or_else(|| class_declaration(project, class, "background-color")),
        _ => None,
    }
}

/// Resolver seeing the custom properties declared on `.class` itself.
pub(crate) fn class_resolver<'p>(root: &Resolver<'p>, project: &'p Project, class: &str) -> Resolver<'p> {
    root.with_declarations(
        project
            .stylesheets
            .iter()
            .flat_map(|file| file.sheet().rules_defining(class))
            .filter(|rule| !rule.is_responsive())
            .flat_map(|rule| rule.declarations.iter()),
    )
}

fn defined_anywhere(project: &Project, class: &str) -> bool {
    project
        .stylesheets
        .iter()
        .any(|file| file.sheet().has_class(class))
}

fn expectations(project: &Project, config: &AuditConfig, findings: &mut Vec<Finding>) {
    let root = Resolver::root_scope(project);

    for utility in &config.utilities.expectations {
        if !defined_anywhere(project, &utility.class) {
            findings.push(Finding::new(
                CheckCode::UtilityStyle,
                Category::Utilities,
                Status::Warn,
                format!(".{}", utility.class),
                format!(".{} is not defined in any stylesheet", utility.class),
            ));
            continue;
        }

        let resolver = class_resolver(&root, project, &utility.class);
        for check in &utility.checks {
            let found = effective_declaration(project, &utility.class, &check.property);
            let resolved = found.map(|(_, decl)| resolver.resolve(&decl.value));

            let (status, message) = match &resolved {
                None => (
                    Status::check(check.expect.matches(None), Status::Fail),
                    format!("{} not set", check.property),
                ),
                Some(Ok(value)) => (
                    Status::check(check.expect.matches(Some(value)), Status::Fail),
                    truncate(value, DISPLAY_WIDTH),
                ),
                Some(Err(error)) => (Status::Fail, format!("unresolved: {error}")),
            };

            let message = if status == Status::Pass {
                message
            } else {
                format!("{message} (expected: {})", check.expect.describe())
            };

            findings.push(
                Finding::new(
                    CheckCode::UtilityStyle,
                    Category::Utilities,
                    status,
                    format!(".{} {}", utility.class, check.description),
                    message,
                )
                .at_opt(found.map(|(file, decl)| file.location(decl.span))),
            );
        }
    }
}

fn availability(project: &Project, config: &AuditConfig, findings: &mut Vec<Finding>) {
    let required = &config.utilities.required;
    if required.is_empty() {
        return;
    }

    let mut available = 0;
    for utility in required {
        let rule = project.stylesheet(&utility.file).and_then(|file| {
            file.sheet()
                .rules_targeting(&utility.class)
                .next()
                .map(|rule| file.location(rule.selector_span))
        });

        let message = if rule.is_some() {
            available += 1;
            format!("Available in {}", utility.file)
        } else {
            format!("Missing from {}", utility.file)
        };

        findings.push(
            Finding::new(
                CheckCode::UtilityAvailable,
                Category::Utilities,
                Status::check(rule.is_some(), Status::Fail),
                format!(".{} Availability", utility.class),
                message,
            )
            .at_opt(rule),
        );
    }

    findings.push(Finding::new(
        CheckCode::UtilityCoverage,
        Category::Utilities,
        config.thresholds.utility_coverage.at_least(available),
        "Utility System Coverage",
        format!("{available}/{} required utilities available", required.len()),
    ));
}

fn density(project: &Project, config: &AuditConfig, findings: &mut Vec<Finding>) {
    let Some(file) = project.stylesheet(&config.roles.utilities) else {
        findings.push(Finding::missing_file(
            Category::Utilities,
            &config.roles.utilities,
        ));
        return;
    };

    let class_rules = file
        .sheet()
        .rules
        .iter()
        .filter(|rule| rule.selector.contains('.'))
        .count();

    findings.push(Finding::new(
        CheckCode::UtilityDensity,
        Category::Utilities,
        config.thresholds.utility_density.at_least(class_rules),
        "Utility Class Density",
        format!(
            "{class_rules} utility class rules in {} (target: ≥{})",
            file.file_name(),
            config.thresholds.utility_density.pass
        ),
    ));

    if project.templates.is_empty() {
        return;
    }

    let unused: Vec<String> = file
        .sheet()
        .classes()
        .into_iter()
        .filter(|class| {
            !project
                .templates
                .iter()
                .any(|template| template.parsed.class_count(class) > 0)
        })
        .map(|class| format!(".{class}"))
        .collect();

    let message = if unused.is_empty() {
        "every utility class is used by a template".to_string()
    } else if unused.len() > LISTED_UNUSED {
        format!(
            "{} unused: {} and {} more",
            unused.len(),
            unused[..LISTED_UNUSED].join(", "),
            unused.len() - LISTED_UNUSED
        )
    } else {
        format!("{} unused: {}", unused.len(), unused.join(", "))
    };

    findings.push(Finding::new(
        CheckCode::UnusedUtility,
        Category::Utilities,
        Status::check(unused.is_empty(), Status::Warn),
        "Unused Utility Classes",
        message,
    ));
}

/// Runs the utility class checks.
pub fn check(project: &Project, config: &AuditConfig) -> Vec<Finding> {
    let mut findings = Vec::new();
    expectations(project, config, &mut findings);
    availability(project, config, &mut findings);
    density(project, config, &mut findings);
    findings
}
