//! Design token checks.
//!
//! Each configured custom property is resolved on the root element and
//! compared with its expectation.

use crate::config::AuditConfig;
use crate::finding::{Category, CheckCode, Finding, Location, Status};
use crate::project::Project;
use crate::resolve::{is_root_rule, truncate, ResolveError, Resolver};
use indexmap::IndexMap;

/// Values longer than this are shortened in messages.
const DISPLAY_WIDTH: usize = 30;

/// Where a custom property is last declared on the root element, the
/// same declarations the resolver reads.
fn definition(project: &Project, name: &str) -> Option<Location> {
    project.stylesheets.iter().rev().find_map(|file| {
        file.sheet()
            .rules
            .iter()
            .filter(|rule| is_root_rule(rule))
            .flat_map(|rule| rule.declarations.iter())
            .filter(|decl| decl.property == name)
            .last()
            .map(|decl| file.location(decl.span))
    })
}

/// Runs the token checks.
pub fn check(project: &Project, config: &AuditConfig) -> Vec<Finding> {
    let resolver = Resolver::root_scope(project);
    tracing::debug!(custom_properties = resolver.len(), "resolving design tokens");

    let mut findings = Vec::new();
    let mut categories: IndexMap<&str, (usize, usize)> = IndexMap::new();

    for token in &config.tokens {
        let resolved = resolver.property(&token.name);
        let passed = token.expect.matches(resolved.as_deref().ok());

        let message = match &resolved {
            Ok(value) if passed => truncate(value, DISPLAY_WIDTH),
            Ok(value) => format!(
                "{} (expected: {})",
                truncate(value, DISPLAY_WIDTH),
                token.expect.describe()
            ),
            Err(ResolveError::Undefined(name)) if *name == token.name => format!(
                "not defined (expected: {})",
                token.expect.describe()
            ),
            Err(error) => format!("unresolved: {error}"),
        };

        let tally = categories.entry(token.category.as_str()).or_default();
        tally.1 += 1;
        if passed {
            tally.0 += 1;
        }

        findings.push(
            Finding::new(
                CheckCode::TokenValue,
                Category::Tokens,
                Status::check(passed, Status::Fail),
                token.name.clone(),
                message,
            )
            .at_opt(definition(project, &token.name)),
        );
    }

    for (category, (passed, total)) in categories {
        let percent = passed as f64 / total as f64 * 100.0;
        findings.push(Finding::new(
            CheckCode::TokenCategory,
            Category::Tokens,
            config.thresholds.token_category.at_least_percent(percent),
            format!("{category} tokens"),
            format!("{passed}/{total} ({}%)", percent.round()),
        ));
    }

    findings
}
