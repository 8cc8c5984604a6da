//! Button consolidation checks.
//!
//! Buttons are expected to be built from a small family of utility classes
//! (`btn-base` plus variants) defined once in the utilities stylesheet, with
//! no page stylesheet restyling buttons on its own.

use crate::config::{AuditConfig, ButtonConfig};
use crate::finding::{Category, CheckCode, Finding, Status};
use crate::project::{Project, StylesheetFile};
use css_scanner::{selectors, Rule};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::OnceLock;

/// Selectors listed by name in a message before the rest are summarised.
const LISTED: usize = 5;

fn button_element_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|[\s>+~])button$").expect("button element pattern is valid"))
}

fn is_button_class(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('-'))
}

fn mentions_button_class(rule: &Rule, prefix: &str) -> bool {
    selectors::class_names(&rule.selector)
        .iter()
        .any(|class| is_button_class(class, prefix))
}

fn is_submit_input(part: &str) -> bool {
    part.replace('\'', "\"").contains("input[type=\"submit\"]")
}

fn list(items: &[String]) -> String {
    if items.len() > LISTED {
        format!(
            "{} and {} more",
            items[..LISTED].join(", "),
            items.len() - LISTED
        )
    } else {
        items.join(", ")
    }
}

fn finding(code: CheckCode, status: Status, name: impl Into<String>, message: impl Into<String>) -> Finding {
    Finding::new(code, Category::Buttons, status, name, message)
}

fn required(utilities: &StylesheetFile, config: &ButtonConfig, findings: &mut Vec<Finding>) {
    for class in &config.required {
        let rule = utilities.sheet().rules_defining(class).next();
        findings.push(
            finding(
                CheckCode::ButtonRequired,
                Status::check(rule.is_some(), Status::Fail),
                format!(".{class} Defined"),
                if rule.is_some() {
                    format!("defined in {}", utilities.file_name())
                } else {
                    format!("missing from {}", utilities.file_name())
                },
            )
            .at_opt(rule.map(|rule| utilities.location(rule.selector_span))),
        );
    }
}

fn base_rule<'f>(utilities: &'f StylesheetFile, config: &ButtonConfig) -> Option<&'f Rule> {
    utilities
        .sheet()
        .rules_defining(&config.base_class)
        .find(|rule| !rule.is_responsive())
}

fn base(utilities: &StylesheetFile, config: &ButtonConfig, findings: &mut Vec<Finding>) {
    let name = format!(".{} Essentials", config.base_class);
    let Some(rule) = base_rule(utilities, config) else {
        findings.push(finding(
            CheckCode::ButtonBase,
            Status::Fail,
            name,
            format!(".{} is not defined in {}", config.base_class, utilities.file_name()),
        ));
        return;
    };

    let missing: Vec<String> = config
        .base_properties
        .iter()
        .filter(|property| {
            !rule.declarations.iter().any(|decl| {
                decl.property == property.as_str()
                    || decl
                        .property
                        .strip_prefix(property.as_str())
                        .is_some_and(|rest| rest.starts_with('-'))
            })
        })
        .cloned()
        .collect();

    let message = if missing.is_empty() {
        format!("declares {}", config.base_properties.join(", "))
    } else {
        format!("does not declare {}", missing.join(", "))
    };
    findings.push(
        finding(
            CheckCode::ButtonBase,
            Status::check(missing.is_empty(), Status::Fail),
            name,
            message,
        )
        .at(utilities.location(rule.selector_span)),
    );
}

fn single_definition(project: &Project, config: &ButtonConfig, findings: &mut Vec<Finding>) {
    // class -> [(file index, rule)]
    let mut definitions: IndexMap<String, Vec<(usize, &Rule)>> = IndexMap::new();

    for (index, file) in project.stylesheets.iter().enumerate() {
        for rule in file.sheet().rules.iter().filter(|rule| !rule.is_responsive()) {
            for part in rule.selectors() {
                if selectors::is_modifier_selector(part) {
                    continue;
                }
                let Some(class) = selectors::primary_class(part) else {
                    continue;
                };
                if !is_button_class(&class, &config.prefix) {
                    continue;
                }
                let entry = definitions.entry(class.to_string()).or_default();
                if !entry.iter().any(|(seen, _)| *seen == index) {
                    entry.push((index, rule));
                }
            }
        }
    }

    let mut duplicated = 0;
    for (class, defs) in &definitions {
        if defs.len() < 2 {
            continue;
        }
        duplicated += 1;
        let files: Vec<String> = defs
            .iter()
            .map(|(index, _)| project.stylesheets[*index].path.to_string())
            .collect();
        let (index, rule) = defs[1];
        let file = &project.stylesheets[index];
        findings.push(
            finding(
                CheckCode::ButtonSingleDefinition,
                Status::Fail,
                format!(".{class} Single Definition"),
                format!("defined in {}; button classes belong in one stylesheet", files.join(", ")),
            )
            .at(file.location(rule.selector_span)),
        );
    }

    if duplicated == 0 {
        findings.push(finding(
            CheckCode::ButtonSingleDefinition,
            Status::Pass,
            "Button Single Definition",
            format!("{} button classes, each defined in one stylesheet", definitions.len()),
        ));
    }
}

fn deprecated(project: &Project, config: &AuditConfig, findings: &mut Vec<Finding>) {
    let buttons = &config.buttons;
    let mut hits = 0;

    for file in &project.stylesheets {
        if file.file_name() == config.roles.utilities {
            continue;
        }
        for rule in &file.sheet().rules {
            for part in rule.selectors() {
                let part = selectors::strip_pseudo(part);
                let part = part.trim();

                let deprecated_class = buttons
                    .deprecated_classes
                    .iter()
                    .find(|class| part.ends_with(&format!(".{class}")));
                let pattern = if let Some(class) = deprecated_class {
                    format!(".{class}")
                } else if is_submit_input(part)
                    && rule.declarations.iter().any(|decl| {
                        ["padding", "border", "background"]
                            .iter()
                            .any(|prefix| decl.property.starts_with(prefix))
                    })
                {
                    "input[type=\"submit\"] styling".to_string()
                } else {
                    continue;
                };

                hits += 1;
                findings.push(
                    finding(
                        CheckCode::ButtonDeprecated,
                        Status::Fail,
                        format!("Deprecated {pattern}"),
                        format!("`{}` in {} uses a deprecated button pattern", rule.selector, file.file_name()),
                    )
                    .at(file.location(rule.selector_span)),
                );
                break;
            }
        }
    }

    if hits == 0 {
        findings.push(finding(
            CheckCode::ButtonDeprecated,
            Status::Pass,
            "Deprecated Button Patterns",
            "no deprecated button patterns outside the utilities stylesheet",
        ));
    }
}

fn legacy(project: &Project, config: &ButtonConfig, findings: &mut Vec<Finding>) {
    for class in &config.legacy_classes {
        let found = project.stylesheets.iter().find_map(|file| {
            file.sheet()
                .rules
                .iter()
                .find(|rule| selectors::mentions_class(&rule.selector, class))
                .map(|rule| file.location(rule.selector_span))
        });

        findings.push(
            finding(
                CheckCode::ButtonLegacy,
                Status::check(found.is_none(), Status::Fail),
                format!(".{class} Removed"),
                if found.is_some() {
                    format!(".{class} is still defined")
                } else {
                    format!("old .{class} class successfully removed")
                },
            )
            .at_opt(found),
        );
    }
}

fn is_custom_button_rule(rule: &Rule, prefix: &str) -> bool {
    rule.selectors().iter().any(|part| {
        let part = selectors::strip_pseudo(part);
        let part = part.trim();
        button_element_regex().is_match(part)
            || is_submit_input(part)
            || selectors::class_names(part)
                .last()
                .is_some_and(|class| {
                    !is_button_class(class, prefix)
                        && (class.contains("button") || class.contains("btn"))
                })
    })
}

fn adoption(project: &Project, config: &AuditConfig, findings: &mut Vec<Finding>) {
    let prefix = &config.buttons.prefix;

    for file in &project.stylesheets {
        let name = file.file_name();
        if name == config.roles.utilities || name == config.roles.variables {
            continue;
        }

        let references: usize = file
            .sheet()
            .rules
            .iter()
            .map(|rule| {
                selectors::class_names(&rule.selector)
                    .iter()
                    .filter(|class| is_button_class(class, prefix))
                    .count()
            })
            .sum();
        let custom = file
            .sheet()
            .rules
            .iter()
            .filter(|rule| is_custom_button_rule(rule, prefix))
            .count();

        if references == 0 && custom == 0 {
            continue;
        }

        findings.push(finding(
            CheckCode::ButtonAdoption,
            Status::check(references >= custom, Status::Warn),
            format!("{name} Button Utility Adoption"),
            format!("{references} button utility references, {custom} custom button rules"),
        ));
    }
}

fn templates(project: &Project, config: &ButtonConfig, findings: &mut Vec<Finding>) {
    let naming = match Regex::new(&config.naming_pattern) {
        Ok(naming) => Some(naming),
        Err(error) => {
            tracing::warn!(pattern = %config.naming_pattern, %error, "invalid button naming pattern");
            None
        }
    };

    for template in &project.templates {
        let buttons = &template.parsed.buttons;
        if buttons.is_empty() {
            continue;
        }

        let mut unclassed = 0;
        for button in buttons {
            let button_classes: Vec<&str> = button
                .classes
                .iter()
                .map(|class| class.as_str())
                .filter(|class| class.starts_with(config.prefix.as_str()))
                .collect();
            if button_classes.is_empty() {
                unclassed += 1;
            }

            let Some(naming) = &naming else { continue };
            for class in button_classes {
                if !naming.is_match(class) {
                    findings.push(
                        finding(
                            CheckCode::ButtonNaming,
                            Status::Fail,
                            format!("{class} Naming"),
                            format!(
                                "button class `{class}` in {} does not follow the {}-* naming convention",
                                template.file_name(),
                                config.prefix
                            ),
                        )
                        .at(template.location(button.span)),
                    );
                }
            }
        }

        findings.push(finding(
            CheckCode::ButtonTemplateClass,
            Status::check(unclassed == 0, Status::Warn),
            format!("{} Button Classes", template.file_name()),
            format!(
                "{}/{} buttons use {}-* utility classes",
                buttons.len() - unclassed,
                buttons.len(),
                config.prefix
            ),
        ));
    }
}

fn states(utilities: &StylesheetFile, config: &ButtonConfig, findings: &mut Vec<Finding>) {
    let state_rules: Vec<&Rule> = utilities
        .sheet()
        .rules
        .iter()
        .filter(|rule| {
            rule.selectors().iter().any(|part| {
                (part.contains(":focus") || part.contains(":hover"))
                    && selectors::class_names(part)
                        .iter()
                        .any(|class| is_button_class(class, &config.prefix))
            })
        })
        .collect();

    findings.push(
        finding(
            CheckCode::ButtonStates,
            Status::check(!state_rules.is_empty(), Status::Fail),
            "Button Focus States",
            if state_rules.is_empty() {
                "no focus or hover states for button classes".to_string()
            } else {
                format!("{} focus/hover rules for button classes", state_rules.len())
            },
        )
        .at_opt(
            state_rules
                .first()
                .map(|rule| utilities.location(rule.selector_span)),
        ),
    );
}

fn color_variables(utilities: &StylesheetFile, config: &ButtonConfig, findings: &mut Vec<Finding>) {
    let offenders: Vec<&Rule> = utilities
        .sheet()
        .rules
        .iter()
        .filter(|rule| mentions_button_class(rule, &config.prefix))
        .filter(|rule| {
            rule.declarations
                .iter()
                .any(|decl| decl.property.ends_with("color") || decl.property == "background")
        })
        .filter(|rule| !rule.declarations.iter().any(|decl| decl.value.contains("var(")))
        .collect();

    let selectors: Vec<String> = offenders.iter().map(|rule| rule.selector.clone()).collect();
    findings.push(
        finding(
            CheckCode::ButtonColorVariables,
            Status::check(offenders.is_empty(), Status::Fail),
            "Button Color Variables",
            if offenders.is_empty() {
                "button colors use CSS variables".to_string()
            } else {
                format!("hardcoded button colors in {}", list(&selectors))
            },
        )
        .at_opt(
            offenders
                .first()
                .map(|rule| utilities.location(rule.selector_span)),
        ),
    );
}

fn rule_count(utilities: &StylesheetFile, config: &ButtonConfig, findings: &mut Vec<Finding>) {
    let count = utilities
        .sheet()
        .rules
        .iter()
        .filter(|rule| mentions_button_class(rule, &config.prefix))
        .count();

    let status = if count < config.min_rules {
        Status::Fail
    } else if count > config.max_rules {
        Status::Warn
    } else {
        Status::Pass
    };

    findings.push(finding(
        CheckCode::ButtonRuleCount,
        status,
        "Button Rule Count",
        format!(
            "{count} button rules (expected between {} and {})",
            config.min_rules, config.max_rules
        ),
    ));
}

fn redundant(utilities: &StylesheetFile, config: &ButtonConfig, findings: &mut Vec<Finding>) {
    let Some(base) = base_rule(utilities, config) else {
        return;
    };
    let shared: Vec<&String> = config
        .shared_properties
        .iter()
        .filter(|property| base.declares(property))
        .collect();

    let repeats: Vec<String> = utilities
        .sheet()
        .rules
        .iter()
        .filter(|rule| !std::ptr::eq(*rule, base))
        .filter(|rule| !rule.defines_class(&config.base_class))
        .filter(|rule| mentions_button_class(rule, &config.prefix))
        .flat_map(|rule| {
            shared
                .iter()
                .filter(|property| rule.declares(property))
                .map(move |property| format!("{} ({property})", rule.selector))
        })
        .collect();

    findings.push(finding(
        CheckCode::ButtonRedundantProperty,
        Status::check(repeats.is_empty(), Status::Warn),
        "Redundant Button Properties",
        if repeats.is_empty() {
            format!("variants leave shared properties to .{}", config.base_class)
        } else {
            format!("repeated from .{}: {}", config.base_class, list(&repeats))
        },
    ));
}

/// Runs the button consolidation checks.
pub fn check(project: &Project, config: &AuditConfig) -> Vec<Finding> {
    let buttons = &config.buttons;
    let mut findings = Vec::new();

    let utilities = project.stylesheet(&config.roles.utilities);
    match utilities {
        Some(utilities) => {
            required(utilities, buttons, &mut findings);
            base(utilities, buttons, &mut findings);
        }
        None => findings.push(Finding::missing_file(
            Category::Buttons,
            &config.roles.utilities,
        )),
    }

    single_definition(project, buttons, &mut findings);
    deprecated(project, config, &mut findings);
    legacy(project, buttons, &mut findings);
    adoption(project, config, &mut findings);
    templates(project, buttons, &mut findings);

    if let Some(utilities) = utilities {
        states(utilities, buttons, &mut findings);
        color_variables(utilities, buttons, &mut findings);
        rule_count(utilities, buttons, &mut findings);
        redundant(utilities, buttons, &mut findings);
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::TemplateFile;
    use pretty_assertions::assert_eq;

    const UTILITIES: &str = "\
.btn-base { display: inline-flex; padding: var(--button-padding); border: none; cursor: pointer; }
.btn-base:focus-visible { outline: 2px solid var(--color-primary); }
.btn-primary { background: var(--color-primary-gradient); color: white; }
.btn-secondary { background: #6c757d; cursor: pointer; }
.btn-small { padding: 4px 8px; }
.btn-large { padding: 12px 24px; }
";

    fn project(extra: &[(&str, &str)], templates: &[(&str, &str)]) -> Project {
        let mut stylesheets = vec![StylesheetFile::stylesheet(
            "static/css/utilities.css",
            UTILITIES.into(),
        )];
        stylesheets.extend(
            extra
                .iter()
                .map(|(path, css)| StylesheetFile::stylesheet(*path, css.to_string())),
        );
        Project::new(
            stylesheets,
            templates
                .iter()
                .map(|(path, html)| TemplateFile::template(*path, html.to_string()))
                .collect(),
        )
    }

    fn by_code(findings: &[Finding], code: CheckCode) -> Vec<(Status, String)> {
        findings
            .iter()
            .filter(|f| f.code == code)
            .map(|f| (f.status, f.message.clone()))
            .collect()
    }

    #[test]
    fn test_class_predicates() {
        assert!(is_button_class("btn", "btn"));
        assert!(is_button_class("btn-primary", "btn"));
        assert!(!is_button_class("btnx", "btn"));
        assert!(!is_button_class("logout-btn", "btn"));
    }

    #[test]
    fn test_clean_utilities() {
        let findings = check(&project(&[], &[]), &AuditConfig::default());

        assert!(by_code(&findings, CheckCode::ButtonRequired)
            .iter()
            .all(|(status, _)| *status == Status::Pass));
        assert_eq!(
            by_code(&findings, CheckCode::ButtonBase),
            vec![(Status::Pass, "declares padding, border, cursor".into())]
        );
        assert_eq!(
            by_code(&findings, CheckCode::ButtonStates),
            vec![(Status::Pass, "1 focus/hover rules for button classes".into())]
        );
        assert_eq!(
            by_code(&findings, CheckCode::ButtonColorVariables),
            vec![(Status::Fail, "hardcoded button colors in .btn-secondary".into())]
        );
        assert_eq!(
            by_code(&findings, CheckCode::ButtonRuleCount),
            vec![(Status::Pass, "6 button rules (expected between 3 and 20)".into())]
        );
        assert_eq!(
            by_code(&findings, CheckCode::ButtonRedundantProperty),
            vec![(
                Status::Warn,
                "repeated from .btn-base: .btn-secondary (cursor)".into()
            )]
        );
    }

    #[test]
    fn test_cross_file_problems() {
        let project = project(
            &[
                (
                    "static/css/search-page.css",
                    ".btn-primary { padding: 2px; }\n\
                     .search-form .btn-primary:hover { color: red; }\n\
                     .submit-btn { border: none; }\n\
                     form input[type='submit'] { background: blue; }\n\
                     .logout-btn { color: gray; }",
                ),
                (
                    "static/css/profile-pages.css",
                    "@media (max-width: 600px) { .btn-primary { padding: 0; } }",
                ),
            ],
            &[],
        );
        let findings = check(&project, &AuditConfig::default());

        assert_eq!(
            by_code(&findings, CheckCode::ButtonSingleDefinition),
            vec![(
                Status::Fail,
                "defined in static/css/search-page.css, static/css/utilities.css; button classes belong in one stylesheet".into()
            )]
        );
        let deprecated = by_code(&findings, CheckCode::ButtonDeprecated);
        assert_eq!(deprecated.len(), 2);
        assert!(deprecated[0].1.contains("`.submit-btn`"));
        assert!(deprecated[1].1.contains("input[type='submit']"));
        assert_eq!(
            by_code(&findings, CheckCode::ButtonLegacy),
            vec![(Status::Fail, ".logout-btn is still defined".into())]
        );
        assert_eq!(
            by_code(&findings, CheckCode::ButtonAdoption),
            vec![
                (
                    Status::Pass,
                    "1 button utility references, 0 custom button rules".into()
                ),
                (
                    Status::Warn,
                    "2 button utility references, 3 custom button rules".into()
                ),
            ]
        );
    }

    #[test]
    fn test_template_buttons() {
        let project = project(
            &[],
            &[(
                "templates/search.html",
                r#"<button class="btn-base btn-primary">Go</button>
                   <button class="btn_primary">Bad</button>
                   <input type="submit" class="plain">"#,
            )],
        );
        let findings = check(&project, &AuditConfig::default());

        assert_eq!(
            by_code(&findings, CheckCode::ButtonNaming),
            vec![(
                Status::Fail,
                "button class `btn_primary` in search.html does not follow the btn-* naming convention".into()
            )]
        );
        assert_eq!(
            by_code(&findings, CheckCode::ButtonTemplateClass),
            vec![(Status::Warn, "2/3 buttons use btn-* utility classes".into())]
        );
    }

    #[test]
    fn test_missing_utilities() {
        let findings = check(&Project::default(), &AuditConfig::default());
        assert_eq!(findings[0].code, CheckCode::RoleFileMissing);
        assert!(findings.iter().all(|f| f.code != CheckCode::ButtonRuleCount));
    }
}
