//! Consolidation scans: hardcoded pattern counts over stylesheet
//! declarations and utility adoption counts over templates.
//!
//! Regexes run over each declaration's `property: value` text, so comments
//! and selectors never match and whitespace inside values is already
//! collapsed.

use crate::config::AuditConfig;
use crate::finding::{Category, CheckCode, Finding, Location, Status};
use crate::project::{Project, StylesheetFile, TemplateFile};
use css_scanner::count_occurrences;
use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::OnceLock;

/// Built-in patterns, each with the name reports use for it.
type Patterns = Vec<(&'static str, Regex)>;

fn compile(patterns: &[(&'static str, &str)]) -> Patterns {
    patterns
        .iter()
        .map(|(name, pattern)| (*name, Regex::new(pattern).expect("built-in pattern is valid")))
        .collect()
}

fn glass_patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        compile(&[
            ("backdrop-filter", r"backdrop-filter:\s*blur\(\d+px\)"),
            (
                "glassmorphism background",
                r"background:\s*rgba\(255,\s*255,\s*255,\s*0\.\d+\)",
            ),
            (
                "glassmorphism border",
                r"border:\s*1px\s*solid\s*rgba\(255,\s*255,\s*255,\s*0\.\d+\)",
            ),
        ])
    })
}

fn page_duplicate_patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        compile(&[
            (
                "box-shadow",
                r"box-shadow:\s*0\s*\d+px\s*\d+px\s*rgba\(0,\s*0,\s*0,\s*0\.\d+\)",
            ),
            ("transition", r"transition:\s*all\s*0\.\d+s\s*ease"),
            ("border-radius", r"border-radius:\s*15px"),
        ])
    })
}

fn component_glass_patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        compile(&[
            ("backdrop-filter", r"^backdrop-filter:"),
            ("glassmorphism background", r"^background: rgba\(255,\s*255,\s*255,"),
            (
                "glassmorphism border",
                r"^border: 1px solid rgba\(255,\s*255,\s*255,",
            ),
            (
                "glassmorphism shadow",
                r"^box-shadow: 0 8px 32px rgba\(0,\s*0,\s*0,",
            ),
        ])
    })
}

fn hardcoded_value_patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        compile(&[
            ("color", r"color:\s*#[0-9a-fA-F]{3,6}"),
            ("font-size", r"font-size:\s*\d+px"),
            ("padding", r"padding:\s*\d+px"),
            ("margin", r"margin:\s*\d+px"),
        ])
    })
}

fn gradient_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"linear-gradient\([^)]+\)").expect("gradient pattern is valid"))
}

fn hex_color_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#[0-9a-fA-F]{3,6}").expect("hex color pattern is valid"))
}

/// Matches of `regex` across a stylesheet's declarations, with the
/// location of the first one.
fn count_matches(file: &StylesheetFile, regex: &Regex) -> (usize, Option<Location>) {
    let mut count = 0;
    let mut first = None;
    for (_, decl) in file.sheet().declarations() {
        let matches = regex.find_iter(&decl.text()).count();
        if matches > 0 && first.is_none() {
            first = Some(file.location(decl.span));
        }
        count += matches;
    }
    (count, first)
}

fn var_usage(file: &StylesheetFile, prefixes: &[String]) -> usize {
    file.sheet()
        .var_references()
        .iter()
        .filter(|(name, _)| prefixes.iter().any(|prefix| name.starts_with(prefix.as_str())))
        .count()
}

fn page(project: &Project, config: &AuditConfig, findings: &mut Vec<Finding>) {
    let page = &config.page;
    let thresholds = &config.thresholds;
    let category = Category::PageConsolidation;

    let Some(file) = project.stylesheet(&page.stylesheet) else {
        findings.push(Finding::missing_file(category, &page.stylesheet));
        return;
    };
    let name = file.file_name();

    let lines = file.line_count();
    findings.push(Finding::new(
        CheckCode::PageLines,
        category,
        Status::check(lines <= page.max_lines, Status::Fail),
        "Line Count Reduction",
        format!("{lines} lines in {name} (target: ≤{})", page.max_lines),
    ));

    let mut glass_total = 0;
    for (pattern, regex) in glass_patterns() {
        let (count, first) = count_matches(file, regex);
        glass_total += count;
        findings.push(
            Finding::new(
                CheckCode::GlassPattern,
                category,
                Status::check(count == 0, Status::Warn),
                format!("{pattern} Consolidation"),
                format!("{count} hardcoded {pattern} patterns found"),
            )
            .at_opt(first),
        );
    }
    findings.push(Finding::new(
        CheckCode::GlassTotal,
        category,
        thresholds.page_glass.at_most(glass_total),
        "Total Glassmorphism Removal",
        format!("{glass_total} total hardcoded glassmorphism patterns"),
    ));

    match project.template(&page.template) {
        Some(template) => {
            let glass = count_occurrences(&template.source, &config.templates.glass_class);
            findings.push(Finding::new(
                CheckCode::UtilityUsage,
                category,
                thresholds.page_glass_usage.at_least(glass),
                format!("{} Utility Usage", config.templates.glass_class),
                format!(
                    "{glass} {} utility usages in {} (target: ≥{})",
                    config.templates.glass_class,
                    template.file_name(),
                    thresholds.page_glass_usage.pass
                ),
            ));

            let gradient = count_occurrences(&template.source, &config.templates.gradient_class);
            findings.push(Finding::new(
                CheckCode::GradientUsage,
                category,
                thresholds.page_gradient_usage.at_least(gradient),
                format!("{} Utility Usage", config.templates.gradient_class),
                format!(
                    "{gradient} {} utility usages in {} (target: ≥{})",
                    config.templates.gradient_class,
                    template.file_name(),
                    thresholds.page_gradient_usage.pass
                ),
            ));
        }
        None => findings.push(Finding::missing_file(category, &page.template)),
    }

    let variables = var_usage(file, &page.variable_prefixes);
    findings.push(Finding::new(
        CheckCode::VariableUsage,
        category,
        thresholds.page_variables.at_least(variables),
        "CSS Variable Usage",
        format!("{variables} CSS variable usages found"),
    ));

    let classes = file.sheet().classes();
    let buttons = page
        .button_classes
        .iter()
        .filter(|class| classes.contains(class.as_str()))
        .count();
    findings.push(Finding::new(
        CheckCode::PageButtons,
        category,
        thresholds.page_buttons.at_least(buttons),
        "Button Class Consolidation",
        format!(
            "{buttons}/{} button utility classes found in {name}",
            page.button_classes.len()
        ),
    ));

    let duplicates: usize = page_duplicate_patterns()
        .iter()
        .map(|(_, regex)| count_matches(file, regex).0.saturating_sub(1))
        .sum();
    findings.push(Finding::new(
        CheckCode::DuplicatePattern,
        category,
        thresholds.page_duplicates.at_most(duplicates),
        "Duplicate Pattern Removal",
        format!("{duplicates} potential duplicate patterns detected"),
    ));
}

fn component_block(project: &Project, config: &AuditConfig, findings: &mut Vec<Finding>) {
    let block = &config.component_block;
    let category = Category::ComponentConsolidation;

    let Some(file) = project.stylesheet(&block.stylesheet) else {
        findings.push(Finding::missing_file(category, &block.stylesheet));
        return;
    };

    let Some(rule) = file.sheet().rules_defining(&block.class).next() else {
        findings.push(Finding::new(
            CheckCode::ComponentBlock,
            category,
            Status::Fail,
            "CSS Class Exists",
            format!(".{} class not found in {}", block.class, file.file_name()),
        ));
        return;
    };

    findings.push(
        Finding::new(
            CheckCode::ComponentBlock,
            category,
            Status::Pass,
            "CSS Class Exists",
            format!(".{} class found in {}", block.class, file.file_name()),
        )
        .at(file.location(rule.selector_span)),
    );

    let texts: Vec<(String, Location)> = rule
        .declarations
        .iter()
        .map(|decl| (decl.text(), file.location(decl.span)))
        .collect();

    let mut any_glass = false;
    for (pattern, regex) in component_glass_patterns() {
        let hit = texts.iter().find(|(text, _)| regex.is_match(text));
        any_glass |= hit.is_some();
        findings.push(
            Finding::new(
                CheckCode::HardcodedGlass,
                category,
                Status::check(hit.is_none(), Status::Fail),
                format!("{pattern} Removal"),
                if hit.is_some() {
                    format!("still contains hardcoded {pattern}")
                } else {
                    format!("{pattern} properly removed")
                },
            )
            .at_opt(hit.map(|(_, location)| location.clone())),
        );
    }
    findings.push(Finding::new(
        CheckCode::HardcodedGlass,
        category,
        Status::check(!any_glass, Status::Fail),
        "Overall Glassmorphism Removal",
        if any_glass {
            "contains hardcoded glassmorphism patterns"
        } else {
            "all glassmorphism patterns removed"
        },
    ));

    let hardcoded: usize = hardcoded_value_patterns()
        .iter()
        .map(|(_, regex)| {
            texts
                .iter()
                .map(|(text, _)| regex.find_iter(text).count())
                .sum::<usize>()
        })
        .sum();
    findings.push(Finding::new(
        CheckCode::HardcodedValues,
        category,
        config.thresholds.component_hardcoded.at_most(hardcoded),
        "Hardcoded Values Reduction",
        format!("{hardcoded} hardcoded values found (colors, sizes, spacing)"),
    ));
}

/// Per-template utility usage, template adoption and gradient usage.
fn template_usage(templates: &[&TemplateFile], config: &AuditConfig, findings: &mut Vec<Finding>) {
    let category = Category::ComponentConsolidation;
    let classes = &config.templates;
    let mut adopting = 0;
    let mut gradients = 0;

    for template in templates {
        let counts: Vec<String> = classes
            .adoption_classes
            .iter()
            .map(|class| format!("{class}: {}", count_occurrences(&template.source, class)))
            .collect();
        let uses = classes
            .adoption_classes
            .iter()
            .any(|class| count_occurrences(&template.source, class) > 0);
        if uses {
            adopting += 1;
        }
        gradients += count_occurrences(&template.source, &classes.gradient_class);

        findings.push(Finding::new(
            CheckCode::UtilityUsage,
            category,
            Status::check(uses, Status::Warn),
            format!("{} Utility Usage", template.file_name()),
            counts.join(", "),
        ));
    }

    findings.push(Finding::new(
        CheckCode::TemplateAdoption,
        category,
        config.thresholds.template_adoption.at_least(adopting),
        "Template Utility Adoption",
        format!("{adopting}/{} templates using utilities", templates.len()),
    ));
    findings.push(Finding::new(
        CheckCode::GradientUsage,
        category,
        config.thresholds.template_gradients.at_least(gradients),
        "Primary Gradient Usage",
        format!("{gradients} {} usages across templates", classes.gradient_class),
    ));
}

fn cross_file(project: &Project, templates: &[&TemplateFile], config: &AuditConfig, findings: &mut Vec<Finding>) {
    let thresholds = &config.thresholds;
    let category = Category::CrossFile;
    let backdrop = &glass_patterns()[0].1;

    let mut glass = 0;
    let mut gradients = 0;
    let mut variables = 0;
    for file in &project.stylesheets {
        glass += count_matches(file, backdrop).0;
        gradients += count_matches(file, gradient_regex()).0;
        variables += file.sheet().var_references().len();
    }

    findings.push(Finding::new(
        CheckCode::GlassTotal,
        category,
        thresholds.cross_glass.at_most(glass),
        "Cross-File Glassmorphism Consolidation",
        format!("{glass} glassmorphism patterns across all CSS files"),
    ));
    findings.push(Finding::new(
        CheckCode::HardcodedGradients,
        category,
        thresholds.cross_gradients.at_most(gradients),
        "Gradient Consolidation",
        format!(
            "{gradients} hardcoded gradients found (target: use .{} utility)",
            config.templates.gradient_class
        ),
    ));
    findings.push(Finding::new(
        CheckCode::VariableUsage,
        category,
        thresholds.cross_variables.at_least(variables),
        "CSS Variable Adoption",
        format!("{variables} CSS variable usages across all files"),
    ));

    let mut using = 0;
    let mut usage = 0;
    for template in templates {
        let count: usize = config
            .templates
            .utility_classes
            .iter()
            .map(|class| count_occurrences(&template.source, class))
            .sum();
        usage += count;
        if count > 0 {
            using += 1;
        }
    }

    findings.push(Finding::new(
        CheckCode::TemplateAdoption,
        category,
        thresholds.template_adoption.at_least(using),
        "Template Utility Consistency",
        format!("{using}/{} templates using utility classes", templates.len()),
    ));
    findings.push(Finding::new(
        CheckCode::TemplateUtilityDensity,
        category,
        thresholds.template_utility_density.at_least(usage),
        "Utility Usage Density",
        format!("{usage} total utility class usages in templates"),
    ));

    let factors = [
        glass <= thresholds.cross_glass.pass,
        usage >= thresholds.template_utility_density.pass,
        using >= thresholds.template_adoption.pass,
        variables >= thresholds.cross_variables.pass,
    ];
    let score = factors.iter().filter(|met| **met).count() * 25;
    findings.push(Finding::new(
        CheckCode::ModernizationScore,
        category,
        thresholds.modernization.at_least(score),
        "Component Modernization Score",
        format!("{score}/100 modernization score (glassmorphism + utilities + variables + templates)"),
    ));
}

fn design_system(project: &Project, config: &AuditConfig, findings: &mut Vec<Finding>) {
    let category = Category::DesignSystem;

    let variables: usize = project
        .stylesheets
        .iter()
        .map(|file| var_usage(file, &config.design_system.variable_prefixes))
        .sum();
    findings.push(Finding::new(
        CheckCode::VariableUsage,
        category,
        config.thresholds.design_variables.at_least(variables),
        "CSS Variable Usage",
        format!("{variables} CSS variable usages found"),
    ));

    let colors: FxHashSet<&str> = project
        .stylesheets
        .iter()
        .flat_map(|file| file.sheet().declarations())
        .flat_map(|(_, decl)| hex_color_regex().find_iter(&decl.value))
        .map(|found| found.as_str())
        .collect();
    findings.push(Finding::new(
        CheckCode::HardcodedColors,
        category,
        config.thresholds.hardcoded_colors.at_most(colors.len()),
        "Color System Consistency",
        format!(
            "{} unique hardcoded colors (target: ≤{})",
            colors.len(),
            config.thresholds.hardcoded_colors.pass
        ),
    ));
}

/// Runs the consolidation scans.
pub fn check(project: &Project, config: &AuditConfig) -> Vec<Finding> {
    let templates = project.templates_named(&config.templates.files);
    tracing::debug!(templates = templates.len(), "scanning consolidation patterns");

    let mut findings = Vec::new();
    page(project, config, &mut findings);
    component_block(project, config, &mut findings);
    template_usage(&templates, config, &mut findings);
    cross_file(project, &templates, config, &mut findings);
    design_system(project, config, &mut findings);
    findings
}
