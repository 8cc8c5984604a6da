//! Cross-file duplicate class detection.
//!
//! Every selector in every stylesheet is reduced to its primary class and
//! tagged as responsive (inside `@media`) and/or a modifier (pseudo-class,
//! compound or combinator). A class with a plain base definition in more
//! than one stylesheet is a duplicate unless one of the legitimacy rules
//! explains it.

use crate::config::AuditConfig;
use crate::finding::{Category, CheckCode, Finding, Status};
use crate::project::{Project, StylesheetFile};
use css_scanner::{selectors, Rule};
use indexmap::IndexMap;
use regex::Regex;
use smol_str::SmolStr;

const PREVIEW_WIDTH: usize = 100;
const LISTED: usize = 5;

/// One selector of a rule, attributed to its primary class.
#[derive(Debug, Clone, Copy)]
struct Definition<'a> {
    rule: &'a Rule,
    responsive: bool,
    modifier: bool,
}

impl Definition<'_> {
    fn is_base(&self) -> bool {
        !self.responsive && !self.modifier
    }
}

/// Definitions of each class in one stylesheet, in source order.
type ClassMap<'a> = IndexMap<SmolStr, Vec<Definition<'a>>>;

fn class_map(file: &StylesheetFile) -> ClassMap<'_> {
    let mut classes = ClassMap::new();
    for rule in &file.sheet().rules {
        let responsive = rule.is_responsive();
        for part in rule.selectors() {
            let Some(class) = selectors::primary_class(part) else {
                continue;
            };
            classes.entry(class).or_default().push(Definition {
                rule,
                responsive,
                modifier: selectors::is_modifier_selector(part),
            });
        }
    }
    classes
}

/// A class defined in more than one stylesheet.
struct Shared<'a> {
    class: &'a SmolStr,
    /// (file index, definitions in that file)
    files: Vec<(usize, &'a [Definition<'a>])>,
}

impl Shared<'_> {
    fn base_files(&self) -> usize {
        self.files
            .iter()
            .filter(|(_, defs)| defs.iter().any(Definition::is_base))
            .count()
    }
}

fn file_names(project: &Project, indices: impl Iterator<Item = usize>) -> String {
    indices
        .map(|index| project.stylesheets[index].file_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Why a class shared between stylesheets is not a duplicate, if it isn't.
fn legitimacy(shared: &Shared<'_>, project: &Project, config: &AuditConfig) -> Option<String> {
    let rules = &config.duplicates;
    let class = shared.class.as_str();

    for (index, _) in &shared.files {
        let name = project.stylesheets[*index].file_name();
        if let Some(prefix) = rules
            .file_prefixes
            .get(name)
            .and_then(|prefixes| prefixes.iter().find(|prefix| class.starts_with(prefix.as_str())))
        {
            return Some(format!("file-specific variant ({prefix}*) in {name}"));
        }
    }

    if let Some(marker) = rules
        .modifier_markers
        .iter()
        .find(|marker| class.contains(marker.as_str()))
    {
        return Some(format!("size/state modifier ({marker})"));
    }

    if let Some(suffix) = rules
        .context_suffixes
        .iter()
        .find(|suffix| class.ends_with(suffix.as_str()))
    {
        return Some(format!("context-specific (*{suffix})"));
    }

    let owners: [(&str, &str, fn(&Definition<'_>) -> bool); 3] = [
        (config.roles.utilities.as_str(), "responsive/modifier extensions", |def| !def.is_base()),
        (config.roles.base.as_str(), "responsive overrides", |def| def.responsive),
        (config.roles.components.as_str(), "extensions", |def| !def.is_base()),
    ];
    for (owner, kind, allowed) in owners {
        let Some(position) = shared
            .files
            .iter()
            .position(|(index, _)| project.stylesheets[*index].file_name() == owner)
        else {
            continue;
        };
        let others = || {
            shared
                .files
                .iter()
                .enumerate()
                .filter(move |(i, _)| *i != position)
                .map(|(_, file)| file)
        };
        if others().all(|(_, defs)| defs.iter().all(allowed)) {
            return Some(format!(
                "{owner} base with {kind} in {}",
                file_names(project, others().map(|(index, _)| *index))
            ));
        }
    }

    if shared
        .files
        .iter()
        .all(|(_, defs)| defs.iter().any(|def| def.modifier))
    {
        return Some("every file extends it with modifiers".to_string());
    }

    None
}

/// Properties the base definitions set to different values in different
/// files.
fn conflicting_properties(shared: &Shared<'_>) -> Vec<SmolStr> {
    let mut values: IndexMap<&SmolStr, Vec<&str>> = IndexMap::new();
    for (_, defs) in &shared.files {
        for def in defs.iter().filter(|def| def.is_base()) {
            for decl in &def.rule.declarations {
                values.entry(&decl.property).or_default().push(&decl.value);
            }
        }
    }

    values
        .into_iter()
        .filter(|(_, seen)| seen.iter().any(|value| *value != seen[0]))
        .map(|(property, _)| property.clone())
        .collect()
}

fn cross_file(project: &Project, maps: &[ClassMap<'_>], config: &AuditConfig, findings: &mut Vec<Finding>) {
    let mut shared: IndexMap<&SmolStr, Vec<(usize, &[Definition<'_>])>> = IndexMap::new();
    for (index, map) in maps.iter().enumerate() {
        for (class, defs) in map {
            shared.entry(class).or_default().push((index, defs.as_slice()));
        }
    }

    let mut duplicates = 0;
    let mut legitimate = 0;

    for (class, files) in shared {
        let shared = Shared { class, files };
        if shared.files.len() < 2 || shared.base_files() == 0 {
            continue;
        }

        if let Some(reason) = legitimacy(&shared, project, config) {
            legitimate += 1;
            findings.push(Finding::new(
                CheckCode::DuplicateClass,
                Category::Duplicates,
                Status::Pass,
                format!(".{class}"),
                format!("legitimate: {reason}"),
            ));
            continue;
        }

        if shared.base_files() < 2 {
            continue;
        }

        duplicates += 1;
        let base_defs: Vec<(usize, &Definition<'_>)> = shared
            .files
            .iter()
            .filter_map(|(index, defs)| defs.iter().find(|def| def.is_base()).map(|def| (*index, def)))
            .collect();

        let mut message = format!(
            "defined in {}",
            file_names(project, base_defs.iter().map(|(index, _)| *index))
        );
        let conflicts = conflicting_properties(&shared);
        if !conflicts.is_empty() {
            message.push_str(&format!(" with conflicting values for {}", conflicts.join(", ")));
        }

        let (index, def) = base_defs[1];
        let file = &project.stylesheets[index];
        message.push_str(&format!("; {}", def.rule.preview(&file.source, PREVIEW_WIDTH)));

        findings.push(
            Finding::new(
                CheckCode::DuplicateClass,
                Category::Duplicates,
                Status::Fail,
                format!(".{class}"),
                message,
            )
            .at(file.location(def.rule.selector_span)),
        );
    }

    findings.push(Finding::new(
        CheckCode::DuplicateSummary,
        Category::Duplicates,
        Status::check(duplicates == 0, Status::Fail),
        "Cross-File Duplicates",
        format!(
            "{duplicates} duplicate classes across {} stylesheets ({legitimate} legitimate shared classes)",
            project.stylesheets.len()
        ),
    ));
}

fn within_file(project: &Project, maps: &[ClassMap<'_>], findings: &mut Vec<Finding>) {
    let mut clean = true;

    for (file, map) in project.stylesheets.iter().zip(maps) {
        let repeated: Vec<(String, &Definition<'_>)> = map
            .iter()
            .filter_map(|(class, defs)| {
                let bases: Vec<&Definition<'_>> = defs.iter().filter(|def| def.is_base()).collect();
                (bases.len() > 1).then(|| (format!(".{class} ({})", bases.len()), bases[1]))
            })
            .collect();
        let Some((_, first)) = repeated.first() else {
            continue;
        };

        clean = false;
        let names: Vec<String> = repeated.iter().map(|(name, _)| name.clone()).collect();
        findings.push(
            Finding::new(
                CheckCode::WithinFileDuplicate,
                Category::Duplicates,
                Status::Warn,
                format!("{} Within-File Duplicates", file.file_name()),
                format!("defined more than once: {}", list(&names)),
            )
            .at(file.location(first.rule.selector_span)),
        );
    }

    if clean {
        findings.push(Finding::new(
            CheckCode::WithinFileDuplicate,
            Category::Duplicates,
            Status::Pass,
            "Within-File Duplicates",
            "no class has two base definitions in one stylesheet",
        ));
    }
}

fn list(items: &[String]) -> String {
    if items.len() > LISTED {
        format!("{} and {} more", items[..LISTED].join(", "), items.len() - LISTED)
    } else {
        items.join(", ")
    }
}

fn architecture(project: &Project, maps: &[ClassMap<'_>], config: &AuditConfig, findings: &mut Vec<Finding>) {
    for (file_name, pattern) in &config.duplicates.architecture {
        let Some(index) = project
            .stylesheets
            .iter()
            .position(|file| file.file_name() == file_name)
        else {
            continue;
        };
        let regex = match Regex::new(pattern) {
            Ok(regex) => regex,
            Err(error) => {
                tracing::warn!(file = %file_name, %pattern, %error, "invalid architecture pattern");
                continue;
            }
        };

        let stray: Vec<String> = maps[index]
            .keys()
            .filter(|class| !regex.is_match(class))
            .map(|class| format!(".{class}"))
            .collect();

        findings.push(Finding::new(
            CheckCode::FileArchitecture,
            Category::Duplicates,
            Status::check(stray.is_empty(), Status::Warn),
            format!("{file_name} Architecture"),
            if stray.is_empty() {
                format!("every class matches {pattern}")
            } else {
                format!("{} classes do not match {pattern}: {}", stray.len(), list(&stray))
            },
        ));
    }
}

/// Runs the duplicate class checks.
pub fn check(project: &Project, config: &AuditConfig) -> Vec<Finding> {
    let maps: Vec<ClassMap<'_>> = project.stylesheets.iter().map(class_map).collect();
    tracing::debug!(
        classes = maps.iter().map(IndexMap::len).sum::<usize>(),
        "collected class definitions"
    );

    let mut findings = Vec::new();
    cross_file(project, &maps, config, &mut findings);
    within_file(project, &maps, &mut findings);
    architecture(project, &maps, config, &mut findings);
    findings
}
