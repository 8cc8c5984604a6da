//! Static HTML showcase of the audited design system.
//!
//! The page links every scanned stylesheet, so the sample elements render
//! with the real styles when opened from disk.

use audit_rules::resolve::Resolver;
use audit_rules::{AuditConfig, AuditSummary, Finding, Project};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use std::collections::BTreeSet;
use std::fmt::Write as _;

/// Escapes text for HTML element content and attribute values.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `target` relative to the directory `from`.
fn relative_to(target: &Utf8Path, from: &Utf8Path) -> Utf8PathBuf {
    let target: Vec<Utf8Component<'_>> = target.components().collect();
    let from: Vec<Utf8Component<'_>> = from.components().collect();
    let common = target
        .iter()
        .zip(&from)
        .take_while(|(a, b)| a == b)
        .count();

    let mut path = Utf8PathBuf::new();
    for _ in common..from.len() {
        path.push("..");
    }
    for component in &target[common..] {
        path.push(component.as_str());
    }
    path
}

/// Classes of a compound selector such as `.nav-link.active`.
fn selector_classes(selector: &str) -> String {
    selector
        .split('.')
        .map(str::trim)
        .filter(|class| !class.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders the showcase page that will be written to `output`.
///
/// Stylesheet links are relative to the page, so `workspace` and `output`
/// must both be absolute or both relative to the same directory.
pub fn render(
    project: &Project,
    config: &AuditConfig,
    findings: &[Finding],
    summary: &AuditSummary,
    workspace: &Utf8Path,
    output: &Utf8Path,
) -> String {
    let page_dir = output.parent().unwrap_or(Utf8Path::new(""));
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Design System Showcase</title>\n");
    for sheet in &project.stylesheets {
        let _ = writeln!(
            html,
            "<link rel=\"stylesheet\" href=\"{}\">",
            escape(relative_to(&workspace.join(&sheet.path), page_dir).as_str())
        );
    }
    html.push_str(
        "<style>\n.showcase{font-family:system-ui,sans-serif;max-width:960px;margin:2rem auto;}\n\
         .showcase section{margin-bottom:2rem;}\n\
         .showcase .samples{display:flex;gap:.5rem;flex-wrap:wrap;align-items:center;}\n\
         .showcase .swatch{display:inline-block;width:1.5rem;height:1.5rem;border-radius:4px;border:1px solid #ccc;vertical-align:middle;}\n\
         .showcase table{border-collapse:collapse;width:100%;font-size:.875rem;}\n\
         .showcase td,.showcase th{border-bottom:1px solid #eee;padding:.25rem .5rem;text-align:left;}\n\
         </style>\n</head>\n<body>\n<main class=\"showcase-page\">\n<div class=\"showcase\">\n",
    );
    let _ = writeln!(html, "<h1>🎨 Design System</h1>");
    let _ = writeln!(
        html,
        "<p>{} of {} checks passed ({:.1}%), grade {}.</p>",
        summary.passed,
        summary.total,
        summary.success_rate,
        escape(summary.grade.as_str())
    );

    buttons(&mut html, project, config);
    utilities(&mut html, config);
    components(&mut html, config);
    tokens(&mut html, project, config);
    results(&mut html, findings);

    html.push_str("</div>\n</main>\n</body>\n</html>\n");
    html
}

fn buttons(html: &mut String, project: &Project, config: &AuditConfig) {
    let prefix = format!("{}-", config.buttons.prefix);
    let classes: BTreeSet<String> = project
        .stylesheets
        .iter()
        .flat_map(|file| file.sheet().classes())
        .filter(|class| class.starts_with(prefix.as_str()) && class.as_str() != config.buttons.base_class)
        .map(|class| class.to_string())
        .collect();
    if classes.is_empty() {
        return;
    }

    html.push_str("<section>\n<h2>Button Utilities</h2>\n<div class=\"samples\">\n");
    for class in classes {
        let _ = writeln!(
            html,
            "<button type=\"button\" class=\"{base} {class}\">{class}</button>",
            base = escape(&config.buttons.base_class),
            class = escape(&class)
        );
    }
    html.push_str("</div>\n</section>\n");
}

fn utilities(html: &mut String, config: &AuditConfig) {
    if config.utilities.expectations.is_empty() {
        return;
    }
    html.push_str("<section>\n<h2>Utility Classes</h2>\n<div class=\"samples\">\n");
    for utility in &config.utilities.expectations {
        let class = escape(&utility.class);
        let _ = writeln!(html, "<div class=\"{class}\">.{class}</div>");
    }
    html.push_str("</div>\n</section>\n");
}

fn components(html: &mut String, config: &AuditConfig) {
    if config.components.is_empty() {
        return;
    }
    html.push_str("<section>\n<h2>Components</h2>\n<div class=\"samples\">\n");
    for component in &config.components {
        let _ = writeln!(
            html,
            "<div class=\"{}\">{}</div>",
            escape(&selector_classes(&component.selector)),
            escape(&component.description)
        );
    }
    html.push_str("</div>\n</section>\n");
}

fn tokens(html: &mut String, project: &Project, config: &AuditConfig) {
    if config.tokens.is_empty() {
        return;
    }
    let resolver = Resolver::root_scope(project);

    html.push_str("<section>\n<h2>Design Tokens</h2>\n<table>\n");
    html.push_str("<tr><th></th><th>Token</th><th>Value</th></tr>\n");
    for token in &config.tokens {
        let value = resolver
            .property(&token.name)
            .unwrap_or_else(|error| error.to_string());
        let swatch = if token.name.contains("color") {
            format!(
                "<span class=\"swatch\" style=\"background: var({})\"></span>",
                escape(&token.name)
            )
        } else {
            String::new()
        };
        let _ = writeln!(
            html,
            "<tr><td>{swatch}</td><td><code>{}</code></td><td><code>{}</code></td></tr>",
            escape(&token.name),
            escape(&value)
        );
    }
    html.push_str("</table>\n</section>\n");
}

fn results(html: &mut String, findings: &[Finding]) {
    html.push_str("<section>\n<h2>Audit Results</h2>\n<table>\n");
    html.push_str("<tr><th></th><th>Category</th><th>Check</th><th>Result</th></tr>\n");
    for finding in findings {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            finding.status.icon(),
            escape(finding.category.title()),
            escape(&finding.name),
            escape(&finding.message)
        );
    }
    html.push_str("</table>\n</section>\n");
}
