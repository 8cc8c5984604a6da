//! HTML template scanning.
//!
//! Templates are only searched, never parsed: the audit needs the class
//! tokens used in `class` attributes, the button-like elements, and plain
//! substring counts.

use regex::Regex;
use smol_str::SmolStr;
use source_span::Span;
use std::sync::OnceLock;

/// A class token used in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassUse {
    pub name: SmolStr,
    pub span: Span,
}

/// A `<button>`, `<input type="submit|button">` or `<a role="button">`
/// element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonElement {
    /// Lowercased tag name.
    pub tag: SmolStr,
    /// Class tokens of the element.
    pub classes: Vec<SmolStr>,
    /// Span of the opening tag.
    pub span: Span,
}

/// A scanned template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    pub classes: Vec<ClassUse>,
    pub buttons: Vec<ButtonElement>,
}

fn class_attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)\bclass\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .expect("class attribute pattern is valid")
    })
}

fn template_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)\{%.*?%\}|\{\{.*?\}\}|\{#.*?#\}").expect("template tag pattern is valid")
    })
}

fn element_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)<(button|input|a)\b([^>]*)>").expect("element pattern is valid")
    })
}

fn button_input_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)\btype\s*=\s*["']?(submit|button|reset)\b"#)
            .expect("input type pattern is valid")
    })
}

fn role_button_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)\brole\s*=\s*["']?button\b"#).expect("role pattern is valid")
    })
}

/// Splits a class attribute value into tokens with file-relative spans.
///
/// Template tags (`{% if %}`, `{{ var }}`) inside the value are blanked out
/// first so their contents never read as class names.
fn class_tokens(value: &str, value_offset: usize) -> Vec<ClassUse> {
    let blanked = template_tag_regex().replace_all(value, |caps: &regex::Captures<'_>| {
        " ".repeat(caps[0].len())
    });

    let mut tokens = Vec::new();
    let mut start = None;
    for (index, c) in blanked.char_indices().chain(std::iter::once((blanked.len(), ' '))) {
        match (c.is_whitespace(), start) {
            (false, None) => start = Some(index),
            (true, Some(begin)) => {
                tokens.push(ClassUse {
                    name: SmolStr::new(&blanked[begin..index]),
                    span: Span::from_usize(value_offset + begin, value_offset + index),
                });
                start = None;
            }
            _ => {}
        }
    }
    tokens
}

fn attr_classes(attrs: &str, attrs_offset: usize) -> Vec<ClassUse> {
    class_attr_regex()
        .captures_iter(attrs)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .flat_map(|value| class_tokens(value.as_str(), attrs_offset + value.start()))
        .collect()
}

impl Template {
    /// Scans template text for class uses and button elements.
    pub fn scan(text: &str) -> Self {
        let classes = attr_classes(text, 0);

        let buttons = element_regex()
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let tag = caps[1].to_ascii_lowercase();
                let attrs = caps.get(2)?;
                let is_button = match tag.as_str() {
                    "button" => true,
                    "input" => button_input_regex().is_match(attrs.as_str()),
                    _ => role_button_regex().is_match(attrs.as_str()),
                };
                if !is_button {
                    return None;
                }
                Some(ButtonElement {
                    tag: SmolStr::new(tag),
                    classes: attr_classes(attrs.as_str(), attrs.start())
                        .into_iter()
                        .map(|class| class.name)
                        .collect(),
                    span: Span::from_usize(whole.start(), whole.end()),
                })
            })
            .collect();

        Self { classes, buttons }
    }

    /// Number of uses of the class `name` in `class` attributes.
    pub fn class_count(&self, name: &str) -> usize {
        self.classes.iter().filter(|class| class.name == name).count()
    }
}

/// Number of non-overlapping occurrences of `needle` in `text`.
pub fn count_occurrences(text: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    text.matches(needle).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_class_tokens_with_spans() {
        let text = r#"<div class="glass-card  p-md">x</div>"#;
        let template = Template::scan(text);
        let names: Vec<&str> = template.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["glass-card", "p-md"]);
        assert_eq!(template.classes[1].span.slice(text), Some("p-md"));
    }

    #[test]
    fn test_template_tags_are_blanked() {
        let text = r#"<a class="nav-link {% if active %}active{% endif %} {{ extra }}">x</a>"#;
        let template = Template::scan(text);
        let names: Vec<&str> = template.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["nav-link", "active"]);
    }

    #[test]
    fn test_buttons() {
        let text = r#"
            <button class="btn-base btn-primary" type="submit">Go</button>
            <input type="submit" class='submit-btn'>
            <input type="text" class="field">
            <a href="/x" role="button" class="btn-muted">Logout</a>
            <a href="/y" class="link">Plain</a>
        "#;
        let template = Template::scan(text);
        let buttons: Vec<(&str, Vec<&str>)> = template
            .buttons
            .iter()
            .map(|b| (b.tag.as_str(), b.classes.iter().map(|c| c.as_str()).collect()))
            .collect();
        assert_eq!(
            buttons,
            vec![
                ("button", vec!["btn-base", "btn-primary"]),
                ("input", vec!["submit-btn"]),
                ("a", vec!["btn-muted"]),
            ]
        );
    }

    #[test]
    fn test_counts() {
        let text = r#"<div class="glass-card"></div><div class="glass-card primary-gradient"></div>"#;
        let template = Template::scan(text);
        assert_eq!(template.class_count("glass-card"), 2);
        assert_eq!(count_occurrences(text, "primary-gradient"), 1);
        assert_eq!(count_occurrences(text, ""), 0);
    }
}
