//! Scanned stylesheet types and queries.

use crate::selectors::{self, defines_class};
use regex::Regex;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use source_span::Span;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// A `property: value` pair inside a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Declaration {
    /// Property name; lowercased unless it is a custom property.
    pub property: SmolStr,
    /// Value with whitespace collapsed and `!important` removed.
    pub value: String,
    /// Whether the declaration was marked `!important`.
    pub important: bool,
    /// Span of the whole declaration.
    pub span: Span,
}

impl Declaration {
    /// Returns true for `--name` custom properties.
    pub fn is_custom_property(&self) -> bool {
        self.property.starts_with("--")
    }

    /// The declaration as `property: value` text, the form pattern scans run on.
    pub fn text(&self) -> String {
        format!("{}: {}", self.property, self.value)
    }
}

/// A style rule: a selector and its declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Rule {
    /// Selector text with comments dropped and whitespace collapsed.
    pub selector: String,
    pub selector_span: Span,
    /// Span from the opening `{` to the closing `}` inclusive.
    pub body_span: Span,
    pub declarations: Vec<Declaration>,
    /// Preludes of the enclosing conditional at-rules, outermost first.
    pub at_rules: Vec<String>,
}

impl Rule {
    /// The individual selectors of the selector list.
    pub fn selectors(&self) -> Vec<&str> {
        selectors::split_selector_list(&self.selector)
    }

    /// Returns true when the rule sits inside an `@media` block.
    pub fn is_responsive(&self) -> bool {
        self.at_rules
            .iter()
            .any(|prelude| prelude.to_ascii_lowercase().starts_with("@media"))
    }

    /// Returns true when the selector list defines `.name` on its own.
    pub fn defines_class(&self, name: &str) -> bool {
        defines_class(&self.selector, name)
    }

    /// The last declaration of `property` in this rule.
    pub fn declaration(&self, property: &str) -> Option<&Declaration> {
        self.declarations
            .iter()
            .rev()
            .find(|decl| decl.property == property)
    }

    /// Returns true if any declaration sets `property`.
    pub fn declares(&self, property: &str) -> bool {
        self.declaration(property).is_some()
    }

    /// Span of the whole rule, selector through closing brace.
    pub fn span(&self) -> Span {
        self.selector_span.cover(self.body_span)
    }

    /// One-line preview of the rule source, cut at `max` characters.
    pub fn preview(&self, source: &str, max: usize) -> String {
        let text = self.span().slice(source).unwrap_or(&self.selector);
        let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if flat.chars().count() > max {
            let cut: String = flat.chars().take(max).collect();
            format!("{cut}...")
        } else {
            flat
        }
    }
}

/// A scanned stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Stylesheet {
    /// Style rules in source order. Rules inside `@keyframes`, `@font-face`
    /// and similar descriptor blocks are not included.
    pub rules: Vec<Rule>,
}

fn var_reference_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"var\(\s*(--[A-Za-z0-9_-]+)").expect("var() pattern is valid")
    })
}

impl Stylesheet {
    /// Iterates every declaration of every rule.
    pub fn declarations(&self) -> impl Iterator<Item = (&Rule, &Declaration)> {
        self.rules
            .iter()
            .flat_map(|rule| rule.declarations.iter().map(move |decl| (rule, decl)))
    }

    /// Custom property definitions in source order.
    pub fn custom_property_declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations()
            .map(|(_, decl)| decl)
            .filter(|decl| decl.is_custom_property())
    }

    /// Custom properties by name; later definitions win.
    pub fn custom_properties(&self) -> FxHashMap<&str, &str> {
        self.custom_property_declarations()
            .map(|decl| (decl.property.as_str(), decl.value.as_str()))
            .collect()
    }

    /// Every `var(--name)` reference with the span of its declaration.
    pub fn var_references(&self) -> Vec<(SmolStr, Span)> {
        self.declarations()
            .flat_map(|(_, decl)| {
                var_reference_regex()
                    .captures_iter(&decl.value)
                    .map(move |caps| (SmolStr::new(&caps[1]), decl.span))
            })
            .collect()
    }

    /// Unique class names appearing in any selector.
    pub fn classes(&self) -> BTreeSet<SmolStr> {
        self.rules
            .iter()
            .flat_map(|rule| selectors::class_names(&rule.selector))
            .collect()
    }

    /// Rules whose selector list defines `.name` on its own.
    pub fn rules_defining<'a: 'n, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a Rule> + 'n {
        self.rules.iter().filter(move |rule| rule.defines_class(name))
    }

    /// Rules with a selector whose subject is `.name`, in any context:
    /// `.name`, `.card .name` and `.a.name` count, `.name:hover` does not.
    pub fn rules_targeting<'a: 'n, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a Rule> + 'n {
        self.rules
            .iter()
            .filter(move |rule| selectors::targets_class(&rule.selector, name))
    }

    /// Returns true if some rule defines `.name`.
    pub fn has_class(&self, name: &str) -> bool {
        self.rules_defining(name).next().is_some()
    }

    /// The value `property` would get on an element carrying only `.name`
    /// at the default viewport: the last matching declaration outside
    /// `@media` blocks, with `!important` taking precedence.
    pub fn declared_value(&self, name: &str, property: &str) -> Option<&Declaration> {
        let candidates: Vec<&Declaration> = self
            .rules_defining(name)
            .filter(|rule| !rule.is_responsive())
            .filter_map(|rule| rule.declaration(property))
            .collect();

        candidates
            .iter()
            .rev()
            .find(|decl| decl.important)
            .or_else(|| candidates.last())
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use crate::scan;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_custom_properties_later_wins() {
        let sheet = scan(":root { --gap: 10px; }\n:root { --gap: 15px; --pad: 8px 16px; }").stylesheet;
        let props = sheet.custom_properties();
        assert_eq!(props.get("--gap"), Some(&"15px"));
        assert_eq!(props.get("--pad"), Some(&"8px 16px"));
    }

    #[test]
    fn test_var_references() {
        let sheet = scan(".a { padding: var(--space-md) var( --space-lg, 4px); }").stylesheet;
        let names: Vec<_> = sheet
            .var_references()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["--space-md", "--space-lg"]);
    }

    #[test]
    fn test_declared_value_ignores_media_and_modifiers() {
        let sheet = scan(
            ".nav-link { padding: 10px 20px; }\n\
             .nav-link:hover { padding: 0; }\n\
             @media (max-width: 600px) { .nav-link { padding: 4px; } }",
        )
        .stylesheet;
        let decl = sheet.declared_value("nav-link", "padding");
        assert_eq!(decl.map(|d| d.value.as_str()), Some("10px 20px"));
    }

    #[test]
    fn test_declared_value_important_wins() {
        let sheet = scan(".a { color: red !important; }\n.a { color: blue; }").stylesheet;
        let decl = sheet.declared_value("a", "color");
        assert_eq!(decl.map(|d| d.value.as_str()), Some("red"));
    }

    #[test]
    fn test_classes_and_preview() {
        let source = ".card .title,\n.badge { color: red; }";
        let sheet = scan(source).stylesheet;
        let classes: Vec<_> = sheet.classes().into_iter().collect();
        assert_eq!(classes, vec!["badge", "card", "title"]);
        assert_eq!(
            sheet.rules[0].preview(source, 20),
            ".card .title, .badge..."
        );
    }

    #[test]
    fn test_rules_targeting_context_selectors() {
        let sheet = scan(
            ".card .user-name { font-weight: 600; }
             .user-bio:hover { color: red; }
             .a, .profile-pic { border-radius: 50%; }",
        )
        .stylesheet;
        assert_eq!(sheet.rules_targeting("user-name").count(), 1);
        assert_eq!(sheet.rules_targeting("user-bio").count(), 0);
        assert_eq!(sheet.rules_targeting("profile-pic").count(), 1);
        assert_eq!(sheet.rules_defining("user-name").count(), 0);
    }

    #[test]
    fn test_declared_value_outlives_the_name() {
        let sheet = scan(".chip { padding: 4px; }").stylesheet;
        let decl = {
            let name = String::from("chip");
            sheet.declared_value(&name, "padding")
        };
        assert_eq!(decl.map(|d| d.value.as_str()), Some("4px"));
    }
}
