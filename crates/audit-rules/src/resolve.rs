//! Static `var()` resolution.
//!
//! Stands in for computed styles: custom properties declared on the root
//! element are collected from every stylesheet and substituted into values.

use crate::project::Project;
use css_scanner::{selectors, Declaration, Rule};
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Maximum `var()` substitution depth.
pub const MAX_DEPTH: usize = 16;

/// Selectors whose custom properties apply to the root element.
const ROOT_SELECTORS: &[&str] = &[":root", "html", "*"];

/// Why a value could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("`{0}` is not defined")]
    Undefined(String),

    #[error("`{0}` refers to itself")]
    Cycle(String),

    #[error("var() nesting is deeper than {MAX_DEPTH}")]
    TooDeep,

    #[error("malformed var() in `{0}`")]
    Malformed(String),
}

/// Custom property values available for substitution.
#[derive(Debug, Clone, Default)]
pub struct Resolver<'a> {
    vars: FxHashMap<&'a str, &'a str>,
}

/// A rule outside `@media` whose selector list includes `:root`, `html`
/// or `*`.
pub(crate) fn is_root_rule(rule: &Rule) -> bool {
    !rule.is_responsive()
        && selectors::split_selector_list(&rule.selector)
            .iter()
            .any(|part| ROOT_SELECTORS.contains(part))
}

impl<'a> Resolver<'a> {
    /// Builds a resolver from `(name, value)` pairs; later pairs win.
    pub fn new(vars: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            vars: vars.into_iter().collect(),
        }
    }

    /// Custom properties declared on `:root`, `html` or `*` outside
    /// `@media`, across the project's stylesheets in path order.
    pub fn root_scope(project: &'a Project) -> Self {
        let vars = project
            .stylesheets
            .iter()
            .flat_map(|file| file.sheet().rules.iter())
            .filter(|rule| is_root_rule(rule))
            .flat_map(|rule| rule.declarations.iter())
            .filter(|decl| decl.is_custom_property())
            .map(|decl| (decl.property.as_str(), decl.value.as_str()));
        Self::new(vars)
    }

    /// A copy with the custom properties of `declarations` layered on top,
    /// as an element carrying those declarations would see them.
    pub fn with_declarations<'b>(&self, declarations: impl IntoIterator<Item = &'b Declaration>) -> Resolver<'b>
    where
        'a: 'b,
    {
        let mut vars: FxHashMap<&'b str, &'b str> =
            self.vars.iter().map(|(k, v)| (*k, *v)).collect();
        for decl in declarations {
            if decl.is_custom_property() {
                vars.insert(decl.property.as_str(), decl.value.as_str());
            }
        }
        Resolver { vars }
    }

    /// The unresolved value of a custom property.
    pub fn raw(&self, name: &str) -> Option<&'a str> {
        self.vars.get(name).copied()
    }

    /// Number of known custom properties.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// The fully substituted value of a custom property.
    pub fn property(&self, name: &str) -> Result<String, ResolveError> {
        let raw = self
            .raw(name)
            .ok_or_else(|| ResolveError::Undefined(name.to_string()))?;
        let mut stack = vec![name.to_string()];
        self.substitute(raw, &mut stack)
    }

    /// Substitutes every `var()` in `value`.
    pub fn resolve(&self, value: &str) -> Result<String, ResolveError> {
        self.substitute(value, &mut Vec::new())
    }

    fn substitute(&self, value: &str, stack: &mut Vec<String>) -> Result<String, ResolveError> {
        let mut out = String::with_capacity(value.len());
        let mut rest = value;

        while let Some(start) = find_var(rest) {
            out.push_str(&rest[..start]);
            let open = start + "var".len();
            let close = matching_paren(rest, open)
                .ok_or_else(|| ResolveError::Malformed(value.to_string()))?;
            let (name, fallback) = split_arguments(&rest[open + 1..close]);

            let replacement = match self.lookup(name, stack) {
                Ok(resolved) => resolved,
                Err(error) => match fallback {
                    Some(fallback) => self.substitute(fallback, stack)?,
                    None => return Err(error),
                },
            };
            out.push_str(&replacement);
            rest = &rest[close + 1..];
        }

        out.push_str(rest);
        Ok(out.trim().to_string())
    }

    fn lookup(&self, name: &str, stack: &mut Vec<String>) -> Result<String, ResolveError> {
        let raw = self
            .raw(name)
            .ok_or_else(|| ResolveError::Undefined(name.to_string()))?;
        if stack.iter().any(|seen| seen == name) {
            return Err(ResolveError::Cycle(name.to_string()));
        }
        if stack.len() >= MAX_DEPTH {
            return Err(ResolveError::TooDeep);
        }
        stack.push(name.to_string());
        let resolved = self.substitute(raw, stack);
        stack.pop();
        resolved
    }
}

/// Byte offset of the next `var(` not preceded by an identifier character.
fn find_var(text: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(found) = text[from..].find("var(") {
        let index = from + found;
        let preceded = text[..index]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !preceded {
            return Some(index);
        }
        from = index + "var(".len();
    }
    None
}

/// Index of the `)` closing the `(` at `open`.
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (index, c) in text[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + index);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits `--name, fallback` on the first top-level comma.
fn split_arguments(args: &str) -> (&str, Option<&str>) {
    let mut depth = 0usize;
    for (index, c) in args.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                return (args[..index].trim(), Some(args[index + 1..].trim()));
            }
            _ => {}
        }
    }
    (args.trim(), None)
}

/// Shortens a value for display, marking the cut with `...`.
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() > max {
        let cut: String = value.chars().take(max).collect();
        format!("{cut}...")
    } else {
        value.to_string()
    }
}
