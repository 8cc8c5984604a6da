//! Selector text helpers.
//!
//! These work on the raw selector text of a rule. They understand just
//! enough structure (selector lists, pseudo-classes, attribute brackets,
//! combinators) to answer the questions the audit asks about classes.

use smol_str::SmolStr;

/// Splits a selector list on top-level commas.
///
/// Commas inside `:is(...)`, `:not(...)` or attribute brackets do not split.
pub fn split_selector_list(selector: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (index, c) in selector.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(selector[start..index].trim());
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(selector[start..].trim());
    parts.retain(|part| !part.is_empty());
    parts
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

/// Returns every class name (without the dot) in a selector, in order.
///
/// Dots inside attribute brackets (`[href$=".pdf"]`) are ignored.
pub fn class_names(selector: &str) -> Vec<SmolStr> {
    let mut names = Vec::new();
    let mut brackets = 0usize;
    let mut chars = selector.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        match c {
            '[' => brackets += 1,
            ']' => brackets = brackets.saturating_sub(1),
            '\\' => {
                chars.next();
            }
            '.' if brackets == 0 => {
                let rest = &selector[index + 1..];
                let len: usize = rest
                    .chars()
                    .take_while(|c| is_ident_char(*c))
                    .map(char::len_utf8)
                    .sum();
                let name = &rest[..len];
                if name.starts_with(|c: char| !c.is_ascii_digit()) {
                    names.push(SmolStr::new(name));
                }
            }
            _ => {}
        }
    }

    names
}

/// Removes pseudo-classes and pseudo-elements, including functional ones
/// such as `:not(.x)`.
pub fn strip_pseudo(selector: &str) -> String {
    let mut out = String::with_capacity(selector.len());
    let mut chars = selector.chars().peekable();
    let mut brackets = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '[' => {
                brackets += 1;
                out.push(c);
            }
            ']' => {
                brackets = brackets.saturating_sub(1);
                out.push(c);
            }
            ':' if brackets == 0 => {
                if chars.peek() == Some(&':') {
                    chars.next();
                }
                while chars.peek().is_some_and(|c| is_ident_char(*c)) {
                    chars.next();
                }
                if chars.peek() == Some(&'(') {
                    let mut depth = 0usize;
                    for c in chars.by_ref() {
                        match c {
                            '(' => depth += 1,
                            ')' => {
                                depth -= 1;
                                if depth == 0 {
                                    break;
                                }
                            }
                            _ => {}
                        }
                    }
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Returns the first class of a single selector after pseudo-classes are
/// stripped, e.g. `.card .btn:hover` gives `card`.
pub fn primary_class(selector: &str) -> Option<SmolStr> {
    class_names(&strip_pseudo(selector)).into_iter().next()
}

/// Returns true when a single selector extends a base class rather than
/// defining it: it has a pseudo-class, compounds several classes, or uses a
/// combinator.
pub fn is_modifier_selector(selector: &str) -> bool {
    let selector = selector.trim();

    if selector.contains(':') {
        return true;
    }

    if class_names(selector).len() > 1 {
        return true;
    }

    selector.contains([' ', '>', '+', '~'])
}

/// Returns true when some selector in the list is exactly `.name`.
///
/// This is the rule used for value lookups: `.btn-primary {`,
/// `.btn-primary,` and `.a, .btn-primary {` all define `btn-primary`, while
/// `.btn-primary:hover` and `.card .btn-primary` only extend it. See
/// [`targets_class`] for the looser, context-tolerant check.
pub fn defines_class(selector_list: &str, name: &str) -> bool {
    split_selector_list(selector_list)
        .iter()
        .any(|part| part.strip_prefix('.') == Some(name))
}

/// Returns true when some selector in the list ends in `.name`, whatever
/// context comes before it.
///
/// `.card .user-name`, `.a.user-name` and `.user-name, .b` all target
/// `user-name`; `.user-name:hover` and `.user-name-lg` do not.
pub fn targets_class(selector_list: &str, name: &str) -> bool {
    split_selector_list(selector_list).iter().any(|part| {
        part.strip_suffix(name)
            .is_some_and(|head| head.ends_with('.') && !head.ends_with("\\."))
    })
}

/// Returns true when any selector in the list mentions `.name`, in any
/// position.
pub fn mentions_class(selector_list: &str, name: &str) -> bool {
    class_names(selector_list).iter().any(|class| class == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_selector_list() {
        assert_eq!(
            split_selector_list(".a, .b:not(.c, .d) , .e"),
            vec![".a", ".b:not(.c, .d)", ".e"]
        );
        assert!(split_selector_list("  ").is_empty());
    }

    #[test]
    fn test_class_names() {
        assert_eq!(
            class_names(".card .btn-primary:hover"),
            vec!["card", "btn-primary"]
        );
        assert_eq!(class_names(r#"a[href$=".pdf"].doc"#), vec!["doc"]);
        assert!(class_names("div > p").is_empty());
    }

    #[test]
    fn test_class_names_skips_numbers() {
        assert!(class_names("0.5").is_empty());
    }

    #[test]
    fn test_strip_pseudo() {
        assert_eq!(strip_pseudo(".btn:hover"), ".btn");
        assert_eq!(strip_pseudo(".btn::before"), ".btn");
        assert_eq!(strip_pseudo(".item:not(.active):first-child"), ".item");
        assert_eq!(strip_pseudo(r#"input[type="a:b"]"#), r#"input[type="a:b"]"#);
    }

    #[test]
    fn test_primary_class() {
        assert_eq!(primary_class(".btn:hover").as_deref(), Some("btn"));
        assert_eq!(primary_class(":not(.x) .y").as_deref(), Some("y"));
        assert_eq!(primary_class("body"), None);
    }

    #[test]
    fn test_is_modifier_selector() {
        assert!(!is_modifier_selector(".btn-base"));
        assert!(is_modifier_selector(".btn-base:hover"));
        assert!(is_modifier_selector(".btn-base.large"));
        assert!(is_modifier_selector(".card .btn-base"));
        assert!(is_modifier_selector(".card>.btn-base"));
    }

    #[test]
    fn test_defines_class() {
        assert!(defines_class(".btn-primary", "btn-primary"));
        assert!(defines_class(".a, .btn-primary", "btn-primary"));
        assert!(!defines_class(".btn-primary:hover", "btn-primary"));
        assert!(!defines_class(".btn-primary-colors", "btn-primary"));
        assert!(mentions_class(".card .btn-primary:hover", "btn-primary"));
    }

    #[test]
    fn test_targets_class() {
        assert!(targets_class(".card .user-name", "user-name"));
        assert!(targets_class(".user-name, .b", "user-name"));
        assert!(targets_class(".a.user-name", "user-name"));
        assert!(!targets_class(".user-bio:hover", "user-bio"));
        assert!(!targets_class(".card .a-user-name", "user-name"));
        assert!(!targets_class(".user-name-lg", "user-name"));
    }
}
