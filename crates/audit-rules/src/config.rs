//! Audit configuration.
//!
//! Every section deserializes with defaults, so a configuration file only
//! needs to name what it changes. The defaults describe the design system
//! the audit was first written for.

use crate::finding::Status;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Configuration for all check groups.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuditConfig {
    pub roles: Roles,
    pub tokens: Vec<TokenExpectation>,
    pub utilities: UtilityConfig,
    pub components: Vec<ComponentExpectation>,
    pub buttons: ButtonConfig,
    pub duplicates: DuplicateConfig,
    pub page: PageConfig,
    pub component_block: ComponentBlockConfig,
    pub templates: TemplateConfig,
    pub design_system: DesignSystemConfig,
    pub thresholds: Thresholds,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            roles: Roles::default(),
            tokens: default_tokens(),
            utilities: UtilityConfig::default(),
            components: default_components(),
            buttons: ButtonConfig::default(),
            duplicates: DuplicateConfig::default(),
            page: PageConfig::default(),
            component_block: ComponentBlockConfig::default(),
            templates: TemplateConfig::default(),
            design_system: DesignSystemConfig::default(),
            thresholds: Thresholds::default(),
        }
    }
}

/// File names of the stylesheets that play a fixed role.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Roles {
    pub utilities: String,
    pub base: String,
    pub components: String,
    pub variables: String,
}

impl Default for Roles {
    fn default() -> Self {
        Self {
            utilities: "utilities.css".into(),
            base: "base.css".into(),
            components: "components.css".into(),
            variables: "variables.css".into(),
        }
    }
}

/// What a value is expected to look like.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Expectation {
    /// Exact match after trimming.
    Equals(String),
    /// Case-insensitive substring.
    Contains(String),
    /// Present and different from the given value.
    NotEquals(String),
}

impl Expectation {
    /// Tests a resolved value. `None` means the value is not set.
    pub fn matches(&self, value: Option<&str>) -> bool {
        let Some(value) = value.map(str::trim) else {
            return false;
        };
        match self {
            Expectation::Equals(expected) => value == expected,
            Expectation::Contains(needle) => value
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            Expectation::NotEquals(other) => value != other,
        }
    }

    /// Short description used in failure messages.
    pub fn describe(&self) -> String {
        match self {
            Expectation::Equals(expected) => expected.clone(),
            Expectation::Contains(needle) => format!("contains \"{needle}\""),
            Expectation::NotEquals(other) => format!("not \"{other}\""),
        }
    }
}

/// An expected custom property value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenExpectation {
    /// Custom property name including the leading `--`.
    pub name: String,
    #[serde(flatten)]
    pub expect: Expectation,
    /// Grouping for the per-category summary.
    #[serde(default = "default_token_category")]
    pub category: String,
}

fn default_token_category() -> String {
    "general".into()
}

fn token(name: &str, expect: Expectation, category: &str) -> TokenExpectation {
    TokenExpectation {
        name: name.into(),
        expect,
        category: category.into(),
    }
}

fn default_tokens() -> Vec<TokenExpectation> {
    use Expectation::{Contains, Equals};
    vec![
        token("--color-primary", Equals("#6441a5".into()), "colors"),
        token(
            "--color-primary-gradient",
            Contains("linear-gradient".into()),
            "colors",
        ),
        token("--color-secondary", Equals("#667eea".into()), "colors"),
        token("--color-text-primary", Equals("#2c3e50".into()), "colors"),
        token("--color-background", Equals("#f8f9fa".into()), "colors"),
        token("--nav-link-padding", Equals("10px 20px".into()), "spacing"),
        token("--button-padding-small", Equals("8px 16px".into()), "spacing"),
        token("--nav-gap", Equals("15px".into()), "spacing"),
        token("--space-lg", Equals("20px".into()), "spacing"),
        token("--space-xl", Equals("25px".into()), "spacing"),
        token("--space-xxl", Equals("30px".into()), "spacing"),
        token("--font-weight-medium", Equals("500".into()), "typography"),
        token("--font-size-sm", Equals("14px".into()), "typography"),
        token("--radius-card", Equals("15px".into()), "layout"),
        token("--transition-all", Contains("all".into()), "layout"),
        token("--profile-pic-size", Equals("60px".into()), "components"),
        token(
            "--skill-description-min-height",
            Equals("3rem".into()),
            "components",
        ),
        token("--filter-group-min-width", Equals("200px".into()), "components"),
        token(
            "--color-background-glass",
            Contains("rgba(255, 255, 255, 0.95)".into()),
            "colors",
        ),
    ]
}

/// A property check on a utility class.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PropertyCheck {
    pub property: String,
    #[serde(flatten)]
    pub expect: Expectation,
    pub description: String,
}

/// Expected styles of one utility class.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UtilityExpectation {
    /// Class name without the dot.
    pub class: String,
    pub checks: Vec<PropertyCheck>,
}

/// A class that must be defined in a given role file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RequiredUtility {
    /// Class name without the dot.
    pub class: String,
    /// File name of the stylesheet that must define it.
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UtilityConfig {
    pub expectations: Vec<UtilityExpectation>,
    pub required: Vec<RequiredUtility>,
}

fn check(property: &str, expect: Expectation, description: &str) -> PropertyCheck {
    PropertyCheck {
        property: property.into(),
        expect,
        description: description.into(),
    }
}

fn required(class: &str, file: &str) -> RequiredUtility {
    RequiredUtility {
        class: class.into(),
        file: file.into(),
    }
}

impl Default for UtilityConfig {
    fn default() -> Self {
        use Expectation::{Contains, Equals, NotEquals};
        Self {
            expectations: vec![
                UtilityExpectation {
                    class: "btn-primary".into(),
                    checks: vec![
                        check(
                            "background",
                            Contains("gradient".into()),
                            "has gradient background",
                        ),
                        check(
                            "border-radius",
                            Equals("8px".into()),
                            "has proper border radius",
                        ),
                        check("padding", Contains("px".into()), "has padding defined"),
                    ],
                },
                UtilityExpectation {
                    class: "btn-secondary".into(),
                    checks: vec![
                        check(
                            "background-color",
                            NotEquals("rgba(0, 0, 0, 0)".into()),
                            "has background color",
                        ),
                        check(
                            "border-radius",
                            Equals("8px".into()),
                            "has proper border radius",
                        ),
                    ],
                },
                UtilityExpectation {
                    class: "glass-card".into(),
                    checks: vec![
                        check(
                            "background",
                            Contains("rgba".into()),
                            "has glassmorphism background",
                        ),
                        check(
                            "backdrop-filter",
                            Contains("blur".into()),
                            "has backdrop blur",
                        ),
                    ],
                },
                UtilityExpectation {
                    class: "nav-link".into(),
                    checks: vec![
                        check(
                            "padding",
                            Equals("10px 20px".into()),
                            "uses CSS variable padding",
                        ),
                        check(
                            "border-radius",
                            Equals("15px".into()),
                            "uses CSS variable radius",
                        ),
                        check("display", Equals("flex".into()), "has flex display"),
                    ],
                },
            ],
            required: vec![
                required("glass-card", "utilities.css"),
                required("primary-gradient", "base.css"),
                required("btn-primary", "utilities.css"),
                required("user-name", "utilities.css"),
                required("user-bio", "utilities.css"),
                required("profile-pic", "utilities.css"),
                required("contact-btn", "utilities.css"),
                required("skill-tag", "utilities.css"),
            ],
        }
    }
}

/// A component selector that should be present and styled.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentExpectation {
    /// Compound class selector, e.g. `.nav-link.active`.
    pub selector: String,
    pub description: String,
    /// Most rules whose selector text mentions `selector`, across every
    /// stylesheet. More means conflicting definitions crept back in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rules: Option<usize>,
}

fn default_components() -> Vec<ComponentExpectation> {
    [
        (".skill-card", "Skill cards", Some(25)),
        (".skill-tile", "Skill tiles", None),
        (".filters-card", "Filter components", Some(2)),
        (".message-nav", "Message navigation", None),
        (".profile-completion", "Profile completion UI", None),
        (".nav-link.active", "Active navigation links", None),
        (".skill-meta", "Skill metadata", Some(3)),
        (".filter-group", "Filter groups", Some(6)),
        (".active-filters", "Active filters display", Some(2)),
    ]
    .into_iter()
    .map(|(selector, description, max_rules)| ComponentExpectation {
        selector: selector.into(),
        description: description.into(),
        max_rules,
    })
    .collect()
}

/// Button consolidation rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ButtonConfig {
    /// Class prefix that marks a button utility.
    pub prefix: String,
    /// Classes the utilities file must define.
    pub required: Vec<String>,
    /// The class every button builds on.
    pub base_class: String,
    /// Properties the base class must declare.
    pub base_properties: Vec<String>,
    /// Properties that belong on the base class only.
    pub shared_properties: Vec<String>,
    /// Classes that must no longer be defined anywhere.
    pub legacy_classes: Vec<String>,
    /// Classes whose rules are deprecated outside the utilities file.
    pub deprecated_classes: Vec<String>,
    /// Template button classes with the prefix must match this pattern.
    pub naming_pattern: String,
    /// Inclusive bounds on the number of button rules in the utilities file.
    pub min_rules: usize,
    pub max_rules: usize,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            prefix: "btn".into(),
            required: strings(&[
                "btn-base",
                "btn-primary",
                "btn-secondary",
                "btn-small",
                "btn-large",
            ]),
            base_class: "btn-base".into(),
            base_properties: strings(&["padding", "border", "cursor"]),
            shared_properties: strings(&["cursor", "border", "display"]),
            legacy_classes: strings(&["logout-btn"]),
            deprecated_classes: strings(&["button", "submit-btn", "form-button"]),
            naming_pattern: "^btn(?:-[a-zA-Z0-9-]+)?$".into(),
            min_rules: 3,
            max_rules: 20,
        }
    }
}

/// Rules for telling duplicate class definitions from legitimate variants.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DuplicateConfig {
    /// Per file name, class prefixes that file may redefine.
    pub file_prefixes: IndexMap<String, Vec<String>>,
    /// Substrings marking size or state variants.
    pub modifier_markers: Vec<String>,
    /// Suffixes marking context-specific classes.
    pub context_suffixes: Vec<String>,
    /// Per file name, a regex every class defined there should match.
    pub architecture: IndexMap<String, String>,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        let strings = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        let file_prefixes = [
            (
                "profile-pages.css",
                strings(&["profile-", "user-detail-", "compact-"]),
            ),
            ("skill-pages.css", strings(&["skill-", "rating-"])),
            ("search-page.css", strings(&["search-", "user-card-"])),
            ("messaging-pages.css", strings(&["message-", "inbox-"])),
            ("auth-pages.css", strings(&["auth-", "login-", "signup-"])),
            ("error-pages.css", strings(&["error-", "btn-primary-colors"])),
        ]
        .into_iter()
        .map(|(file, prefixes)| (file.to_string(), prefixes))
        .collect();

        Self {
            file_prefixes,
            modifier_markers: strings(&[
                "-small", "-large", "-mini", "-enabled", "-active", "-selected",
            ]),
            context_suffixes: strings(&[
                "-card",
                "-header",
                "-footer",
                "-section",
                "-grid",
                "-container",
                "-wrapper",
            ]),
            architecture: IndexMap::new(),
        }
    }
}

/// The page stylesheet being consolidated and its template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageConfig {
    pub stylesheet: String,
    pub template: String,
    /// Button classes the page should build on.
    pub button_classes: Vec<String>,
    /// `var()` prefixes counted as design-system usage on the page.
    pub variable_prefixes: Vec<String>,
    /// Line count the page stylesheet should stay within.
    pub max_lines: usize,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            stylesheet: "search-page.css".into(),
            template: "search.html".into(),
            button_classes: vec![
                "btn-primary".into(),
                "contact-btn".into(),
                "search-button".into(),
            ],
            variable_prefixes: vec![
                "--color-".into(),
                "--space-".into(),
                "--radius-".into(),
                "--shadow-".into(),
            ],
            max_lines: 335,
        }
    }
}

/// The component rule whose hardcoded styles are being consolidated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentBlockConfig {
    pub stylesheet: String,
    /// Class name without the dot.
    pub class: String,
}

impl Default for ComponentBlockConfig {
    fn default() -> Self {
        Self {
            stylesheet: "components.css".into(),
            class: "user-card".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TemplateConfig {
    /// Template file names to analyse; empty means every template.
    pub files: Vec<String>,
    /// Utility classes whose presence marks a template as adopting utilities.
    pub adoption_classes: Vec<String>,
    /// Utility classes counted for usage density.
    pub utility_classes: Vec<String>,
    /// Class counted for gradient usage.
    pub gradient_class: String,
    /// Class counted for glass card usage on the page template.
    pub glass_class: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            adoption_classes: vec!["glass-card".into(), "primary-gradient".into()],
            utility_classes: [
                "glass-card",
                "primary-gradient",
                "btn-primary",
                "user-name",
                "user-bio",
                "profile-pic",
                "contact-btn",
                "skill-tag",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            gradient_class: "primary-gradient".into(),
            glass_class: "glass-card".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DesignSystemConfig {
    /// `var()` prefixes counted as design-system usage across all files.
    pub variable_prefixes: Vec<String>,
}

impl Default for DesignSystemConfig {
    fn default() -> Self {
        Self {
            variable_prefixes: [
                "--color-primary",
                "--space-",
                "--font-size-",
                "--border-radius-",
                "--shadow-",
                "--transition-",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Pass and warn boundaries of a counted check.
///
/// Whether the counts must be at least or at most the boundaries is decided
/// by the check using the band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Band {
    pub pass: usize,
    pub warn: usize,
}

impl Band {
    pub const fn new(pass: usize, warn: usize) -> Self {
        Self { pass, warn }
    }

    /// Higher is better: Pass at `pass` or more, Warn at `warn` or more.
    pub fn at_least(&self, value: usize) -> Status {
        if value >= self.pass {
            Status::Pass
        } else if value >= self.warn {
            Status::Warn
        } else {
            Status::Fail
        }
    }

    /// Lower is better: Pass at `pass` or less, Warn at `warn` or less.
    pub fn at_most(&self, value: usize) -> Status {
        if value <= self.pass {
            Status::Pass
        } else if value <= self.warn {
            Status::Warn
        } else {
            Status::Fail
        }
    }

    /// [`Band::at_least`] for percentages.
    pub fn at_least_percent(&self, percent: f64) -> Status {
        if percent >= self.pass as f64 {
            Status::Pass
        } else if percent >= self.warn as f64 {
            Status::Warn
        } else {
            Status::Fail
        }
    }
}

/// Count boundaries of every thresholded check.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Thresholds {
    /// Percent of a token category passing.
    pub token_category: Band,
    /// Required utilities available (at least).
    pub utility_coverage: Band,
    /// Class rules in the utilities file (at least).
    pub utility_density: Band,
    /// Hardcoded glassmorphism patterns on the page (at most).
    pub page_glass: Band,
    /// Design-system `var()` references on the page (at least).
    pub page_variables: Band,
    /// Button classes present on the page (at least).
    pub page_buttons: Band,
    /// Repeated declaration patterns on the page (at most).
    pub page_duplicates: Band,
    /// Glass class uses in the page template (at least).
    pub page_glass_usage: Band,
    /// Gradient class uses in the page template (at least).
    pub page_gradient_usage: Band,
    /// Hardcoded values in the component block (at most).
    pub component_hardcoded: Band,
    /// Templates adopting utilities (at least).
    pub template_adoption: Band,
    /// Gradient class uses across templates (at least).
    pub template_gradients: Band,
    /// Utility class uses across templates (at least).
    pub template_utility_density: Band,
    /// Glassmorphism patterns across all stylesheets (at most).
    pub cross_glass: Band,
    /// Hardcoded gradients across all stylesheets (at most).
    pub cross_gradients: Band,
    /// `var()` references across all stylesheets (at least).
    pub cross_variables: Band,
    /// Modernization score out of 100 (at least).
    pub modernization: Band,
    /// Design-system prefixed `var()` references (at least).
    pub design_variables: Band,
    /// Unique hardcoded colors (at most).
    pub hardcoded_colors: Band,
    /// Total stylesheet lines (at most).
    pub total_lines: Band,
    /// Duplicated glass and shadow patterns across files (at most).
    pub duplicate_patterns: Band,
    /// Percent of page and component consolidation checks passing.
    pub consolidation_progress: Band,
    /// Percent of utility and design-system checks passing.
    pub system_readiness: Band,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            token_category: Band::new(100, 50),
            utility_coverage: Band::new(5, 3),
            utility_density: Band::new(200, 0),
            page_glass: Band::new(0, 3),
            page_variables: Band::new(10, 5),
            page_buttons: Band::new(2, 1),
            page_duplicates: Band::new(2, 5),
            page_glass_usage: Band::new(3, 1),
            page_gradient_usage: Band::new(2, 1),
            component_hardcoded: Band::new(5, 10),
            template_adoption: Band::new(2, 1),
            template_gradients: Band::new(2, 1),
            template_utility_density: Band::new(15, 8),
            cross_glass: Band::new(3, 8),
            cross_gradients: Band::new(10, 20),
            cross_variables: Band::new(50, 25),
            modernization: Band::new(75, 50),
            design_variables: Band::new(100, 0),
            hardcoded_colors: Band::new(20, usize::MAX),
            total_lines: Band::new(6500, usize::MAX),
            duplicate_patterns: Band::new(10, usize::MAX),
            consolidation_progress: Band::new(80, 60),
            system_readiness: Band::new(75, 0),
        }
    }
}
