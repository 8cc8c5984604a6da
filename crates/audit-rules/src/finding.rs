//! Finding types.

use camino::Utf8PathBuf;
use serde::Serialize;
use source_span::Span;

/// One pass/warn/fail record produced by a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// The check that produced this finding.
    pub code: CheckCode,
    /// The report section the finding is grouped under.
    pub category: Category,
    /// The outcome.
    pub status: Status,
    /// Short title, e.g. `.glass-card Availability`.
    pub name: String,
    /// Details of the outcome.
    pub message: String,
    /// Where in the workspace the finding points, when it points anywhere.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Finding {
    /// Creates a new finding without a location.
    pub fn new(
        code: CheckCode,
        category: Category,
        status: Status,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            category,
            status,
            name: name.into(),
            message: message.into(),
            location: None,
        }
    }

    /// Attaches a location to this finding.
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Attaches a location when one is available.
    pub fn at_opt(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }

    /// A file some checks depend on is not in the workspace.
    pub fn missing_file(category: Category, file_name: &str) -> Self {
        Self::new(
            CheckCode::RoleFileMissing,
            category,
            Status::Warn,
            format!("{file_name} Present"),
            format!("{file_name} not found, dependent checks skipped"),
        )
    }
}

/// A position in a workspace file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Path relative to the workspace root.
    pub file: Utf8PathBuf,
    #[serde(skip)]
    pub span: Span,
    /// 1-indexed line.
    pub line: u32,
    /// 1-indexed column.
    pub column: u32,
}

/// The outcome of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Warn,
    Fail,
}

impl Status {
    /// `Pass` when `ok`, otherwise `otherwise`.
    pub fn check(ok: bool, otherwise: Status) -> Self {
        if ok {
            Status::Pass
        } else {
            otherwise
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Warn => "WARN",
            Status::Fail => "FAIL",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Status::Pass => "✅",
            Status::Warn => "⚠️",
            Status::Fail => "❌",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report sections, in the order the check groups produce them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Tokens,
    Utilities,
    Components,
    Buttons,
    Duplicates,
    PageConsolidation,
    ComponentConsolidation,
    CrossFile,
    DesignSystem,
    Syntax,
    CodeQuality,
    Progress,
}

impl Category {
    /// Machine-readable identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tokens => "tokens",
            Category::Utilities => "utilities",
            Category::Components => "components",
            Category::Buttons => "buttons",
            Category::Duplicates => "duplicates",
            Category::PageConsolidation => "page-consolidation",
            Category::ComponentConsolidation => "component-consolidation",
            Category::CrossFile => "cross-file",
            Category::DesignSystem => "design-system",
            Category::Syntax => "syntax",
            Category::CodeQuality => "code-quality",
            Category::Progress => "progress",
        }
    }

    /// Section heading for human output.
    pub fn title(&self) -> &'static str {
        match self {
            Category::Tokens => "Design Tokens",
            Category::Utilities => "Utilities",
            Category::Components => "Components",
            Category::Buttons => "Button Consolidation",
            Category::Duplicates => "Duplicate Classes",
            Category::PageConsolidation => "Page Consolidation",
            Category::ComponentConsolidation => "Component Consolidation",
            Category::CrossFile => "Cross-File Analysis",
            Category::DesignSystem => "Design System",
            Category::Syntax => "Syntax",
            Category::CodeQuality => "Code Quality",
            Category::Progress => "Progress",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Check codes for every finding the audit can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum CheckCode {
    // === Shared ===
    /// `role-file-missing`: a stylesheet or template a check depends on is absent
    RoleFileMissing,

    // === Tokens ===
    /// `token-value`
    TokenValue,
    /// `token-category`: per-category token summary
    TokenCategory,

    // === Utilities ===
    /// `utility-style`: a utility class declares the expected value
    UtilityStyle,
    /// `utility-available`
    UtilityAvailable,
    /// `utility-coverage`
    UtilityCoverage,
    /// `utility-density`: class rules in the utilities file
    UtilityDensity,
    /// `unused-utility`
    UnusedUtility,

    // === Components ===
    /// `component-styled`
    ComponentStyled,
    /// `component-summary`
    ComponentSummary,
    /// `component-rule-count`: rules mentioning a component stay under a ceiling
    ComponentRuleCount,

    // === Buttons ===
    /// `button-required`
    ButtonRequired,
    /// `button-base`: the base class declares the essential properties
    ButtonBase,
    /// `button-single-definition`
    ButtonSingleDefinition,
    /// `button-deprecated`
    ButtonDeprecated,
    /// `button-legacy`
    ButtonLegacy,
    /// `button-adoption`: utilities preferred over custom button styling
    ButtonAdoption,
    /// `button-naming`
    ButtonNaming,
    /// `button-template-class`
    ButtonTemplateClass,
    /// `button-states`: focus/hover rules exist
    ButtonStates,
    /// `button-color-variables`
    ButtonColorVariables,
    /// `button-rule-count`
    ButtonRuleCount,
    /// `button-redundant-property`
    ButtonRedundantProperty,

    // === Duplicates ===
    /// `duplicate-class`: a class defined in several files
    DuplicateClass,
    /// `duplicate-summary`
    DuplicateSummary,
    /// `within-file-duplicate`
    WithinFileDuplicate,
    /// `file-architecture`: class names in a role file follow its pattern
    FileArchitecture,

    // === Consolidation patterns ===
    /// `page-lines`
    PageLines,
    /// `glass-pattern`
    GlassPattern,
    /// `glass-total`
    GlassTotal,
    /// `variable-usage`
    VariableUsage,
    /// `page-buttons`
    PageButtons,
    /// `duplicate-pattern`
    DuplicatePattern,
    /// `utility-usage`: utility classes used by a template
    UtilityUsage,
    /// `component-block`
    ComponentBlock,
    /// `hardcoded-glass`
    HardcodedGlass,
    /// `hardcoded-values`
    HardcodedValues,
    /// `template-adoption`
    TemplateAdoption,
    /// `gradient-usage`
    GradientUsage,
    /// `hardcoded-gradients`
    HardcodedGradients,
    /// `template-utility-density`
    TemplateUtilityDensity,
    /// `hardcoded-colors`
    HardcodedColors,
    /// `modernization-score`
    ModernizationScore,

    // === Syntax ===
    /// `syntax-valid`
    SyntaxValid,
    /// `unbalanced-braces`
    UnbalancedBraces,
    /// `unterminated-comment`
    UnterminatedComment,
    /// `unterminated-string`
    UnterminatedString,
    /// `empty-rule`
    EmptyRule,
    /// `duplicate-semicolon`
    DuplicateSemicolon,
    /// `invalid-declaration`
    InvalidDeclaration,

    // === Stats ===
    /// `file-stats`
    FileStats,
    /// `total-size`
    TotalSize,

    // === Progress ===
    /// `consolidation-progress`
    ConsolidationProgress,
    /// `system-readiness`
    SystemReadiness,
}

impl CheckCode {
    /// Returns the check code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckCode::RoleFileMissing => "role-file-missing",
            CheckCode::TokenValue => "token-value",
            CheckCode::TokenCategory => "token-category",
            CheckCode::UtilityStyle => "utility-style",
            CheckCode::UtilityAvailable => "utility-available",
            CheckCode::UtilityCoverage => "utility-coverage",
            CheckCode::UtilityDensity => "utility-density",
            CheckCode::UnusedUtility => "unused-utility",
            CheckCode::ComponentStyled => "component-styled",
            CheckCode::ComponentSummary => "component-summary",
            CheckCode::ComponentRuleCount => "component-rule-count",
            CheckCode::ButtonRequired => "button-required",
            CheckCode::ButtonBase => "button-base",
            CheckCode::ButtonSingleDefinition => "button-single-definition",
            CheckCode::ButtonDeprecated => "button-deprecated",
            CheckCode::ButtonLegacy => "button-legacy",
            CheckCode::ButtonAdoption => "button-adoption",
            CheckCode::ButtonNaming => "button-naming",
            CheckCode::ButtonTemplateClass => "button-template-class",
            CheckCode::ButtonStates => "button-states",
            CheckCode::ButtonColorVariables => "button-color-variables",
            CheckCode::ButtonRuleCount => "button-rule-count",
            CheckCode::ButtonRedundantProperty => "button-redundant-property",
            CheckCode::DuplicateClass => "duplicate-class",
            CheckCode::DuplicateSummary => "duplicate-summary",
            CheckCode::WithinFileDuplicate => "within-file-duplicate",
            CheckCode::FileArchitecture => "file-architecture",
            CheckCode::PageLines => "page-lines",
            CheckCode::GlassPattern => "glass-pattern",
            CheckCode::GlassTotal => "glass-total",
            CheckCode::VariableUsage => "variable-usage",
            CheckCode::PageButtons => "page-buttons",
            CheckCode::DuplicatePattern => "duplicate-pattern",
            CheckCode::UtilityUsage => "utility-usage",
            CheckCode::ComponentBlock => "component-block",
            CheckCode::HardcodedGlass => "hardcoded-glass",
            CheckCode::HardcodedValues => "hardcoded-values",
            CheckCode::TemplateAdoption => "template-adoption",
            CheckCode::GradientUsage => "gradient-usage",
            CheckCode::HardcodedGradients => "hardcoded-gradients",
            CheckCode::TemplateUtilityDensity => "template-utility-density",
            CheckCode::HardcodedColors => "hardcoded-colors",
            CheckCode::ModernizationScore => "modernization-score",
            CheckCode::SyntaxValid => "syntax-valid",
            CheckCode::UnbalancedBraces => "unbalanced-braces",
            CheckCode::UnterminatedComment => "unterminated-comment",
            CheckCode::UnterminatedString => "unterminated-string",
            CheckCode::EmptyRule => "empty-rule",
            CheckCode::DuplicateSemicolon => "duplicate-semicolon",
            CheckCode::InvalidDeclaration => "invalid-declaration",
            CheckCode::FileStats => "file-stats",
            CheckCode::TotalSize => "total-size",
            CheckCode::ConsolidationProgress => "consolidation-progress",
            CheckCode::SystemReadiness => "system-readiness",
        }
    }
}

impl From<CheckCode> for &'static str {
    fn from(code: CheckCode) -> Self {
        code.as_str()
    }
}

impl std::fmt::Display for CheckCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
