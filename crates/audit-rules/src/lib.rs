//! Design-system audit checks for css-audit.
//!
//! This crate provides checks for:
//! - Design tokens (custom property values on the root element)
//! - Utility classes (expected styles, availability, density)
//! - Components and button consolidation
//! - Cross-file duplicate class definitions
//! - Consolidation scans for hardcoded patterns and template adoption
//! - Scan errors, file statistics and overall progress
//!
//! Every check produces [`Finding`]s; nothing is printed here.
//!
//! # Example
//!
//! ```
//! use audit_rules::{audit, AuditConfig, AuditOptions, CheckGroup, Project, StylesheetFile};
//!
//! let project = Project::new(
//!     vec![StylesheetFile::stylesheet(
//!         "static/css/variables.css",
//!         ":root { --nav-gap: 15px; }".to_string(),
//!     )],
//!     Vec::new(),
//! );
//! let options = AuditOptions::from_groups(&[CheckGroup::Syntax]);
//! let findings = audit(&project, &options, &AuditConfig::default());
//!
//! for finding in findings {
//!     println!("{} {}: {}", finding.status, finding.name, finding.message);
//! }
//! ```

mod buttons;
mod components;
mod config;
mod duplicates;
mod finding;
mod patterns;
mod progress;
mod project;
pub mod resolve;
mod stats;
mod summary;
mod syntax;
mod tokens;
mod utilities;

pub use config::{
    AuditConfig, Band, ButtonConfig, ComponentBlockConfig, ComponentExpectation, DesignSystemConfig,
    DuplicateConfig, Expectation, PageConfig, PropertyCheck, RequiredUtility, Roles, TemplateConfig,
    Thresholds, TokenExpectation, UtilityConfig, UtilityExpectation,
};
pub use finding::{Category, CheckCode, Finding, Location, Status};
pub use project::{Project, SourceFile, StylesheetFile, TemplateFile};
pub use summary::{AuditSummary, Grade, Recommendation, Tally};

use std::str::FromStr;
use thiserror::Error;

/// A group of related checks that can be switched on and off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckGroup {
    Tokens,
    Utilities,
    Components,
    Buttons,
    Duplicates,
    Patterns,
    Syntax,
    Stats,
    Progress,
}

impl CheckGroup {
    /// Every group, in the order the audit runs them.
    pub const ALL: [CheckGroup; 9] = [
        CheckGroup::Tokens,
        CheckGroup::Utilities,
        CheckGroup::Components,
        CheckGroup::Buttons,
        CheckGroup::Duplicates,
        CheckGroup::Patterns,
        CheckGroup::Syntax,
        CheckGroup::Stats,
        CheckGroup::Progress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckGroup::Tokens => "tokens",
            CheckGroup::Utilities => "utilities",
            CheckGroup::Components => "components",
            CheckGroup::Buttons => "buttons",
            CheckGroup::Duplicates => "duplicates",
            CheckGroup::Patterns => "patterns",
            CheckGroup::Syntax => "syntax",
            CheckGroup::Stats => "stats",
            CheckGroup::Progress => "progress",
        }
    }
}

impl std::fmt::Display for CheckGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unknown check group name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown check group `{0}` (expected one of: tokens, utilities, components, buttons, duplicates, patterns, syntax, stats, progress)")]
pub struct UnknownCheckGroup(pub String);

impl FromStr for CheckGroup {
    type Err = UnknownCheckGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CheckGroup::ALL
            .into_iter()
            .find(|group| group.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCheckGroup(s.to_string()))
    }
}

/// Which check groups to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditOptions {
    pub tokens: bool,
    pub utilities: bool,
    pub components: bool,
    pub buttons: bool,
    pub duplicates: bool,
    pub patterns: bool,
    pub syntax: bool,
    pub stats: bool,
    pub progress: bool,
}

impl AuditOptions {
    /// Returns options with all checks enabled.
    pub fn all() -> Self {
        Self::from_groups(&CheckGroup::ALL)
    }

    /// Enables exactly the given groups.
    pub fn from_groups(groups: &[CheckGroup]) -> Self {
        let mut options = Self::default();
        for group in groups {
            match group {
                CheckGroup::Tokens => options.tokens = true,
                CheckGroup::Utilities => options.utilities = true,
                CheckGroup::Components => options.components = true,
                CheckGroup::Buttons => options.buttons = true,
                CheckGroup::Duplicates => options.duplicates = true,
                CheckGroup::Patterns => options.patterns = true,
                CheckGroup::Syntax => options.syntax = true,
                CheckGroup::Stats => options.stats = true,
                CheckGroup::Progress => options.progress = true,
            }
        }
        options
    }
}

/// Runs all enabled check groups over a project.
///
/// Groups run in a fixed order, and findings keep the order their group
/// produced them in. Progress runs last, over everything found before it.
pub fn audit(project: &Project, options: &AuditOptions, config: &AuditConfig) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut record = |group: CheckGroup, found: Vec<Finding>| {
        tracing::debug!(group = %group, findings = found.len(), "ran check group");
        findings.extend(found);
    };

    if options.tokens {
        record(CheckGroup::Tokens, tokens::check(project, config));
    }
    if options.utilities {
        record(CheckGroup::Utilities, utilities::check(project, config));
    }
    if options.components {
        record(CheckGroup::Components, components::check(project, config));
    }
    if options.buttons {
        record(CheckGroup::Buttons, buttons::check(project, config));
    }
    if options.duplicates {
        record(CheckGroup::Duplicates, duplicates::check(project, config));
    }
    if options.patterns {
        record(CheckGroup::Patterns, patterns::check(project, config));
    }
    if options.syntax {
        record(CheckGroup::Syntax, syntax::check(project));
    }
    if options.stats {
        record(CheckGroup::Stats, stats::check(project, config));
    }

    if options.progress {
        let progress = progress::check(&findings, config);
        findings.extend(progress);
    }

    findings
}
