//! CLI argument parsing.

use audit_rules::{AuditOptions, CheckGroup};
use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};

/// Audits a stylesheet design system.
#[derive(Debug, Parser)]
#[command(name = "css-audit")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Working directory for the audit
    #[arg(long, default_value = ".")]
    pub workspace: Utf8PathBuf,

    /// Path to a configuration file (defaults to css-audit.json in the workspace)
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Lowest status reported besides passes
    #[arg(long, value_enum, default_value = "warn")]
    pub threshold: Threshold,

    /// Check groups to run (comma-separated, defaults to all)
    #[arg(long, value_delimiter = ',')]
    pub checks: Vec<CheckGroup>,

    /// Glob patterns to ignore
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Exit with error on warnings
    #[arg(long = "fail-on-warnings")]
    pub fail_on_warnings: bool,

    /// Write an HTML showcase of the design system to this path
    #[arg(long)]
    pub showcase: Option<Utf8PathBuf>,

    /// Watch mode
    #[arg(long)]
    pub watch: bool,

    /// Preserve watch output (don't clear screen)
    #[arg(long = "preserve-watch-output")]
    pub preserve_watch_output: bool,

    /// Print timing breakdowns
    #[arg(long)]
    pub timings: bool,

    /// Timing output format
    #[arg(long, value_enum, default_value = "text")]
    pub timings_format: TimingFormat,

    /// When to color human output
    #[arg(long, value_enum, default_value = "auto")]
    pub color: ColorChoice,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// Human-readable with locations and source snippets
    HumanVerbose,
    /// JSON output
    Json,
    /// Machine-readable (one line per finding)
    Machine,
}

/// Status threshold.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum Threshold {
    /// Report warnings and failures (default)
    #[default]
    Warn,
    /// Only report failures
    Fail,
}

/// Timing output format.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum TimingFormat {
    /// Human-readable output
    #[default]
    Text,
    /// JSON output (machine-readable)
    Json,
}

/// Color mode for human output.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum ColorChoice {
    /// Color when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl Args {
    /// The check groups to run; every group when none are named.
    pub fn audit_options(&self) -> AuditOptions {
        if self.checks.is_empty() {
            AuditOptions::all()
        } else {
            AuditOptions::from_groups(&self.checks)
        }
    }

    /// Whether timings are printed.
    pub fn timings_enabled(&self) -> bool {
        self.timings
            || self.timings_format == TimingFormat::Json
            || read_env_bool("CSS_AUDIT_TIMINGS").unwrap_or(false)
    }
}

fn read_env_bool(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
