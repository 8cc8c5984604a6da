//! Main orchestration logic.

use crate::cli::{Args, OutputFormat, Threshold, TimingFormat};
use crate::config::{ConfigError, ProjectConfig};
use crate::output::{self, Formatter};
use crate::showcase;
use audit_rules::{audit, AuditSummary, Finding, Project, Status, StylesheetFile, TemplateFile};
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use rayon::prelude::*;
use std::fs;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::task::JoinSet;
use walkdir::WalkDir;

/// Paths never audited.
const DEFAULT_IGNORES: [&str; 4] = [
    "**/node_modules/**",
    "**/target/**",
    "**/.git/**",
    "**/dist/**",
];

/// Fatal audit errors.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Invalid glob pattern.
    #[error("invalid glob pattern `{pattern}`: {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("workspace not found: {0}")]
    WorkspaceNotFound(Utf8PathBuf),

    #[error("current directory is not valid UTF-8: {0}")]
    NonUtf8Path(String),

    #[error("failed to write showcase {path}: {source}")]
    ShowcaseWrite {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Watch error.
    #[error("watch error: {0}")]
    WatchFailed(String),
}

/// Result of one audit pass, used for the exit status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOutcome {
    pub failed: usize,
    pub warned: usize,
    pub fail_on_warnings: bool,
}

impl RunOutcome {
    pub fn is_failure(&self) -> bool {
        self.failed > 0 || (self.fail_on_warnings && self.warned > 0)
    }
}

/// Kinds of file the audit loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Stylesheet,
    Template,
}

/// Decides which workspace files are loaded.
#[derive(Debug)]
pub struct FileSelection {
    stylesheets: GlobSet,
    templates: GlobSet,
    ignore: GlobSet,
}

fn glob_set<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Result<GlobSet, AuditError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| AuditError::InvalidGlob {
            pattern: pattern.to_string(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| AuditError::InvalidGlob {
        pattern: "<set>".to_string(),
        source,
    })
}

impl FileSelection {
    /// Builds the selection from the config file and extra CLI ignores.
    pub fn new(config: &ProjectConfig, extra_ignores: &[String]) -> Result<Self, AuditError> {
        Ok(Self {
            stylesheets: glob_set(config.stylesheets.iter().map(String::as_str))?,
            templates: glob_set(config.templates.iter().map(String::as_str))?,
            ignore: glob_set(
                DEFAULT_IGNORES
                    .into_iter()
                    .chain(config.ignore.iter().map(String::as_str))
                    .chain(extra_ignores.iter().map(String::as_str)),
            )?,
        })
    }

    /// Classifies a workspace-relative path.
    pub fn classify(&self, relative: &Utf8Path) -> Option<FileKind> {
        if self.ignore.is_match(relative.as_std_path()) {
            None
        } else if self.stylesheets.is_match(relative.as_std_path()) {
            Some(FileKind::Stylesheet)
        } else if self.templates.is_match(relative.as_std_path()) {
            Some(FileKind::Template)
        } else {
            None
        }
    }

    /// Workspace-relative stylesheet and template paths, sorted.
    pub fn discover(&self, workspace: &Utf8Path) -> (Vec<Utf8PathBuf>, Vec<Utf8PathBuf>) {
        let mut stylesheets = Vec::new();
        let mut templates = Vec::new();

        let files = WalkDir::new(workspace)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| Utf8PathBuf::try_from(e.into_path()).ok());
        for path in files {
            let relative = path.strip_prefix(workspace).unwrap_or(&path).to_owned();
            match self.classify(&relative) {
                Some(FileKind::Stylesheet) => stylesheets.push(relative),
                Some(FileKind::Template) => templates.push(relative),
                None => {}
            }
        }

        stylesheets.sort();
        templates.sort();
        (stylesheets, templates)
    }
}

fn resolve_workspace(path: &Utf8Path) -> Result<Utf8PathBuf, AuditError> {
    let workspace = if path.is_relative() {
        let current =
            std::env::current_dir().map_err(|_| AuditError::WorkspaceNotFound(path.to_owned()))?;
        Utf8PathBuf::try_from(current)
            .map_err(|e| AuditError::NonUtf8Path(e.into_path_buf().display().to_string()))?
            .join(path)
    } else {
        path.to_owned()
    };

    if workspace.is_dir() {
        Ok(workspace)
    } else {
        Err(AuditError::WorkspaceNotFound(workspace))
    }
}

/// Reads and scans files in parallel, skipping unreadable ones.
fn load<T: Send>(
    workspace: &Utf8Path,
    paths: &[Utf8PathBuf],
    scan: fn(Utf8PathBuf, String) -> T,
) -> Vec<T> {
    paths
        .par_iter()
        .filter_map(|relative| match fs::read_to_string(workspace.join(relative)) {
            Ok(source) => Some(scan(relative.clone(), source)),
            Err(error) => {
                tracing::warn!(file = %relative, %error, "skipping unreadable file");
                None
            }
        })
        .collect()
}

/// Loads every selected file into a project.
pub fn load_project(workspace: &Utf8Path, selection: &FileSelection) -> Project {
    let (stylesheet_paths, template_paths) = selection.discover(workspace);
    tracing::debug!(
        stylesheets = stylesheet_paths.len(),
        templates = template_paths.len(),
        "discovered files"
    );

    let stylesheets = load(workspace, &stylesheet_paths, |path, source| {
        StylesheetFile::stylesheet(path, source)
    });
    let templates = load(workspace, &template_paths, |path, source| {
        TemplateFile::template(path, source)
    });
    Project::new(stylesheets, templates)
}

/// Reads stylesheet sizes on disk concurrently.
async fn gather_sizes(workspace: &Utf8Path, project: &mut Project) {
    let mut tasks = JoinSet::new();
    for file in &project.stylesheets {
        let relative = file.path.clone();
        let absolute = workspace.join(&relative);
        tasks.spawn(async move {
            let size = tokio::fs::metadata(&absolute).await.map(|m| m.len());
            (relative, size)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((path, Ok(size))) => {
                project.file_sizes.insert(path, size);
            }
            Ok((path, Err(error))) => {
                tracing::debug!(file = %path, %error, "size unavailable");
            }
            Err(error) => tracing::debug!(%error, "size task failed"),
        }
    }
}

/// Drops findings below the threshold.
fn apply_threshold(findings: Vec<Finding>, threshold: Threshold) -> Vec<Finding> {
    match threshold {
        Threshold::Warn => findings,
        Threshold::Fail => findings
            .into_iter()
            .filter(|f| f.status != Status::Warn)
            .collect(),
    }
}

/// Time spent in each phase of one pass.
#[derive(Debug, Default)]
struct Timings {
    load: Duration,
    sizes: Duration,
    audit: Duration,
    total: Duration,
    files: usize,
}

impl Timings {
    fn print(&self, format: TimingFormat) {
        let ms = |d: Duration| d.as_secs_f64() * 1000.0;
        match format {
            TimingFormat::Json => {
                let json = serde_json::json!({
                    "file_count": self.files,
                    "load_ms": ms(self.load),
                    "sizes_ms": ms(self.sizes),
                    "audit_ms": ms(self.audit),
                    "total_ms": ms(self.total),
                });
                eprintln!(
                    "{}",
                    serde_json::to_string_pretty(&json).unwrap_or_else(|_| "{}".to_string())
                );
            }
            TimingFormat::Text => {
                eprintln!("=== css-audit timings ===");
                eprintln!("load: {:?} ({} files)", self.load, self.files);
                eprintln!("sizes: {:?}", self.sizes);
                eprintln!("audit: {:?}", self.audit);
                eprintln!("total: {:?}", self.total);
            }
        }
    }
}

/// Runs the audit.
pub async fn run(args: Args) -> Result<RunOutcome, AuditError> {
    let workspace = resolve_workspace(&args.workspace)?;
    let (config_path, config) = ProjectConfig::load(&workspace, args.config.as_deref())?;
    if let Some(path) = &config_path {
        tracing::info!(%path, "using config");
    }
    let selection = FileSelection::new(&config, &args.ignore)?;

    if args.watch {
        run_watch_mode(&args, &workspace, &config, &selection).await
    } else {
        run_single_audit(&args, &workspace, &config, &selection).await
    }
}

/// Runs a single audit pass.
async fn run_single_audit(
    args: &Args,
    workspace: &Utf8Path,
    config: &ProjectConfig,
    selection: &FileSelection,
) -> Result<RunOutcome, AuditError> {
    let total_start = Instant::now();
    let mut timings = Timings::default();

    let load_start = Instant::now();
    let mut project = load_project(workspace, selection);
    timings.load = load_start.elapsed();
    timings.files = project.stylesheets.len() + project.templates.len();

    let sizes_start = Instant::now();
    gather_sizes(workspace, &mut project).await;
    timings.sizes = sizes_start.elapsed();

    let audit_start = Instant::now();
    let findings = apply_threshold(
        audit(&project, &args.audit_options(), &config.audit),
        args.threshold,
    );
    let summary = AuditSummary::from_findings(&findings);
    timings.audit = audit_start.elapsed();

    let formatter = Formatter::new(args.output, output::use_color(args.color));
    print!("{}", formatter.format(&findings, &summary, &project));

    if let Some(path) = &args.showcase {
        let path = if path.is_relative() {
            workspace.join(path)
        } else {
            path.clone()
        };
        let html = showcase::render(&project, &config.audit, &findings, &summary, workspace, &path);
        fs::write(&path, html).map_err(|source| AuditError::ShowcaseWrite {
            path: path.clone(),
            source,
        })?;
        if args.output != OutputFormat::Json {
            println!("🎨 showcase written to {path}");
        }
    }

    timings.total = total_start.elapsed();
    if args.timings_enabled() {
        timings.print(args.timings_format);
    }

    Ok(RunOutcome {
        failed: summary.failed,
        warned: summary.warned,
        fail_on_warnings: args.fail_on_warnings,
    })
}

/// Whether a changed path should trigger a new pass.
fn is_relevant_change(path: &std::path::Path, workspace: &Utf8Path, selection: &FileSelection) -> bool {
    let Some(path) = Utf8Path::from_path(path) else {
        return false;
    };
    let relative = path.strip_prefix(workspace).unwrap_or(path);
    selection.classify(relative).is_some()
}

/// Runs in watch mode.
async fn run_watch_mode(
    args: &Args,
    workspace: &Utf8Path,
    config: &ProjectConfig,
    selection: &FileSelection,
) -> Result<RunOutcome, AuditError> {
    use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};

    println!("Starting watch mode...\n");

    run_single_audit(args, workspace, config, selection).await?;

    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        },
        Config::default().with_poll_interval(Duration::from_secs(1)),
    )
    .map_err(|e| AuditError::WatchFailed(e.to_string()))?;

    watcher
        .watch(workspace.as_std_path(), RecursiveMode::Recursive)
        .map_err(|e| AuditError::WatchFailed(e.to_string()))?;

    println!("Watching for changes... (Ctrl+C to stop)\n");

    while let Some(event) = rx.recv().await {
        let changed = event
            .paths
            .iter()
            .any(|p| is_relevant_change(p, workspace, selection));
        if !changed {
            continue;
        }

        if !args.preserve_watch_output {
            print!("\x1B[2J\x1B[1;1H");
        }
        println!("File changed, re-auditing...\n");

        if let Err(error) = run_single_audit(args, workspace, config, selection).await {
            tracing::error!(%error, "audit pass failed");
        }
    }

    Err(AuditError::WatchFailed(
        "watch channel closed unexpectedly".to_string(),
    ))
}
