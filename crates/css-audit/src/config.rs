//! Configuration loading.

use audit_rules::AuditConfig;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::fs;
use thiserror::Error;

/// File names searched for in the workspace, in order.
const CONFIG_FILES: [&str; 2] = ["css-audit.json", ".css-audit.json"];

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file named with `--config` does not exist.
    #[error("config file not found: {0}")]
    NotFound(Utf8PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Workspace configuration: which files to load and how to audit them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Include globs for stylesheets, relative to the workspace.
    pub stylesheets: Vec<String>,
    /// Include globs for templates, relative to the workspace.
    pub templates: Vec<String>,
    /// Globs excluded from both.
    pub ignore: Vec<String>,
    /// Check configuration.
    #[serde(flatten)]
    pub audit: AuditConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            stylesheets: vec!["**/*.css".into()],
            templates: vec!["**/*.html".into()],
            ignore: Vec::new(),
            audit: AuditConfig::default(),
        }
    }
}

impl ProjectConfig {
    /// Loads the configuration for a workspace.
    ///
    /// An explicit path must exist. Without one, the first of
    /// `css-audit.json` and `.css-audit.json` found in the workspace is used,
    /// and defaults apply when neither exists.
    pub fn load(
        workspace: &Utf8Path,
        explicit: Option<&Utf8Path>,
    ) -> Result<(Option<Utf8PathBuf>, Self), ConfigError> {
        let path = match explicit {
            Some(path) => {
                let path = if path.is_relative() {
                    workspace.join(path)
                } else {
                    path.to_owned()
                };
                if !path.exists() {
                    return Err(ConfigError::NotFound(path));
                }
                path
            }
            None => match Self::find(workspace) {
                Some(path) => path,
                None => {
                    tracing::debug!(%workspace, "no config file, using defaults");
                    return Ok((None, Self::default()));
                }
            },
        };

        let config = Self::read(&path)?;
        tracing::debug!(%path, "loaded config");
        Ok((Some(path), config))
    }

    /// Finds a config file in the workspace root.
    pub fn find(workspace: &Utf8Path) -> Option<Utf8PathBuf> {
        CONFIG_FILES
            .iter()
            .map(|name| workspace.join(name))
            .find(|path| path.exists())
    }

    fn read(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Parses configuration JSON; comments are allowed.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(&remove_json_comments(content))
    }
}

/// Removes single-line and multi-line comments from JSON.
fn remove_json_comments(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut chars = json.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if c == '"' {
                in_string = false;
            } else if c == '\\' {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            }
        } else if c == '"' {
            result.push(c);
            in_string = true;
        } else if c == '/' {
            match chars.peek() {
                Some('/') => {
                    chars.next();
                    while let Some(&next) = chars.peek() {
                        if next == '\n' {
                            break;
                        }
                        chars.next();
                    }
                }
                Some('*') => {
                    chars.next();
                    while let Some(next) = chars.next() {
                        if next == '*' && chars.peek() == Some(&'/') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => result.push(c),
            }
        } else {
            result.push(c);
        }
    }

    result
}
