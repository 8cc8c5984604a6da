//! The scanned workspace the checks run over.

use crate::finding::Location;
use camino::{Utf8Path, Utf8PathBuf};
use css_scanner::{ScanResult, Stylesheet, Template};
use rustc_hash::FxHashMap;
use source_span::{LineIndex, Span};

/// A workspace file together with its scanned form.
#[derive(Debug)]
pub struct SourceFile<T> {
    /// Path relative to the workspace root.
    pub path: Utf8PathBuf,
    pub source: String,
    pub parsed: T,
    pub line_index: LineIndex,
}

pub type StylesheetFile = SourceFile<ScanResult>;
pub type TemplateFile = SourceFile<Template>;

impl<T> SourceFile<T> {
    /// The final path component.
    pub fn file_name(&self) -> &str {
        self.path.file_name().unwrap_or(self.path.as_str())
    }

    /// Number of lines, counting a trailing empty line like a text editor
    /// that shows the cursor after the last newline.
    pub fn line_count(&self) -> usize {
        self.source.split('\n').count()
    }

    /// Lines with something other than whitespace.
    pub fn non_empty_lines(&self) -> usize {
        self.source
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .count()
    }

    /// Converts a span of this file into a reportable location.
    pub fn location(&self, span: Span) -> Location {
        let (line, column) = self
            .line_index
            .line_col(span.start)
            .map(|lc| (lc.line + 1, lc.col + 1))
            .unwrap_or((1, 1));
        Location {
            file: self.path.clone(),
            span,
            line,
            column,
        }
    }

    /// The text of the 1-indexed `line`.
    pub fn line_text(&self, line: u32) -> Option<&str> {
        self.line_index
            .line_text(line.checked_sub(1)?, &self.source)
    }
}

impl SourceFile<ScanResult> {
    /// Scans stylesheet text.
    pub fn stylesheet(path: impl Into<Utf8PathBuf>, source: String) -> Self {
        let parsed = css_scanner::scan(&source);
        let line_index = LineIndex::new(&source);
        Self {
            path: path.into(),
            source,
            parsed,
            line_index,
        }
    }

    /// The scanned rules.
    pub fn sheet(&self) -> &Stylesheet {
        &self.parsed.stylesheet
    }
}

impl SourceFile<Template> {
    /// Scans template text.
    pub fn template(path: impl Into<Utf8PathBuf>, source: String) -> Self {
        let parsed = Template::scan(&source);
        let line_index = LineIndex::new(&source);
        Self {
            path: path.into(),
            source,
            parsed,
            line_index,
        }
    }
}

/// Every scanned stylesheet and template of a workspace.
#[derive(Debug, Default)]
pub struct Project {
    /// Stylesheets sorted by path.
    pub stylesheets: Vec<StylesheetFile>,
    /// Templates sorted by path.
    pub templates: Vec<TemplateFile>,
    /// On-disk sizes in bytes, when known.
    pub file_sizes: FxHashMap<Utf8PathBuf, u64>,
}

impl Project {
    pub fn new(mut stylesheets: Vec<StylesheetFile>, mut templates: Vec<TemplateFile>) -> Self {
        stylesheets.sort_by(|a, b| a.path.cmp(&b.path));
        templates.sort_by(|a, b| a.path.cmp(&b.path));
        Self {
            stylesheets,
            templates,
            file_sizes: FxHashMap::default(),
        }
    }

    /// The first stylesheet with the given file name.
    pub fn stylesheet(&self, file_name: &str) -> Option<&StylesheetFile> {
        self.stylesheets
            .iter()
            .find(|file| file.file_name() == file_name)
    }

    /// The first template with the given file name.
    pub fn template(&self, file_name: &str) -> Option<&TemplateFile> {
        self.templates
            .iter()
            .find(|file| file.file_name() == file_name)
    }

    /// Templates with the given file names, or every template when `names`
    /// is empty.
    pub fn templates_named<'a>(&'a self, names: &'a [String]) -> Vec<&'a TemplateFile> {
        if names.is_empty() {
            return self.templates.iter().collect();
        }
        names.iter().filter_map(|name| self.template(name)).collect()
    }

    /// Size of a file in bytes; the source length when the size on disk
    /// was not gathered.
    pub fn file_size<T>(&self, file: &SourceFile<T>) -> u64 {
        self.file_sizes
            .get(&file.path)
            .copied()
            .unwrap_or(file.source.len() as u64)
    }

    /// Looks up a file's source by path, for rendering snippets.
    pub fn source_of(&self, path: &Utf8Path) -> Option<(&str, &LineIndex)> {
        self.stylesheets
            .iter()
            .find(|file| file.path.as_path() == path)
            .map(|file| (file.source.as_str(), &file.line_index))
            .or_else(|| {
                self.templates
                    .iter()
                    .find(|file| file.path.as_path() == path)
                    .map(|file| (file.source.as_str(), &file.line_index))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_location_is_one_indexed() {
        let file = StylesheetFile::stylesheet("static/css/a.css", ".a {}\n.b { color: red; }".into());
        let span = file.sheet().rules[1].selector_span;
        let location = file.location(span);
        assert_eq!((location.line, location.column), (2, 1));
        assert_eq!(file.line_text(2), Some(".b { color: red; }"));
        assert_eq!(file.file_name(), "a.css");
    }

    #[test]
    fn test_line_counts() {
        let file = StylesheetFile::stylesheet("x.css", ".a { color: red; }\n\n".into());
        assert_eq!(file.line_count(), 3);
        assert_eq!(file.non_empty_lines(), 1);
    }

    #[test]
    fn test_lookup_by_file_name() {
        let project = Project::new(
            vec![
                StylesheetFile::stylesheet("css/utilities.css", String::new()),
                StylesheetFile::stylesheet("css/base.css", String::new()),
            ],
            vec![TemplateFile::template("templates/search.html", String::new())],
        );
        assert_eq!(project.stylesheets[0].path, "css/base.css");
        assert!(project.stylesheet("utilities.css").is_some());
        assert!(project.stylesheet("missing.css").is_none());
        assert_eq!(project.templates_named(&[]).len(), 1);
        assert_eq!(
            project.templates_named(&["nope.html".to_string()]).len(),
            0
        );
    }
}
