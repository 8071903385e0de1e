//! Ties discovery, formatting and output together.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::files::{self, FileError};
use crate::format::{css, html, javascript, FormatError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Minify,
    Prettify,
}

/// Where formatted output goes: back over the source file, or into the
/// mode's output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteTarget {
    InPlace,
    OutputDir,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Html,
    Css,
    Script,
}

impl FileKind {
    /// The formatter family for a path, by extension. The whole
    /// `js`/`ts` extension family shares one scanner.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "html" | "htm" => Some(Self::Html),
            "css" => Some(Self::Css),
            "js" | "mjs" | "cjs" | "jsx" | "ts" | "mts" | "cts" | "tsx" => Some(Self::Script),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to access file: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Format(#[from] FormatError),

    #[error("{0}")]
    File(#[from] FileError),

    #[error("{0:?} has no formattable file extension")]
    Unsupported(PathBuf),
}

/// Format a single source string without touching the file system.
pub fn format_source(
    kind: FileKind,
    src: &str,
    config: &Config,
    mode: Mode,
) -> Result<String, FormatError> {
    match (kind, mode) {
        (FileKind::Html, Mode::Minify) => html::minify(src, config),
        (FileKind::Html, Mode::Prettify) => html::prettify(src, config),
        (FileKind::Css, Mode::Minify) => css::minify(src, &config.css),
        (FileKind::Css, Mode::Prettify) => css::prettify(src),
        (FileKind::Script, Mode::Minify) => javascript::minify(src, &config.javascript),
        (FileKind::Script, Mode::Prettify) => javascript::prettify(src),
    }
}

/// Outcome of a run. Failures are collected, never fatal to the run.
#[derive(Debug, Default)]
pub struct FormatReport {
    pub formatted: usize,
    pub failed: Vec<(PathBuf, String)>,
}

impl FormatReport {
    pub fn success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct Pipeline {
    config: Config,
    mode: Mode,
    target: WriteTarget,
}

impl Pipeline {
    pub fn new(config: Config, mode: Mode, target: WriteTarget) -> Self {
        Self {
            config,
            mode,
            target,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Format every supported file under `root`. Per-file failures are
    /// logged and collected while the rest of the tree is processed.
    pub fn run_all(&self, root: &Path) -> FormatReport {
        let files = files::discover(root, &self.config);
        info!("Formatting {} files under {:?}", files.len(), root);
        let mut report = FormatReport::default();
        for path in files {
            match self.run_file(&path, Some(root)) {
                Ok(written) => {
                    debug!("Formatted {:?} -> {:?}", path, written);
                    report.formatted += 1;
                }
                Err(e) => {
                    error!("Failed to format {:?}: {}", path, e);
                    report.failed.push((path, e.to_string()));
                }
            }
        }
        info!(
            "Formatted {} files, {} failed",
            report.formatted,
            report.failed.len()
        );
        report
    }

    /// Format one file and return the path the result was written to.
    pub fn run_file(&self, path: &Path, root: Option<&Path>) -> Result<PathBuf, PipelineError> {
        let kind = FileKind::from_path(path)
            .ok_or_else(|| PipelineError::Unsupported(path.to_path_buf()))?;
        let src = fs::read_to_string(path)?;
        let formatted = format_source(kind, &src, &self.config, self.mode)?;
        let destination = match self.target {
            WriteTarget::InPlace => path.to_path_buf(),
            WriteTarget::OutputDir => files::output_path(path, root, &self.config, self.mode)?,
        };
        files::write_output(&destination, &formatted)?;
        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_kind_from_path() {
        assert_eq!(FileKind::from_path(Path::new("a/index.html")), Some(FileKind::Html));
        assert_eq!(FileKind::from_path(Path::new("page.HTM")), Some(FileKind::Html));
        assert_eq!(FileKind::from_path(Path::new("style.css")), Some(FileKind::Css));
        assert_eq!(FileKind::from_path(Path::new("app.ts")), Some(FileKind::Script));
        assert_eq!(FileKind::from_path(Path::new("mod.mjs")), Some(FileKind::Script));
        assert_eq!(FileKind::from_path(Path::new("notes.txt")), None);
        assert_eq!(FileKind::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn test_format_source_dispatches_by_kind() {
        let config = Config::default();
        assert_eq!(
            format_source(FileKind::Css, "a { b : c ; }", &config, Mode::Minify).unwrap(),
            "a{b:c}"
        );
        assert_eq!(
            format_source(FileKind::Script, "f();\n\n\ng();", &config, Mode::Prettify).unwrap(),
            "f();\n\ng();\n"
        );
    }

    #[test]
    fn test_run_file_rejects_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "plain text").unwrap();
        let pipeline = Pipeline::new(Config::default(), Mode::Minify, WriteTarget::InPlace);
        let err = pipeline.run_file(&path, None).unwrap_err();
        assert!(matches!(err, PipelineError::Unsupported(_)));
        assert!(err.to_string().contains("no formattable file extension"));
    }

    #[test]
    fn test_run_file_rewrites_loose_file_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("style.css");
        std::fs::write(&path, "a { color : red ; }").unwrap();
        let pipeline = Pipeline::new(Config::default(), Mode::Minify, WriteTarget::OutputDir);
        let written = pipeline.run_file(&path, None).unwrap();
        assert_eq!(written, dir.path().join("style.min.css"));
        assert_eq!(std::fs::read_to_string(written).unwrap(), "a{color:red}");
    }

    #[test]
    fn test_run_all_continues_past_failures() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.css"), "a { b : c ; }").unwrap();
        std::fs::write(dir.path().join("bad.html"), "<!-- oops").unwrap();
        let pipeline = Pipeline::new(Config::default(), Mode::Minify, WriteTarget::OutputDir);
        let report = pipeline.run_all(dir.path());
        assert_eq!(report.formatted, 1);
        assert_eq!(report.failed.len(), 1);
        assert!(!report.success());
        assert_eq!(report.failed[0].0, dir.path().join("bad.html"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("minified").join("good.css")).unwrap(),
            "a{b:c}"
        );
    }
}
