//! File discovery and output path mapping.
//!
//! Discovery walks the project tree collecting every file with a
//! formattable extension. Output mapping mirrors a source path into a
//! directory under the project root or, for loose files, rewrites the
//! extension with a marker segment.

use crate::config::Config;
use crate::pipeline::Mode;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Extensions picked up by project-wide discovery
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "html", "htm", "css", "js", "mjs", "cjs", "jsx", "ts", "mts", "cts", "tsx",
];

#[derive(Error, Debug)]
pub enum FileError {
    #[error("{path:?} is not under the project root {root:?}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("No output directory configured for prettified files")]
    NoOutputDir,
}

/// Whether a path has one of the formattable extensions
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Walk upward from `start` looking for a file named `file_name`.
pub fn find_upwards(start: &Path, file_name: &str) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        let candidate = current.join(file_name);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = current.parent();
    }
    None
}

/// Compile ignore patterns, dropping any that fail to parse.
pub fn compile_ignore_patterns(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!("Skipping invalid ignore pattern {:?}: {}", pattern, e);
                None
            }
        })
        .collect()
}

/// Discover formattable files under `root`.
///
/// The configured output directories are always skipped, as is any file
/// whose root-relative path matches an ignore pattern. Results come
/// back sorted for stable reporting.
pub fn discover(root: &Path, config: &Config) -> Vec<PathBuf> {
    let ignore = compile_ignore_patterns(&config.ignore);
    let mut skipped_dirs = vec![PathBuf::from(&config.output.minify_dir)];
    if let Some(dir) = &config.output.prettify_dir {
        skipped_dirs.push(PathBuf::from(dir));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| is_supported(path))
        .filter(|path| {
            let relative = match path.strip_prefix(root) {
                Ok(rel) => rel,
                Err(_) => return false,
            };
            if skipped_dirs.iter().any(|dir| relative.starts_with(dir)) {
                return false;
            }
            let relative = relative.to_string_lossy();
            if ignore.iter().any(|re| re.is_match(&relative)) {
                tracing::debug!("Ignoring {}", relative);
                return false;
            }
            true
        })
        .collect();
    files.sort();
    files
}

/// Map a source file to its output location.
///
/// Inside a project (`root` is `Some`) the file's position under the
/// root is mirrored into the mode's output directory. For a loose file
/// the extension is rewritten instead: `page.html` becomes
/// `page.min.html` or `page.pretty.html`.
pub fn output_path(
    path: &Path,
    root: Option<&Path>,
    config: &Config,
    mode: Mode,
) -> Result<PathBuf, FileError> {
    match root {
        Some(root) => {
            let relative = path.strip_prefix(root).map_err(|_| FileError::OutsideRoot {
                path: path.to_path_buf(),
                root: root.to_path_buf(),
            })?;
            let out_dir = match mode {
                Mode::Minify => config.output.minify_dir.as_str(),
                Mode::Prettify => config
                    .output
                    .prettify_dir
                    .as_deref()
                    .ok_or(FileError::NoOutputDir)?,
            };
            Ok(root.join(out_dir).join(relative))
        }
        None => {
            let marker = match mode {
                Mode::Minify => "min",
                Mode::Prettify => "pretty",
            };
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default();
            Ok(path.with_extension(format!("{}.{}", marker, ext)))
        }
    }
}

/// Write `contents` to `path`, creating parent directories as needed.
pub fn write_output(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}
