//! Core formatting library for webtidy.
//!
//! Everything needed to minify or prettify a tree of web assets:
//! configuration loading, file discovery, the per-language formatters
//! and the pipeline that ties them together. The CLI is a thin layer
//! over [`Pipeline`]; the formatters are usable directly through
//! [`format_source`] for callers that already hold source text.

pub mod config;
pub mod files;
pub mod format;
pub mod options;
pub mod pipeline;

pub use config::{Config, ConfigError, IndentKind, CONFIG_FILE_NAME};
pub use files::FileError;
pub use format::FormatError;
pub use options::{OptionBuilder, OptionMap, StringOptionBuilder};
pub use pipeline::{
    format_source, FileKind, FormatReport, Mode, Pipeline, PipelineError, WriteTarget,
};
