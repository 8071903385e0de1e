//! Configuration parsing and management.
//!
//! A project is marked by a `.webtidy.toml` at its root. Every section
//! and key is optional; missing keys fall back to the defaults below,
//! so an empty file is a valid configuration. The one exception is
//! `[threads]`, which has no default and must be spelled out in full
//! when present.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project configuration file
pub const CONFIG_FILE_NAME: &str = ".webtidy.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("No {CONFIG_FILE_NAME} found in {0:?} or any parent directory")]
    NotFound(PathBuf),
}

/// Top-level webtidy configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub html: HtmlConfig,
    pub css: CssConfig,
    pub javascript: JsConfig,
    pub output: OutputConfig,

    /// Regex patterns matched against root-relative paths; matching
    /// files are skipped during discovery
    pub ignore: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<ThreadsConfig>,
}

/// HTML formatting settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlConfig {
    /// Character used for one indent step
    pub indent_kind: IndentKind,

    /// Number of indent characters per nesting level
    pub indent_width: usize,

    /// Elements whose subtree stays on a single line when prettifying
    pub inline_tags: Vec<String>,

    /// Drop `<!-- -->` comments when minifying
    pub strip_comments: bool,

    /// Rewrite tags with normalized attribute spacing and quoting
    pub format_attributes: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            indent_kind: IndentKind::Space,
            indent_width: 2,
            inline_tags: default_inline_tags(),
            strip_comments: true,
            format_attributes: true,
        }
    }
}

impl HtmlConfig {
    /// One indent step as a string
    pub fn indent_unit(&self) -> String {
        self.indent_kind
            .as_char()
            .to_string()
            .repeat(self.indent_width)
    }

    /// Whether `tag` keeps its subtree on one line when prettifying
    pub fn is_inline_tag(&self, tag: &str) -> bool {
        self.inline_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Indentation character for prettified output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentKind {
    #[default]
    Space,
    Tab,
}

impl IndentKind {
    pub fn as_char(self) -> char {
        match self {
            IndentKind::Space => ' ',
            IndentKind::Tab => '\t',
        }
    }
}

/// CSS formatting settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CssConfig {
    /// Drop `/* */` comments when minifying
    pub strip_comments: bool,
}

impl Default for CssConfig {
    fn default() -> Self {
        Self {
            strip_comments: true,
        }
    }
}

/// JavaScript formatting settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsConfig {
    /// Drop `//` and `/* */` comments when minifying
    pub strip_comments: bool,
}

impl Default for JsConfig {
    fn default() -> Self {
        Self {
            strip_comments: true,
        }
    }
}

/// Output location settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory under the project root that receives minified output
    pub minify_dir: String,

    /// Directory for prettified output; absent means prettify in place
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prettify_dir: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            minify_dir: "minified".to_string(),
            prettify_dir: None,
        }
    }
}

/// Discussion thread server settings
///
/// The thread-id counter has no default. A project that wants thread
/// commands must state where numbering starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadsConfig {
    /// Base URL of the thread server, without a trailing path
    pub base_url: String,

    /// First id handed out by this project's thread client
    pub first_thread_id: u64,
}

/// Elements rendered inline by browsers; their subtrees stay on one
/// line so prettifying does not introduce whitespace into running text.
fn default_inline_tags() -> Vec<String> {
    [
        "a", "span", "b", "i", "em", "strong", "del", "sup", "sub", "ins", "bdi", "bdo",
        "cite", "code", "data", "kbd", "mark", "q", "rp", "rt", "ruby", "s", "samp",
        "small", "time", "u", "var",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Config {
    /// Load configuration from a specific file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Find and load configuration by walking up from `start`.
    ///
    /// Returns the configuration together with the project root, i.e.
    /// the directory containing the config file.
    pub fn find_from(start: &Path) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = crate::files::find_upwards(start, CONFIG_FILE_NAME)
            .ok_or_else(|| ConfigError::NotFound(start.to_path_buf()))?;
        let config = Self::load(&config_path)?;
        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));
        Ok((config, root))
    }
}
