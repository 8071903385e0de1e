//! Minify and prettify command implementations.

use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

use webtidy_core::{Config, ConfigError, Mode, Pipeline, WriteTarget, CONFIG_FILE_NAME};

/// How a format run was invoked.
pub struct FormatOptions {
    pub mode: Mode,
    pub path: Option<PathBuf>,
    pub in_place: bool,
    pub config_path: Option<PathBuf>,
    pub use_defaults: bool,
}

/// Format a single file or every formattable file in the project
pub fn format_files(options: FormatOptions) -> Result<()> {
    let FormatOptions {
        mode,
        path,
        in_place,
        config_path,
        use_defaults,
    } = options;
    let target = if in_place {
        WriteTarget::InPlace
    } else {
        WriteTarget::OutputDir
    };

    match path {
        Some(file) => format_one(&file, mode, target, config_path.as_deref(), use_defaults),
        None => format_project(mode, target, config_path.as_deref(), use_defaults),
    }
}

fn format_one(
    file: &Path,
    mode: Mode,
    target: WriteTarget,
    config_path: Option<&Path>,
    use_defaults: bool,
) -> Result<()> {
    let config = single_file_config(config_path, use_defaults)?;
    let pipeline = Pipeline::new(config, mode, target);
    let written = pipeline
        .run_file(file, None)
        .with_context(|| format!("Failed to format {:?}", file))?;

    match target {
        WriteTarget::InPlace => println!("Formatted {}", file.display()),
        WriteTarget::OutputDir => {
            println!("Formatted {} -> {}", file.display(), written.display())
        }
    }
    Ok(())
}

fn format_project(
    mode: Mode,
    target: WriteTarget,
    config_path: Option<&Path>,
    use_defaults: bool,
) -> Result<()> {
    let (config, root) = project_config(config_path, use_defaults)?;
    let pipeline = Pipeline::new(config, mode, target);
    let report = pipeline.run_all(&root);

    let label = match mode {
        Mode::Minify => "Minified",
        Mode::Prettify => "Prettified",
    };
    println!("{} {} files", label, report.formatted);
    if !report.success() {
        for (path, message) in &report.failed {
            eprintln!("  {}: {}", path.display(), message);
        }
        anyhow::bail!("{} files failed to format", report.failed.len());
    }
    Ok(())
}

/// Config for a loose file. Missing project markers are fine here, the
/// defaults apply.
fn single_file_config(config_path: Option<&Path>, use_defaults: bool) -> Result<Config> {
    if let Some(path) = config_path {
        return Config::load(path)
            .with_context(|| format!("Failed to load config from {:?}", path));
    }
    if use_defaults {
        return Ok(Config::default());
    }
    let cwd = env::current_dir().context("Failed to read current directory")?;
    match Config::find_from(&cwd) {
        Ok((config, _)) => Ok(config),
        Err(ConfigError::NotFound(_)) => Ok(Config::default()),
        Err(e) => Err(e).context("Failed to load project config"),
    }
}

/// Config plus project root for a whole-project run. The root anchors
/// ignore patterns and output directories, so a project marker is
/// required even with `--use-defaults`.
fn project_config(config_path: Option<&Path>, use_defaults: bool) -> Result<(Config, PathBuf)> {
    if let Some(path) = config_path {
        let config =
            Config::load(path).with_context(|| format!("Failed to load config from {:?}", path))?;
        let root = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => env::current_dir().context("Failed to read current directory")?,
        };
        return Ok((config, root));
    }

    let cwd = env::current_dir().context("Failed to read current directory")?;
    let (config, root) = match Config::find_from(&cwd) {
        Ok(found) => found,
        Err(e @ ConfigError::NotFound(_)) => {
            return Err(e).context("Run `webtidy init` to create a project")
        }
        Err(e) => return Err(e).context(format!("Failed to load {CONFIG_FILE_NAME}")),
    };
    if use_defaults {
        return Ok((Config::default(), root));
    }
    Ok((config, root))
}
