//! Init command implementation.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use webtidy_core::CONFIG_FILE_NAME;

const DEFAULT_CONFIG: &str = include_str!("../../../.webtidy.toml.example");

/// Initialize a new webtidy project
pub fn init_project(path: Option<&Path>) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(root).with_context(|| format!("Failed to create {:?}", root))?;

    write_config(root)?;

    println!("✓ webtidy initialized in {:?}", root);
    println!("  - Edit {CONFIG_FILE_NAME} to customize formatting");
    println!("  - Run `webtidy minify` or `webtidy prettify` from anywhere in the project");
    Ok(())
}

fn write_config(root: &Path) -> Result<()> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        println!("{CONFIG_FILE_NAME} already exists at {:?}", config_path);
        return Ok(());
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {:?}", config_path))?;
    println!("Created {:?}", config_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use webtidy_core::Config;

    #[test]
    fn test_template_uncommented_values_match_defaults() {
        let parsed: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_init_writes_config_once() {
        let dir = tempdir().unwrap();
        init_project(Some(dir.path())).unwrap();

        let config_path = dir.path().join(CONFIG_FILE_NAME);
        let written = fs::read_to_string(&config_path).unwrap();
        assert!(written.contains("[html]"));

        // A second run must not clobber local edits.
        fs::write(&config_path, "ignore = [\"^docs/\"]\n").unwrap();
        init_project(Some(dir.path())).unwrap();
        let kept = fs::read_to_string(&config_path).unwrap();
        assert_eq!(kept, "ignore = [\"^docs/\"]\n");
    }
}
