//! Thread subcommand implementations.

use anyhow::{Context, Result};
use std::env;
use std::path::Path;

use webtidy_core::config::ThreadsConfig;
use webtidy_core::{Config, ConfigError, CONFIG_FILE_NAME};
use webtidy_threads::{Admin, ThreadClient, User};
use webtidy_types::{ThreadId, UserId};

/// Open a thread as a regular user.
pub async fn open_thread(
    config_path: Option<&Path>,
    base_url: Option<String>,
    first_id: Option<u64>,
    title: &str,
    content: &str,
) -> Result<()> {
    let settings = resolve_settings(config_path, base_url, first_id)?;
    let client = ThreadClient::new(settings.base_url, ThreadId::new(settings.first_id));
    let user = User::new(UserId::next());

    let id = user
        .open_thread(&client, title, content)
        .await
        .context("Failed to open thread")?;
    println!("Opened thread {}", id);
    Ok(())
}

/// Close a thread. Runs with admin capabilities, which regular users
/// do not have.
pub async fn close_thread(
    config_path: Option<&Path>,
    base_url: Option<String>,
    first_id: Option<u64>,
    id: u64,
) -> Result<()> {
    let settings = resolve_settings(config_path, base_url, first_id)?;
    let client = ThreadClient::new(settings.base_url, ThreadId::new(settings.first_id));
    let admin = Admin::new(UserId::next());

    admin
        .close_thread(&client, ThreadId::new(id))
        .await
        .context("Failed to close thread")?;
    println!("Closed thread {}", id);
    Ok(())
}

#[derive(Debug)]
struct ThreadSettings {
    base_url: String,
    first_id: u64,
}

/// Flags override the `[threads]` section; both the base URL and the
/// first id must come from somewhere, there are no built-in defaults.
fn resolve_settings(
    config_path: Option<&Path>,
    base_url: Option<String>,
    first_id: Option<u64>,
) -> Result<ThreadSettings> {
    let from_config = load_threads_config(config_path)?;

    let base_url = base_url.or_else(|| from_config.as_ref().map(|t| t.base_url.clone()));
    let first_id = first_id.or_else(|| from_config.as_ref().map(|t| t.first_thread_id));

    let Some(base_url) = base_url else {
        anyhow::bail!(
            "No thread server configured; set [threads] base_url in {CONFIG_FILE_NAME} \
             or pass --base-url"
        );
    };
    let Some(first_id) = first_id else {
        anyhow::bail!(
            "No first thread id configured; set [threads] first_thread_id in \
             {CONFIG_FILE_NAME} or pass --first-id"
        );
    };
    Ok(ThreadSettings { base_url, first_id })
}

fn load_threads_config(config_path: Option<&Path>) -> Result<Option<ThreadsConfig>> {
    let config = match config_path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => {
            let cwd = env::current_dir().context("Failed to read current directory")?;
            match Config::find_from(&cwd) {
                Ok((config, _)) => config,
                Err(ConfigError::NotFound(_)) => Config::default(),
                Err(e) => return Err(e).context(format!("Failed to load {CONFIG_FILE_NAME}")),
            }
        }
    };
    Ok(config.threads)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &config_path,
            "[threads]\nbase_url = \"http://localhost:4100\"\nfirst_thread_id = 10\n",
        )
        .unwrap();

        let settings = resolve_settings(Some(&config_path), None, None).unwrap();
        assert_eq!(settings.base_url, "http://localhost:4100");
        assert_eq!(settings.first_id, 10);

        let settings =
            resolve_settings(Some(&config_path), Some("http://other:9".into()), Some(3)).unwrap();
        assert_eq!(settings.base_url, "http://other:9");
        assert_eq!(settings.first_id, 3);
    }

    /// Config file without a `[threads]` section.
    fn bare_config() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, "ignore = []\n").unwrap();
        (dir, config_path)
    }

    #[test]
    fn test_missing_base_url_is_an_error() {
        let (_dir, config_path) = bare_config();
        let err = resolve_settings(Some(&config_path), None, Some(1)).unwrap_err();
        assert!(err.to_string().contains("--base-url"));
    }

    #[test]
    fn test_missing_first_id_is_an_error() {
        let (_dir, config_path) = bare_config();
        let err =
            resolve_settings(Some(&config_path), Some("http://localhost:4100".into()), None)
                .unwrap_err();
        assert!(err.to_string().contains("--first-id"));
    }
}
