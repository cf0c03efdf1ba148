//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use storescan_commerce::runtime::EventLoop;
use storescan_commerce::session::SessionState;
use storescan_data::{FetchClient, HttpStoreApi};

use crate::config::CliConfig;
use crate::output::Output;

/// Config file names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["storescan.toml", ".storescan.toml", "storescan.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// Effective configuration, environment overrides applied.
    pub config: CliConfig,
    pub output: Output,
    pub cwd: PathBuf,
    /// File the config was read from, if any.
    pub config_path: Option<PathBuf>,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => (CliConfig::load(path)?, Some(PathBuf::from(path))),
            None => match find_config(&cwd) {
                Some(path) => {
                    let config = CliConfig::load(&path.to_string_lossy())?;
                    (config, Some(path))
                }
                None => (CliConfig::default(), None),
            },
        };
        tracing::debug!(path = ?config_path, "configuration loaded");

        Ok(Self {
            config: config.with_env(),
            output,
            cwd,
            config_path,
        })
    }

    /// Build the HTTP backend from the effective configuration.
    pub fn store_api(&self) -> Result<HttpStoreApi> {
        let client = FetchClient::new()
            .with_base_url(self.config.api.base_url.clone())
            .with_default_header("User-Agent", concat!("storescan/", env!("CARGO_PKG_VERSION")));
        Ok(HttpStoreApi::new(client)
            .with_mobile(self.config.api.mobile.clone())
            .with_currency(self.config.currency()?))
    }

    /// A fresh session wired to the HTTP backend.
    pub fn event_loop(&self) -> Result<EventLoop> {
        let api = self.store_api()?;
        let state = SessionState::new(self.config.currency()?);
        Ok(EventLoop::new(Arc::new(api), state))
    }
}

/// Find the nearest config file in `start` or its ancestors.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("storescan-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_find_config_walks_up() {
        let root = scratch_dir("walk");
        let nested = root.join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.join(".storescan.toml"), "").unwrap();

        assert_eq!(find_config(&nested), Some(root.join(".storescan.toml")));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_find_config_prefers_toml_in_same_dir() {
        let root = scratch_dir("prefer");
        std::fs::write(root.join("storescan.json"), "{}").unwrap();
        std::fs::write(root.join("storescan.toml"), "").unwrap();

        assert_eq!(find_config(&root), Some(root.join("storescan.toml")));
        let _ = std::fs::remove_dir_all(&root);
    }
}
