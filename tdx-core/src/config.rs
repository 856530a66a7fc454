//! tdx configuration: config file, `TDX_*` environment variables, defaults.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{TdxError, TdxResult};

static DEFAULT_VDIR_PATH: &str = "~/.local/share/calendars";
static DEFAULT_STATUS: &str = "NEEDS-ACTION";
static DEFAULT_SORT: &str = "status,priority";
static ENV_PREFIX: &str = "TDX";

fn default_vdir_path() -> PathBuf {
    PathBuf::from(DEFAULT_VDIR_PATH)
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

fn default_sort() -> String {
    DEFAULT_SORT.to_string()
}

/// Configuration at ~/.config/tdx/config.toml, overridden by `TDX_*`
/// environment variables (`TDX_PATH`, `TDX_LIST`, `TDX_LIST_OPTS`, ...).
///
/// Command-line flags override both; that layer lives in the CLI.
#[derive(Debug, Deserialize, Clone)]
pub struct TdxConfig {
    /// Root of the vdir.
    #[serde(default = "default_vdir_path")]
    pub path: PathBuf,

    /// Default collection for new todos.
    pub list: Option<String>,

    /// Default status filter for `list`.
    #[serde(default = "default_status")]
    pub status: String,

    /// Default sort keys for `list`, comma separated.
    #[serde(default = "default_sort")]
    pub sort: String,

    /// Arguments prepended to every `list` invocation.
    pub list_opts: Option<String>,

    /// Arguments prepended to every `add` invocation.
    pub add_opts: Option<String>,
}

impl Default for TdxConfig {
    fn default() -> Self {
        TdxConfig {
            path: default_vdir_path(),
            list: None,
            status: default_status(),
            sort: default_sort(),
            list_opts: None,
            add_opts: None,
        }
    }
}

impl TdxConfig {
    pub fn config_path() -> TdxResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TdxError::Config("Could not determine config directory".into()))?
            .join("tdx");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default config file location and the environment.
    pub fn load() -> TdxResult<Self> {
        Self::load_from(&Self::config_path()?, ENV_PREFIX)
    }

    /// Load from `config_path` (if it exists) and variables prefixed with
    /// `env_prefix`.
    pub fn load_from(config_path: &Path, env_prefix: &str) -> TdxResult<Self> {
        Config::builder()
            .add_source(File::from(config_path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix(env_prefix))
            .build()
            .map_err(|e| TdxError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| TdxError::Config(e.to_string()))
    }

    /// The vdir root with `~` expanded.
    pub fn vdir_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.path.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const UNUSED_PREFIX: &str = "TDX_CONFIG_TEST_UNSET";

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = TdxConfig::load_from(&dir.path().join("config.toml"), UNUSED_PREFIX).unwrap();

        assert_eq!(config.path, PathBuf::from("~/.local/share/calendars"));
        assert_eq!(config.status, "NEEDS-ACTION");
        assert_eq!(config.sort, "status,priority");
        assert!(config.list.is_none());
    }

    #[test]
    fn test_file_values_override_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "path = \"/tmp/cals\"\nlist = \"work\"\nlist_opts = \"--due 7\"\n",
        )
        .unwrap();

        let config = TdxConfig::load_from(&path, UNUSED_PREFIX).unwrap();
        assert_eq!(config.path, PathBuf::from("/tmp/cals"));
        assert_eq!(config.list.as_deref(), Some("work"));
        assert_eq!(config.list_opts.as_deref(), Some("--due 7"));
        assert_eq!(config.status, "NEEDS-ACTION");
    }

    #[test]
    fn test_vdir_path_expands_tilde() {
        let config = TdxConfig::default();
        assert!(!config.vdir_path().to_string_lossy().starts_with('~'));
    }
}
