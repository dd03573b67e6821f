pub mod check;
pub mod init;
pub mod run;

use std::path::{Path, PathBuf};

use chatrelay_config::{AppConfig, ConfigError};

/// Load from `path` if given, else from the default location.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => AppConfig::load_with_env(path),
        None => AppConfig::load(),
    }
}

/// Where `init` writes and `run`/`check` read by default.
pub fn config_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"))
}
