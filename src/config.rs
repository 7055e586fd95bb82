//! Locating, reading and writing the credentials file.
//!
//! The file is INI formatted and holds a single token:
//!
//! ```ini
//! [github]
//! token=...
//! ```

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::Result;
use ini::Ini;
use log::debug;

use crate::utils::expand_home;

pub const DEFAULT_CONFIG_FILE: &str = ".ghconfig";
pub const SECTION: &str = "github";
pub const TOKEN_KEY: &str = "token";

/// The default credentials file, `$HOME/.ghconfig`
pub fn default_config_path() -> Result<PathBuf> {
    match dirs::home_dir() {
        Some(home) => Ok(home.join(DEFAULT_CONFIG_FILE)),
        None => Err(anyhow::anyhow!(
            "Unable to determine the home directory, please pass -c/--config"
        )),
    }
}

/// Resolve the credentials file path from the `--config` option, falling back to the default
pub fn resolve_config_path(config_path: Option<&Path>) -> Result<PathBuf> {
    match config_path {
        Some(path) => Ok(expand_home(path)),
        None => default_config_path(),
    }
}

/// Whether `path` is an existing file we can both read and write
pub fn is_read_write(path: &Path) -> bool {
    path.is_file()
        && OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .is_ok()
}

/// Read `[github].token`, `None` if the file has no token
pub fn read_token(path: &Path) -> Result<Option<String>> {
    debug!("Reading credentials from {}", path.display());
    let conf = Ini::load_from_file(path)?;
    Ok(conf.get_from(Some(SECTION), TOKEN_KEY).map(str::to_owned))
}

/// Write `token` as the only content of the credentials file, truncating what was there
pub fn write_token(path: &Path, token: &str) -> Result<()> {
    debug!("Writing credentials to {}", path.display());
    let mut conf = Ini::new();
    conf.with_section(Some(SECTION)).set(TOKEN_KEY, token);
    conf.write_to_file(path)?;
    Ok(())
}
