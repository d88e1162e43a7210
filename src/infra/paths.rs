// src/infra/paths.rs — Config location
//
// PROFICIENCYPRO_HOME overrides everything. When unset, config lives in
// ~/.proficiencypro/.

use std::path::PathBuf;

pub const HOME_ENV: &str = "PROFICIENCYPRO_HOME";

fn home_override() -> Option<PathBuf> {
    std::env::var_os(HOME_ENV).map(PathBuf::from)
}

/// Configuration directory: $PROFICIENCYPRO_HOME/ or ~/.proficiencypro/
pub fn config_dir() -> PathBuf {
    if let Some(home) = home_override() {
        return home;
    }
    match directories::BaseDirs::new() {
        Some(base) => base.home_dir().join(".proficiencypro"),
        // No resolvable home directory: fall back to the working directory.
        None => PathBuf::from(".proficiencypro"),
    }
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
