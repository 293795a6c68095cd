use std::fs;
use std::path::{Path, PathBuf};

use sim_core::ReignParams;
use tracing::info;

use crate::PersistenceError;

/// Rules file looked up in the working directory when none is given.
pub fn default_rules_path() -> PathBuf {
    PathBuf::from("game_rules.txt")
}

/// Read and validate a rules file. Nothing is returned unless every key is
/// present and in range.
pub fn load_rules(path: impl AsRef<Path>) -> Result<ReignParams, PersistenceError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let params = ReignParams::from_rules_text(&text).map_err(|source| PersistenceError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), years = params.total_years, "rules loaded");
    Ok(params)
}
