use std::path::{Path, PathBuf};

use thiserror::Error;

use super::raw::RawWorkout;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Invalid workout pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("Failed to read workout file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse workout file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Reads one workout definition file.
pub fn read(path: &Path) -> Result<RawWorkout, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Expands a glob pattern into the matching workout files, in path order.
///
/// A pattern that matches nothing yields an empty list. Directories are skipped.
pub fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>, LoadError> {
    let entries = glob::glob(pattern).map_err(|source| LoadError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| LoadError::Read {
            path: e.path().to_path_buf(),
            source: e.into(),
        })?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    tracing::debug!("Pattern '{}' matched {} file(s)", pattern, paths.len());
    Ok(paths)
}
