use std::path::PathBuf;

use thiserror::Error;

use crate::garmin::RemoteError;
use crate::models::ModelError;
use crate::workouts::LoadError;

/// Errors that stop an import or export run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Workout file unreadable or not valid YAML
    #[error(transparent)]
    Load(#[from] LoadError),
    /// Workout file parsed but failed validation
    #[error("{}: {source}", path.display())]
    Definition {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
    /// Workout could not be rendered into a payload
    #[error("Workout '{name}': {source}")]
    Conversion {
        name: String,
        #[source]
        source: ModelError,
    },
    #[error(transparent)]
    Remote(#[from] RemoteError),
}
