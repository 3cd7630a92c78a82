use std::path::{Path, PathBuf};

use super::error::SyncError;
use crate::garmin::WorkoutService;
use crate::models::RemoteId;

/// Where a workout's FIT file is written: `<dir>/<id>.fit`.
pub fn destination_path(dir: &Path, id: &RemoteId) -> PathBuf {
    dir.join(format!("{}.fit", id))
}

/// Downloads every remote workout into `dir`, in listing order.
///
/// `dir` must already exist and be writable. Stops at the first failed download
/// and returns the paths written so far on success.
pub fn run_export<S>(service: &S, dir: &Path) -> Result<Vec<PathBuf>, SyncError>
where
    S: WorkoutService + ?Sized,
{
    let listing = service.list_workouts()?;
    if listing.is_empty() {
        tracing::info!("No remote workouts to export");
        return Ok(Vec::new());
    }

    let mut written = Vec::with_capacity(listing.len());
    for summary in &listing {
        let path = destination_path(dir, &summary.id);
        service.download_workout(&summary.id, &path)?;
        tracing::info!(
            "Downloaded workout '{}' into '{}'",
            summary.name,
            path.display()
        );
        written.push(path);
    }

    Ok(written)
}
