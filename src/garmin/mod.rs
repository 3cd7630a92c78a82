//! Garmin Connect workout service.
//!
//! [`WorkoutService`] is the seam between the import/export pipelines and the
//! remote workout library. [`GarminSession`] is the HTTP implementation; tests
//! use an in-memory fake.

mod client;
mod error;
#[cfg(test)]
pub mod fake;

use std::path::Path;

use crate::models::{RemoteId, RemoteWorkoutSummary, WorkoutPayload};

pub use client::GarminSession;
pub use error::RemoteError;

/// Operations the pipelines need from the remote workout library.
///
/// Calls are blocking and made one at a time.
pub trait WorkoutService {
    /// Full snapshot of the remote workout library, in listing order.
    fn list_workouts(&self) -> Result<Vec<RemoteWorkoutSummary>, RemoteError>;

    /// Creates a new workout. Returns the new id when the service reports one.
    fn create_workout(&self, payload: &WorkoutPayload) -> Result<Option<RemoteId>, RemoteError>;

    /// Replaces an existing workout.
    fn update_workout(&self, id: &RemoteId, payload: &WorkoutPayload) -> Result<(), RemoteError>;

    /// Downloads a workout as a FIT file written to `destination`.
    fn download_workout(&self, id: &RemoteId, destination: &Path) -> Result<(), RemoteError>;
}

impl<T: WorkoutService + ?Sized> WorkoutService for &T {
    fn list_workouts(&self) -> Result<Vec<RemoteWorkoutSummary>, RemoteError> {
        (**self).list_workouts()
    }

    fn create_workout(&self, payload: &WorkoutPayload) -> Result<Option<RemoteId>, RemoteError> {
        (**self).create_workout(payload)
    }

    fn update_workout(&self, id: &RemoteId, payload: &WorkoutPayload) -> Result<(), RemoteError> {
        (**self).update_workout(id, payload)
    }

    fn download_workout(&self, id: &RemoteId, destination: &Path) -> Result<(), RemoteError> {
        (**self).download_workout(id, destination)
    }
}
