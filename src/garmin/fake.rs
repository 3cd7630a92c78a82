//! In-memory [`WorkoutService`] that records every call.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{RemoteError, WorkoutService};
use crate::models::{RemoteId, RemoteWorkoutSummary, WorkoutPayload};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    Create(Value),
    Update(RemoteId, Value),
    Download(RemoteId, PathBuf),
}

#[derive(Default)]
pub struct FakeService {
    listing: Vec<RemoteWorkoutSummary>,
    /// Zero-based index of the create/update/download call that fails
    fail_at: Option<usize>,
    fail_listing: bool,
    calls: RefCell<Vec<Call>>,
}

impl FakeService {
    pub fn new(listing: Vec<RemoteWorkoutSummary>) -> Self {
        Self {
            listing,
            ..Default::default()
        }
    }

    pub fn failing_at(mut self, mutation: usize) -> Self {
        self.fail_at = Some(mutation);
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| *call != Call::List)
            .collect()
    }

    fn record(&self, call: Call) -> Result<(), RemoteError> {
        let mut calls = self.calls.borrow_mut();
        let index = calls.iter().filter(|c| **c != Call::List).count();
        calls.push(call);
        if self.fail_at == Some(index) {
            return Err(RemoteError::Status {
                status: 500,
                body: "simulated failure".to_string(),
            });
        }
        Ok(())
    }
}

impl WorkoutService for FakeService {
    fn list_workouts(&self) -> Result<Vec<RemoteWorkoutSummary>, RemoteError> {
        self.calls.borrow_mut().push(Call::List);
        if self.fail_listing {
            return Err(RemoteError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(self.listing.clone())
    }

    fn create_workout(&self, payload: &WorkoutPayload) -> Result<Option<RemoteId>, RemoteError> {
        let value = serde_json::to_value(payload).map_err(|e| RemoteError::Decode(e.to_string()))?;
        self.record(Call::Create(value))?;
        Ok(None)
    }

    fn update_workout(&self, id: &RemoteId, payload: &WorkoutPayload) -> Result<(), RemoteError> {
        let value = serde_json::to_value(payload).map_err(|e| RemoteError::Decode(e.to_string()))?;
        self.record(Call::Update(id.clone(), value))
    }

    fn download_workout(&self, id: &RemoteId, destination: &Path) -> Result<(), RemoteError> {
        self.record(Call::Download(id.clone(), destination.to_path_buf()))
    }
}
