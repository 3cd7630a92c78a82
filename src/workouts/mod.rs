//! Local workout definition files.
//!
//! Reads YAML definitions from disk into [`RawWorkout`] records. Only the
//! document shape is checked here; field semantics are validated by
//! [`crate::models::WorkoutDefinition::normalize`].

mod loader;
mod raw;

pub use loader::{expand_pattern, read, LoadError};
pub use raw::{RawStep, RawWorkout};
#[cfg(test)]
pub use raw::RawDuration;
