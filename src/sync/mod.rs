//! Import and export pipelines against the remote workout library.
//!
//! # Import
//!
//! Local definitions are matched to remote workouts by exact name. A match is
//! updated in place, anything else is created. All payloads are rendered
//! before the first mutation, so a definition that cannot be converted stops
//! the run without touching the remote library.
//!
//! # Export
//!
//! Every remote workout is downloaded to `<dir>/<id>.fit`.
//!
//! Both pipelines stop at the first remote error. Mutations already made are
//! not rolled back.

mod error;
mod export;
mod import;

pub use export::run_export;
pub use import::{run_import, ImportReport};
