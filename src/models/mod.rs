mod error;
mod payload;
mod remote;
mod sport;
mod step_kind;
mod workout;

pub use error::ModelError;
pub use payload::{render_payload, AthleteContext, WorkoutPayload};
pub use remote::{RemoteId, RemoteIndex, RemoteWorkoutSummary};
pub use workout::WorkoutDefinition;
#[cfg(test)]
pub use sport::Sport;
#[cfg(test)]
pub use step_kind::StepKind;
#[cfg(test)]
pub use workout::{EndCondition, Intensity, IntervalStep, Step};
