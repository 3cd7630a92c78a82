use std::fmt;
use std::str::FromStr;

use super::error::ModelError;
use super::sport::Sport;
use super::step_kind::StepKind;
use crate::workouts::{RawStep, RawWorkout};

/// A validated, structured workout loaded from a local definition file.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutDefinition {
    pub name: String,
    pub description: Option<String>,
    pub sport: Sport,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Interval(IntervalStep),
    Repeat { iterations: u32, steps: Vec<Step> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntervalStep {
    pub kind: StepKind,
    pub end: EndCondition,
    pub target: Option<Intensity>,
    pub notes: Option<String>,
}

/// What ends a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EndCondition {
    Time { seconds: u32 },
    Distance { meters: f64 },
    LapButton,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intensity {
    /// Fraction of the athlete's threshold power (0.75 = 75%)
    PowerPercent(f64),
    PowerWatts(u32),
    /// Beats per minute
    HeartRate(u32),
}

impl Intensity {
    pub fn is_power(&self) -> bool {
        matches!(self, Intensity::PowerPercent(_) | Intensity::PowerWatts(_))
    }
}

impl WorkoutDefinition {
    /// Validates a raw definition and converts it into a workout.
    pub fn normalize(raw: RawWorkout) -> Result<Self, ModelError> {
        let name = match raw.name {
            Some(name) if !name.trim().is_empty() => name,
            Some(_) => return Err(ModelError::Validation("workout name is blank".into())),
            None => return Err(ModelError::Validation("missing workout name".into())),
        };

        let sport = match raw.sport.as_deref() {
            Some(sport) => Sport::from_str(sport).map_err(ModelError::Schema)?,
            None => Sport::default(),
        };

        let raw_steps = raw.steps.unwrap_or_default();
        if raw_steps.is_empty() {
            return Err(ModelError::Validation(format!(
                "workout '{}' has no steps",
                name
            )));
        }

        let steps = normalize_steps(raw_steps, "")?;

        Ok(Self {
            name,
            description: raw.description,
            sport,
            steps,
        })
    }

    /// The key used to match this workout against remote workouts.
    ///
    /// The raw name, verbatim: no case folding or trimming.
    pub fn canonical_name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for WorkoutDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {} step", self.name, self.sport, self.steps.len())?;
        if self.steps.len() != 1 {
            write!(f, "s")?;
        }
        write!(f, ")")
    }
}

fn normalize_steps(raw_steps: Vec<RawStep>, prefix: &str) -> Result<Vec<Step>, ModelError> {
    raw_steps
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            let label = format!("{}{}", prefix, i + 1);
            normalize_step(raw, &label)
        })
        .collect()
}

fn normalize_step(raw: RawStep, label: &str) -> Result<Step, ModelError> {
    if let Some(iterations) = raw.repeat {
        return normalize_repeat(raw, iterations, label);
    }

    if raw.steps.is_some() {
        return Err(ModelError::Validation(format!(
            "step {}: nested steps require 'repeat'",
            label
        )));
    }

    let step_type = raw
        .step_type
        .as_deref()
        .ok_or_else(|| ModelError::Validation(format!("step {}: missing type", label)))?;

    let end = match step_type {
        "time" => {
            reject_fields(label, "a time step", &[("distance", raw.distance.is_some())])?;
            let seconds = raw
                .duration
                .as_ref()
                .ok_or_else(|| {
                    ModelError::Validation(format!("step {}: time step needs a duration", label))
                })?
                .to_seconds()
                .ok_or_else(|| {
                    ModelError::Validation(format!(
                        "step {}: duration must be seconds or [h:]mm:ss",
                        label
                    ))
                })?;
            if seconds == 0 {
                return Err(ModelError::Validation(format!(
                    "step {}: duration must be positive",
                    label
                )));
            }
            EndCondition::Time { seconds }
        }
        "distance" => {
            reject_fields(label, "a distance step", &[("duration", raw.duration.is_some())])?;
            let meters = raw.distance.ok_or_else(|| {
                ModelError::Validation(format!(
                    "step {}: distance step needs a distance",
                    label
                ))
            })?;
            if !meters.is_finite() || meters <= 0.0 {
                return Err(ModelError::Validation(format!(
                    "step {}: distance must be positive",
                    label
                )));
            }
            EndCondition::Distance { meters }
        }
        "lap" => {
            reject_fields(
                label,
                "a lap step",
                &[
                    ("duration", raw.duration.is_some()),
                    ("distance", raw.distance.is_some()),
                ],
            )?;
            EndCondition::LapButton
        }
        other => {
            return Err(ModelError::Schema(format!(
                "step {}: unrecognized step type '{}'. Valid options: time, distance, lap",
                label, other
            )))
        }
    };

    let kind = match raw.kind.as_deref() {
        Some(kind) => StepKind::from_str(kind)
            .map_err(|e| ModelError::Schema(format!("step {}: {}", label, e)))?,
        None => StepKind::default(),
    };

    let target = normalize_target(&raw, label)?;

    Ok(Step::Interval(IntervalStep {
        kind,
        end,
        target,
        notes: raw.notes,
    }))
}

fn normalize_repeat(raw: RawStep, iterations: u32, label: &str) -> Result<Step, ModelError> {
    if raw.step_type.is_some() {
        return Err(ModelError::Validation(format!(
            "step {}: a repeat group cannot have a type",
            label
        )));
    }
    reject_fields(
        label,
        "a repeat group",
        &[
            ("kind", raw.kind.is_some()),
            ("duration", raw.duration.is_some()),
            ("distance", raw.distance.is_some()),
            ("target_pct", raw.target_pct.is_some()),
            ("target_watts", raw.target_watts.is_some()),
            ("target_hr", raw.target_hr.is_some()),
            ("notes", raw.notes.is_some()),
        ],
    )?;
    if iterations == 0 {
        return Err(ModelError::Validation(format!(
            "step {}: repeat count must be at least 1",
            label
        )));
    }

    let children = raw.steps.unwrap_or_default();
    if children.is_empty() {
        return Err(ModelError::Validation(format!(
            "step {}: repeat group has no steps",
            label
        )));
    }

    let steps = normalize_steps(children, &format!("{}.", label))?;
    Ok(Step::Repeat { iterations, steps })
}

/// Fails on the first field that is set but has no meaning for `context`.
fn reject_fields(label: &str, context: &str, fields: &[(&str, bool)]) -> Result<(), ModelError> {
    match fields.iter().find(|(_, set)| *set) {
        Some((field, _)) => Err(ModelError::Validation(format!(
            "step {}: '{}' is not allowed on {}",
            label, field, context
        ))),
        None => Ok(()),
    }
}

fn normalize_target(raw: &RawStep, label: &str) -> Result<Option<Intensity>, ModelError> {
    let given = [
        raw.target_pct.is_some(),
        raw.target_watts.is_some(),
        raw.target_hr.is_some(),
    ]
    .iter()
    .filter(|set| **set)
    .count();
    if given > 1 {
        return Err(ModelError::Validation(format!(
            "step {}: only one of target_pct, target_watts, target_hr may be set",
            label
        )));
    }

    if let Some(pct) = raw.target_pct {
        if !pct.is_finite() || pct <= 0.0 {
            return Err(ModelError::Validation(format!(
                "step {}: target_pct must be positive, got {}",
                label, pct
            )));
        }
        return Ok(Some(Intensity::PowerPercent(pct)));
    }
    if let Some(watts) = raw.target_watts {
        if watts == 0 {
            return Err(ModelError::Validation(format!(
                "step {}: target_watts must be positive",
                label
            )));
        }
        return Ok(Some(Intensity::PowerWatts(watts)));
    }
    if let Some(bpm) = raw.target_hr {
        if bpm == 0 {
            return Err(ModelError::Validation(format!(
                "step {}: target_hr must be positive",
                label
            )));
        }
        return Ok(Some(Intensity::HeartRate(bpm)));
    }

    Ok(None)
}
