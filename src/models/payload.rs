//! Rendering of workout definitions into Garmin Connect workout payloads.
//!
//! The payload mirrors the JSON the Garmin workout service accepts on
//! `POST /workout-service/workout` and `PUT /workout-service/workout/{id}`:
//! one segment holding executable steps and repeat groups.

use serde::Serialize;

use super::error::ModelError;
use super::remote::{RemoteId, RemoteWorkoutSummary};
use super::sport::Sport;
use super::workout::{EndCondition, Intensity, IntervalStep, Step, WorkoutDefinition};

/// Athlete-specific values used while rendering, supplied per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AthleteContext {
    /// Functional threshold power in watts
    pub threshold: i64,
}

impl AthleteContext {
    pub fn new(threshold: i64) -> Self {
        Self { threshold }
    }

    /// Resolves a fraction of threshold power to whole watts.
    ///
    /// Rounds half away from zero: 251 * 0.33 = 82.83 resolves to 83 W.
    pub fn resolve_percent(&self, pct: f64) -> Result<u32, ModelError> {
        if self.threshold <= 0 {
            return Err(ModelError::Conversion(format!(
                "threshold must be a positive number of watts, got {}",
                self.threshold
            )));
        }

        let watts = (self.threshold as f64 * pct).round();
        if !watts.is_finite() || watts < 1.0 || watts > u32::MAX as f64 {
            return Err(ModelError::Conversion(format!(
                "{:.1}% of {} W does not resolve to a positive target",
                pct * 100.0,
                self.threshold
            )));
        }
        Ok(watts as u32)
    }
}

/// Garmin workout payload. Built by [`render_payload`] and handed to a create
/// or update call as-is.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    workout_id: Option<RemoteId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    owner_id: Option<RemoteId>,
    workout_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    sport_type: SportTypeDto,
    workout_segments: Vec<SegmentDto>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
struct SportTypeDto {
    sport_type_id: u32,
    sport_type_key: &'static str,
}

impl From<Sport> for SportTypeDto {
    fn from(sport: Sport) -> Self {
        Self {
            sport_type_id: sport.id(),
            sport_type_key: sport.key(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SegmentDto {
    segment_order: u32,
    sport_type: SportTypeDto,
    workout_steps: Vec<StepDto>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
struct StepTypeDto {
    step_type_id: u32,
    step_type_key: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConditionTypeDto {
    condition_type_id: u32,
    condition_type_key: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
struct TargetTypeDto {
    workout_target_type_id: u32,
    workout_target_type_key: &'static str,
}

const REPEAT_STEP_TYPE: StepTypeDto = StepTypeDto {
    step_type_id: 6,
    step_type_key: "repeat",
};

const NO_TARGET: TargetTypeDto = TargetTypeDto {
    workout_target_type_id: 1,
    workout_target_type_key: "no.target",
};
const POWER_TARGET: TargetTypeDto = TargetTypeDto {
    workout_target_type_id: 2,
    workout_target_type_key: "power.zone",
};
const HEART_RATE_TARGET: TargetTypeDto = TargetTypeDto {
    workout_target_type_id: 4,
    workout_target_type_key: "heart.rate.zone",
};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
enum StepDto {
    #[serde(rename = "ExecutableStepDTO", rename_all = "camelCase")]
    Executable {
        step_order: u32,
        step_type: StepTypeDto,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        end_condition: ConditionTypeDto,
        #[serde(skip_serializing_if = "Option::is_none")]
        end_condition_value: Option<f64>,
        target_type: TargetTypeDto,
        #[serde(skip_serializing_if = "Option::is_none")]
        target_value_one: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        target_value_two: Option<u32>,
    },
    #[serde(rename = "RepeatGroupDTO", rename_all = "camelCase")]
    Repeat {
        step_order: u32,
        step_type: StepTypeDto,
        number_of_iterations: u32,
        smart_repeat: bool,
        end_condition: ConditionTypeDto,
        end_condition_value: f64,
        workout_steps: Vec<StepDto>,
    },
}

/// Renders a workout definition into a Garmin payload.
///
/// With `existing`, the payload embeds the remote workout's id and owner so the
/// service treats it as an update. Without it no identifiers are emitted.
pub fn render_payload(
    definition: &WorkoutDefinition,
    athlete: &AthleteContext,
    existing: Option<&RemoteWorkoutSummary>,
) -> Result<WorkoutPayload, ModelError> {
    let mut renderer = StepRenderer {
        sport: definition.sport,
        athlete,
        next_order: 1,
    };
    let workout_steps = renderer.render_steps(&definition.steps)?;

    Ok(WorkoutPayload {
        workout_id: existing.map(|w| w.id.clone()),
        owner_id: existing.map(|w| w.owner_id.clone()),
        workout_name: definition.canonical_name().to_string(),
        description: definition.description.clone(),
        sport_type: definition.sport.into(),
        workout_segments: vec![SegmentDto {
            segment_order: 1,
            sport_type: definition.sport.into(),
            workout_steps,
        }],
    })
}

/// Numbers steps depth-first across the whole segment.
struct StepRenderer<'a> {
    sport: Sport,
    athlete: &'a AthleteContext,
    next_order: u32,
}

impl StepRenderer<'_> {
    fn render_steps(&mut self, steps: &[Step]) -> Result<Vec<StepDto>, ModelError> {
        steps.iter().map(|step| self.render_step(step)).collect()
    }

    fn take_order(&mut self) -> u32 {
        let order = self.next_order;
        self.next_order += 1;
        order
    }

    fn render_step(&mut self, step: &Step) -> Result<StepDto, ModelError> {
        match step {
            Step::Interval(interval) => self.render_interval(interval),
            Step::Repeat { iterations, steps } => {
                let step_order = self.take_order();
                let workout_steps = self.render_steps(steps)?;
                Ok(StepDto::Repeat {
                    step_order,
                    step_type: REPEAT_STEP_TYPE,
                    number_of_iterations: *iterations,
                    smart_repeat: false,
                    end_condition: ConditionTypeDto {
                        condition_type_id: 7,
                        condition_type_key: "iterations",
                    },
                    end_condition_value: f64::from(*iterations),
                    workout_steps,
                })
            }
        }
    }

    fn render_interval(&mut self, step: &IntervalStep) -> Result<StepDto, ModelError> {
        let step_order = self.take_order();

        let (end_condition, end_condition_value) = match step.end {
            EndCondition::LapButton => (
                ConditionTypeDto {
                    condition_type_id: 1,
                    condition_type_key: "lap.button",
                },
                None,
            ),
            EndCondition::Time { seconds } => (
                ConditionTypeDto {
                    condition_type_id: 2,
                    condition_type_key: "time",
                },
                Some(f64::from(seconds)),
            ),
            EndCondition::Distance { meters } => (
                ConditionTypeDto {
                    condition_type_id: 3,
                    condition_type_key: "distance",
                },
                Some(meters),
            ),
        };

        let (target_type, value) = match step.target {
            None => (NO_TARGET, None),
            Some(target) if target.is_power() && !self.sport.supports_power() => {
                return Err(ModelError::Conversion(format!(
                    "step {}: power targets cannot be rendered for {} workouts",
                    step_order, self.sport
                )));
            }
            Some(Intensity::PowerPercent(pct)) => {
                let watts = self.athlete.resolve_percent(pct).map_err(|e| match e {
                    ModelError::Conversion(msg) => {
                        ModelError::Conversion(format!("step {}: {}", step_order, msg))
                    }
                    other => other,
                })?;
                (POWER_TARGET, Some(watts))
            }
            Some(Intensity::PowerWatts(watts)) => (POWER_TARGET, Some(watts)),
            Some(Intensity::HeartRate(bpm)) => (HEART_RATE_TARGET, Some(bpm)),
        };

        Ok(StepDto::Executable {
            step_order,
            step_type: StepTypeDto {
                step_type_id: step.kind.id(),
                step_type_key: step.kind.key(),
            },
            description: step.notes.clone(),
            end_condition,
            end_condition_value,
            target_type,
            target_value_one: value,
            target_value_two: value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StepKind;
    use serde_json::{json, Value};

    fn interval(end: EndCondition, target: Option<Intensity>) -> Step {
        Step::Interval(IntervalStep {
            kind: StepKind::Interval,
            end,
            target,
            notes: None,
        })
    }

    fn workout(sport: Sport, steps: Vec<Step>) -> WorkoutDefinition {
        WorkoutDefinition {
            name: "Test".to_string(),
            description: None,
            sport,
            steps,
        }
    }

    fn render_json(def: &WorkoutDefinition, threshold: i64) -> Value {
        let payload = render_payload(def, &AthleteContext::new(threshold), None).unwrap();
        serde_json::to_value(&payload).unwrap()
    }

    fn percent_workout(pct: f64) -> WorkoutDefinition {
        workout(
            Sport::Cycling,
            vec![interval(
                EndCondition::Time { seconds: 600 },
                Some(Intensity::PowerPercent(pct)),
            )],
        )
    }

    #[test]
    fn test_resolve_percent_rounding() {
        let athlete = AthleteContext::new(250);
        assert_eq!(athlete.resolve_percent(0.8).unwrap(), 200);

        let athlete = AthleteContext::new(251);
        assert_eq!(athlete.resolve_percent(0.33).unwrap(), 83);

        // exactly half a watt rounds up
        let athlete = AthleteContext::new(201);
        assert_eq!(athlete.resolve_percent(0.5).unwrap(), 101);
    }

    #[test]
    fn test_resolve_percent_rejects_non_positive_threshold() {
        for threshold in [0, -5] {
            let err = AthleteContext::new(threshold)
                .resolve_percent(0.8)
                .unwrap_err();
            assert!(matches!(err, ModelError::Conversion(_)));
        }
    }

    #[test]
    fn test_resolve_percent_rejects_zero_watts() {
        let err = AthleteContext::new(1).resolve_percent(0.2).unwrap_err();
        assert_eq!(
            err,
            ModelError::Conversion("20.0% of 1 W does not resolve to a positive target".into())
        );
    }

    #[test]
    fn test_render_percent_target() {
        let value = render_json(&percent_workout(0.8), 250);
        let step = &value["workoutSegments"][0]["workoutSteps"][0];

        assert_eq!(step["type"], "ExecutableStepDTO");
        assert_eq!(step["targetType"]["workoutTargetTypeKey"], "power.zone");
        assert_eq!(step["targetValueOne"], 200);
        assert_eq!(step["targetValueTwo"], 200);
        assert_eq!(step["endCondition"]["conditionTypeKey"], "time");
        assert_eq!(step["endConditionValue"], 600.0);
    }

    #[test]
    fn test_render_create_omits_identifiers() {
        let value = render_json(&percent_workout(0.5), 200);
        let object = value.as_object().unwrap();

        assert!(!object.contains_key("workoutId"));
        assert!(!object.contains_key("ownerId"));
        assert_eq!(value["workoutName"], "Test");
        assert_eq!(
            value["sportType"],
            json!({"sportTypeId": 2, "sportTypeKey": "cycling"})
        );
    }

    #[test]
    fn test_render_update_embeds_identifiers() {
        let existing = RemoteWorkoutSummary::new(7, "u1", "Test");
        let payload = render_payload(
            &percent_workout(0.5),
            &AthleteContext::new(200),
            Some(&existing),
        )
        .unwrap();

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["workoutId"], 7);
        assert_eq!(value["ownerId"], "u1");
    }

    #[test]
    fn test_absolute_targets_ignore_threshold() {
        let def = workout(
            Sport::Running,
            vec![
                interval(
                    EndCondition::Distance { meters: 1000.0 },
                    Some(Intensity::PowerWatts(300)),
                ),
                interval(EndCondition::LapButton, Some(Intensity::HeartRate(145))),
                interval(EndCondition::LapButton, None),
            ],
        );

        for threshold in [0, -5, 250] {
            let value = render_json(&def, threshold);
            let steps = &value["workoutSegments"][0]["workoutSteps"];

            assert_eq!(steps[0]["targetValueOne"], 300);
            assert_eq!(steps[0]["endConditionValue"], 1000.0);
            assert_eq!(
                steps[1]["targetType"]["workoutTargetTypeKey"],
                "heart.rate.zone"
            );
            assert_eq!(steps[1]["endCondition"]["conditionTypeKey"], "lap.button");
            assert!(steps[1].get("endConditionValue").is_none());
            assert_eq!(steps[2]["targetType"]["workoutTargetTypeKey"], "no.target");
            assert!(steps[2].get("targetValueOne").is_none());
        }
    }

    #[test]
    fn test_percent_target_with_bad_threshold_fails() {
        for threshold in [0, -5] {
            let err = render_payload(
                &percent_workout(0.75),
                &AthleteContext::new(threshold),
                None,
            )
            .unwrap_err();
            assert!(matches!(err, ModelError::Conversion(_)));
        }
    }

    #[test]
    fn test_power_target_for_swimming_fails() {
        let def = workout(
            Sport::Swimming,
            vec![interval(
                EndCondition::Distance { meters: 100.0 },
                Some(Intensity::PowerWatts(200)),
            )],
        );
        let err = render_payload(&def, &AthleteContext::new(250), None).unwrap_err();
        assert!(matches!(err, ModelError::Conversion(_)));
        assert!(err.to_string().contains("swimming"));
    }

    #[test]
    fn test_repeat_group_rendering_and_step_order() {
        let def = workout(
            Sport::Cycling,
            vec![
                interval(EndCondition::Time { seconds: 600 }, None),
                Step::Repeat {
                    iterations: 3,
                    steps: vec![
                        interval(
                            EndCondition::Time { seconds: 300 },
                            Some(Intensity::PowerPercent(1.0)),
                        ),
                        interval(EndCondition::Time { seconds: 120 }, None),
                    ],
                },
                interval(EndCondition::LapButton, None),
            ],
        );
        let value = render_json(&def, 280);
        let steps = &value["workoutSegments"][0]["workoutSteps"];

        assert_eq!(steps[0]["stepOrder"], 1);
        assert_eq!(steps[1]["type"], "RepeatGroupDTO");
        assert_eq!(steps[1]["stepOrder"], 2);
        assert_eq!(steps[1]["numberOfIterations"], 3);
        assert_eq!(steps[1]["stepType"]["stepTypeKey"], "repeat");
        assert_eq!(steps[1]["workoutSteps"][0]["stepOrder"], 3);
        assert_eq!(steps[1]["workoutSteps"][0]["targetValueOne"], 280);
        assert_eq!(steps[1]["workoutSteps"][1]["stepOrder"], 4);
        assert_eq!(steps[2]["stepOrder"], 5);
    }
}
