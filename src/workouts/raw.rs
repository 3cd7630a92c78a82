use serde::Deserialize;

/// Workout definition as written in a YAML file, before validation.
///
/// ```yaml
/// name: Sweet Spot 2x20
/// sport: cycling
/// steps:
///   - { type: time, kind: warmup, duration: "10:00", target_pct: 0.55 }
///   - repeat: 2
///     steps:
///       - { type: time, duration: 1200, target_pct: 0.9 }
///       - { type: time, kind: recovery, duration: 300, target_watts: 120 }
///   - { type: lap, kind: cooldown }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawWorkout {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sport: Option<String>,
    pub steps: Option<Vec<RawStep>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawStep {
    /// `time`, `distance` or `lap`
    #[serde(rename = "type")]
    pub step_type: Option<String>,
    pub kind: Option<String>,
    pub duration: Option<RawDuration>,
    /// Meters
    pub distance: Option<f64>,
    /// Fraction of threshold power
    pub target_pct: Option<f64>,
    pub target_watts: Option<u32>,
    pub target_hr: Option<u32>,
    /// Iteration count; turns the step into a repeat group over `steps`
    pub repeat: Option<u32>,
    pub steps: Option<Vec<RawStep>>,
    pub notes: Option<String>,
}

/// Step duration: whole seconds or a `[h:]mm:ss` clock string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawDuration {
    Seconds(u32),
    Clock(String),
}

impl RawDuration {
    pub fn to_seconds(&self) -> Option<u32> {
        match self {
            RawDuration::Seconds(s) => Some(*s),
            RawDuration::Clock(clock) => parse_clock(clock),
        }
    }
}

fn parse_clock(clock: &str) -> Option<u32> {
    let parts: Vec<&str> = clock.trim().split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }

    let mut total: u32 = 0;
    for (i, part) in parts.iter().enumerate() {
        let value: u32 = part.parse().ok()?;
        // minutes and seconds after the leading field must stay below 60
        if i > 0 && value >= 60 {
            return None;
        }
        total = total.checked_mul(60)?.checked_add(value)?;
    }
    Some(total)
}
