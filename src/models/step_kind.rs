use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepKind {
    Warmup,
    Cooldown,
    #[default]
    Interval,
    Recovery,
    Rest,
}

impl StepKind {
    /// Garmin `stepTypeId`.
    pub fn id(self) -> u32 {
        match self {
            StepKind::Warmup => 1,
            StepKind::Cooldown => 2,
            StepKind::Interval => 3,
            StepKind::Recovery => 4,
            StepKind::Rest => 5,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            StepKind::Warmup => "warmup",
            StepKind::Cooldown => "cooldown",
            StepKind::Interval => "interval",
            StepKind::Recovery => "recovery",
            StepKind::Rest => "rest",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for StepKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warmup" => Ok(StepKind::Warmup),
            "cooldown" => Ok(StepKind::Cooldown),
            "interval" => Ok(StepKind::Interval),
            "recovery" => Ok(StepKind::Recovery),
            "rest" => Ok(StepKind::Rest),
            _ => Err(format!(
                "Invalid step kind '{}'. Valid options: warmup, interval, recovery, rest, cooldown",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_kind_from_str() {
        assert_eq!(StepKind::from_str("warmup").unwrap(), StepKind::Warmup);
        assert_eq!(StepKind::from_str("CoolDown").unwrap(), StepKind::Cooldown);
        assert_eq!(StepKind::from_str("rest").unwrap(), StepKind::Rest);
    }

    #[test]
    fn test_step_kind_from_str_invalid() {
        assert!(StepKind::from_str("sprint").is_err());
        assert!(StepKind::from_str("").is_err());
    }

    #[test]
    fn test_step_kind_display() {
        assert_eq!(format!("{}", StepKind::Recovery), "recovery");
        assert_eq!(StepKind::Interval.id(), 3);
    }
}
