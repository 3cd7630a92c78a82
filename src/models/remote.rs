use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Opaque Garmin identifier. Keeps whether the service sent a number or a string
/// so it can be echoed back unchanged in update payloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemoteId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteId::Number(n) => write!(f, "{}", n),
            RemoteId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RemoteId {
    fn from(id: i64) -> Self {
        RemoteId::Number(id)
    }
}

impl From<&str> for RemoteId {
    fn from(id: &str) -> Self {
        RemoteId::Text(id.to_string())
    }
}

/// One entry of the remote workout listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteWorkoutSummary {
    #[serde(rename = "workoutId")]
    pub id: RemoteId,
    #[serde(rename = "ownerId")]
    pub owner_id: RemoteId,
    #[serde(rename = "workoutName")]
    pub name: String,
}

impl RemoteWorkoutSummary {
    pub fn new(
        id: impl Into<RemoteId>,
        owner_id: impl Into<RemoteId>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
            name: name.into(),
        }
    }
}

/// Lookup from exact workout name to remote summary.
///
/// Built in listing order: when two remote workouts share a name the later one
/// replaces the earlier one.
#[derive(Debug, Default)]
pub struct RemoteIndex<'a> {
    by_name: HashMap<&'a str, &'a RemoteWorkoutSummary>,
}

impl<'a> RemoteIndex<'a> {
    pub fn build(listing: &'a [RemoteWorkoutSummary]) -> Self {
        let mut by_name = HashMap::with_capacity(listing.len());
        for summary in listing {
            if let Some(previous) = by_name.insert(summary.name.as_str(), summary) {
                tracing::debug!(
                    "Duplicate remote workout name '{}': {} replaces {}",
                    summary.name,
                    summary.id,
                    previous.id
                );
            }
        }
        Self { by_name }
    }

    pub fn get(&self, name: &str) -> Option<&'a RemoteWorkoutSummary> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }
}
