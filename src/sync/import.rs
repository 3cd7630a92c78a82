use std::fmt;

use super::error::SyncError;
use crate::garmin::{RemoteError, WorkoutService};
use crate::models::{
    render_payload, AthleteContext, RemoteId, RemoteIndex, RemoteWorkoutSummary,
    WorkoutDefinition, WorkoutPayload,
};
use crate::workouts;

/// The single remote mutation planned for one local workout.
#[derive(Debug)]
pub enum ImportAction {
    Create {
        name: String,
        payload: WorkoutPayload,
    },
    Update {
        name: String,
        id: RemoteId,
        payload: WorkoutPayload,
    },
}

impl fmt::Display for ImportAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportAction::Create { name, .. } => write!(f, "create '{}'", name),
            ImportAction::Update { name, id, .. } => write!(f, "update '{}' (id {})", name, id),
        }
    }
}

/// Names of the workouts created and updated by an import run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ImportReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    /// Nothing was sent; the lists are what would have happened
    pub dry_run: bool,
}

impl ImportReport {
    fn planned(actions: &[ImportAction]) -> Self {
        let mut report = Self {
            dry_run: true,
            ..Default::default()
        };
        for action in actions {
            match action {
                ImportAction::Create { name, .. } => report.created.push(name.clone()),
                ImportAction::Update { name, .. } => report.updated.push(name.clone()),
            }
        }
        report
    }

    pub fn total(&self) -> usize {
        self.created.len() + self.updated.len()
    }
}

/// Loads and validates every workout file matching `pattern`.
///
/// Stops at the first file that cannot be read, parsed or validated.
pub fn load_workouts(pattern: &str) -> Result<Vec<WorkoutDefinition>, SyncError> {
    workouts::expand_pattern(pattern)?
        .into_iter()
        .map(|path| -> Result<WorkoutDefinition, SyncError> {
            let raw = workouts::read(&path)?;
            let definition =
                WorkoutDefinition::normalize(raw).map_err(|source| SyncError::Definition {
                    path: path.clone(),
                    source,
                })?;
            tracing::debug!("Loaded {} from '{}'", definition, path.display());
            Ok(definition)
        })
        .collect()
}

/// Decides create vs update for each definition, in input order, and renders
/// its payload.
///
/// Names are matched exactly against the listing. When the listing holds the
/// same name twice, the later workout is the one updated.
pub fn plan(
    definitions: &[WorkoutDefinition],
    listing: &[RemoteWorkoutSummary],
    athlete: &AthleteContext,
) -> Result<Vec<ImportAction>, SyncError> {
    let index = RemoteIndex::build(listing);
    tracing::debug!("Indexed {} distinct remote workout name(s)", index.len());

    definitions
        .iter()
        .map(|definition| -> Result<ImportAction, SyncError> {
            let name = definition.canonical_name().to_string();
            let existing = index.get(&name);
            let payload = render_payload(definition, athlete, existing).map_err(|source| {
                SyncError::Conversion {
                    name: name.clone(),
                    source,
                }
            })?;

            Ok(match existing {
                Some(summary) => ImportAction::Update {
                    name,
                    id: summary.id.clone(),
                    payload,
                },
                None => ImportAction::Create { name, payload },
            })
        })
        .collect()
}

/// Sends each planned action to the service, in order.
///
/// Stops at the first remote error.
pub fn apply<S>(service: &S, actions: Vec<ImportAction>) -> Result<ImportReport, SyncError>
where
    S: WorkoutService + ?Sized,
{
    let mut report = ImportReport::default();

    for action in actions {
        match action {
            ImportAction::Create { name, payload } => {
                let id = service.create_workout(&payload)?;
                match id {
                    Some(id) => tracing::info!("Saved workout '{}' (id {})", name, id),
                    None => tracing::info!("Saved workout '{}'", name),
                }
                report.created.push(name);
            }
            ImportAction::Update { name, id, payload } => {
                service.update_workout(&id, &payload)?;
                tracing::info!("Updated workout '{}' (id {})", name, id);
                report.updated.push(name);
            }
        }
    }

    Ok(report)
}

/// Imports every workout file matching `pattern`.
///
/// Files are loaded and validated before `connect` is called, and `connect` is
/// not called at all when nothing matches. The service is dropped on return.
/// With `dry_run` the remote listing is still fetched but nothing is created
/// or updated.
pub fn run_import<S, F>(
    connect: F,
    pattern: &str,
    athlete: &AthleteContext,
    dry_run: bool,
) -> Result<ImportReport, SyncError>
where
    S: WorkoutService,
    F: FnOnce() -> Result<S, RemoteError>,
{
    let definitions = load_workouts(pattern)?;
    if definitions.is_empty() {
        tracing::info!("No workout files match '{}'", pattern);
        return Ok(ImportReport {
            dry_run,
            ..Default::default()
        });
    }

    let service = connect()?;
    import_definitions(&service, &definitions, athlete, dry_run)
}

/// Reconciles already loaded definitions against the remote library.
pub fn import_definitions<S>(
    service: &S,
    definitions: &[WorkoutDefinition],
    athlete: &AthleteContext,
    dry_run: bool,
) -> Result<ImportReport, SyncError>
where
    S: WorkoutService + ?Sized,
{
    let listing = service.list_workouts()?;
    tracing::debug!(
        "Matching {} local workout(s) against {} remote workout(s)",
        definitions.len(),
        listing.len()
    );

    let actions = plan(definitions, &listing, athlete)?;
    for action in &actions {
        tracing::debug!("Planned: {}", action);
    }

    if dry_run {
        return Ok(ImportReport::planned(&actions));
    }

    apply(service, actions)
}
