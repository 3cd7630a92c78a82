//! HTTP client for the Garmin Connect workout service.
//!
//! Authentication is out of scope: the session uses an OAuth access token
//! obtained elsewhere, read from config, the environment or a token file.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use super::error::RemoteError;
use super::WorkoutService;
use crate::config::GarminConfig;
use crate::models::{RemoteId, RemoteWorkoutSummary, WorkoutPayload};

/// Response body of a successful create.
#[derive(Deserialize)]
struct CreatedWorkout {
    #[serde(rename = "workoutId")]
    workout_id: RemoteId,
}

/// One authenticated connection to Garmin Connect.
///
/// Opened once per command and released when dropped. Async `reqwest` calls
/// are driven to completion on a private current-thread runtime, one at a time.
pub struct GarminSession {
    http: reqwest::Client,
    base_url: String,
    page_size: u32,
    runtime: tokio::runtime::Runtime,
}

impl GarminSession {
    /// Opens a session from config.
    ///
    /// Returns an error if no access token is available.
    pub fn open(config: &GarminConfig) -> Result<Self, RemoteError> {
        let token = load_token(config)?;

        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| RemoteError::InvalidToken(e.to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(HeaderName::from_static("nk"), HeaderValue::from_static("NT"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("garmin-workouts/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(RemoteError::Runtime)?;

        tracing::debug!("Opened Garmin session against {}", config.api_base_url);

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            page_size: config.page_size,
            runtime,
        })
    }

    /// Builds an API URL from the base URL and a service path.
    fn url(&self, path: &str) -> String {
        build_url(&self.base_url, path)
    }
}

impl Drop for GarminSession {
    fn drop(&mut self) {
        tracing::debug!("Closing Garmin session");
    }
}

impl WorkoutService for GarminSession {
    fn list_workouts(&self) -> Result<Vec<RemoteWorkoutSummary>, RemoteError> {
        self.runtime.block_on(async {
            let url = self.url("workout-service/workouts");
            let mut workouts = Vec::new();
            let mut seen = HashSet::new();
            let mut start: u32 = 0;

            loop {
                let response = self
                    .http
                    .get(&url)
                    .query(&[("start", start), ("limit", self.page_size)])
                    .send()
                    .await?;
                let page: Vec<RemoteWorkoutSummary> = check(response).await?.json().await?;

                let count = page.len();
                let added = append_page(&mut workouts, &mut seen, page);
                if count == 0 || count < self.page_size as usize {
                    break;
                }
                if added == 0 {
                    tracing::warn!("Listing page at offset {} repeated earlier workouts", start);
                    break;
                }
                start += count as u32;
            }

            tracing::debug!("Listed {} remote workout(s)", workouts.len());
            Ok(workouts)
        })
    }

    fn create_workout(&self, payload: &WorkoutPayload) -> Result<Option<RemoteId>, RemoteError> {
        self.runtime.block_on(async {
            let response = self
                .http
                .post(self.url("workout-service/workout"))
                .json(payload)
                .send()
                .await?;
            let body = check(response).await?.text().await?;

            // The id is informational; an unexpected body still counts as success
            Ok(serde_json::from_str::<CreatedWorkout>(&body)
                .ok()
                .map(|created| created.workout_id))
        })
    }

    fn update_workout(&self, id: &RemoteId, payload: &WorkoutPayload) -> Result<(), RemoteError> {
        self.runtime.block_on(async {
            let response = self
                .http
                .put(self.url(&format!("workout-service/workout/{}", id)))
                .json(payload)
                .send()
                .await?;
            check(response).await?;
            Ok(())
        })
    }

    fn download_workout(&self, id: &RemoteId, destination: &Path) -> Result<(), RemoteError> {
        let bytes = self.runtime.block_on(async {
            let response = self
                .http
                .get(self.url(&format!("workout-service/workout/FIT/{}", id)))
                .send()
                .await?;
            let bytes = check(response).await?.bytes().await?;
            Ok::<_, RemoteError>(bytes)
        })?;

        if bytes.is_empty() {
            return Err(RemoteError::Decode(format!(
                "empty FIT file for workout {}",
                id
            )));
        }

        std::fs::write(destination, &bytes).map_err(|source| RemoteError::Write {
            path: destination.to_path_buf(),
            source,
        })
    }
}

/// Turns non-success responses into [`RemoteError::Status`].
async fn check(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Appends the workouts of `page` not already listed. Returns how many were new.
fn append_page(
    workouts: &mut Vec<RemoteWorkoutSummary>,
    seen: &mut HashSet<RemoteId>,
    page: Vec<RemoteWorkoutSummary>,
) -> usize {
    let before = workouts.len();
    workouts.extend(page.into_iter().filter(|w| seen.insert(w.id.clone())));
    workouts.len() - before
}

fn build_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Access token from config, falling back to the token file.
fn load_token(config: &GarminConfig) -> Result<String, RemoteError> {
    if let Some(token) = &config.access_token {
        let token = token.trim();
        if !token.is_empty() {
            return Ok(token.to_string());
        }
    }

    match std::fs::read_to_string(&config.token_file) {
        Ok(contents) => {
            let token = contents.trim();
            if token.is_empty() {
                Err(RemoteError::NotConfigured(config.token_file.clone()))
            } else {
                Ok(token.to_string())
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(RemoteError::NotConfigured(config.token_file.clone()))
        }
        Err(source) => Err(RemoteError::TokenFile {
            path: config.token_file.clone(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn garmin_config(access_token: Option<&str>, token_file: PathBuf) -> GarminConfig {
        GarminConfig {
            api_base_url: "https://connectapi.garmin.com".to_string(),
            access_token: access_token.map(str::to_string),
            token_file,
            page_size: 100,
        }
    }

    #[test]
    fn test_build_url() {
        assert_eq!(
            build_url("https://connectapi.garmin.com", "workout-service/workouts"),
            "https://connectapi.garmin.com/workout-service/workouts"
        );
        assert_eq!(
            build_url("http://localhost:8080/", "/workout-service/workout/42"),
            "http://localhost:8080/workout-service/workout/42"
        );
    }

    #[test]
    fn test_append_page_skips_repeated_workouts() {
        let mut workouts = Vec::new();
        let mut seen = HashSet::new();
        let page = vec![
            RemoteWorkoutSummary::new(1, 9, "A"),
            RemoteWorkoutSummary::new(2, 9, "B"),
        ];

        assert_eq!(append_page(&mut workouts, &mut seen, page.clone()), 2);
        // a server ignoring `start` sends the same page again
        assert_eq!(append_page(&mut workouts, &mut seen, page), 0);
        assert_eq!(
            append_page(
                &mut workouts,
                &mut seen,
                vec![RemoteWorkoutSummary::new(3, 9, "C")]
            ),
            1
        );
        assert_eq!(workouts.len(), 3);
    }

    #[test]
    fn test_token_from_config_wins() {
        let temp_dir = tempdir().unwrap();
        let token_file = temp_dir.path().join("token");
        std::fs::write(&token_file, "from-file").unwrap();

        let config = garmin_config(Some(" direct "), token_file);
        assert_eq!(load_token(&config).unwrap(), "direct");
    }

    #[test]
    fn test_token_from_file() {
        let temp_dir = tempdir().unwrap();
        let token_file = temp_dir.path().join("token");
        std::fs::write(&token_file, "from-file\n").unwrap();

        let config = garmin_config(None, token_file);
        assert_eq!(load_token(&config).unwrap(), "from-file");
    }

    #[test]
    fn test_missing_token_is_not_configured() {
        let temp_dir = tempdir().unwrap();
        let config = garmin_config(None, temp_dir.path().join("missing"));

        let err = load_token(&config).unwrap_err();
        assert!(matches!(err, RemoteError::NotConfigured(_)));
        assert!(err.to_string().contains("GARMIN_ACCESS_TOKEN"));
    }

    #[test]
    fn test_blank_token_file_is_not_configured() {
        let temp_dir = tempdir().unwrap();
        let token_file = temp_dir.path().join("token");
        std::fs::write(&token_file, "  \n").unwrap();

        let config = garmin_config(Some(""), token_file);
        assert!(matches!(
            load_token(&config),
            Err(RemoteError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_open_session_without_token_fails() {
        let temp_dir = tempdir().unwrap();
        let config = garmin_config(None, temp_dir.path().join("missing"));
        assert!(matches!(
            GarminSession::open(&config),
            Err(RemoteError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_open_session_with_token() {
        let temp_dir = tempdir().unwrap();
        let config = garmin_config(Some("abc123"), temp_dir.path().join("missing"));

        let session = GarminSession::open(&config).unwrap();
        assert_eq!(
            session.url("workout-service/workout/FIT/7"),
            "https://connectapi.garmin.com/workout-service/workout/FIT/7"
        );
    }

    #[test]
    fn test_token_with_newline_in_middle_is_invalid() {
        let temp_dir = tempdir().unwrap();
        let config = garmin_config(Some("abc\ndef"), temp_dir.path().join("missing"));
        assert!(matches!(
            GarminSession::open(&config),
            Err(RemoteError::InvalidToken(_))
        ));
    }
}
