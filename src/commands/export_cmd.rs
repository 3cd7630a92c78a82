use clap::Args;
use std::path::PathBuf;

use crate::config::Config;
use crate::garmin::GarminSession;
use crate::sync::run_export;

/// Export all workouts and save into directory
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Existing, writable directory for the FIT files
    #[arg(value_parser = writable_dir)]
    pub directory: PathBuf,
}

impl ExportCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let session = GarminSession::open(&config.garmin())?;
        let written = run_export(&session, &self.directory)?;

        println!(
            "Exported {} workout{} to {}",
            written.len(),
            if written.len() == 1 { "" } else { "s" },
            self.directory.display()
        );
        Ok(())
    }
}

/// Accepts only an existing directory a file can actually be created in.
fn writable_dir(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    let metadata =
        std::fs::metadata(&path).map_err(|e| format!("cannot access '{}': {}", value, e))?;

    if !metadata.is_dir() {
        return Err(format!("'{}' is not a directory", value));
    }
    tempfile::NamedTempFile::new_in(&path)
        .map_err(|e| format!("'{}' is not writable: {}", value, e))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_writable_dir_accepts_directory() {
        let temp_dir = tempdir().unwrap();
        let value = temp_dir.path().to_string_lossy().into_owned();
        assert_eq!(writable_dir(&value).unwrap(), temp_dir.path());
    }

    #[test]
    fn test_writable_dir_rejects_missing() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("missing");
        let err = writable_dir(&missing.to_string_lossy()).unwrap_err();
        assert!(err.contains("cannot access"));
    }

    #[cfg(unix)]
    #[test]
    fn test_writable_dir_rejects_unwritable_directory() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempdir().unwrap();
        let locked = temp_dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();

        // root can write regardless of mode bits
        let writable_anyway = tempfile::NamedTempFile::new_in(&locked).is_ok();
        let result = writable_dir(&locked.to_string_lossy());
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        if writable_anyway {
            assert!(result.is_ok());
        } else {
            assert!(result.unwrap_err().contains("not writable"));
        }
        assert_eq!(std::fs::read_dir(&locked).unwrap().count(), 0);
    }

    #[test]
    fn test_writable_dir_rejects_file() {
        let temp_dir = tempdir().unwrap();
        let file = temp_dir.path().join("file.fit");
        std::fs::write(&file, b"x").unwrap();

        let err = writable_dir(&file.to_string_lossy()).unwrap_err();
        assert!(err.contains("not a directory"));
    }
}
