use clap::Args;

use crate::config::Config;
use crate::garmin::GarminSession;
use crate::models::AthleteContext;
use crate::sync::{run_import, ImportReport};

/// Import workout(s) from file(s)
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// Workout file or glob pattern, e.g. 'workouts/*.yaml' (quote it)
    pub workout: String,

    /// Functional threshold power in watts (default: `ftp` from config)
    #[arg(long, allow_negative_numbers = true)]
    pub ftp: Option<i64>,

    /// Show what would be created or updated without changing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl ImportCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let ftp = self
            .ftp
            .or(config.ftp.value)
            .ok_or("No FTP given. Pass --ftp or set ftp in the config file.")?;
        let athlete = AthleteContext::new(ftp);

        let garmin = config.garmin();
        let report = run_import(
            || GarminSession::open(&garmin),
            &self.workout,
            &athlete,
            self.dry_run,
        )?;

        print!("{}", render_report(&report));
        Ok(())
    }
}

fn render_report(report: &ImportReport) -> String {
    if report.total() == 0 {
        return "No workouts imported.\n".to_string();
    }

    let (created, updated) = if report.dry_run {
        ("Would create", "Would update")
    } else {
        ("Created", "Updated")
    };

    let mut out = String::new();
    for name in &report.created {
        out.push_str(&format!("  {}: {}\n", created, name));
    }
    for name in &report.updated {
        out.push_str(&format!("  {}: {}\n", updated, name));
    }
    out.push_str(&format!(
        "\n{} workout{} {}.\n",
        report.total(),
        if report.total() == 1 { "" } else { "s" },
        if report.dry_run { "planned" } else { "imported" }
    ));
    out
}
