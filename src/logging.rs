//! Tracing setup for a single CLI invocation.

use tracing::Subscriber;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

const DEFAULT_FILTER: &str = "garmin_workouts=info";
const DEBUG_FILTER: &str = "garmin_workouts=debug";

/// Builds the subscriber for one command.
///
/// `--debug` forces debug output for this crate; otherwise `RUST_LOG` is used when
/// set, falling back to info. Logs go to stderr so stdout stays for command output.
pub fn subscriber(debug: bool) -> impl Subscriber + Send + Sync {
    let filter = if debug {
        EnvFilter::new(DEBUG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr),
    )
}
