//! Host identity query via `lsb_release`.

use crate::{CommandRunner, CommandSpec};
use std::time::Duration;
use tokio::time::timeout;

/// Timeout for the identity query.
const QUERY_TIMEOUT: Duration = Duration::from_secs(2);

/// Program used to query the distribution identity.
pub(crate) const QUERY_PROGRAM: &str = "lsb_release";

/// Ask `lsb_release -si` for the distributor ID.
///
/// Returns the lowercased first line of its output, or `None` if the
/// program is missing, fails, times out, or prints nothing.
pub(crate) async fn query_identity<R: CommandRunner>(runner: &R) -> Option<String> {
    runner.locate(QUERY_PROGRAM)?;

    let command = CommandSpec::new(QUERY_PROGRAM).arg("-si");
    let output = match timeout(QUERY_TIMEOUT, runner.output(&command)).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            tracing::debug!(error = %e, "lsb_release failed to start");
            return None;
        }
        Err(_) => {
            tracing::debug!("lsb_release timed out");
            return None;
        }
    };

    if !command.accepts(output.status) {
        return None;
    }

    output
        .stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_lowercase)
}
