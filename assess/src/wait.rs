//! The polling loop that drives a [`Condition`] to convergence.

use std::future::Future;
use std::io::Write;
use std::time::Duration;

use jujupy::{Clock, Condition, Convergence, GroupReporter, UntilTimeout, WaitingSet};

use crate::Result;

/// Poll `fetch` until `condition` converges or `deadline` runs out.
///
/// Every observation that is not converged yet is handed to `reporter`.
/// Transient fetch failures (the CLI erroring or hanging) are logged and
/// polled again; anything else ends the wait immediately. On timeout the
/// condition's own error is returned, carrying the last waiting set seen.
pub async fn wait_for<C, F, Fut, W, K>(
    condition: &C,
    mut fetch: F,
    reporter: &mut GroupReporter<W>,
    interval: Duration,
    deadline: UntilTimeout<K>,
) -> Result<()>
where
    C: Condition,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<C::Input>>,
    W: Write,
    K: Clock,
{
    let timeout = deadline.timeout();
    let description = condition.describe();
    tracing::info!(timeout = ?timeout, "waiting for {description}");

    let mut last_waiting = WaitingSet::new();
    for remaining in deadline {
        let pause = interval.min(Duration::from_secs_f64(remaining));

        let input = match fetch().await {
            Ok(input) => input,
            Err(e) if e.is_transient() => {
                tracing::warn!(error = %e, remaining, "status unavailable, retrying");
                tokio::time::sleep(pause).await;
                continue;
            }
            Err(e) => {
                end_progress(reporter);
                return Err(e);
            }
        };

        match condition.check(&input) {
            Ok(Convergence::Converged) => {
                reporter.finish()?;
                tracing::info!("done waiting for {description}");
                return Ok(());
            }
            Ok(Convergence::Waiting(waiting)) => {
                reporter.update(jujupy::group_by_state(&waiting))?;
                last_waiting = waiting;
            }
            Err(e) => {
                end_progress(reporter);
                return Err(e.into());
            }
        }

        tokio::time::sleep(pause).await;
    }

    end_progress(reporter);
    tracing::error!(waiting = last_waiting.len(), "gave up waiting for {description}");
    Err(condition.timed_out(timeout, last_waiting).into())
}

/// Terminate the progress line on a failing path. A broken output stream is
/// only logged so the error that ended the wait is the one returned.
fn end_progress<W: Write>(reporter: &mut GroupReporter<W>) {
    if let Err(e) = reporter.finish() {
        tracing::warn!(error = %e, "could not finish progress output");
    }
}
