// ── Action poller ──
//
// Mutations on the controller are asynchronous: they hand back an action id
// and the outcome is read from a status endpoint. The poller repeats that
// read until the summary reports `done`, bounded by a deadline and a
// cancellation token.

use std::future::Future;

use tokio::time::{Instant, sleep, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::PollOptions;
use crate::error::CoreError;
use crate::model::{ActionId, ActionStatus, Outcome};

/// Anything that can report the status of an action.
///
/// Implemented by [`Controller`](crate::Controller); tests plug in scripted
/// sources.
pub trait ActionStatusSource {
    fn fetch_status(
        &self,
        id: &ActionId,
    ) -> impl Future<Output = Result<ActionStatus, CoreError>> + Send;
}

/// Poll `id` until it reaches `done`, the deadline passes, or `cancel` fires.
///
/// The first request is issued immediately and always allowed to finish, so
/// even a zero timeout reads the status once; between requests the poller
/// sleeps for `opts.interval` (shortened to whatever is left before the
/// deadline). A later request still in flight when the deadline passes is
/// abandoned. Transport and API errors end the wait and are returned as-is,
/// and an interval below [`PollOptions::MIN_INTERVAL`] is rejected up front.
pub async fn await_completion<S>(
    source: &S,
    id: &ActionId,
    opts: &PollOptions,
    cancel: &CancellationToken,
) -> Result<Outcome, CoreError>
where
    S: ActionStatusSource + Sync + ?Sized,
{
    opts.validate()?;

    let started = Instant::now();
    let deadline = started + opts.timeout;
    let mut polls: u32 = 0;
    let mut last: Option<ActionStatus> = None;

    debug!(
        action_id = %id,
        interval = ?opts.interval,
        timeout = ?opts.timeout,
        "waiting for action"
    );

    loop {
        let status = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                info!(action_id = %id, polls, "wait cancelled");
                return Ok(Outcome::Cancelled { polls });
            }
            () = sleep_until(deadline), if polls > 0 => {
                return Ok(timed_out(id, last, polls, started));
            }
            result = source.fetch_status(id) => result?,
        };
        polls += 1;

        debug!(
            action_id = %id,
            poll = polls,
            status = %status.status,
            succeeded = status.succeeded,
            failed = status.failed,
            "action status"
        );

        if status.state.is_terminal() {
            return Ok(if status.has_failures() {
                warn!(action_id = %id, failed = status.failed, "action finished with failures");
                Outcome::Failed { status, polls }
            } else {
                info!(action_id = %id, polls, "action finished");
                Outcome::Succeeded { status, polls }
            });
        }
        last = Some(status);

        let now = Instant::now();
        if now >= deadline {
            return Ok(timed_out(id, last, polls, started));
        }
        let pause = opts.interval.min(deadline - now);

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                info!(action_id = %id, polls, "wait cancelled");
                return Ok(Outcome::Cancelled { polls });
            }
            () = sleep(pause) => {}
        }
    }
}

fn timed_out(id: &ActionId, last: Option<ActionStatus>, polls: u32, started: Instant) -> Outcome {
    let waited = started.elapsed();
    warn!(action_id = %id, polls, ?waited, "gave up waiting for action");
    Outcome::TimedOut {
        last,
        polls,
        waited,
    }
}
