//! Action status and wait handlers, plus the shared follow-up used by
//! attach and detach.

use std::time::Duration;

use sdwan_core::{
    ActionId, ActionStatus, CancellationToken, Controller, Outcome, PollOptions,
};

use crate::cli::{ActionArgs, ActionCommand, GlobalOpts, WaitOpts};
use crate::error::CliError;
use crate::output::{self, Tone};

fn detail(s: &ActionStatus) -> String {
    let mut lines = vec![
        format!("Action:    {}", s.id),
        format!("Type:      {}", s.action.as_deref().unwrap_or("-")),
        format!("Status:    {}", s.status),
        format!("Succeeded: {}", s.succeeded),
        format!("Failed:    {}", s.failed),
    ];
    for d in &s.devices {
        let name = d
            .host_name
            .as_deref()
            .or(d.uuid.as_deref())
            .unwrap_or("-");
        lines.push(format!(
            "  {name} ({}): {}",
            d.system_ip.as_deref().unwrap_or("-"),
            d.status.as_deref().unwrap_or("-")
        ));
        if let Some(last) = d.activity.last() {
            lines.push(format!("    {last}"));
        }
    }
    lines.join("\n")
}

fn print_status(status: &ActionStatus, global: &GlobalOpts) {
    let out = output::render_single(&global.output, status, detail, |s| s.status.clone());
    output::print_output(&out, global.quiet);
}

/// Print a freshly submitted action id, or wait for it per `wait`.
pub async fn submitted(
    controller: &Controller,
    id: ActionId,
    wait: &WaitOpts,
    global: &GlobalOpts,
    cancel: &CancellationToken,
) -> Result<(), CliError> {
    if wait.no_wait {
        let out = output::render_single(
            &global.output,
            &id,
            |id| format!("Action submitted: {id}"),
            ToString::to_string,
        );
        output::print_output(&out, global.quiet);
        return Ok(());
    }
    follow(controller, &id, wait.poll_interval, wait.wait_timeout, global, cancel).await
}

/// Wait for `id` to finish, render the final status, and turn anything but
/// success into the matching error.
pub async fn follow(
    controller: &Controller,
    id: &ActionId,
    interval: Duration,
    timeout: Duration,
    global: &GlobalOpts,
    cancel: &CancellationToken,
) -> Result<(), CliError> {
    let opts = PollOptions { interval, timeout };
    let color = output::should_color(&global.color);

    let spinner = output::spinner(format!("Waiting for action {id}"), global.quiet);
    let result = controller.await_completion(id, &opts, cancel).await;
    spinner.finish_and_clear();
    let outcome = result?;

    if let Some(status) = outcome.status() {
        print_status(status, global);
    }
    if !global.quiet {
        let line = match &outcome {
            Outcome::Succeeded { polls, .. } => output::status_line(
                Tone::Good,
                &format!("Action {id} done after {polls} poll(s)"),
                color,
            ),
            Outcome::Failed { status, .. } => output::status_line(
                Tone::Bad,
                &format!("Action {id} done with {} failure(s)", status.failed),
                color,
            ),
            Outcome::TimedOut { polls, .. } => output::status_line(
                Tone::Pending,
                &format!("Action {id} still pending after {polls} poll(s)"),
                color,
            ),
            Outcome::Cancelled { .. } => {
                output::status_line(Tone::Pending, &format!("Stopped waiting for {id}"), color)
            }
        };
        eprintln!("{line}");
    }

    outcome.into_result(id)?;
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: ActionArgs,
    global: &GlobalOpts,
    cancel: &CancellationToken,
) -> Result<(), CliError> {
    match args.command {
        ActionCommand::Status { id } => {
            let status = controller.action_status(&ActionId::new(id)).await?;
            print_status(&status, global);
            Ok(())
        }

        ActionCommand::Wait {
            id,
            poll_interval,
            wait_timeout,
        } => {
            let id = ActionId::new(id);
            follow(controller, &id, poll_interval, wait_timeout, global, cancel).await
        }
    }
}
