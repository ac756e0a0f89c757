//! Command dispatch: bridges CLI args -> controller calls -> output formatting.

pub mod action;
pub mod attach;
pub mod config_cmd;
pub mod detach;
pub mod devices;
pub mod templates;
pub mod util;

use sdwan_core::{AttachTemplate, CancellationToken, Controller, DetachDevice};

use crate::cli::{ActionArgs, Command, DevicesArgs, GlobalOpts, TemplatesArgs, WaitOpts};
use crate::error::CliError;

/// A controller-bound command whose local checks have passed.
#[derive(Debug)]
pub enum Prepared {
    Devices(DevicesArgs),
    Templates(TemplatesArgs),
    Action(ActionArgs),
    Attach(AttachTemplate, WaitOpts),
    Detach(DetachDevice, WaitOpts),
}

/// Validate and confirm a command before any request reaches the controller.
///
/// Returns `None` when the operator declines a mutation.
pub fn prepare(cmd: Command, global: &GlobalOpts) -> Result<Option<Prepared>, CliError> {
    let prepared = match cmd {
        Command::Devices(args) => Prepared::Devices(args),
        Command::Templates(args) => Prepared::Templates(args),
        Command::Action(args) => Prepared::Action(args),
        Command::Attach(args) => match attach::prepare(&args, global)? {
            Some(request) => Prepared::Attach(request, args.wait),
            None => return Ok(None),
        },
        Command::Detach(args) => match detach::prepare(&args, global)? {
            Some(request) => Prepared::Detach(request, args.wait),
            None => return Ok(None),
        },
        // Config and Completions are handled before preparation
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    };
    Ok(Some(prepared))
}

/// Dispatch a prepared command to the appropriate handler.
pub async fn dispatch(
    cmd: Prepared,
    controller: &Controller,
    global: &GlobalOpts,
    cancel: &CancellationToken,
) -> Result<(), CliError> {
    match cmd {
        Prepared::Devices(args) => devices::handle(controller, args, global).await,
        Prepared::Templates(args) => templates::handle(controller, args, global).await,
        Prepared::Action(args) => action::handle(controller, args, global, cancel).await,
        Prepared::Attach(request, wait) => {
            let id = controller.attach_template(&request).await?;
            action::submitted(controller, id, &wait, global, cancel).await
        }
        Prepared::Detach(request, wait) => {
            let id = controller.detach_device(&request).await?;
            action::submitted(controller, id, &wait, global, cancel).await
        }
    }
}
