//! Template detach preparation.

use sdwan_core::DetachDevice;

use crate::cli::{DetachArgs, GlobalOpts};
use crate::error::CliError;

use super::util;

/// Build and confirm the detach request; `None` if the operator declines.
pub fn prepare(args: &DetachArgs, global: &GlobalOpts) -> Result<Option<DetachDevice>, CliError> {
    let request = DetachDevice {
        device_id: args.target.clone(),
        device_ip: args.sysip.clone(),
        device_type: args.device_type.clone(),
    };
    request.validate()?;

    let prompt = format!(
        "Detach device {} ({}) from its template and switch it to CLI mode?",
        request.device_id, request.device_ip
    );
    Ok(util::confirm(&prompt, "detach", global.yes)?.then_some(request))
}
