//! Template attach preparation: variable merging, validation, confirmation.

use std::collections::BTreeMap;

use sdwan_core::AttachTemplate;

use crate::cli::{AttachArgs, GlobalOpts};
use crate::error::CliError;

use super::util;

const HOST_NAME_VAR: &str = "//system/host-name";
const SYSTEM_IP_VAR: &str = "//system/system-ip";
const SITE_ID_VAR: &str = "//system/site-id";
const LOOPBACK_VAR: &str = "/1/loopback1/interface/ip/address";
const GE0_VAR: &str = "/0/ge0/0/interface/ip/address";

/// Merge variables: file < named flags < `--var`.
fn build_request(args: &AttachArgs) -> Result<AttachTemplate, CliError> {
    let mut variables = BTreeMap::new();

    if let Some(ref path) = args.vars_file {
        variables.extend(util::read_vars_file(path)?);
    }

    let named = [
        (HOST_NAME_VAR, &args.hostname),
        (SYSTEM_IP_VAR, &args.sysip),
        (SITE_ID_VAR, &args.siteid),
        (LOOPBACK_VAR, &args.loopip),
        (GE0_VAR, &args.geip),
    ];
    for (path, value) in named {
        if let Some(value) = value {
            variables.insert(path.to_owned(), value.clone());
        }
    }

    variables.extend(args.vars.iter().cloned());

    Ok(AttachTemplate {
        template_id: args.template.clone(),
        device_id: args.target.clone(),
        device_ip: args.sysip.clone(),
        host_name: args.hostname.clone(),
        variables,
        resolve_inputs: !args.skip_inputs,
    })
}

/// Build and confirm the attach request; `None` if the operator declines.
pub fn prepare(args: &AttachArgs, global: &GlobalOpts) -> Result<Option<AttachTemplate>, CliError> {
    let request = build_request(args)?;
    request.validate()?;

    let prompt = format!(
        "Attach template {} to device {}?",
        request.template_id, request.device_id
    );
    Ok(util::confirm(&prompt, "attach", global.yes)?.then_some(request))
}
