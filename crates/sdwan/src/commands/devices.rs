//! Device command handlers.

use tabled::Tabled;

use sdwan_core::{Controller, Device};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, or_dash};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Host-Name")]
    host_name: String,
    #[tabled(rename = "Device Type")]
    device_type: String,
    #[tabled(rename = "Device ID")]
    uuid: String,
    #[tabled(rename = "System IP")]
    system_ip: String,
    #[tabled(rename = "Site ID")]
    site_id: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Device Model")]
    model: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            host_name: or_dash(d.host_name.as_deref()),
            device_type: or_dash(d.device_type.as_deref()),
            uuid: d.uuid.clone(),
            system_ip: or_dash(d.system_ip.as_deref()),
            site_id: or_dash(d.site_id.as_deref()),
            version: or_dash(d.version.as_deref()),
            model: or_dash(d.model.as_deref()),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => {
            let devices = controller.list_devices().await?;
            let out = output::render_list(
                &global.output,
                &devices,
                |d| DeviceRow::from(d),
                |d| d.uuid.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
