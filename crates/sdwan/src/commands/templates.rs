//! Device template command handlers.

use tabled::Tabled;

use sdwan_core::{AttachedDevice, Controller, Template};

use crate::cli::{GlobalOpts, TemplatesArgs, TemplatesCommand};
use crate::error::CliError;
use crate::output::{self, or_dash};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct TemplateRow {
    #[tabled(rename = "Template Name")]
    name: String,
    #[tabled(rename = "Device Type")]
    device_type: String,
    #[tabled(rename = "Template ID")]
    id: String,
    #[tabled(rename = "Attached devices")]
    devices_attached: u64,
    #[tabled(rename = "Template version")]
    feature_templates: u64,
}

impl From<&Template> for TemplateRow {
    fn from(t: &Template) -> Self {
        Self {
            name: or_dash(t.name.as_deref()),
            device_type: or_dash(t.device_type.as_deref()),
            id: t.id.clone(),
            devices_attached: t.devices_attached,
            feature_templates: t.feature_templates,
        }
    }
}

#[derive(Tabled)]
struct AttachedRow {
    #[tabled(rename = "Host Name")]
    host_name: String,
    #[tabled(rename = "Device IP")]
    device_ip: String,
    #[tabled(rename = "Site ID")]
    site_id: String,
    #[tabled(rename = "Host ID")]
    uuid: String,
    #[tabled(rename = "Host Type")]
    personality: String,
}

impl From<&AttachedDevice> for AttachedRow {
    fn from(d: &AttachedDevice) -> Self {
        Self {
            host_name: or_dash(d.host_name.as_deref()),
            device_ip: or_dash(d.device_ip.as_deref()),
            site_id: or_dash(d.site_id.as_deref()),
            uuid: d.uuid.clone(),
            personality: or_dash(d.personality.as_deref()),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: TemplatesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TemplatesCommand::List => {
            let templates = controller.list_templates().await?;
            let out = output::render_list(
                &global.output,
                &templates,
                |t| TemplateRow::from(t),
                |t| t.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TemplatesCommand::Attached { template } => {
            let devices = controller.list_attached_devices(&template).await?;
            let out = output::render_list(
                &global.output,
                &devices,
                |d| AttachedRow::from(d),
                |d| d.uuid.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
