// ── Mutation request types ──
//
// Typed inputs for attach/detach and the payload assembly that turns them
// into controller bodies. Neither mutation is idempotent on the controller;
// no attachment state is checked client-side.

use std::collections::BTreeMap;

use serde_json::Value;

use sdwan_api::models::{
    AttachRequest, DetachRequest, DetachTarget, DeviceInputRow, DeviceTemplateAttachment,
    InputRequest,
};

use crate::error::CoreError;

const CSV_STATUS: &str = "csv-status";
const CSV_DEVICE_ID: &str = "csv-deviceId";
const CSV_DEVICE_IP: &str = "csv-deviceIP";
const CSV_HOST_NAME: &str = "csv-host-name";
const CSV_TEMPLATE_ID: &str = "csv-templateId";

/// Attach a device template to one device.
#[derive(Debug, Clone, Default)]
pub struct AttachTemplate {
    pub template_id: String,
    /// Device uuid (`csv-deviceId`).
    pub device_id: String,
    /// System IP (`csv-deviceIP`).
    pub device_ip: Option<String>,
    /// Host name (`csv-host-name`).
    pub host_name: Option<String>,
    /// Template variable values keyed by variable path
    /// (e.g. `//system/site-id`). Applied last, so they win.
    pub variables: BTreeMap<String, String>,
    /// Ask the controller for the device's current variable row first.
    pub resolve_inputs: bool,
}

impl AttachTemplate {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.template_id.trim().is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "template id is required".into(),
            });
        }
        if self.device_id.trim().is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "device id is required".into(),
            });
        }
        if !self.resolve_inputs && (self.device_ip.is_none() || self.host_name.is_none()) {
            return Err(CoreError::ValidationFailed {
                message: "system IP and host name are required when device inputs are not \
                          resolved from the controller"
                    .into(),
            });
        }
        Ok(())
    }

    pub(crate) fn input_request(&self) -> InputRequest {
        InputRequest {
            template_id: self.template_id.clone(),
            device_ids: vec![self.device_id.clone()],
            is_edited: false,
            is_master_edited: false,
        }
    }

    /// Pick this device's row out of a generated input set.
    pub(crate) fn select_row(
        &self,
        rows: Vec<DeviceInputRow>,
    ) -> Result<DeviceInputRow, CoreError> {
        rows.into_iter()
            .find(|row| row.get(CSV_DEVICE_ID).and_then(Value::as_str) == Some(&self.device_id))
            .ok_or_else(|| CoreError::ValidationFailed {
                message: format!(
                    "controller generated no variable row for device {} on template {}",
                    self.device_id, self.template_id
                ),
            })
    }

    /// Assemble the device row: generated values (if any), then the
    /// bookkeeping keys, then operator-supplied variables.
    pub(crate) fn device_row(&self, generated: Option<DeviceInputRow>) -> DeviceInputRow {
        let mut row = generated.unwrap_or_default();

        row.insert(CSV_STATUS.into(), Value::from("complete"));
        row.insert(CSV_DEVICE_ID.into(), Value::from(self.device_id.as_str()));
        row.insert(CSV_TEMPLATE_ID.into(), Value::from(self.template_id.as_str()));
        if let Some(ref ip) = self.device_ip {
            row.insert(CSV_DEVICE_IP.into(), Value::from(ip.as_str()));
        }
        if let Some(ref name) = self.host_name {
            row.insert(CSV_HOST_NAME.into(), Value::from(name.as_str()));
        }
        for (path, value) in &self.variables {
            row.insert(path.clone(), Value::from(value.as_str()));
        }
        row.insert("selected".into(), Value::from("true"));

        row
    }

    pub(crate) fn attach_request(&self, row: DeviceInputRow) -> AttachRequest {
        AttachRequest {
            device_template_list: vec![DeviceTemplateAttachment {
                template_id: self.template_id.clone(),
                device: vec![row],
                is_edited: false,
                is_master_edited: false,
            }],
        }
    }
}

/// Detach one device from its template (switch it to CLI mode).
#[derive(Debug, Clone)]
pub struct DetachDevice {
    pub device_id: String,
    pub device_ip: String,
    /// Controller device class, `vedge` for edge routers.
    pub device_type: String,
}

impl DetachDevice {
    pub fn validate(&self) -> Result<(), CoreError> {
        for (field, value) in [
            ("device id", &self.device_id),
            ("system IP", &self.device_ip),
            ("device type", &self.device_type),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::ValidationFailed {
                    message: format!("{field} is required"),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn detach_request(&self) -> DetachRequest {
        DetachRequest {
            device_type: self.device_type.clone(),
            devices: vec![DetachTarget {
                device_id: self.device_id.clone(),
                device_ip: self.device_ip.clone(),
            }],
        }
    }
}
