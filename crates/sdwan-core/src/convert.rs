// ── Wire → domain conversions ──
//
// Field-by-field mapping from `sdwan_api::models` records to the canonical
// domain types. List conversions preserve count and order.

use sdwan_api::models::{
    ActionDeviceRecord, ActionStatusResponse, AttachedDeviceRecord, DeviceRecord, TemplateRecord,
};

use crate::model::{
    ActionDeviceStatus, ActionId, ActionState, ActionStatus, AttachedDevice, Device, Template,
};

impl From<DeviceRecord> for Device {
    fn from(r: DeviceRecord) -> Self {
        Self {
            uuid: r.uuid,
            host_name: r.host_name,
            device_type: r.device_type,
            system_ip: r.system_ip,
            site_id: r.site_id,
            version: r.version,
            model: r.device_model,
            reachability: r.reachability,
        }
    }
}

impl From<AttachedDeviceRecord> for AttachedDevice {
    fn from(r: AttachedDeviceRecord) -> Self {
        Self {
            uuid: r.uuid,
            host_name: r.host_name,
            device_ip: r.device_ip,
            site_id: r.site_id,
            personality: r.personality,
        }
    }
}

impl From<TemplateRecord> for Template {
    fn from(r: TemplateRecord) -> Self {
        Self {
            id: r.template_id,
            name: r.template_name,
            description: r.template_description,
            device_type: r.device_type,
            devices_attached: r.devices_attached,
            feature_templates: r.template_attached,
        }
    }
}

impl From<ActionDeviceRecord> for ActionDeviceStatus {
    fn from(r: ActionDeviceRecord) -> Self {
        Self {
            uuid: r.uuid,
            host_name: r.host_name,
            system_ip: r.system_ip,
            status: r.status.or(r.status_id),
            activity: r.activity,
        }
    }
}

/// Build an [`ActionStatus`] from a status reply.
///
/// The tally keys are matched case-insensitively (`Success`/`success`,
/// `Failure`/`failure`); a missing tally counts as zero.
pub fn action_status(id: ActionId, resp: ActionStatusResponse) -> ActionStatus {
    let tally = |key: &str| -> u64 {
        resp.summary
            .count
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| *v)
            .sum()
    };
    let succeeded = tally("success");
    let failed = tally("failure");

    ActionStatus {
        id,
        action: resp.summary.action,
        state: ActionState::from_status(&resp.summary.status),
        status: resp.summary.status,
        succeeded,
        failed,
        devices: resp.data.into_iter().map(ActionDeviceStatus::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn device_record_maps_by_field_name() {
        let record: DeviceRecord = serde_json::from_value(json!({
            "host-name": "r1",
            "device-type": "vedge",
            "uuid": "u1",
            "system-ip": "1.1.1.1",
            "site-id": "100",
            "version": "20.6",
            "device-model": "vedge-100"
        }))
        .unwrap();

        let device = Device::from(record);
        assert_eq!(
            device,
            Device {
                uuid: "u1".into(),
                host_name: Some("r1".into()),
                device_type: Some("vedge".into()),
                system_ip: Some("1.1.1.1".into()),
                site_id: Some("100".into()),
                version: Some("20.6".into()),
                model: Some("vedge-100".into()),
                reachability: None,
            }
        );
        assert_eq!(serde_json::to_value(&device).unwrap()["hostName"], json!("r1"));
    }

    #[test]
    fn done_with_failure_count_is_counted() {
        let resp: ActionStatusResponse = serde_json::from_value(json!({
            "summary": {"status": "done", "count": {"Success": 2, "Failure": 1}},
            "data": [{"host-name": "r2", "statusId": "failure", "activity": ["Failed to push"]}]
        }))
        .unwrap();

        let status = action_status(ActionId::from("push-9"), resp);
        assert_eq!(status.state, ActionState::Done);
        assert_eq!(status.succeeded, 2);
        assert_eq!(status.failed, 1);
        assert!(status.has_failures());
        assert_eq!(status.devices[0].status.as_deref(), Some("failure"));
    }

    #[test]
    fn zero_failure_entry_is_not_a_failure() {
        let resp: ActionStatusResponse = serde_json::from_value(json!({
            "summary": {"status": "done", "count": {"Success": 1, "Failure": 0}}
        }))
        .unwrap();

        let status = action_status(ActionId::from("push-1"), resp);
        assert!(!status.has_failures());
    }
}
