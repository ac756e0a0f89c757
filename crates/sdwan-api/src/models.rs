// vManage wire types
//
// Models for the controller's `dataservice` JSON. List endpoints wrap their
// payload in `{ "data": [...] }`; field names mix kebab-case (`host-name`)
// and camelCase (`templateId`) depending on the endpoint. Optional fields
// use `#[serde(default)]` because presence varies across controller releases.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

// ── Response Envelopes ───────────────────────────────────────────────

/// Standard list envelope: `{ "header": {...}, "data": [...] }`.
///
/// Only `data` is required; a body without it is a malformed envelope.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: Vec<T>,
}

/// Reply to a mutating template call: `{ "id": "push_feature_template_..." }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionIdResponse {
    pub id: String,
}

// ── Devices ──────────────────────────────────────────────────────────

/// One entry of `GET dataservice/device`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub uuid: String,
    #[serde(default, rename = "host-name", deserialize_with = "lenient_string")]
    pub host_name: Option<String>,
    #[serde(default, rename = "device-type", deserialize_with = "lenient_string")]
    pub device_type: Option<String>,
    #[serde(default, rename = "system-ip", deserialize_with = "lenient_string")]
    pub system_ip: Option<String>,
    #[serde(default, rename = "site-id", deserialize_with = "lenient_string")]
    pub site_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: Option<String>,
    #[serde(default, rename = "device-model", deserialize_with = "lenient_string")]
    pub device_model: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reachability: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One entry of `GET dataservice/template/device/config/attached/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachedDeviceRecord {
    pub uuid: String,
    #[serde(default, rename = "host-name", deserialize_with = "lenient_string")]
    pub host_name: Option<String>,
    #[serde(default, rename = "deviceIP", deserialize_with = "lenient_string")]
    pub device_ip: Option<String>,
    #[serde(default, rename = "site-id", deserialize_with = "lenient_string")]
    pub site_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub personality: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Templates ────────────────────────────────────────────────────────

/// One entry of `GET dataservice/template/device`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    pub template_id: String,
    #[serde(default)]
    pub template_name: Option<String>,
    #[serde(default)]
    pub template_description: Option<String>,
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub devices_attached: u64,
    /// Number of feature templates composing this device template.
    #[serde(default)]
    pub template_attached: u64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body of `POST dataservice/template/device/config/input`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputRequest {
    pub template_id: String,
    pub device_ids: Vec<String>,
    pub is_edited: bool,
    pub is_master_edited: bool,
}

/// One device row of template variables: `csv-*` bookkeeping keys plus
/// `/path/to/variable` keys, all string-valued.
pub type DeviceInputRow = serde_json::Map<String, serde_json::Value>;

/// Body of `POST dataservice/template/device/config/attachfeature`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachRequest {
    pub device_template_list: Vec<DeviceTemplateAttachment>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceTemplateAttachment {
    pub template_id: String,
    pub device: Vec<DeviceInputRow>,
    pub is_edited: bool,
    pub is_master_edited: bool,
}

/// Body of `POST dataservice/template/config/device/mode/cli`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetachRequest {
    pub device_type: String,
    pub devices: Vec<DetachTarget>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetachTarget {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    #[serde(rename = "deviceIP")]
    pub device_ip: String,
}

// ── Actions ──────────────────────────────────────────────────────────

/// `GET dataservice/device/action/status/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionStatusResponse {
    pub summary: ActionSummary,
    /// Per-device progress rows.
    #[serde(default)]
    pub data: Vec<ActionDeviceRecord>,
}

/// `summary` object: overall status plus an outcome tally such as
/// `{"Success": 1, "Failure": 0}`. The tally is absent while pending.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionSummary {
    pub status: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub count: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActionDeviceRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub uuid: Option<String>,
    #[serde(default, rename = "host-name", deserialize_with = "lenient_string")]
    pub host_name: Option<String>,
    #[serde(default, rename = "system-ip", deserialize_with = "lenient_string")]
    pub system_ip: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "statusId")]
    pub status_id: Option<String>,
    #[serde(default)]
    pub activity: Vec<String>,
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Accept strings, numbers, and booleans for fields the controller is
/// inconsistent about (`site-id` is a string on some releases, a number
/// on others). `null` maps to `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn device_record_accepts_numeric_site_id() {
        let record: DeviceRecord = serde_json::from_value(json!({
            "uuid": "u1",
            "host-name": "r1",
            "site-id": 100,
            "board-serial": "SN1"
        }))
        .unwrap();
        assert_eq!(record.site_id.as_deref(), Some("100"));
        assert_eq!(record.host_name.as_deref(), Some("r1"));
        assert!(record.version.is_none());
        assert_eq!(record.extra.get("board-serial"), Some(&json!("SN1")));
    }

    #[test]
    fn envelope_without_data_is_rejected() {
        let result = serde_json::from_value::<DataEnvelope<DeviceRecord>>(json!({"header": {}}));
        assert!(result.is_err());
    }

    #[test]
    fn pending_summary_has_empty_count() {
        let status: ActionStatusResponse =
            serde_json::from_value(json!({"summary": {"status": "in_progress"}})).unwrap();
        assert_eq!(status.summary.status, "in_progress");
        assert!(status.summary.count.is_empty());
        assert!(status.data.is_empty());
    }

    #[test]
    fn detach_request_uses_controller_field_names() {
        let body = DetachRequest {
            device_type: "vedge".into(),
            devices: vec![DetachTarget {
                device_id: "u1".into(),
                device_ip: "1.1.1.1".into(),
            }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "deviceType": "vedge",
                "devices": [{"deviceId": "u1", "deviceIP": "1.1.1.1"}]
            })
        );
    }
}
