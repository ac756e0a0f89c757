// ── Device domain types ──

use serde::{Deserialize, Serialize};

/// A device in the fabric (edge router, controller, or management node).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub uuid: String,
    pub host_name: Option<String>,
    pub device_type: Option<String>,
    pub system_ip: Option<String>,
    pub site_id: Option<String>,
    pub version: Option<String>,
    pub model: Option<String>,
    pub reachability: Option<String>,
}

/// A device attached to a device template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedDevice {
    pub uuid: String,
    pub host_name: Option<String>,
    pub device_ip: Option<String>,
    pub site_id: Option<String>,
    /// Device role as reported by the controller (`vedge`, `vsmart`, ...).
    pub personality: Option<String>,
}
