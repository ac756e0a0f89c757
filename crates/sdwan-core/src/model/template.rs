// ── Template domain types ──

use serde::{Deserialize, Serialize};

/// A device configuration template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub device_type: Option<String>,
    pub devices_attached: u64,
    /// Feature templates composing this device template.
    pub feature_templates: u64,
}
