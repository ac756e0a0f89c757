// Device template endpoints
//
// Listing device templates, the devices attached to one, and the two
// mutating calls: attach (push feature template) and detach (switch the
// device back to CLI mode). Both mutations answer with an action id.

use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::{
    ActionIdResponse, AttachRequest, AttachedDeviceRecord, DataEnvelope, DetachRequest,
    DeviceInputRow, InputRequest, TemplateRecord,
};
use crate::session::Session;

impl Client {
    /// List device templates.
    ///
    /// `GET dataservice/template/device`
    pub async fn list_templates(&self, session: &Session) -> Result<Vec<TemplateRecord>, Error> {
        debug!("listing device templates");
        self.get_data(session, "dataservice/template/device").await
    }

    /// List the devices currently attached to a template.
    ///
    /// `GET dataservice/template/device/config/attached/{templateId}`
    pub async fn list_attached_devices(
        &self,
        session: &Session,
        template_id: &str,
    ) -> Result<Vec<AttachedDeviceRecord>, Error> {
        debug!(template_id, "listing attached devices");
        let path = format!(
            "dataservice/template/device/config/attached/{}",
            encode_segment(template_id)
        );
        self.get_data(session, &path).await
    }

    /// Generate the per-device variable rows for a template.
    ///
    /// `POST dataservice/template/device/config/input`
    pub async fn generate_device_inputs(
        &self,
        session: &Session,
        request: &InputRequest,
    ) -> Result<Vec<DeviceInputRow>, Error> {
        debug!(
            template_id = %request.template_id,
            devices = request.device_ids.len(),
            "generating device inputs"
        );
        let envelope: DataEnvelope<DeviceInputRow> = self
            .post_json(session, "dataservice/template/device/config/input", request)
            .await?;
        Ok(envelope.data)
    }

    /// Attach a device template.
    ///
    /// `POST dataservice/template/device/config/attachfeature`
    pub async fn attach_feature(
        &self,
        session: &Session,
        request: &AttachRequest,
    ) -> Result<String, Error> {
        debug!(templates = request.device_template_list.len(), "attaching device template");
        let resp: ActionIdResponse = self
            .post_json(
                session,
                "dataservice/template/device/config/attachfeature",
                request,
            )
            .await?;
        Ok(resp.id)
    }

    /// Detach devices from their template by switching them to CLI mode.
    ///
    /// `POST dataservice/template/config/device/mode/cli`
    pub async fn detach_to_cli_mode(
        &self,
        session: &Session,
        request: &DetachRequest,
    ) -> Result<String, Error> {
        debug!(
            device_type = %request.device_type,
            devices = request.devices.len(),
            "switching devices to CLI mode"
        );
        let resp: ActionIdResponse = self
            .post_json(
                session,
                "dataservice/template/config/device/mode/cli",
                request,
            )
            .await?;
        Ok(resp.id)
    }
}

/// Percent-encode an identifier used as a single path segment.
pub(crate) fn encode_segment(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
