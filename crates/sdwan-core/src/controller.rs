// ── Controller facade ──
//
// One authenticated connection to one controller. `connect` performs the
// login handshake; the resulting session is reused for every call made
// through this value and is never refreshed.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use sdwan_api::transport::{TlsMode, TransportConfig};
use sdwan_api::{Client, Endpoint, Session};

use crate::config::{ControllerConfig, PollOptions, TlsVerification};
use crate::convert;
use crate::error::CoreError;
use crate::model::{ActionId, ActionStatus, AttachedDevice, Device, Outcome, Template};
use crate::poller::{self, ActionStatusSource};
use crate::requests::{AttachTemplate, DetachDevice};

// ── Controller ───────────────────────────────────────────────────

/// An authenticated controller connection.
///
/// Credentials are consumed by [`connect()`](Self::connect) and not kept;
/// only the session cookie and XSRF token survive.
#[derive(Debug, Clone)]
pub struct Controller {
    client: Client,
    session: Session,
}

impl Controller {
    /// Log in and return a connected controller.
    pub async fn connect(config: ControllerConfig) -> Result<Self, CoreError> {
        let ControllerConfig {
            endpoint,
            credentials,
            tls,
            timeout,
        } = config;

        let transport = TransportConfig {
            tls: tls_mode(tls),
            timeout,
        };
        let client = Client::new(endpoint, &transport)?;

        debug!(endpoint = %client.endpoint(), "authenticating");
        let session = client.login(&credentials).await?;
        info!(
            endpoint = %client.endpoint(),
            username = %credentials.username,
            "session established"
        );

        Ok(Self { client, session })
    }

    /// Wrap an already established session.
    pub fn from_session(client: Client, session: Session) -> Self {
        Self { client, session }
    }

    pub fn endpoint(&self) -> &Endpoint {
        self.client.endpoint()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // ── Reads ────────────────────────────────────────────────────

    pub async fn list_devices(&self) -> Result<Vec<Device>, CoreError> {
        let records = self.client.list_devices(&self.session).await?;
        Ok(records.into_iter().map(Device::from).collect())
    }

    pub async fn list_templates(&self) -> Result<Vec<Template>, CoreError> {
        let records = self.client.list_templates(&self.session).await?;
        Ok(records.into_iter().map(Template::from).collect())
    }

    pub async fn list_attached_devices(
        &self,
        template_id: &str,
    ) -> Result<Vec<AttachedDevice>, CoreError> {
        let records = self
            .client
            .list_attached_devices(&self.session, template_id)
            .await?;
        Ok(records.into_iter().map(AttachedDevice::from).collect())
    }

    pub async fn action_status(&self, id: &ActionId) -> Result<ActionStatus, CoreError> {
        let resp = self.client.action_status(&self.session, id.as_str()).await?;
        Ok(convert::action_status(id.clone(), resp))
    }

    // ── Mutations ────────────────────────────────────────────────

    /// Submit a template attachment and return the action id to poll.
    ///
    /// With `resolve_inputs` set, the controller's generated variable row
    /// for the device is fetched first and used as the base of the payload.
    pub async fn attach_template(&self, request: &AttachTemplate) -> Result<ActionId, CoreError> {
        request.validate()?;

        let generated = if request.resolve_inputs {
            let rows = self
                .client
                .generate_device_inputs(&self.session, &request.input_request())
                .await?;
            debug!(rows = rows.len(), "device inputs generated");
            Some(request.select_row(rows)?)
        } else {
            None
        };

        let body = request.attach_request(request.device_row(generated));
        let id = self.client.attach_feature(&self.session, &body).await?;
        info!(
            action_id = %id,
            template_id = %request.template_id,
            device_id = %request.device_id,
            "template attach submitted"
        );
        Ok(ActionId::from(id))
    }

    /// Switch a device back to CLI mode and return the action id to poll.
    pub async fn detach_device(&self, request: &DetachDevice) -> Result<ActionId, CoreError> {
        request.validate()?;

        let id = self
            .client
            .detach_to_cli_mode(&self.session, &request.detach_request())
            .await?;
        info!(action_id = %id, device_id = %request.device_id, "template detach submitted");
        Ok(ActionId::from(id))
    }

    // ── Action polling ───────────────────────────────────────────

    /// Poll an action until it finishes. See [`poller::await_completion`].
    pub async fn await_completion(
        &self,
        id: &ActionId,
        opts: &PollOptions,
        cancel: &CancellationToken,
    ) -> Result<Outcome, CoreError> {
        poller::await_completion(self, id, opts, cancel).await
    }
}

impl ActionStatusSource for Controller {
    async fn fetch_status(&self, id: &ActionId) -> Result<ActionStatus, CoreError> {
        self.action_status(id).await
    }
}

fn tls_mode(tls: TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
