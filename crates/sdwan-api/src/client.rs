// vManage HTTP client
//
// Wraps `reqwest::Client` with endpoint-relative URL construction, session
// header injection, and `{ "data": [...] }` envelope unwrapping. Endpoint
// groups (devices, templates, actions) are inherent methods in separate
// files to keep this module focused on transport mechanics.

use reqwest::StatusCode;
use reqwest::header::COOKIE;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::endpoint::Endpoint;
use crate::error::Error;
use crate::models::DataEnvelope;
use crate::session::{Session, looks_like_login_page, preview};
use crate::transport::TransportConfig;

/// Header carrying the XSRF token on authenticated requests.
pub const XSRF_HEADER: &str = "X-XSRF-TOKEN";

/// Raw HTTP client for a single controller endpoint.
///
/// Holds no authentication state of its own: [`login`](Client::login)
/// returns a [`Session`] which every data call takes by reference.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: Endpoint,
}

impl Client {
    /// Create a client for `endpoint` from a `TransportConfig`.
    pub fn new(endpoint: Endpoint, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            endpoint,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, endpoint: Endpoint) -> Self {
        Self { http, endpoint }
    }

    /// The underlying HTTP client (for the login handshake).
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The controller this client talks to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Refuse sessions minted for another controller.
    fn check_session(&self, session: &Session) -> Result<(), Error> {
        if session.endpoint() == &self.endpoint {
            Ok(())
        } else {
            Err(Error::SessionMismatch {
                session: session.endpoint().to_string(),
                client: self.endpoint.to_string(),
            })
        }
    }

    /// Attach the session cookie and XSRF token to a request.
    fn authorize(
        builder: reqwest::RequestBuilder,
        session: &Session,
    ) -> reqwest::RequestBuilder {
        builder
            .header(COOKIE, session.cookie().expose_secret())
            .header(XSRF_HEADER, session.token().expose_secret())
    }

    /// `GET` a `dataservice/` path and unwrap the `data` envelope.
    pub(crate) async fn get_data<T: DeserializeOwned>(
        &self,
        session: &Session,
        path: &str,
    ) -> Result<Vec<T>, Error> {
        let envelope: DataEnvelope<T> = self.get_json(session, path).await?;
        Ok(envelope.data)
    }

    /// `GET` a `dataservice/` path and decode the whole body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        session: &Session,
        path: &str,
    ) -> Result<T, Error> {
        self.check_session(session)?;
        let url = self.endpoint.url(path)?;
        debug!("GET {}", url);

        let resp = Self::authorize(self.http.get(url), session).send().await?;
        parse_json(resp).await
    }

    /// `POST` a JSON body to a `dataservice/` path and decode the reply.
    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        session: &Session,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        self.check_session(session)?;
        let url = self.endpoint.url(path)?;
        debug!("POST {}", url);

        let resp = Self::authorize(self.http.post(url).json(body), session)
            .send()
            .await?;
        parse_json(resp).await
    }
}

/// Decode a JSON reply, mapping non-200 statuses and login-page bodies
/// to typed errors.
async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    let body = resp.text().await?;
    trace!(%status, len = body.len(), "response received");

    if status != StatusCode::OK {
        return Err(Error::RequestFailed {
            status: status.as_u16(),
            body: preview(&body),
        });
    }

    // An expired session is answered with the login page and HTTP 200.
    if looks_like_login_page(&body) {
        return Err(Error::SessionExpired);
    }

    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body,
    })
}
