// Session handshake
//
// vManage authenticates in two steps: a form post to `j_security_check`
// sets a session cookie, then `dataservice/client/token` hands out the XSRF
// token that must accompany every mutating call. Both are captured in an
// explicit `Session` value owned by the caller.

use reqwest::StatusCode;
use reqwest::header::{COOKIE, HeaderMap, SET_COOKIE};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace};

use crate::client::Client;
use crate::endpoint::Endpoint;
use crate::error::Error;

const LOGIN_PATH: &str = "j_security_check";
const TOKEN_PATH: &str = "dataservice/client/token";

/// Username/password pair. Only read during [`Client::login`].
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Authenticated context for one controller.
///
/// Holds the session cookie and the XSRF token. Read-only after login;
/// there is no refresh or logout, the session lives as long as the process.
#[derive(Debug, Clone)]
pub struct Session {
    endpoint: Endpoint,
    cookie: SecretString,
    token: SecretString,
}

impl Session {
    /// The controller this session was minted for.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// `Cookie` header value (e.g. `JSESSIONID=...`).
    pub fn cookie(&self) -> &SecretString {
        &self.cookie
    }

    /// Value sent in the `X-XSRF-TOKEN` header.
    pub fn token(&self) -> &SecretString {
        &self.token
    }
}

impl Client {
    /// Authenticate with the controller and fetch an XSRF token.
    ///
    /// Fails with [`Error::InvalidCredentials`] when the controller answers
    /// the form with its HTML login page or sets no cookie; the token
    /// endpoint is not contacted in that case.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, Error> {
        let url = self.endpoint().url(LOGIN_PATH)?;
        debug!(%url, username = %credentials.username, "submitting login form");

        let resp = self
            .http()
            .post(url)
            .form(&[
                ("j_username", credentials.username.as_str()),
                ("j_password", credentials.password.expose_secret()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let cookie = session_cookie(resp.headers());
        let body = resp.text().await?;

        if looks_like_login_page(&body) {
            debug!(%status, "controller returned its login page");
            return Err(Error::InvalidCredentials);
        }

        if !(status.is_success() || status.is_redirection()) {
            return Err(Error::RequestFailed {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        let Some(cookie) = cookie else {
            debug!(%status, "login response carried no session cookie");
            return Err(Error::InvalidCredentials);
        };

        let token = self.fetch_token(&cookie).await?;
        debug!("login successful");

        Ok(Session {
            endpoint: self.endpoint().clone(),
            cookie,
            token,
        })
    }

    /// `GET dataservice/client/token` using the fresh session cookie.
    async fn fetch_token(&self, cookie: &SecretString) -> Result<SecretString, Error> {
        let url = self.endpoint().url(TOKEN_PATH)?;
        debug!(%url, "requesting XSRF token");

        let resp = self
            .http()
            .get(url)
            .header(COOKIE, cookie.expose_secret())
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(Error::TokenUnavailable {
                status: status.as_u16(),
            });
        }

        let token = resp.text().await?;
        let token = token.trim();
        if token.is_empty() || looks_like_login_page(token) {
            return Err(Error::TokenUnavailable {
                status: status.as_u16(),
            });
        }

        trace!("XSRF token received");
        Ok(SecretString::from(token.to_owned()))
    }
}

/// The controller signals a rejected login (and an expired session) by
/// serving its HTML login page instead of an empty body or JSON.
pub(crate) fn looks_like_login_page(body: &str) -> bool {
    body.to_ascii_lowercase().contains("<html")
}

/// Collect `name=value` pairs from every `Set-Cookie` header into one
/// `Cookie` header value. Returns `None` when no usable cookie was set.
fn session_cookie(headers: &HeaderMap) -> Option<SecretString> {
    let pairs: Vec<&str> = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .map(str::trim)
        .filter(|pair| pair.split_once('=').is_some_and(|(k, v)| !k.is_empty() && !v.is_empty()))
        .collect();

    if pairs.is_empty() {
        None
    } else {
        Some(SecretString::from(pairs.join("; ")))
    }
}

pub(crate) fn preview(body: &str) -> String {
    body.chars().take(512).collect()
}
