// Controller endpoint addressing
//
// An endpoint is the controller root: scheme, host, port, and an optional
// base path. All API paths are joined relative to it, so a controller served
// under `/vmanage/` behind a proxy works the same as one at the root.

use std::fmt;

use url::Url;

use crate::error::Error;

/// Immutable address of a single controller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    base_url: Url,
}

impl Endpoint {
    /// Build an HTTPS endpoint from host, port, and base path.
    ///
    /// `base_path` may be empty, `/`, or a prefix such as `/vmanage`.
    pub fn new(host: &str, port: u16, base_path: &str) -> Result<Self, Error> {
        let url = Url::parse(&format!("https://{host}:{port}/"))?;
        Ok(Self::with_base_path(url, base_path))
    }

    /// Use a full base URL as-is (any scheme, path kept as the base path).
    pub fn from_url(url: Url) -> Self {
        let path = url.path().to_owned();
        Self::with_base_path(url, &path)
    }

    fn with_base_path(mut url: Url, base_path: &str) -> Self {
        let trimmed = base_path.trim_matches('/');
        if trimmed.is_empty() {
            url.set_path("/");
        } else {
            url.set_path(&format!("/{trimmed}/"));
        }
        url.set_query(None);
        url.set_fragment(None);
        Self { base_url: url }
    }

    /// The controller root URL, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join an API path (e.g. `dataservice/device`) onto the endpoint.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_url.as_str())
    }
}
