//! Configuration for the `sdwan` CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation to `sdwan_core::ControllerConfig`. The CLI layers its
//! global flags on top through [`Overrides`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sdwan_core::{ControllerConfig, Credentials, Endpoint, TlsVerification};

/// Keyring service name; entries are keyed `{profile}/password`.
pub const KEYRING_SERVICE: &str = "sdwan";

/// Environment variable that relocates the config file.
pub const CONFIG_PATH_ENV: &str = "SDWAN_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no {what} configured for profile '{profile}'")]
    Missing { what: String, profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named controller profile. Every field is optional; whatever is
/// missing must come from flags or the environment.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Controller host name or IP.
    pub host: Option<String>,

    /// Controller HTTPS port.
    pub port: Option<u16>,

    /// Full base URL; takes precedence over host/port.
    pub url: Option<String>,

    /// Path prefix the controller is served under (e.g. "/vmanage").
    pub base_path: Option<String>,

    pub username: Option<String>,

    /// Password (plaintext; prefer the keyring).
    pub password: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS verification.
    pub insecure: Option<bool>,

    /// Per-request timeout override (seconds).
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `$SDWAN_CONFIG`, else the platform
/// config directory.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "sdwan", "sdwan").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("sdwan");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path`, layered: defaults < file < `SDWAN_*` env.
///
/// Nested keys use a double underscore, e.g. `SDWAN_DEFAULTS__TIMEOUT`
/// or `SDWAN_PROFILES__LAB__HOST`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SDWAN_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load only what is stored in the canonical file, for editing.
pub fn load_config_file() -> Result<Config, ConfigError> {
    load_config_file_from(&config_path())
}

/// Load `path` over the defaults without the environment layer, so a
/// config that is saved back holds exactly what the file held. A missing
/// file yields the defaults; a malformed one is an error.
pub fn load_config_file_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/password"),
    )?)
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password)?;
    Ok(())
}

/// Resolve the password: `SDWAN_PASSWORD` > keyring > plaintext profile value.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Env var
    if let Ok(pw) = std::env::var("SDWAN_PASSWORD") {
        return Ok(SecretString::from(pw));
    }

    // 2. Keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::Missing {
        what: "password".into(),
        profile: profile_name.into(),
    })
}

// ── ControllerConfig construction ───────────────────────────────────

/// Connection settings that take priority over the profile (CLI flags).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub base_path: Option<String>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub insecure: bool,
    pub ca_cert: Option<PathBuf>,
    pub timeout: Option<u64>,
}

/// Build the controller endpoint: a full URL wins, otherwise host and
/// port are both required.
pub fn resolve_endpoint(
    profile: &Profile,
    profile_name: &str,
    overrides: &Overrides,
) -> Result<Endpoint, ConfigError> {
    let base_path = overrides
        .base_path
        .as_deref()
        .or(profile.base_path.as_deref())
        .unwrap_or("");

    if let Some(raw) = overrides.url.as_deref().or(profile.url.as_deref()) {
        let mut url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
            field: "url".into(),
            reason: format!("invalid URL: {raw}"),
        })?;
        if !base_path.is_empty() {
            url.set_path(base_path);
        }
        return Ok(Endpoint::from_url(url));
    }

    let host = overrides
        .host
        .as_deref()
        .or(profile.host.as_deref())
        .filter(|h| !h.trim().is_empty())
        .ok_or_else(|| ConfigError::Missing {
            what: "controller host".into(),
            profile: profile_name.into(),
        })?;
    let port = overrides
        .port
        .or(profile.port)
        .ok_or_else(|| ConfigError::Missing {
            what: "controller port".into(),
            profile: profile_name.into(),
        })?;

    Endpoint::new(host.trim(), port, base_path).map_err(|e| ConfigError::Validation {
        field: "host".into(),
        reason: e.to_string(),
    })
}

/// Translate a profile plus overrides into a `ControllerConfig`.
///
/// Resolution order per field: override > profile > defaults. The
/// password falls back to [`resolve_password`].
pub fn resolve_controller_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    overrides: &Overrides,
) -> Result<ControllerConfig, ConfigError> {
    // 1. Endpoint
    let endpoint = resolve_endpoint(profile, profile_name, overrides)?;

    // 2. Credentials
    let username = overrides
        .username
        .clone()
        .or_else(|| profile.username.clone())
        .ok_or_else(|| ConfigError::Missing {
            what: "username".into(),
            profile: profile_name.into(),
        })?;
    let password = match overrides.password {
        Some(ref pw) => pw.clone(),
        None => resolve_password(profile, profile_name)?,
    };

    // 3. TLS verification
    let tls = if overrides.insecure || profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ca_path) = overrides.ca_cert.as_ref().or(profile.ca_cert.as_ref()) {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    // 4. Timeout
    let timeout = Duration::from_secs(
        overrides
            .timeout
            .or(profile.timeout)
            .unwrap_or(defaults.timeout),
    );

    Ok(ControllerConfig {
        endpoint,
        credentials: Credentials::new(username, password),
        tls,
        timeout,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn lab() -> Profile {
        Profile {
            host: Some("10.10.20.90".into()),
            port: Some(8443),
            username: Some("admin".into()),
            ..Profile::default()
        }
    }

    fn with_password() -> Overrides {
        Overrides {
            password: Some(SecretString::from("s3cret".to_string())),
            ..Overrides::default()
        }
    }

    #[test]
    fn profile_resolves_to_https_endpoint() {
        let cfg =
            resolve_controller_config(&lab(), "lab", &Defaults::default(), &with_password())
                .unwrap();

        assert_eq!(cfg.endpoint.to_string(), "https://10.10.20.90:8443/");
        assert_eq!(cfg.credentials.username, "admin");
        assert_eq!(cfg.credentials.password.expose_secret(), "s3cret");
        assert_eq!(cfg.tls, TlsVerification::SystemDefaults);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn flags_override_profile_values() {
        let overrides = Overrides {
            host: Some("vmanage.example.net".into()),
            base_path: Some("/vmanage".into()),
            username: Some("ops".into()),
            insecure: true,
            timeout: Some(5),
            ..with_password()
        };
        let cfg =
            resolve_controller_config(&lab(), "lab", &Defaults::default(), &overrides).unwrap();

        assert_eq!(
            cfg.endpoint.to_string(),
            "https://vmanage.example.net:8443/vmanage/"
        );
        assert_eq!(cfg.credentials.username, "ops");
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(cfg.timeout, Duration::from_secs(5));
    }

    #[test]
    fn url_takes_precedence_over_host_and_port() {
        let overrides = Overrides {
            url: Some("http://127.0.0.1:9000".into()),
            ..with_password()
        };
        let endpoint = resolve_endpoint(&Profile::default(), "default", &overrides).unwrap();
        assert_eq!(endpoint.to_string(), "http://127.0.0.1:9000/");
    }

    #[test]
    fn missing_port_is_reported() {
        let profile = Profile {
            port: None,
            ..lab()
        };
        let err = resolve_endpoint(&profile, "lab", &Overrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { ref what, .. } if what == "controller port"));
    }

    #[test]
    fn missing_host_is_reported_before_credentials() {
        let err = resolve_controller_config(
            &Profile::default(),
            "default",
            &Defaults::default(),
            &Overrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing { ref what, .. } if what == "controller host"));
    }

    #[test]
    fn ca_cert_applies_when_verification_is_on() {
        let profile = Profile {
            ca_cert: Some(PathBuf::from("/etc/sdwan/ca.pem")),
            ..lab()
        };
        let cfg =
            resolve_controller_config(&profile, "lab", &Defaults::default(), &with_password())
                .unwrap();
        assert_eq!(
            cfg.tls,
            TlsVerification::CustomCa(PathBuf::from("/etc/sdwan/ca.pem"))
        );
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.default_profile = Some("lab".into());
        cfg.profiles.insert("lab".into(), lab());
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.default_profile.as_deref(), Some("lab"));
        let profile = &loaded.profiles["lab"];
        assert_eq!(profile.host.as_deref(), Some("10.10.20.90"));
        assert_eq!(profile.port, Some(8443));
        assert_eq!(loaded.defaults.timeout, 30);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[profiles.lab\nhost = 1\n").unwrap();

        assert!(matches!(load_config_from(&path), Err(ConfigError::Figment(_))));
        assert!(matches!(load_config_file_from(&path), Err(ConfigError::Figment(_))));
    }

    #[test]
    fn file_only_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert("lab".into(), lab());
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_file_from(&path).unwrap();
        assert_eq!(loaded.profiles.len(), 1);
        assert_eq!(loaded.profiles["lab"].port, Some(8443));
        assert!(load_config_file_from(&dir.path().join("absent.toml"))
            .unwrap()
            .profiles
            .is_empty());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded.defaults.output, "table");
        assert!(loaded.profiles.is_empty());
    }
}
