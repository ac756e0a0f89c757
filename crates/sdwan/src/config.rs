//! CLI configuration: thin wrapper around `sdwan_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--host, --port, --url, etc.).

use secrecy::SecretString;

use sdwan_config::Overrides;
use sdwan_core::ControllerConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use sdwan_config::{
    Config, Profile, config_path, load_config, load_config_file, save_config, store_password,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names for diagnostics.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

fn overrides(global: &GlobalOpts) -> Overrides {
    Overrides {
        url: global.url.clone(),
        host: global.host.clone(),
        port: global.port,
        base_path: global.base_path.clone(),
        username: global.username.clone(),
        password: global.password.clone().map(SecretString::from),
        insecure: global.insecure,
        ca_cert: global.ca_cert.clone(),
        timeout: global.timeout,
    }
}

/// Build a `ControllerConfig` from the config file, profile, and CLI
/// overrides. Returns the profile name alongside for diagnostics.
///
/// An explicitly requested profile must exist; the implicit default may
/// be absent when flags or env supply everything.
pub fn build_controller_config(
    global: &GlobalOpts,
) -> Result<(ControllerConfig, String), CliError> {
    let cfg = load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    let profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        None => Profile::default(),
    };

    let controller = sdwan_config::resolve_controller_config(
        &profile,
        &profile_name,
        &cfg.defaults,
        &overrides(global),
    )?;

    Ok((controller, profile_name))
}
