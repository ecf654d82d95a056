//! Profile resolution: the shared config crate plus command-line overrides.

use std::path::PathBuf;

use secrecy::SecretString;

use sectorly_config::{Config, Profile};
use sectorly_core::PanelConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Config file in effect: `--config`, else the platform default.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(sectorly_config::config_path)
}

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(sectorly_config::load_config_from(&config_path(global))?)
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// The active profile with flag overrides applied.
///
/// Without a stored profile, `--panel-id` alone is enough when the
/// credentials come from the environment.
pub fn effective_profile(global: &GlobalOpts, cfg: &Config) -> Result<(String, Profile), CliError> {
    let name = active_profile_name(global, cfg);
    let mut profile = match cfg.profiles.get(&name) {
        Some(profile) => profile.clone(),
        None if global.panel_id.is_some() => Profile::default(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                available: available_profiles(cfg),
                name,
            });
        }
        None => {
            return Err(CliError::NoConfig {
                path: config_path(global).display().to_string(),
            });
        }
    };

    if let Some(ref panel_id) = global.panel_id {
        profile.panel_id.clone_from(panel_id);
    }
    if let Some(ref email) = global.email {
        profile.email = Some(email.clone());
    }
    if let Some(ref api_url) = global.api_url {
        profile.api_url = Some(api_url.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    profile.timeout = Some(
        global
            .timeout
            .or(profile.timeout)
            .unwrap_or(cfg.defaults.timeout),
    );

    Ok((name, profile))
}

/// Build the core `PanelConfig` for the active profile.
pub fn resolve_panel_config(global: &GlobalOpts) -> Result<(String, Profile, PanelConfig), CliError> {
    let cfg = load(global)?;
    let (name, profile) = effective_profile(global, &cfg)?;
    let panel = sectorly_config::profile_to_panel_config(&profile, &name)?;
    Ok((name, profile, panel))
}

/// User code: `--code`, then `SECTORLY_CODE`, keyring, config, then a prompt
/// when stdin is a terminal.
pub fn resolve_code(
    flag: Option<&str>,
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, CliError> {
    if let Some(code) = flag {
        return Ok(SecretString::from(code.to_owned()));
    }
    if let Some(code) = sectorly_config::resolve_code(profile, profile_name) {
        return Ok(code);
    }
    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        let code = rpassword::prompt_password("User code: ")?;
        if !code.is_empty() {
            return Ok(SecretString::from(code));
        }
    }
    Err(CliError::NoCode)
}

fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        return "(none)".into();
    }
    cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
}
