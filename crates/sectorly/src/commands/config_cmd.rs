//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Input, Select};

use sectorly_config::{Config, Defaults, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of `cfg` with plaintext secrets masked.
fn redacted(cfg: &Config) -> Config {
    Config {
        default_profile: cfg.default_profile.clone(),
        defaults: Defaults {
            output: cfg.defaults.output.clone(),
            color: cfg.defaults.color.clone(),
            timeout: cfg.defaults.timeout,
        },
        profiles: cfg
            .profiles
            .iter()
            .map(|(name, p)| {
                let mut p = p.clone();
                p.password = p.password.map(|_| MASK.into());
                p.code = p.code.map(|_| MASK.into());
                (name.clone(), p)
            })
            .collect(),
    }
}

fn format_config(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "panel_id = \"{}\"", p.panel_id);
        if let Some(ref email) = p.email {
            let _ = writeln!(out, "email = \"{email}\"");
        }
        if let Some(ref password) = p.password {
            let _ = writeln!(out, "password = \"{password}\"");
        }
        if let Some(ref code) = p.code {
            let _ = writeln!(out, "code = \"{code}\"");
        }
        if let Some(format) = p.code_format {
            let _ = writeln!(out, "code_format = {format}");
        }
        if let Some(ref url) = p.api_url {
            let _ = writeln!(out, "api_url = \"{url}\"");
        }
        if let Some(interval) = p.update_interval {
            let _ = writeln!(out, "update_interval = {interval}");
        }
        if let Some(cycle) = p.cycle_timeout {
            let _ = writeln!(out, "cycle_timeout = {cycle}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }

        let f = &p.fetch;
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}.fetch]");
        for (key, on) in [
            ("fetch_temperatures", f.fetch_temperatures),
            ("fetch_humidity", f.fetch_humidity),
            ("fetch_leakage_detectors", f.fetch_leakage_detectors),
            ("fetch_smoke_detectors", f.fetch_smoke_detectors),
            ("fetch_doors_windows", f.fetch_doors_windows),
            ("fetch_cameras", f.fetch_cameras),
            ("fetch_smartplugs", f.fetch_smartplugs),
        ] {
            let _ = writeln!(out, "{key} = {on}");
        }
    }

    out.trim_end().to_owned()
}

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_secret(label: &str) -> Result<String, CliError> {
    let secret = rpassword::prompt_password(format!("{label}: ")).map_err(prompt_err)?;
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: label.to_lowercase(),
            reason: "cannot be empty".into(),
        });
    }
    Ok(secret)
}

/// Store in the keyring, or hand the secret back for plaintext config.
fn store_or_return(profile_name: &str, kind: &str, secret: String) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt(format!("Where should the {kind} be stored?"))
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        sectorly_config::store_secret(profile_name, kind, &secret)?;
        eprintln!("   ✓ {kind} stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(secret))
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path(global);
    match args.command {
        ConfigCommand::Init => {
            eprintln!("sectorly configuration");
            eprintln!("   Config path: {}\n", path.display());

            let mut cfg = config::load(global)?;

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;
            let email: String = Input::new()
                .with_prompt("Account e-mail")
                .interact_text()
                .map_err(prompt_err)?;
            let panel_id: String = Input::new()
                .with_prompt("Panel ID")
                .interact_text()
                .map_err(prompt_err)?;

            let password = prompt_secret("Password")?;
            let password = store_or_return(&profile_name, "password", password)?;

            let profile = Profile {
                email: Some(email),
                password,
                panel_id,
                ..Profile::default()
            };
            cfg.profiles.insert(profile_name.clone(), profile);
            if cfg.profiles.len() == 1 {
                cfg.default_profile = Some(profile_name.clone());
            }
            sectorly_config::save_config_to(&cfg, &path)?;

            eprintln!("\n✓ Configuration written to {}", path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: sectorly status");
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = redacted(&config::load(global)?);
            let out = output::render_single(&global.output, &cfg, format_config, |c| {
                c.default_profile.clone().unwrap_or_default()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load(global)?;
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: sectorly config init");
            } else {
                for name in cfg.profiles.keys() {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load(global)?;
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", "),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            sectorly_config::save_config_to(&cfg, &path)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        ConfigCommand::SetPassword => set_secret(global, "password", "Password"),
        ConfigCommand::SetCode => set_secret(global, "code", "User code"),
    }
}

fn set_secret(global: &GlobalOpts, kind: &str, label: &str) -> Result<(), CliError> {
    let cfg = config::load(global)?;
    let profile_name = config::active_profile_name(global, &cfg);
    let secret = prompt_secret(label)?;
    sectorly_config::store_secret(&profile_name, kind, &secret)?;
    eprintln!("✓ {label} stored in system keyring for profile '{profile_name}'");
    Ok(())
}
