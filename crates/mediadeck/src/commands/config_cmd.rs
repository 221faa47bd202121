//! Config subcommand handlers.

use dialoguer::{Input, Select};

use mediadeck_config::{Config, Profile, config_path, load_config_or_default, save_config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn profile_names(cfg: &Config) -> String {
    let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

/// Replace plaintext tokens so `config show` is safe to paste.
fn redact(cfg: &mut Config) {
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some(REDACTED.into());
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => init(global),

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let mut cfg = load_config_or_default();
            redact(&mut cfg);
            let out = output::render_single(
                global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|e| format!("<unprintable: {e}>")),
                |c| c.active_profile_name(global.profile.as_deref()),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config_path().display().to_string(), global.quiet);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = load_config_or_default();
            let default = config::active_profile_name(global, &cfg);
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: mediadeck config init");
                return Ok(());
            }
            let mut names: Vec<_> = cfg.profiles.keys().collect();
            names.sort();
            let lines: Vec<String> = names
                .into_iter()
                .map(|name| {
                    let marker = if *name == default { " *" } else { "" };
                    format!("{name}{marker}")
                })
                .collect();
            output::print_output(&lines.join("\n"), global.quiet);
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: profile_names(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }
    }
}

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let path = config_path();
    eprintln!("mediadeck configuration wizard");
    eprintln!("   Config path: {}\n", path.display());

    let mut cfg = load_config_or_default();

    // 1. Profile name
    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default(global.profile.clone().unwrap_or_else(|| "default".into()))
        .interact_text()
        .map_err(prompt_err)?;

    // 2. Server URL
    let server: String = Input::new()
        .with_prompt("Server URL")
        .default(
            global
                .server
                .clone()
                .unwrap_or_else(|| "http://localhost:8080".into()),
        )
        .validate_with(|raw: &String| {
            mediadeck_config::parse_server_url(raw)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(prompt_err)?;

    let mut profile = Profile::new(server);

    // 3. Token (optional)
    let token = rpassword::prompt_password("Bearer token (empty for none): ").map_err(prompt_err)?;
    if !token.is_empty() {
        let choices = &[
            "Store in system keyring (recommended)",
            "Read from an environment variable",
            "Save to config file (plaintext)",
        ];
        let selection = Select::new()
            .with_prompt("Where should the token live?")
            .items(choices)
            .default(0)
            .interact()
            .map_err(prompt_err)?;

        match selection {
            0 => {
                mediadeck_config::store_token(&profile_name, &token)?;
                eprintln!("   Token stored in system keyring");
            }
            1 => {
                let var: String = Input::new()
                    .with_prompt("Variable name")
                    .default("MEDIADECK_TOKEN".into())
                    .interact_text()
                    .map_err(prompt_err)?;
                eprintln!("   Remember to export {var}");
                profile.token_env = Some(var);
            }
            _ => profile.token = Some(token),
        }
    }

    // 4. TLS
    if global.insecure {
        profile.insecure = Some(true);
    }

    cfg.profiles.insert(profile_name.clone(), profile);
    if cfg.default_profile.is_none() || cfg.profiles.len() == 1 {
        cfg.default_profile = Some(profile_name.clone());
    }
    save_config(&cfg)?;

    eprintln!("\nConfiguration written to {}", path.display());
    eprintln!("  Profile: {profile_name}");
    eprintln!("\n  Test it: mediadeck --profile {profile_name} dashboard");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_hides_plaintext_tokens() {
        let mut cfg = Config::default();
        let mut with_token = Profile::new("https://a.example");
        with_token.token = Some("secret".into());
        cfg.profiles.insert("a".into(), with_token);
        cfg.profiles
            .insert("b".into(), Profile::new("https://b.example"));

        redact(&mut cfg);
        assert_eq!(cfg.profiles["a"].token.as_deref(), Some(REDACTED));
        assert_eq!(cfg.profiles["b"].token, None);
        assert_eq!(profile_names(&cfg), "a, b");
    }
}
