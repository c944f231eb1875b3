//! Config subcommand handlers.

use dialoguer::{Confirm, Input, Select};
use tracing::warn;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, CredentialBackend};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

/// Config rendered the way it is written to disk.
fn config_toml(cfg: &Config) -> Result<String, CliError> {
    toml::to_string_pretty(cfg).map_err(|e| CliError::Validation {
        field: "config".into(),
        reason: format!("failed to serialize config: {e}"),
    })
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let path = config::config_file(global);
            eprintln!("MasPatas CLI configuration");
            eprintln!("   Config path: {}\n", path.display());

            if path.exists()
                && !global.yes
                && !Confirm::new()
                    .with_prompt("A config file already exists. Overwrite it?")
                    .default(false)
                    .interact()
                    .map_err(prompt_err)?
            {
                return Ok(());
            }

            // Start from whatever is already in effect so Enter keeps it.
            let current = config::load(global).unwrap_or_else(|e| {
                warn!(error = %e, "current config unreadable, prompting from defaults");
                Config::default()
            });

            let api_url: String = Input::new()
                .with_prompt("API URL (absolute, or relative to the origin)")
                .default(current.api_url.clone())
                .interact_text()
                .map_err(prompt_err)?;

            let origin: String = Input::new()
                .with_prompt("Origin")
                .default(current.origin.clone())
                .interact_text()
                .map_err(prompt_err)?;

            let username: String = Input::new()
                .with_prompt("Username")
                .default(current.username.clone())
                .interact_text()
                .map_err(prompt_err)?;

            let store_choices = &[
                "File in the data directory (default)",
                "System keyring",
            ];
            let credential_store = match Select::new()
                .with_prompt("Where should the session token be kept?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?
            {
                0 => CredentialBackend::File,
                _ => CredentialBackend::Keyring,
            };

            let cfg = Config {
                api_url,
                origin,
                username,
                credential_store,
                ..current
            };
            // Reject a URL that cannot resolve before writing it.
            cfg.api_base_url()?;

            config::save_config_to(&cfg, &path)?;
            eprintln!("\n✓ Configuration written to {}", path.display());
            eprintln!("\n  Test it: maspatas health");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let rendered = config_toml(&cfg)?;
            let out = output::render_single(
                global.output,
                &cfg,
                |_| rendered.clone(),
                |c| c.api_url.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_file(global).display().to_string(), false);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn config_toml_matches_the_file_format() {
        let cfg = Config {
            api_url: "https://api.maspatas.test/v1".into(),
            username: "ana".into(),
            ..Config::default()
        };
        let text = config_toml(&cfg).unwrap();
        assert!(text.contains("api_url = \"https://api.maspatas.test/v1\""), "{text}");
        assert!(text.contains("username = \"ana\""), "{text}");

        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.api_url, cfg.api_url);
    }
}
