//! CLI configuration: thin wrapper around `maspatas_config`.
//!
//! Loads the shared config, then applies `GlobalOpts` flag overrides
//! (--api-url, --credential-file, ...) before the dashboard is built.

use std::path::PathBuf;

use maspatas_core::Dashboard;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use maspatas_config::{Config, CredentialBackend, save_config_to};

/// Config file in effect: `--config` or the platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(maspatas_config::config_path)
}

/// Load file + environment, then apply flag overrides.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = maspatas_config::load_config_from(&config_file(global))?;
    apply_overrides(&mut cfg, global);
    Ok(cfg)
}

/// Flags win over file and environment.
pub fn apply_overrides(cfg: &mut Config, global: &GlobalOpts) {
    if let Some(ref url) = global.api_url {
        cfg.api_url.clone_from(url);
    }
    if let Some(ref origin) = global.origin {
        cfg.origin.clone_from(origin);
    }
    if let Some(ref path) = global.credential_file {
        cfg.credential_store = CredentialBackend::File;
        cfg.credential_file = Some(path.clone());
    }
    if global.insecure {
        cfg.insecure = true;
    }
    if let Some(secs) = global.timeout {
        cfg.timeout_secs = Some(secs);
    }
}

/// Build the dashboard from resolved config, restoring any stored session.
pub fn build_dashboard(cfg: &Config) -> Result<Dashboard, CliError> {
    let dashboard_config = cfg.dashboard_config()?;
    let credentials = cfg.credential_store()?;
    tracing::debug!(api_url = %dashboard_config.api_url, "using backend");
    Ok(Dashboard::new(&dashboard_config, credentials)?)
}

/// Human-readable location of the credential store, for `status`.
pub fn credential_location(cfg: &Config) -> String {
    match cfg.credential_store {
        CredentialBackend::Keyring => "system keyring".into(),
        CredentialBackend::File => cfg
            .credential_file
            .clone()
            .unwrap_or_else(maspatas_config::FileCredentialStore::default_path)
            .display()
            .to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["maspatas"];
        argv.extend_from_slice(args);
        argv.push("status");
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn flags_override_loaded_values() {
        let mut cfg = Config::default();
        let opts = global(&[
            "--api-url",
            "https://api.maspatas.test",
            "--credential-file",
            "/tmp/token",
            "--timeout",
            "5",
            "-k",
        ]);
        apply_overrides(&mut cfg, &opts);

        assert_eq!(cfg.api_url, "https://api.maspatas.test");
        assert_eq!(cfg.credential_file, Some(PathBuf::from("/tmp/token")));
        assert_eq!(cfg.credential_store, CredentialBackend::File);
        assert_eq!(cfg.timeout_secs, Some(5));
        assert!(cfg.insecure);
        assert_eq!(credential_location(&cfg), "/tmp/token");
    }

    #[test]
    fn origin_flag_only_touches_origin() {
        let mut cfg = Config {
            api_url: "/backend".into(),
            ..Config::default()
        };
        apply_overrides(&mut cfg, &global(&["--origin", "http://shop.local"]));
        assert_eq!(cfg.origin, "http://shop.local");
        assert_eq!(cfg.api_base_url().unwrap().as_str(), "http://shop.local/backend");
    }
}
