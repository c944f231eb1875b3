//! Session commands: login, logout, status.

use secrecy::SecretString;
use serde::Serialize;

use maspatas_core::Dashboard;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn login(
    dashboard: &Dashboard,
    args: LoginArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let username = args.username.unwrap_or_else(|| cfg.username.clone());
    let password = match args.password {
        Some(pw) => SecretString::from(pw),
        None => match maspatas_config::password_from_env() {
            Some(pw) => pw,
            None => prompt_password(&username)?,
        },
    };

    util::with_spinner(global, "Signing in", dashboard.login(&username, &password)).await?;
    announce(dashboard, global);
    Ok(())
}

pub fn logout(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    dashboard.logout()?;
    announce(dashboard, global);
    Ok(())
}

#[derive(Debug, Serialize)]
struct StatusView {
    api_url: String,
    authenticated: bool,
    credential_store: String,
}

pub fn status(dashboard: &Dashboard, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let view = StatusView {
        api_url: dashboard.api().base_url().to_string(),
        authenticated: dashboard.is_authenticated(),
        credential_store: config::credential_location(cfg),
    };
    let color = output::should_color(global.color);

    let out = output::render_single(
        global.output,
        &view,
        |v| {
            let session = if v.authenticated {
                output::paint("signed in", true, color)
            } else {
                output::paint("signed out", false, color)
            };
            output::detail_lines(&[
                ("Backend", v.api_url.clone()),
                ("Session", session),
                ("Token", v.credential_store.clone()),
            ])
        },
        |v| if v.authenticated { "signed-in" } else { "signed-out" }.into(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn prompt_password(username: &str) -> Result<SecretString, CliError> {
    let pw = rpassword::prompt_password(format!("Password for {username}: "))
        .map_err(util::prompt_err)?;
    if pw.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "cannot be empty".into(),
        });
    }
    Ok(SecretString::from(pw))
}

fn announce(dashboard: &Dashboard, global: &GlobalOpts) {
    if let Some(message) = dashboard.feedback().message() {
        output::notice(message, global.quiet);
    }
}
