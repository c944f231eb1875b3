//! Shared helpers for command handlers.

use std::future::Future;
use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use maspatas_core::{Dashboard, EntityKind, Feedback};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Run `fut` behind a spinner on an interactive stderr.
pub async fn with_spinner<T>(
    global: &GlobalOpts,
    message: &'static str,
    fut: impl Future<Output = T>,
) -> T {
    if global.quiet || !std::io::stderr().is_terminal() {
        return fut.await;
    }

    let spinner = ProgressBar::new_spinner().with_message(message);
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(90));
    let out = fut.await;
    spinner.finish_and_clear();
    out
}

/// Submit the current draft for `kind` and print what the backend created.
///
/// The draft must already hold the command's arguments.
pub async fn submit_draft(
    dashboard: &Dashboard,
    kind: EntityKind,
    id_field: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let record = with_spinner(global, "Saving", dashboard.submit(kind)).await?;

    if let Feedback::Success(message) = dashboard.feedback() {
        output::notice(&message, global.quiet);
    }

    let out = output::render_single(
        global.output,
        &record,
        json_detail,
        |v| json_field(v, id_field),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Top-level scalar fields of a JSON object as aligned detail lines.
fn json_detail(value: &serde_json::Value) -> String {
    match value.as_object() {
        Some(map) => {
            let fields: Vec<(&str, String)> = map
                .iter()
                .filter(|(_, v)| !v.is_array() && !v.is_object())
                .map(|(k, v)| (k.as_str(), json_field(v, "")))
                .collect();
            output::detail_lines(&fields)
        }
        None => value.to_string(),
    }
}

/// `value[key]` as display text; `value` itself when `key` is empty.
fn json_field(value: &serde_json::Value, key: &str) -> String {
    let field = if key.is_empty() { value } else { &value[key] };
    match field {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
