//! `health`: ping the backend.

use maspatas_core::{Dashboard, Health};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    let health = dashboard.health().await?;
    let color = output::should_color(global.color);

    let out = output::render_single(
        global.output,
        &health,
        |h: &Health| {
            output::detail_lines(&[
                ("Backend", dashboard.api().base_url().to_string()),
                ("Status", output::paint(&h.status, h.is_ok(), color)),
            ])
        },
        |h| h.status.clone(),
    )?;
    output::print_output(&out, global.quiet);

    if health.is_ok() {
        Ok(())
    } else {
        Err(CliError::Communication {
            message: format!("backend reports status '{}'", health.status),
        })
    }
}
