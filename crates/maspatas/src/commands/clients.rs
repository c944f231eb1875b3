//! Client command handlers.

use maspatas_core::{Client, Dashboard, EntityKind};
use tabled::Tabled;

use crate::cli::{ClientsArgs, ClientsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
}

impl From<&Client> for ClientRow {
    fn from(c: &Client) -> Self {
        Self {
            id: c.id.clone(),
            name: c.full_name.clone(),
            email: c.email.clone(),
        }
    }
}

fn detail(c: &Client) -> String {
    output::detail_lines(&[
        ("ID", c.id.clone()),
        ("Name", c.full_name.clone()),
        ("Email", c.email.clone()),
    ])
}

pub async fn handle(
    dashboard: &Dashboard,
    args: ClientsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ClientsCommand::List => {
            let clients = dashboard.list_clients().await?;
            let out = output::render_list(
                global.output,
                &clients,
                |c| ClientRow::from(c),
                |c| c.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ClientsCommand::Get { client } => {
            let found = dashboard
                .get_client(&client)
                .await
                .map_err(|e| CliError::from(e).with_list_command("clients list"))?;
            let out = output::render_single(global.output, &found, detail, |c| c.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ClientsCommand::Create {
            client_id,
            name,
            email,
        } => {
            dashboard.edit_client(|d| {
                d.client_id = client_id;
                d.full_name = name;
                d.email = email;
            });
            util::submit_draft(dashboard, EntityKind::Client, "id", global).await
        }
    }
}
