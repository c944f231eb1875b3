//! Command dispatch: bridges CLI args -> dashboard operations -> output.

pub mod clients;
pub mod config_cmd;
pub mod health;
pub mod inventory;
pub mod products;
pub mod sales;
pub mod session;
pub mod summary;
pub mod util;

use maspatas_core::Dashboard;

use crate::cli::{Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;

/// Dispatch a backend-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    dashboard: &Dashboard,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => session::login(dashboard, args, cfg, global).await,
        Command::Logout => session::logout(dashboard, global),
        Command::Status => session::status(dashboard, cfg, global),
        Command::Products(args) => products::handle(dashboard, args, global).await,
        Command::Clients(args) => clients::handle(dashboard, args, global).await,
        Command::Inventory(args) => inventory::handle(dashboard, args, global).await,
        Command::Sales(args) => sales::handle(dashboard, args, global).await,
        Command::Summary => summary::handle(dashboard, global).await,
        Command::Health => health::handle(dashboard, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
