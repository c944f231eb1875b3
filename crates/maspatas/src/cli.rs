//! Clap derive structures for the `maspatas` CLI.
//!
//! Defines the command tree, global flags, and shared value types. Only
//! clap and clap_complete may be used here: build.rs includes this file to
//! render man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// maspatas -- admin client for the MasPatas store backend
#[derive(Debug, Parser)]
#[command(
    name = "maspatas",
    version,
    about = "Manage MasPatas products, clients, inventory and sales",
    long_about = "Command-line admin client for the MasPatas retail backend.\n\n\
        Reads need no session. Creating products, clients or sales requires\n\
        signing in first with `maspatas login`; the session token is kept\n\
        between runs.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file to read instead of the platform default
    #[arg(long, env = "MASPATAS_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// API base URL, absolute or relative to --origin
    #[arg(long, short = 'u', env = "MASPATAS_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Origin a relative API URL is resolved against
    #[arg(long, env = "MASPATAS_ORIGIN", global = true)]
    pub origin: Option<String>,

    /// Keep the session token in this file
    #[arg(
        long,
        env = "MASPATAS_CREDENTIAL_FILE",
        global = true,
        value_name = "PATH"
    )]
    pub credential_file: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MASPATAS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "MASPATAS_TIMEOUT", global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one identifier per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and keep the session token
    Login(LoginArgs),

    /// Forget the stored session token
    Logout,

    /// Show backend URL and session state
    Status,

    /// List, inspect and register products
    #[command(alias = "p")]
    Products(ProductsArgs),

    /// List, inspect and register clients
    #[command(alias = "cl")]
    Clients(ClientsArgs),

    /// Show stock per product
    #[command(alias = "inv")]
    Inventory(InventoryArgs),

    /// List, inspect and register sales
    #[command(alias = "s")]
    Sales(SalesArgs),

    /// Counts, total stock and total revenue
    Summary,

    /// Check that the backend is up
    Health,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SESSION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Args)]
pub struct LoginArgs {
    /// Username (defaults to the configured one)
    #[arg(long)]
    pub username: Option<String>,

    /// Password; prompted when absent and MASPATAS_PASSWORD is unset
    #[arg(long)]
    pub password: Option<String>,
}

impl std::fmt::Debug for LoginArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginArgs")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .finish()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PRODUCTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List products
    #[command(alias = "ls")]
    List,

    /// Show one product
    Get {
        /// Product ID
        product: String,
    },

    /// Register a new product (requires login)
    Create {
        /// Product ID
        #[arg(long = "id")]
        product_id: String,

        /// Display name
        #[arg(long)]
        name: String,

        /// Stock keeping unit
        #[arg(long)]
        sku: String,

        /// Unit price as a decimal amount, e.g. 9.99
        #[arg(long)]
        price: String,

        /// Three-letter currency code
        #[arg(long, default_value = "USD")]
        currency: String,

        /// Units in stock after registration
        #[arg(long, default_value = "0")]
        stock: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CLIENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ClientsArgs {
    #[command(subcommand)]
    pub command: ClientsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClientsCommand {
    /// List clients
    #[command(alias = "ls")]
    List,

    /// Show one client
    Get {
        /// Client ID
        client: String,
    },

    /// Register a new client (requires login)
    Create {
        /// Client ID
        #[arg(long = "id")]
        client_id: String,

        /// Full name
        #[arg(long)]
        name: String,

        /// Email address
        #[arg(long)]
        email: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  INVENTORY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct InventoryArgs {
    #[command(subcommand)]
    pub command: InventoryCommand,
}

#[derive(Debug, Subcommand)]
pub enum InventoryCommand {
    /// List stock per product
    #[command(alias = "ls")]
    List,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SALES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SalesArgs {
    #[command(subcommand)]
    pub command: SalesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SalesCommand {
    /// List sales
    #[command(alias = "ls")]
    List,

    /// Show one sale with its lines
    Get {
        /// Sale ID
        sale: String,
    },

    /// Register a new sale (requires login)
    Create {
        /// Sale ID
        #[arg(long = "id")]
        sale_id: String,

        /// Client the sale belongs to
        #[arg(long)]
        client: String,

        /// Line item as PRODUCT:QTY (repeat for more lines)
        #[arg(long = "line", required = true, value_parser = parse_sale_line)]
        lines: Vec<SaleLineArg>,
    },
}

/// One `--line PRODUCT:QTY` value. The quantity stays text until the sale
/// draft is coerced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleLineArg {
    pub product_id: String,
    pub quantity: String,
}

fn parse_sale_line(raw: &str) -> Result<SaleLineArg, String> {
    let (product_id, quantity) = raw
        .rsplit_once(':')
        .ok_or_else(|| format!("expected PRODUCT:QTY, got '{raw}'"))?;
    if product_id.trim().is_empty() {
        return Err(format!("missing product in '{raw}'"));
    }
    Ok(SaleLineArg {
        product_id: product_id.trim().to_owned(),
        quantity: quantity.trim().to_owned(),
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init,

    /// Display the resolved configuration
    Show,

    /// Print the config file location
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
