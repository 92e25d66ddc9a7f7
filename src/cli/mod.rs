// ABOUTME: CLI argument parsing and command routing for apimctl
//
// Provides command-line access to the admin backend:
// - Browsing entity lists (list, show)
// - Editing entities through the form controllers (save, deny-status)
// - Deleting entities (delete)
// - Adding roles through the add-role wizard (role add)
// - Managing the stored access token (auth)

pub mod auth;
pub mod delete;
pub mod list;
pub mod role;
pub mod save;
pub mod util;

use crate::api::{AdminApi, ResourceFamily};
use crate::config::AppConfig;
use crate::credentials;
use crate::forms::FormKind;
use crate::i18n::{CatalogLocalizer, DefaultLocalizer, Localizer};
use crate::notify::{ConsoleNotifier, Notifier};
use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::sync::Arc;

/// Admin console for an API management backend
#[derive(Parser)]
#[command(name = "apimctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List the entities of one family
    List(ListArgs),

    /// Show one entity
    Show(ShowArgs),

    /// Delete one entity
    Delete(DeleteArgs),

    /// Create or edit an entity through its form
    Save(SaveArgs),

    /// Enable or disable a deny policy
    DenyStatus(DenyStatusArgs),

    /// Manage roles
    #[command(subcommand)]
    Role(RoleCommands),

    /// Store or clear the admin API access token
    Auth(AuthArgs),
}

/// Arguments for the list command
#[derive(clap::Args)]
pub struct ListArgs {
    /// Entity family (application-policies, subscription-policies, advanced-policies,
    /// deny-policies, api-categories, key-managers)
    pub family: ResourceFamily,

    /// Only show rows containing this text
    #[arg(long)]
    pub search: Option<String>,

    /// Sort by this field
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

/// Arguments for the show command
#[derive(clap::Args)]
pub struct ShowArgs {
    pub family: ResourceFamily,

    /// Entity ID
    pub id: String,
}

/// Arguments for the delete command
#[derive(clap::Args)]
pub struct DeleteArgs {
    pub family: ResourceFamily,

    /// Entity ID
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub force: bool,
}

/// Arguments for the save command
#[derive(clap::Args)]
pub struct SaveArgs {
    /// Form to drive (application-policy, deny-policy, api-category)
    pub form: FormKind,

    /// Edit this entity instead of creating a new one
    #[arg(long)]
    pub id: Option<String>,

    /// Field assignment, e.g. --set policyName=Gold (values parse as JSON when possible)
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = util::parse_assignment)]
    pub assignments: Vec<(String, Value)>,
}

/// Arguments for the deny-status command
#[derive(clap::Args)]
pub struct DenyStatusArgs {
    /// Deny policy condition ID
    pub id: String,

    /// New condition status
    #[arg(long, action = clap::ArgAction::Set)]
    pub enabled: bool,
}

#[derive(Subcommand)]
pub enum RoleCommands {
    /// Add a role as an alias of existing roles or with its own permissions
    Add(RoleAddArgs),
}

/// Arguments for the role add command
#[derive(clap::Args)]
#[command(group(ArgGroup::new("strategy").required(true).args(["aliases", "scopes"])))]
pub struct RoleAddArgs {
    /// Name of the new role
    pub name: String,

    /// Existing role the new role becomes an alias of (repeatable)
    #[arg(long = "alias", value_name = "ROLE")]
    pub aliases: Vec<String>,

    /// Scope to grant the new role, e.g. apim:api_view (repeatable)
    #[arg(long = "scope", value_name = "SCOPE")]
    pub scopes: Vec<String>,
}

/// Arguments for the auth command
#[derive(clap::Args)]
#[command(group(ArgGroup::new("action").required(true).args(["token", "clear"])))]
pub struct AuthArgs {
    /// Store this access token in the system keychain
    #[arg(long)]
    pub token: Option<String>,

    /// Remove the stored access token
    #[arg(long)]
    pub clear: bool,
}

/// Everything a command needs to talk to the backend
pub struct Console {
    pub config: AppConfig,
    pub api: AdminApi,
    pub intl: Arc<dyn Localizer>,
    pub notifier: Arc<dyn Notifier>,
}

impl Console {
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let token = credentials::resolve_access_token().unwrap_or_else(|e| {
            tracing::warn!("Could not read access token from keychain: {}", e);
            None
        });
        let api = AdminApi::connect(config.http_settings(token))?;

        let intl: Arc<dyn Localizer> = match &config.ui.locale_catalog {
            Some(path) => Arc::new(CatalogLocalizer::load(path)?),
            None => Arc::new(DefaultLocalizer),
        };

        Ok(Self {
            config,
            api,
            intl,
            notifier: Arc::new(ConsoleNotifier),
        })
    }
}

/// Run a parsed command line
pub async fn execute(cli: Cli, config: AppConfig) -> Result<()> {
    let format = cli.format;
    // Auth runs without a backend connection
    let connect = move || Console::from_config(config);
    match cli.command {
        Commands::Auth(args) => auth::execute(&args),
        Commands::List(args) => list::execute(&connect()?, args, format).await,
        Commands::Show(args) => list::show(&connect()?, &args, format).await,
        Commands::Delete(args) => delete::execute(&connect()?, &args, format).await,
        Commands::Save(args) => save::execute(&connect()?, args, format).await,
        Commands::DenyStatus(args) => save::deny_status(&connect()?, &args, format).await,
        Commands::Role(RoleCommands::Add(args)) => role::add(&connect()?, args, format).await,
    }
}
