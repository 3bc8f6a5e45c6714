//! CLI command definitions.

pub mod groups;
pub mod logs;
pub mod users;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{OktaConfig, DEFAULT_SCOPES};
use crate::error::Result;

/// Administer users, groups and audit logs of an Okta organisation.
#[derive(Debug, Parser)]
#[command(name = "oktactl", version)]
#[command(about = "Administer users, groups and audit logs of an Okta organisation", long_about = None)]
pub struct Cli {
    /// Client ID of the Okta service application.
    #[arg(long, env = "OKTACTL_CLIENT_ID")]
    pub client_id: String,

    /// RSA private key of the service application: PEM text or a path to a PEM file.
    #[arg(long, env = "OKTACTL_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Organisation URL, e.g. https://acme.okta.com.
    #[arg(long, env = "OKTACTL_ORG_URL")]
    pub org_url: String,

    /// Space separated OAuth scopes to request.
    #[arg(long, env = "OKTACTL_SCOPES", default_value = DEFAULT_SCOPES)]
    pub scopes: String,

    /// Key ID (`kid`) registered for the private key.
    #[arg(long, env = "OKTACTL_KEY_ID")]
    pub key_id: Option<String>,

    /// Output format.
    #[arg(long, global = true, env = "OKTACTL_OUTPUT_FORMAT", default_value = "table")]
    pub output_format: OutputFormat,

    /// Log debug information to stderr.
    #[arg(short, long, global = true, env = "OKTACTL_VERBOSE")]
    pub verbose: bool,

    /// Suppress progress messages.
    #[arg(short, long, global = true, env = "OKTACTL_QUIET", conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Validate the connection options.
    pub fn okta_config(&self) -> Result<OktaConfig> {
        OktaConfig::new(
            &self.org_url,
            &self.client_id,
            &self.private_key,
            self.key_id.as_deref(),
            &self.scopes,
        )
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Activate a STAGED or DEPROVISIONED user.
    ActivateUser(users::ActivateUserArgs),
    /// Deactivate (deprovision) a user.
    DeactivateUser(users::UserIdArgs),
    /// Delete a deprovisioned user.
    DeleteUser(users::DeleteUserArgs),
    /// Expire a user's password and print a temporary one.
    ExpirePasswordAndGetTemporaryPassword(users::ExpirePasswordArgs),
    /// Create a STAGED user.
    CreateUser(users::CreateUserArgs),
    /// List users, optionally only the members of a group.
    ListUsers(users::ListUsersArgs),
    /// Add a user to a group.
    AddUserToGroup(groups::MembershipArgs),
    /// Remove a user from a group.
    RemoveUserFromGroup(groups::MembershipArgs),
    /// List groups, optionally only those of a user.
    ListGroups(groups::ListGroupsArgs),
    /// Query the System Log.
    Logs(logs::LogsArgs),
    /// Check that the credentials work.
    Ping,
}
