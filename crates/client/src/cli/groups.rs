//! Group CLI commands.

use clap::Args;

/// A user and a group.
#[derive(Debug, Args)]
pub struct MembershipArgs {
    /// User ID.
    pub user: String,
    /// Group ID.
    pub group: String,
}

/// Arguments of `list-groups`.
#[derive(Debug, Args)]
pub struct ListGroupsArgs {
    /// Only list the groups of this user.
    #[arg(long, env = "OKTACTL_USER_ID")]
    pub user_id: Option<String>,
}
