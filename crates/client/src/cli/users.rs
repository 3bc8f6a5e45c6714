//! User CLI commands.

use clap::Args;

/// A single user.
#[derive(Debug, Args)]
pub struct UserIdArgs {
    /// User ID.
    pub user_id: String,
}

/// Arguments of `activate-user`.
#[derive(Debug, Args)]
pub struct ActivateUserArgs {
    /// User ID.
    pub user_id: String,
    /// Report what would happen without activating.
    #[arg(long, env = "OKTACTL_DRY_RUN")]
    pub dry_run: bool,
    /// Send the activation email to the user.
    #[arg(long, env = "OKTACTL_SEND_EMAIL")]
    pub send_email: bool,
}

/// Arguments of `delete-user`.
#[derive(Debug, Args)]
pub struct DeleteUserArgs {
    /// User ID.
    pub user_id: String,
    /// Deactivate the user first if it is not deprovisioned yet.
    #[arg(long, env = "OKTACTL_FORCE")]
    pub force: bool,
}

/// Arguments of `expire-password-and-get-temporary-password`.
#[derive(Debug, Args)]
pub struct ExpirePasswordArgs {
    /// User ID.
    pub user_id: String,
    /// Report what would happen without expiring the password.
    #[arg(long, env = "OKTACTL_DRY_RUN")]
    pub dry_run: bool,
}

/// Arguments of `create-user`.
#[derive(Debug, Args)]
pub struct CreateUserArgs {
    /// Email address, also used as login.
    pub email: String,
    /// First name.
    #[arg(long, env = "OKTACTL_FIRST_NAME")]
    pub first_name: Option<String>,
    /// Last name.
    #[arg(long, env = "OKTACTL_LAST_NAME")]
    pub last_name: Option<String>,
}

/// Arguments of `list-users`.
#[derive(Debug, Args)]
pub struct ListUsersArgs {
    /// Only list the members of this group.
    #[arg(long, env = "OKTACTL_GROUP_ID")]
    pub group_id: Option<String>,
}
