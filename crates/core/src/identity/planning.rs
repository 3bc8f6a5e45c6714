//! Pure functions for calculating lifecycle plans (Functional Core).

use super::error::{CommandError, Result};
use super::types::{ActivatableUser, PasswordExpirableUser, User};

/// A primitive lifecycle action against a validated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Activate a staged or deprovisioned user.
    Activate {
        user: ActivatableUser,
        send_email: bool,
    },
    /// Expire the password and issue a temporary one.
    ExpirePassword { user: PasswordExpirableUser },
    /// Deprovision a user.
    Deactivate { user: User },
    /// Delete a user.
    Delete { user: User },
}

impl UserCommand {
    /// The user this command targets.
    pub fn user(&self) -> &User {
        match self {
            UserCommand::Activate { user, .. } => user.user(),
            UserCommand::ExpirePassword { user } => user.user(),
            UserCommand::Deactivate { user } | UserCommand::Delete { user } => user,
        }
    }
}

/// Pure function: plan the activation of a validated user.
pub fn plan_activation(user: ActivatableUser, send_email: bool) -> Vec<UserCommand> {
    vec![UserCommand::Activate { user, send_email }]
}

/// Pure function: plan a password expiry for a validated user.
pub fn plan_password_expiration(user: PasswordExpirableUser) -> Vec<UserCommand> {
    vec![UserCommand::ExpirePassword { user }]
}

/// Pure function: plan a deactivation. Already deprovisioned users need nothing.
pub fn plan_deactivation(user: User) -> Vec<UserCommand> {
    if user.is_deactivated() {
        Vec::new()
    } else {
        vec![UserCommand::Deactivate { user }]
    }
}

/// Pure function: plan a deletion.
///
/// Deletion is only legal for deprovisioned users. With `force`, a
/// deactivation is planned first; without it the request is refused.
pub fn plan_deletion(user: User, force: bool) -> Result<Vec<UserCommand>> {
    if user.is_deactivated() {
        return Ok(vec![UserCommand::Delete { user }]);
    }

    if !force {
        return Err(CommandError::NotDeprovisioned { id: user.id });
    }

    Ok(vec![
        UserCommand::Deactivate { user: user.clone() },
        UserCommand::Delete { user },
    ])
}

/// Pure function: one-line description of a planned command.
pub fn describe_command(command: &UserCommand) -> String {
    match command {
        UserCommand::Activate { user, send_email } => {
            let email = if *send_email {
                "sending activation email"
            } else {
                "without activation email"
            };
            format!(
                "Activate user [{}] ({}) from {} ({})",
                user.user().id,
                user.user().login,
                user.user().status,
                email
            )
        }
        UserCommand::ExpirePassword { user } => format!(
            "Expire password of user [{}] ({}) and issue a temporary password",
            user.user().id,
            user.user().login
        ),
        UserCommand::Deactivate { user } => format!(
            "Deactivate user [{}] ({}) from {}",
            user.id, user.login, user.status
        ),
        UserCommand::Delete { user } => {
            format!("Delete user [{}] ({})", user.id, user.login)
        }
    }
}
