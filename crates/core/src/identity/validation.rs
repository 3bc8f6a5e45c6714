//! Precondition checks run before any lifecycle call.
//!
//! The status validators are pure: they only look at an already-fetched
//! snapshot. The existence validators perform the fetch and nothing else.

use super::error::{CommandError, Operation, Remediation, Result};
use super::traits::{GroupService, UserService};
use super::types::{
    ActivatableStatus, ActivatableUser, Group, PasswordExpirableStatus, PasswordExpirableUser,
    User, UserStatus,
};

/// Fetches a user, turning absence into a not-found error for `operation`.
pub async fn validate_user_exists(
    users: &dyn UserService,
    id: &str,
    operation: Operation,
) -> Result<User> {
    users
        .get_user(id)
        .await?
        .ok_or_else(|| CommandError::UserNotFound {
            id: id.to_string(),
            operation,
        })
}

/// Fetches a group, turning absence into a not-found error.
pub async fn validate_group_exists(groups: &dyn GroupService, id: &str) -> Result<Group> {
    groups
        .get_group(id)
        .await?
        .ok_or_else(|| CommandError::GroupNotFound { id: id.to_string() })
}

/// Narrows a user to one that may be activated.
pub fn validate_user_status_for_activation(user: User) -> Result<ActivatableUser> {
    let remediation = match user.status {
        UserStatus::Staged => {
            return Ok(ActivatableUser::new(user, ActivatableStatus::Staged));
        }
        UserStatus::Deprovisioned => {
            return Ok(ActivatableUser::new(user, ActivatableStatus::Deprovisioned));
        }
        UserStatus::Active => None,
        UserStatus::Provisioned => Some(Remediation::Reactivate),
        UserStatus::LockedOut => Some(Remediation::Unlock),
        UserStatus::PasswordExpired | UserStatus::Recovery => Some(Remediation::ResetPassword),
        UserStatus::Suspended => Some(Remediation::Unsuspend),
    };

    Err(CommandError::NotActivatable {
        id: user.id,
        status: user.status,
        remediation,
    })
}

/// Narrows a user to one whose password may be expired.
pub fn validate_user_status_for_password_expiration(
    user: User,
) -> Result<PasswordExpirableUser> {
    let status = match user.status {
        UserStatus::Active => PasswordExpirableStatus::Active,
        UserStatus::Staged => PasswordExpirableStatus::Staged,
        UserStatus::Provisioned => PasswordExpirableStatus::Provisioned,
        UserStatus::LockedOut => PasswordExpirableStatus::LockedOut,
        UserStatus::Recovery => PasswordExpirableStatus::Recovery,
        UserStatus::PasswordExpired => PasswordExpirableStatus::PasswordExpired,
        UserStatus::Suspended | UserStatus::Deprovisioned => {
            return Err(CommandError::PasswordNotExpirable {
                id: user.id,
                status: user.status,
            });
        }
    };

    Ok(PasswordExpirableUser::new(user, status))
}

/// Fetches both sides of a membership change before deciding.
///
/// Transport failures win over absence (user first, then group). When both
/// resources are missing a single error names the group, then the user.
pub async fn validate_membership_targets(
    users: &dyn UserService,
    groups: &dyn GroupService,
    user_id: &str,
    group_id: &str,
) -> Result<(User, Group)> {
    let (user, group) = tokio::join!(users.get_user(user_id), groups.get_group(group_id));

    match (user?, group?) {
        (Some(user), Some(group)) => Ok((user, group)),
        (None, None) => Err(CommandError::UserAndGroupNotFound {
            user_id: user_id.to_string(),
            group_id: group_id.to_string(),
        }),
        (Some(_), None) => Err(CommandError::GroupNotFound {
            id: group_id.to_string(),
        }),
        (None, Some(_)) => Err(CommandError::UserNotFound {
            id: user_id.to_string(),
            operation: Operation::Membership,
        }),
    }
}
