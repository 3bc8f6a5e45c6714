//! Lifecycle command pipelines.
//!
//! Each pipeline is a fixed sequence: existence check, status precondition,
//! plan, then execution or dry-run reporting. The first error ends it.

use super::error::{Operation, Result};
use super::planning::{
    plan_activation, plan_deactivation, plan_deletion, plan_password_expiration,
};
use super::runner::{run_plan, CommandRunner, DryRunReporter, Executor, Reporter};
use super::traits::{GroupService, UserService};
use super::types::{ExpiredPassword, Group, User};
use super::validation::{
    validate_group_exists, validate_membership_targets, validate_user_exists,
    validate_user_status_for_activation, validate_user_status_for_password_expiration,
};

fn select_runner<'a>(
    users: &'a dyn UserService,
    reporter: &'a dyn Reporter,
    dry_run: bool,
) -> Box<dyn CommandRunner + 'a> {
    if dry_run {
        Box::new(DryRunReporter::new(reporter))
    } else {
        Box::new(Executor::new(users, reporter))
    }
}

/// Activates a staged or deprovisioned user.
pub async fn activate_user(
    users: &dyn UserService,
    reporter: &dyn Reporter,
    id: &str,
    dry_run: bool,
    send_email: bool,
) -> Result<User> {
    let user = validate_user_exists(users, id, Operation::Activate).await?;
    let activatable = validate_user_status_for_activation(user.clone())?;
    let plan = plan_activation(activatable, send_email);

    let runner = select_runner(users, reporter, dry_run);
    let output = run_plan(runner.as_ref(), &plan, user).await?;
    Ok(output.user)
}

/// Expires a user's password and returns the temporary replacement.
///
/// A dry run returns an empty temporary password.
pub async fn expire_password_and_get_temporary_password(
    users: &dyn UserService,
    reporter: &dyn Reporter,
    id: &str,
    dry_run: bool,
) -> Result<ExpiredPassword> {
    let user = validate_user_exists(users, id, Operation::ExpirePassword).await?;
    let expirable = validate_user_status_for_password_expiration(user.clone())?;
    let plan = plan_password_expiration(expirable);

    let runner = select_runner(users, reporter, dry_run);
    let output = run_plan(runner.as_ref(), &plan, user).await?;
    Ok(ExpiredPassword {
        user: output.user,
        temporary_password: output.temporary_password.unwrap_or_default(),
    })
}

/// Deactivates a user. Already deprovisioned users are returned unchanged.
pub async fn deactivate_user(
    users: &dyn UserService,
    reporter: &dyn Reporter,
    id: &str,
) -> Result<User> {
    let user = validate_user_exists(users, id, Operation::Deactivate).await?;
    let plan = plan_deactivation(user.clone());
    if plan.is_empty() {
        tracing::debug!(user_id = %id, "User already deprovisioned");
        reporter.report(&format!("User [{}] is already deprovisioned", id));
    }

    let executor = Executor::new(users, reporter);
    let output = run_plan(&executor, &plan, user).await?;
    Ok(output.user)
}

/// Deletes a deprovisioned user, returning the snapshot taken before deletion.
///
/// With `force`, a user that is not yet deprovisioned is deactivated first.
pub async fn delete_user(
    users: &dyn UserService,
    reporter: &dyn Reporter,
    id: &str,
    force: bool,
) -> Result<User> {
    let user = validate_user_exists(users, id, Operation::Delete).await?;
    let plan = plan_deletion(user.clone(), force)?;

    let executor = Executor::new(users, reporter);
    let output = run_plan(&executor, &plan, user).await?;
    Ok(output.user)
}

/// Adds a user to a group once both are known to exist.
pub async fn add_user_to_group(
    users: &dyn UserService,
    groups: &dyn GroupService,
    user_id: &str,
    group_id: &str,
) -> Result<()> {
    validate_membership_targets(users, groups, user_id, group_id).await?;
    groups.add_user_to_group(user_id, group_id).await?;
    tracing::info!(user_id = %user_id, group_id = %group_id, "Added user to group");
    Ok(())
}

/// Removes a user from a group, checking the user and then the group.
pub async fn remove_user_from_group(
    users: &dyn UserService,
    groups: &dyn GroupService,
    user_id: &str,
    group_id: &str,
) -> Result<()> {
    validate_user_exists(users, user_id, Operation::Membership).await?;
    validate_group_exists(groups, group_id).await?;
    groups.remove_user_from_group(group_id, user_id).await?;
    tracing::info!(user_id = %user_id, group_id = %group_id, "Removed user from group");
    Ok(())
}

/// Lists the members of an existing group.
pub async fn list_users_in_group(
    users: &dyn UserService,
    groups: &dyn GroupService,
    group_id: &str,
) -> Result<(Group, Vec<User>)> {
    let group = validate_group_exists(groups, group_id).await?;
    let members = users.list_users_in_group(&group).await?;
    Ok((group, members))
}

/// Lists the groups of an existing user.
pub async fn list_groups_for_user(
    users: &dyn UserService,
    groups: &dyn GroupService,
    user_id: &str,
) -> Result<Vec<Group>> {
    validate_user_exists(users, user_id, Operation::Lookup).await?;
    Ok(groups.list_user_groups(user_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::error::CommandError;
    use crate::identity::inmemory::InMemoryDirectory;
    use crate::identity::runner::RecordingReporter;
    use crate::identity::types::UserStatus;
    use crate::identity::ServiceError;

    const ALL_STATUSES: [UserStatus; 8] = [
        UserStatus::Active,
        UserStatus::Staged,
        UserStatus::Provisioned,
        UserStatus::PasswordExpired,
        UserStatus::Recovery,
        UserStatus::LockedOut,
        UserStatus::Suspended,
        UserStatus::Deprovisioned,
    ];

    fn user_with(status: UserStatus) -> User {
        User::new(
            "user_id",
            "ada@example.com",
            "ada@example.com",
            Some("Ada"),
            Some("Lovelace"),
            status,
        )
    }

    fn ops_group() -> Group {
        Group::new("group_id", "Operations", "OKTA_GROUP")
    }

    // ==================== activate_user ====================

    #[tokio::test]
    async fn activation_calls_activate_once_and_refetches_for_permitted_statuses() {
        for status in [UserStatus::Staged, UserStatus::Deprovisioned] {
            let directory = InMemoryDirectory::new().with_user(user_with(status));
            let reporter = RecordingReporter::new();

            let user = activate_user(&directory, &reporter, "user_id", false, false)
                .await
                .unwrap();

            assert_eq!(user.status, UserStatus::Active);
            let calls = directory.calls();
            assert_eq!(calls.activate_user, 1);
            // existence check + post-activation verification
            assert_eq!(calls.get_user, 2);
        }
    }

    #[tokio::test]
    async fn activation_is_rejected_for_every_other_status() {
        for status in ALL_STATUSES {
            if matches!(status, UserStatus::Staged | UserStatus::Deprovisioned) {
                continue;
            }
            let directory = InMemoryDirectory::new().with_user(user_with(status));
            let reporter = RecordingReporter::new();

            let error = activate_user(&directory, &reporter, "user_id", false, true)
                .await
                .unwrap_err();

            assert!(matches!(error, CommandError::NotActivatable { .. }));
            assert!(error.to_string().contains(status.as_str()));
            assert_eq!(directory.calls().activate_user, 0);
        }
    }

    #[tokio::test]
    async fn activation_of_missing_user_makes_no_call() {
        let directory = InMemoryDirectory::new();
        let reporter = RecordingReporter::new();

        let error = activate_user(&directory, &reporter, "user_id", false, false)
            .await
            .unwrap_err();

        assert_eq!(
            error.to_string(),
            "User [user_id] does not exist. Cannot activate."
        );
        assert_eq!(directory.calls().activate_user, 0);
    }

    #[tokio::test]
    async fn dry_run_activation_returns_unmodified_user() {
        let directory = InMemoryDirectory::new().with_user(user_with(UserStatus::Staged));
        let reporter = RecordingReporter::new();

        let user = activate_user(&directory, &reporter, "user_id", true, true)
            .await
            .unwrap();

        assert_eq!(user, user_with(UserStatus::Staged));
        assert_eq!(directory.calls().activate_user, 0);
        assert_eq!(directory.calls().mutations(), 0);
        assert!(reporter.messages()[0].starts_with("[dry-run] Activate user [user_id]"));
    }

    // ==================== expire_password_and_get_temporary_password ====================

    #[tokio::test]
    async fn password_expiry_returns_temporary_password() {
        let directory = InMemoryDirectory::new().with_user(user_with(UserStatus::Active));
        let reporter = RecordingReporter::new();

        let expired =
            expire_password_and_get_temporary_password(&directory, &reporter, "user_id", false)
                .await
                .unwrap();

        assert_eq!(expired.temporary_password, "temp-user_id");
        assert_eq!(expired.user.status, UserStatus::PasswordExpired);
        assert_eq!(directory.calls().expire_password, 1);
        assert!(reporter
            .messages()
            .contains(&"Temporary password for user [user_id]: temp-user_id".to_string()));
    }

    #[tokio::test]
    async fn dry_run_password_expiry_returns_empty_placeholder() {
        let directory = InMemoryDirectory::new().with_user(user_with(UserStatus::LockedOut));
        let reporter = RecordingReporter::new();

        let expired =
            expire_password_and_get_temporary_password(&directory, &reporter, "user_id", true)
                .await
                .unwrap();

        assert_eq!(expired.temporary_password, "");
        assert_eq!(expired.user, user_with(UserStatus::LockedOut));
        assert_eq!(directory.calls().expire_password, 0);
    }

    #[tokio::test]
    async fn password_expiry_rejected_for_suspended_user() {
        let directory = InMemoryDirectory::new().with_user(user_with(UserStatus::Suspended));
        let reporter = RecordingReporter::new();

        let error =
            expire_password_and_get_temporary_password(&directory, &reporter, "user_id", false)
                .await
                .unwrap_err();

        assert!(matches!(error, CommandError::PasswordNotExpirable { .. }));
        assert_eq!(directory.calls().expire_password, 0);
    }

    #[tokio::test]
    async fn password_expiry_of_missing_user() {
        let directory = InMemoryDirectory::new();
        let reporter = RecordingReporter::new();

        let error =
            expire_password_and_get_temporary_password(&directory, &reporter, "user_id", true)
                .await
                .unwrap_err();

        assert_eq!(
            error.to_string(),
            "User [user_id] does not exist. Cannot expire password."
        );
    }

    // ==================== deactivate_user ====================

    #[tokio::test]
    async fn deactivation_deprovisions_and_refetches() {
        let directory = InMemoryDirectory::new().with_user(user_with(UserStatus::Active));
        let reporter = RecordingReporter::new();

        let user = deactivate_user(&directory, &reporter, "user_id").await.unwrap();

        assert_eq!(user.status, UserStatus::Deprovisioned);
        assert!(user.is_deactivated());
        assert_eq!(directory.calls().deactivate_user, 1);
        assert_eq!(directory.calls().get_user, 2);
    }

    #[tokio::test]
    async fn deactivation_is_idempotent() {
        let directory = InMemoryDirectory::new().with_user(user_with(UserStatus::Active));
        let reporter = RecordingReporter::new();

        let first = deactivate_user(&directory, &reporter, "user_id").await.unwrap();
        let second = deactivate_user(&directory, &reporter, "user_id").await.unwrap();
        let third = deactivate_user(&directory, &reporter, "user_id").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second, third);
        assert_eq!(directory.calls().deactivate_user, 1);
    }

    #[tokio::test]
    async fn deactivation_of_missing_user() {
        let directory = InMemoryDirectory::new();
        let reporter = RecordingReporter::new();

        let error = deactivate_user(&directory, &reporter, "user_id")
            .await
            .unwrap_err();

        assert_eq!(
            error.to_string(),
            "User [user_id] does not exist. Can not de-activate."
        );
        assert_eq!(directory.calls().mutations(), 0);
    }

    #[tokio::test]
    async fn deactivation_reports_inconsistent_state_when_user_vanishes() {
        let directory = InMemoryDirectory::new()
            .with_user(user_with(UserStatus::Active))
            .vanishing_after_mutation();
        let reporter = RecordingReporter::new();

        let error = deactivate_user(&directory, &reporter, "user_id")
            .await
            .unwrap_err();

        assert_eq!(
            error,
            CommandError::InconsistentState {
                id: "user_id".to_string(),
                operation: Operation::Deactivate,
            }
        );
        assert_eq!(directory.calls().deactivate_user, 1);
        assert!(!reporter
            .messages()
            .iter()
            .any(|m| m.ends_with("is now DEPROVISIONED")));
    }

    // ==================== delete_user ====================

    #[tokio::test]
    async fn deleting_deprovisioned_user_returns_snapshot() {
        let directory = InMemoryDirectory::new().with_user(user_with(UserStatus::Deprovisioned));
        let reporter = RecordingReporter::new();

        let user = delete_user(&directory, &reporter, "user_id", false)
            .await
            .unwrap();

        assert_eq!(user, user_with(UserStatus::Deprovisioned));
        assert_eq!(directory.calls().delete_user, 1);
        assert_eq!(directory.stored_user("user_id").await, None);
    }

    #[tokio::test]
    async fn deleting_active_user_without_force_is_refused() {
        let directory = InMemoryDirectory::new().with_user(user_with(UserStatus::Active));
        let reporter = RecordingReporter::new();

        let error = delete_user(&directory, &reporter, "user_id", false)
            .await
            .unwrap_err();

        assert_eq!(
            error.to_string(),
            "User [user_id] has not been deprovisioned. Deprovision before deleting."
        );
        assert_eq!(directory.calls().delete_user, 0);
        assert_eq!(directory.calls().deactivate_user, 0);
    }

    #[tokio::test]
    async fn forced_deletion_deactivates_then_deletes() {
        let directory = InMemoryDirectory::new().with_user(user_with(UserStatus::Active));
        let reporter = RecordingReporter::new();

        let deleted = delete_user(&directory, &reporter, "user_id", true)
            .await
            .unwrap();

        assert_eq!(deleted.status, UserStatus::Deprovisioned);
        let calls = directory.calls();
        assert_eq!(calls.deactivate_user, 1);
        assert_eq!(calls.delete_user, 1);
        let messages = reporter.messages();
        let deactivate_at = messages
            .iter()
            .position(|m| m.starts_with("Deactivate user"))
            .unwrap();
        let delete_at = messages
            .iter()
            .position(|m| m.starts_with("Delete user"))
            .unwrap();
        assert!(deactivate_at < delete_at);
    }

    #[tokio::test]
    async fn deleting_missing_user() {
        let directory = InMemoryDirectory::new();
        let reporter = RecordingReporter::new();

        let error = delete_user(&directory, &reporter, "user_id", true)
            .await
            .unwrap_err();

        assert_eq!(
            error.to_string(),
            "User [user_id] does not exist. Can not delete."
        );
        assert_eq!(directory.calls().mutations(), 0);
    }

    // ==================== group membership ====================

    #[tokio::test]
    async fn add_user_to_group_when_both_exist() {
        let directory = InMemoryDirectory::new()
            .with_user(user_with(UserStatus::Active))
            .with_group(ops_group());

        add_user_to_group(&directory, &directory, "user_id", "group_id")
            .await
            .unwrap();

        assert!(directory.is_member("group_id", "user_id").await);
        assert_eq!(directory.calls().add_user_to_group, 1);
    }

    #[tokio::test]
    async fn add_user_to_group_with_both_missing_combines_errors() {
        let directory = InMemoryDirectory::new();

        let error = add_user_to_group(&directory, &directory, "user_id", "group_id")
            .await
            .unwrap_err();

        assert_eq!(
            error.to_string(),
            "Group [group_id] does not exist. User [user_id] does not exist."
        );
        assert_eq!(directory.calls().get_user, 1);
        assert_eq!(directory.calls().get_group, 1);
        assert_eq!(directory.calls().add_user_to_group, 0);
    }

    #[tokio::test]
    async fn add_user_to_group_group_lookup_failure_propagates() {
        let failure = ServiceError::Transport("timed out".to_string());
        let directory = InMemoryDirectory::new()
            .with_user(user_with(UserStatus::Active))
            .failing_group_lookups(failure.clone());

        let error = add_user_to_group(&directory, &directory, "user_id", "group_id")
            .await
            .unwrap_err();

        assert_eq!(error, CommandError::Service(failure));
        assert_eq!(directory.calls().add_user_to_group, 0);
    }

    #[tokio::test]
    async fn add_user_to_group_propagates_add_failure() {
        let failure = ServiceError::Api {
            status: 400,
            message: "Group is app-managed".to_string(),
        };
        let directory = InMemoryDirectory::new()
            .with_user(user_with(UserStatus::Active))
            .with_group(ops_group())
            .failing_mutations(failure.clone());

        let error = add_user_to_group(&directory, &directory, "user_id", "group_id")
            .await
            .unwrap_err();

        assert_eq!(error, CommandError::Service(failure));
    }

    #[tokio::test]
    async fn remove_user_from_group_checks_user_first() {
        let directory = InMemoryDirectory::new();

        let error = remove_user_from_group(&directory, &directory, "user_id", "group_id")
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "User [user_id] does not exist.");
        assert_eq!(directory.calls().get_group, 0);
        assert_eq!(directory.calls().remove_user_from_group, 0);
    }

    #[tokio::test]
    async fn remove_user_from_missing_group() {
        let directory = InMemoryDirectory::new().with_user(user_with(UserStatus::Active));

        let error = remove_user_from_group(&directory, &directory, "user_id", "group_id")
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "Group [group_id] does not exist.");
        assert_eq!(directory.calls().remove_user_from_group, 0);
    }

    #[tokio::test]
    async fn remove_user_from_group_when_both_exist() {
        let directory = InMemoryDirectory::new()
            .with_user(user_with(UserStatus::Active))
            .with_group(ops_group())
            .with_member("group_id", "user_id");

        remove_user_from_group(&directory, &directory, "user_id", "group_id")
            .await
            .unwrap();

        assert!(!directory.is_member("group_id", "user_id").await);
    }

    // ==================== listings ====================

    #[tokio::test]
    async fn list_users_in_group_requires_existing_group() {
        let directory = InMemoryDirectory::new();

        let error = list_users_in_group(&directory, &directory, "group_id")
            .await
            .unwrap_err();

        assert_eq!(error, CommandError::GroupNotFound { id: "group_id".to_string() });
        assert_eq!(directory.calls().list_users_in_group, 0);
    }

    #[tokio::test]
    async fn list_users_in_group_returns_members() {
        let directory = InMemoryDirectory::new()
            .with_user(user_with(UserStatus::Active))
            .with_group(ops_group())
            .with_member("group_id", "user_id");

        let (group, members) = list_users_in_group(&directory, &directory, "group_id")
            .await
            .unwrap();

        assert_eq!(group, ops_group());
        assert_eq!(members, vec![user_with(UserStatus::Active)]);
    }

    #[tokio::test]
    async fn list_groups_for_user_requires_existing_user() {
        let directory = InMemoryDirectory::new().with_group(ops_group());

        let error = list_groups_for_user(&directory, &directory, "user_id")
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "User [user_id] does not exist.");
        assert_eq!(directory.calls().list_user_groups, 0);
    }
}
