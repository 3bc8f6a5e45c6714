//! User and group lifecycle: types, service seams, validators, planner,
//! runners and the per-command pipelines built from them.

mod error;
#[cfg(any(test, feature = "inmemory"))]
pub mod inmemory;
mod pipelines;
mod planning;
mod runner;
mod traits;
mod types;
mod validation;

pub use error::{CommandError, Operation, Remediation, Result, ServiceError};
pub use pipelines::{
    activate_user, add_user_to_group, deactivate_user, delete_user,
    expire_password_and_get_temporary_password, list_groups_for_user, list_users_in_group,
    remove_user_from_group,
};
pub use planning::{
    describe_command, plan_activation, plan_deactivation, plan_deletion,
    plan_password_expiration, UserCommand,
};
#[cfg(any(test, feature = "inmemory"))]
pub use runner::RecordingReporter;
pub use runner::{run_plan, CommandOutput, CommandRunner, DryRunReporter, Executor, Reporter};
pub use traits::{GroupService, ServiceResult, UserService};
pub use types::{
    display_name, ActivatableStatus, ActivatableUser, ExpiredPassword, Group, NewUser,
    PasswordExpirableStatus, PasswordExpirableUser, User, UserStatus,
};
pub use validation::{
    validate_group_exists, validate_membership_targets, validate_user_exists,
    validate_user_status_for_activation, validate_user_status_for_password_expiration,
};
