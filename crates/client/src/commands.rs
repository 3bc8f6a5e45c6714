//! Dispatch of parsed commands onto the lifecycle pipelines.
//!
//! Every command returns the text to print on stdout; progress goes through
//! the [`Reporter`].

use chrono::Utc;
use oktactl_core::identity::{self, GroupService, NewUser, Reporter, UserService};
use oktactl_core::logs::{build_log_query, LogService};
use serde::Serialize;

use crate::cli::{Commands, OutputFormat};
use crate::client::health::Connectivity;
use crate::error::Result;
use crate::output::json::{user_records, ExpiredPasswordRecord, UserRecord};
use crate::output::{format_output, table};
use crate::password::generate_password;

/// The services a command may call.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub users: &'a dyn UserService,
    pub groups: &'a dyn GroupService,
    pub logs: &'a dyn LogService,
    pub health: &'a dyn Connectivity,
}

impl<'a> Services<'a> {
    /// Use one backend for every service.
    pub fn uniform<T>(backend: &'a T) -> Self
    where
        T: UserService + GroupService + LogService + Connectivity,
    {
        Self {
            users: backend,
            groups: backend,
            logs: backend,
            health: backend,
        }
    }
}

/// Outcome of a membership change.
#[derive(Debug, Serialize)]
pub struct MembershipChange {
    pub user_id: String,
    pub group_id: String,
    pub member: bool,
}

impl MembershipChange {
    fn describe(&self) -> String {
        if self.member {
            format!("Added user [{}] to group [{}]", self.user_id, self.group_id)
        } else {
            format!("Removed user [{}] from group [{}]", self.user_id, self.group_id)
        }
    }
}

fn user_output(user: &identity::User, format: OutputFormat) -> String {
    format_output(&UserRecord::from(user), format, |record| table::format_user(record.user))
}

/// Run one command and render its result.
pub async fn execute(
    command: Commands,
    services: Services<'_>,
    reporter: &dyn Reporter,
    format: OutputFormat,
) -> Result<String> {
    let Services {
        users,
        groups,
        logs,
        health,
    } = services;

    let output = match command {
        Commands::ActivateUser(args) => {
            let user =
                identity::activate_user(users, reporter, &args.user_id, args.dry_run, args.send_email)
                    .await?;
            user_output(&user, format)
        }
        Commands::DeactivateUser(args) => {
            let user = identity::deactivate_user(users, reporter, &args.user_id).await?;
            user_output(&user, format)
        }
        Commands::DeleteUser(args) => {
            let user = identity::delete_user(users, reporter, &args.user_id, args.force).await?;
            user_output(&user, format)
        }
        Commands::ExpirePasswordAndGetTemporaryPassword(args) => {
            let expired = identity::expire_password_and_get_temporary_password(
                users,
                reporter,
                &args.user_id,
                args.dry_run,
            )
            .await?;
            format_output(&ExpiredPasswordRecord::from(&expired), format, |_| {
                table::format_expired_password(&expired)
            })
        }
        Commands::CreateUser(args) => {
            let new_user = NewUser {
                email: args.email,
                first_name: args.first_name,
                last_name: args.last_name,
                password: generate_password(),
            };
            let user = users.create_user(&new_user).await?;
            tracing::info!(user_id = %user.id, login = %user.login, "Created user");
            reporter.report(&format!(
                "Created user [{}] ({}) in status {}",
                user.id, user.login, user.status
            ));
            user_output(&user, format)
        }
        Commands::ListUsers(args) => match args.group_id {
            Some(group_id) => {
                let (group, members) =
                    identity::list_users_in_group(users, groups, &group_id).await?;
                format_output(&user_records(&members), format, |_| {
                    table::format_members(&group, &members)
                })
            }
            None => {
                let all = users.list_users().await?;
                format_output(&user_records(&all), format, |_| table::format_users(&all))
            }
        },
        Commands::AddUserToGroup(args) => {
            identity::add_user_to_group(users, groups, &args.user, &args.group).await?;
            let change = MembershipChange {
                user_id: args.user,
                group_id: args.group,
                member: true,
            };
            format_output(&change, format, MembershipChange::describe)
        }
        Commands::RemoveUserFromGroup(args) => {
            identity::remove_user_from_group(users, groups, &args.user, &args.group).await?;
            let change = MembershipChange {
                user_id: args.user,
                group_id: args.group,
                member: false,
            };
            format_output(&change, format, MembershipChange::describe)
        }
        Commands::ListGroups(args) => {
            let found = match args.user_id {
                Some(user_id) => identity::list_groups_for_user(users, groups, &user_id).await?,
                None => groups.list_groups().await?,
            };
            format_output(&found, format, |found| table::format_groups(found))
        }
        Commands::Logs(args) => {
            let query = build_log_query(args.into(), Utc::now())?;
            tracing::debug!(?query, "Querying System Log");
            let events = logs.list_log_events(&query).await?;
            format_output(&events, format, |events| table::format_log_events(events))
        }
        Commands::Ping => {
            let ping = health.ping().await?;
            format_output(&ping, format, table::format_ping)
        }
    };

    Ok(output)
}
