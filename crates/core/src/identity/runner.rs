//! Strategies that consume a lifecycle plan.
//!
//! [`Executor`] performs each command against the [`UserService`] and
//! verifies the result; [`DryRunReporter`] only reports what would happen.

use async_trait::async_trait;

use super::error::{CommandError, Operation, Result};
use super::planning::{describe_command, UserCommand};
use super::traits::UserService;
use super::types::User;

/// Sink for human-readable progress messages.
pub trait Reporter: Send + Sync {
    fn report(&self, message: &str);
}

/// What running a single command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub user: User,
    pub temporary_password: Option<String>,
}

impl CommandOutput {
    pub fn from_user(user: User) -> Self {
        Self {
            user,
            temporary_password: None,
        }
    }
}

/// Consumes one planned command.
///
/// `current` is the user as left by the previous step of the plan.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &UserCommand, current: &User) -> Result<CommandOutput>;
}

/// Runs `plan` in order and stops at the first failure.
///
/// An empty plan leaves `current` untouched.
pub async fn run_plan(
    runner: &dyn CommandRunner,
    plan: &[UserCommand],
    current: User,
) -> Result<CommandOutput> {
    let mut output = CommandOutput::from_user(current);
    for command in plan {
        output = runner.run(command, &output.user).await?;
    }
    Ok(output)
}

/// Performs commands against the identity platform.
pub struct Executor<'a> {
    users: &'a dyn UserService,
    reporter: &'a dyn Reporter,
}

impl<'a> Executor<'a> {
    pub fn new(users: &'a dyn UserService, reporter: &'a dyn Reporter) -> Self {
        Self { users, reporter }
    }

    async fn refetch(&self, id: &str, operation: Operation) -> Result<User> {
        self.users
            .get_user(id)
            .await?
            .ok_or_else(|| CommandError::InconsistentState {
                id: id.to_string(),
                operation,
            })
    }
}

#[async_trait]
impl CommandRunner for Executor<'_> {
    async fn run(&self, command: &UserCommand, current: &User) -> Result<CommandOutput> {
        self.reporter.report(&describe_command(command));
        let id = command.user().id.as_str();

        match command {
            UserCommand::Activate { send_email, .. } => {
                self.users.activate_user(id, *send_email).await?;
                let user = self.refetch(id, Operation::Activate).await?;
                tracing::info!(user_id = %id, status = %user.status, "Activated user");
                self.reporter
                    .report(&format!("User [{}] is now {}", id, user.status));
                Ok(CommandOutput::from_user(user))
            }
            UserCommand::ExpirePassword { .. } => {
                let expired = self
                    .users
                    .expire_password_and_get_temporary_password(id)
                    .await?;
                tracing::info!(user_id = %id, "Expired password");
                self.reporter.report(&format!(
                    "Temporary password for user [{}]: {}",
                    id, expired.temporary_password
                ));
                Ok(CommandOutput {
                    user: expired.user,
                    temporary_password: Some(expired.temporary_password),
                })
            }
            UserCommand::Deactivate { .. } => {
                self.users.deactivate_user(id).await?;
                let user = self.refetch(id, Operation::Deactivate).await?;
                tracing::info!(user_id = %id, status = %user.status, "Deactivated user");
                self.reporter
                    .report(&format!("User [{}] is now {}", id, user.status));
                Ok(CommandOutput::from_user(user))
            }
            UserCommand::Delete { .. } => {
                self.users.delete_user(id).await?;
                tracing::info!(user_id = %id, "Deleted user");
                self.reporter.report(&format!("User [{}] deleted", id));
                Ok(CommandOutput::from_user(current.clone()))
            }
        }
    }
}

/// Reports the projected effect of each command without calling the platform.
pub struct DryRunReporter<'a> {
    reporter: &'a dyn Reporter,
}

impl<'a> DryRunReporter<'a> {
    pub fn new(reporter: &'a dyn Reporter) -> Self {
        Self { reporter }
    }
}

#[async_trait]
impl CommandRunner for DryRunReporter<'_> {
    async fn run(&self, command: &UserCommand, current: &User) -> Result<CommandOutput> {
        self.reporter
            .report(&format!("[dry-run] {}", describe_command(command)));

        let user = current.clone();
        let temporary_password = match command {
            UserCommand::ExpirePassword { .. } => Some(String::new()),
            _ => None,
        };
        Ok(CommandOutput {
            user,
            temporary_password,
        })
    }
}

/// Reporter that keeps every message, for assertions.
#[cfg(any(test, feature = "inmemory"))]
#[derive(Debug, Default)]
pub struct RecordingReporter {
    messages: std::sync::Mutex<Vec<String>>,
}

#[cfg(any(test, feature = "inmemory"))]
impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[cfg(any(test, feature = "inmemory"))]
impl Reporter for RecordingReporter {
    fn report(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(message.to_string());
    }
}
