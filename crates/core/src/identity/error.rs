use thiserror::Error;

use super::types::{PasswordExpirableStatus, UserStatus};

/// Lifecycle operation a lookup is performed for.
///
/// Selects the trailing clause of the not-found message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Activate,
    ExpirePassword,
    Deactivate,
    Delete,
    Membership,
    Lookup,
}

impl Operation {
    fn not_found_clause(&self) -> &'static str {
        match self {
            Self::Activate => " Cannot activate.",
            Self::ExpirePassword => " Cannot expire password.",
            Self::Deactivate => " Can not de-activate.",
            Self::Delete => " Can not delete.",
            Self::Membership | Self::Lookup => "",
        }
    }

    /// Name of the operation as used in consistency messages.
    pub fn past_tense(&self) -> &'static str {
        match self {
            Self::Activate => "activation",
            Self::ExpirePassword => "password expiry",
            Self::Deactivate => "deactivation",
            Self::Delete => "deletion",
            Self::Membership => "membership change",
            Self::Lookup => "lookup",
        }
    }
}

/// Lifecycle call that moves a user out of a status activation cannot handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remediation {
    Reactivate,
    Unlock,
    ResetPassword,
    Unsuspend,
}

impl Remediation {
    pub fn command(&self) -> &'static str {
        match self {
            Self::Reactivate => "reactivate",
            Self::Unlock => "unlock",
            Self::ResetPassword => "reset-password",
            Self::Unsuspend => "unsuspend",
        }
    }
}

fn remediation_suffix(remediation: &Option<Remediation>) -> String {
    match remediation {
        Some(r) => format!(" Use `{}` instead.", r.command()),
        None => String::new(),
    }
}

fn permitted_password_statuses() -> String {
    let names: Vec<&str> = PasswordExpirableStatus::ALL
        .iter()
        .map(|s| UserStatus::from(*s).as_str())
        .collect();
    match names.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} or {}", rest.join(", "), last),
        Some((last, _)) => last.to_string(),
        None => String::new(),
    }
}

/// Failure of a call to the identity platform itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Okta API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response from Okta: {0}")]
    InvalidResponse(String),

    #[error("Not authorized: {0}")]
    Unauthorized(String),
}

/// Errors produced by the lifecycle pipelines.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("User [{id}] does not exist.{}", .operation.not_found_clause())]
    UserNotFound { id: String, operation: Operation },

    #[error("Group [{id}] does not exist.")]
    GroupNotFound { id: String },

    #[error("Group [{group_id}] does not exist. User [{user_id}] does not exist.")]
    UserAndGroupNotFound { user_id: String, group_id: String },

    #[error("User [{id}] is {status} and cannot be activated.{}", remediation_suffix(.remediation))]
    NotActivatable {
        id: String,
        status: UserStatus,
        remediation: Option<Remediation>,
    },

    #[error(
        "User [{id}] is {status}. Passwords can only be expired for users that are {}.",
        permitted_password_statuses()
    )]
    PasswordNotExpirable { id: String, status: UserStatus },

    #[error("User [{id}] has not been deprovisioned. Deprovision before deleting.")]
    NotDeprovisioned { id: String },

    #[error("User [{id}] could not be found after {}. Directory state is inconsistent.", .operation.past_tense())]
    InconsistentState { id: String, operation: Operation },

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Result type for lifecycle pipelines.
pub type Result<T> = std::result::Result<T, CommandError>;
