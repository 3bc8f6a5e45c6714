use serde::{Deserialize, Serialize};

/// Lifecycle status of an Okta user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Staged,
    Provisioned,
    PasswordExpired,
    Recovery,
    LockedOut,
    Suspended,
    Deprovisioned,
}

impl UserStatus {
    /// Wire representation of the status (e.g. `LOCKED_OUT`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Staged => "STAGED",
            Self::Provisioned => "PROVISIONED",
            Self::PasswordExpired => "PASSWORD_EXPIRED",
            Self::Recovery => "RECOVERY",
            Self::LockedOut => "LOCKED_OUT",
            Self::Suspended => "SUSPENDED",
            Self::Deprovisioned => "DEPROVISIONED",
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An account in the identity platform, as observed by a single fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub login: String,
    pub email: String,
    pub display_name: String,
    pub status: UserStatus,
}

impl User {
    /// Creates a user snapshot, deriving the display name from the name parts.
    pub fn new(
        id: impl Into<String>,
        login: impl Into<String>,
        email: impl Into<String>,
        first_name: Option<&str>,
        last_name: Option<&str>,
        status: UserStatus,
    ) -> Self {
        Self {
            id: id.into(),
            login: login.into(),
            email: email.into(),
            display_name: display_name(first_name, last_name),
            status,
        }
    }

    /// Returns a copy of this snapshot with a different status.
    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = status;
        self
    }

    /// True when the user has been deprovisioned.
    pub fn is_deactivated(&self) -> bool {
        self.status == UserStatus::Deprovisioned
    }
}

/// Joins first and last name with a single space, skipping empty parts.
pub fn display_name(first_name: Option<&str>, last_name: Option<&str>) -> String {
    [first_name, last_name]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A group of users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    /// Free-form group type, e.g. `OKTA_GROUP` or `APP_GROUP`.
    #[serde(rename = "type")]
    pub group_type: String,
}

impl Group {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        group_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            group_type: group_type.into(),
        }
    }
}

/// Attributes for a user that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: String,
}

/// Result of expiring a user's password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiredPassword {
    pub user: User,
    /// Empty when the expiry was only simulated.
    pub temporary_password: String,
}

/// Statuses from which a user may be activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivatableStatus {
    Staged,
    Deprovisioned,
}

impl From<ActivatableStatus> for UserStatus {
    fn from(status: ActivatableStatus) -> Self {
        match status {
            ActivatableStatus::Staged => UserStatus::Staged,
            ActivatableStatus::Deprovisioned => UserStatus::Deprovisioned,
        }
    }
}

/// A user whose status has been checked to permit activation.
///
/// Only `validate_user_status_for_activation` builds one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivatableUser {
    user: User,
    status: ActivatableStatus,
}

impl ActivatableUser {
    pub(crate) fn new(user: User, status: ActivatableStatus) -> Self {
        Self { user, status }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn status(&self) -> ActivatableStatus {
        self.status
    }

    pub fn into_user(self) -> User {
        self.user
    }
}

/// Statuses from which a user's password may be expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordExpirableStatus {
    Active,
    Staged,
    Provisioned,
    LockedOut,
    Recovery,
    PasswordExpired,
}

impl PasswordExpirableStatus {
    /// Every permitted status, in the order they are listed in messages.
    pub const ALL: [PasswordExpirableStatus; 6] = [
        Self::Active,
        Self::Staged,
        Self::Provisioned,
        Self::LockedOut,
        Self::Recovery,
        Self::PasswordExpired,
    ];
}

impl From<PasswordExpirableStatus> for UserStatus {
    fn from(status: PasswordExpirableStatus) -> Self {
        match status {
            PasswordExpirableStatus::Active => UserStatus::Active,
            PasswordExpirableStatus::Staged => UserStatus::Staged,
            PasswordExpirableStatus::Provisioned => UserStatus::Provisioned,
            PasswordExpirableStatus::LockedOut => UserStatus::LockedOut,
            PasswordExpirableStatus::Recovery => UserStatus::Recovery,
            PasswordExpirableStatus::PasswordExpired => UserStatus::PasswordExpired,
        }
    }
}

/// A user whose status has been checked to permit password expiry.
///
/// Only `validate_user_status_for_password_expiration` builds one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordExpirableUser {
    user: User,
    status: PasswordExpirableStatus,
}

impl PasswordExpirableUser {
    pub(crate) fn new(user: User, status: PasswordExpirableStatus) -> Self {
        Self { user, status }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn status(&self) -> PasswordExpirableStatus {
        self.status
    }

    pub fn into_user(self) -> User {
        self.user
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_joins_both_parts() {
        assert_eq!(display_name(Some("Ada"), Some("Lovelace")), "Ada Lovelace");
    }

    #[test]
    fn display_name_omits_empty_parts() {
        assert_eq!(display_name(Some(""), Some("Lovelace")), "Lovelace");
        assert_eq!(display_name(Some("Ada"), None), "Ada");
        assert_eq!(display_name(Some("  "), Some("")), "");
        assert_eq!(display_name(None, None), "");
    }

    #[test]
    fn deactivated_follows_status() {
        let user = User::new("u1", "a@b.c", "a@b.c", None, None, UserStatus::Active);
        assert!(!user.is_deactivated());
        assert!(user.with_status(UserStatus::Deprovisioned).is_deactivated());
    }

    #[test]
    fn status_uses_screaming_snake_case_on_the_wire() {
        let json = serde_json::to_string(&UserStatus::PasswordExpired).unwrap();
        assert_eq!(json, "\"PASSWORD_EXPIRED\"");

        let status: UserStatus = serde_json::from_str("\"LOCKED_OUT\"").unwrap();
        assert_eq!(status, UserStatus::LockedOut);
        assert_eq!(status.to_string(), "LOCKED_OUT");
    }

    #[test]
    fn narrowed_statuses_widen_back() {
        assert_eq!(
            UserStatus::from(ActivatableStatus::Deprovisioned),
            UserStatus::Deprovisioned
        );
        assert_eq!(
            UserStatus::from(PasswordExpirableStatus::LockedOut),
            UserStatus::LockedOut
        );
    }
}
