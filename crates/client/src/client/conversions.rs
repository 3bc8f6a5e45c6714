//! Okta wire formats and their conversions into core types.

use chrono::{DateTime, Utc};
use oktactl_core::identity::{Group, NewUser, User, UserStatus};
use oktactl_core::logs::LogEvent;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OktaUser {
    pub id: String,
    pub status: UserStatus,
    pub profile: OktaUserProfile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OktaUserProfile {
    pub login: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl From<OktaUser> for User {
    fn from(user: OktaUser) -> Self {
        let profile = user.profile;
        User::new(
            user.id,
            profile.login,
            profile.email.unwrap_or_default(),
            profile.first_name.as_deref(),
            profile.last_name.as_deref(),
            user.status,
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct OktaGroup {
    pub id: String,
    #[serde(rename = "type")]
    pub group_type: String,
    pub profile: OktaGroupProfile,
}

#[derive(Debug, Deserialize)]
pub struct OktaGroupProfile {
    pub name: String,
}

impl From<OktaGroup> for Group {
    fn from(group: OktaGroup) -> Self {
        Group::new(group.id, group.profile.name, group.group_type)
    }
}

/// Body of `expire_password_with_temp_password`. Older orgs omit the user.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OktaTempPassword {
    #[serde(default)]
    pub user: Option<OktaUser>,
    pub temp_password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub profile: CreateUserProfile,
    pub credentials: CreateUserCredentials,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub email: String,
    pub login: String,
}

#[derive(Debug, Serialize)]
pub struct CreateUserCredentials {
    pub password: PasswordValue,
}

#[derive(Debug, Serialize)]
pub struct PasswordValue {
    pub value: String,
}

impl From<&NewUser> for CreateUserRequest {
    fn from(user: &NewUser) -> Self {
        Self {
            profile: CreateUserProfile {
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                email: user.email.clone(),
                login: user.email.clone(),
            },
            credentials: CreateUserCredentials {
                password: PasswordValue {
                    value: user.password.clone(),
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OktaLogEvent {
    pub uuid: String,
    pub published: DateTime<Utc>,
    pub event_type: String,
    pub severity: String,
    #[serde(default)]
    pub display_message: Option<String>,
    #[serde(default)]
    pub actor: Option<OktaActor>,
    #[serde(default)]
    pub outcome: Option<OktaOutcome>,
    #[serde(default)]
    pub client: Option<OktaLogClient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OktaActor {
    #[serde(default)]
    pub alternate_id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OktaOutcome {
    #[serde(default)]
    pub result: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OktaLogClient {
    #[serde(default)]
    pub ip_address: Option<String>,
}

impl From<OktaLogEvent> for LogEvent {
    fn from(event: OktaLogEvent) -> Self {
        let actor = event.actor.and_then(|actor| {
            actor
                .display_name
                .filter(|name| !name.is_empty())
                .or(actor.alternate_id)
        });
        LogEvent {
            uuid: event.uuid,
            published: event.published,
            event_type: event.event_type,
            severity: event.severity,
            display_message: event.display_message,
            actor,
            outcome: event.outcome.and_then(|o| o.result),
            client_ip: event.client.and_then(|c| c.ip_address),
        }
    }
}

/// OAuth token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Okta error body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OktaErrorBody {
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_summary: Option<String>,
    #[serde(default)]
    pub error_causes: Vec<OktaErrorCause>,
    /// OAuth endpoints use `error` / `error_description` instead.
    #[serde(default, rename = "error_description")]
    pub error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OktaErrorCause {
    pub error_summary: String,
}

impl OktaErrorBody {
    /// Human readable summary including the causes, if any.
    pub fn message(&self) -> Option<String> {
        let summary = self
            .error_summary
            .clone()
            .or_else(|| self.error_description.clone())?;
        let mut message = match &self.error_code {
            Some(code) => format!("{summary} ({code})"),
            None => summary,
        };
        for cause in &self.error_causes {
            message.push_str(&format!("; {}", cause.error_summary));
        }
        Some(message)
    }
}
