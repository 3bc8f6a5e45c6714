//! Table output formatting.

use oktactl_core::identity::{ExpiredPassword, Group, User};
use oktactl_core::logs::LogEvent;

use crate::client::health::Ping;

/// Render rows under a header, padding every column to its widest cell.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut output = line(headers.to_vec());
    output.push('\n');
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    output.push_str(&line(separator.iter().map(String::as_str).collect()));
    for row in rows {
        output.push('\n');
        output.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    output
}

fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => "-".to_string(),
    }
}

/// Format a user for display.
pub fn format_user(user: &User) -> String {
    format!(
        "{}\n  ID: {}\n  Login: {}\n  Email: {}\n  Status: {}",
        or_dash(Some(&user.display_name)),
        user.id,
        user.login,
        or_dash(Some(&user.email)),
        user.status
    )
}

/// Format users for display.
pub fn format_users(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|user| {
            vec![
                user.id.clone(),
                user.login.clone(),
                or_dash(Some(&user.display_name)),
                or_dash(Some(&user.email)),
                user.status.to_string(),
            ]
        })
        .collect();
    render_table(&["ID", "LOGIN", "NAME", "EMAIL", "STATUS"], &rows)
}

/// Format groups for display.
pub fn format_groups(groups: &[Group]) -> String {
    if groups.is_empty() {
        return "No groups found.".to_string();
    }
    let rows: Vec<Vec<String>> = groups
        .iter()
        .map(|group| vec![group.id.clone(), group.name.clone(), group.group_type.clone()])
        .collect();
    render_table(&["ID", "NAME", "TYPE"], &rows)
}

/// Format the members of a group.
pub fn format_members(group: &Group, users: &[User]) -> String {
    format!("GROUP {} ({})\n{}", group.name, group.id, format_users(users))
}

/// Format log events for display.
pub fn format_log_events(events: &[LogEvent]) -> String {
    if events.is_empty() {
        return "No log events found.".to_string();
    }
    let rows: Vec<Vec<String>> = events
        .iter()
        .map(|event| {
            vec![
                event.published.format("%Y-%m-%d %H:%M:%S").to_string(),
                event.severity.clone(),
                event.event_type.clone(),
                or_dash(event.actor.as_deref()),
                or_dash(event.outcome.as_deref()),
                or_dash(event.display_message.as_deref()),
            ]
        })
        .collect();
    render_table(
        &["PUBLISHED", "SEVERITY", "EVENT TYPE", "ACTOR", "OUTCOME", "MESSAGE"],
        &rows,
    )
}

/// Format an expired password. An empty password means nothing was issued.
pub fn format_expired_password(expired: &ExpiredPassword) -> String {
    let password = if expired.temporary_password.is_empty() {
        "(none, dry run)"
    } else {
        expired.temporary_password.as_str()
    };
    format!(
        "{}\n  Temporary password: {}",
        format_user(&expired.user),
        password
    )
}

/// Format a ping result.
pub fn format_ping(ping: &Ping) -> String {
    format!(
        "{}\n  Status: {}\n  Latency: {}ms",
        ping.org_url, ping.status, ping.latency_ms
    )
}
