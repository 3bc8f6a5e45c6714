//! Okta organisation URL contract.

use thiserror::Error;
use url::Url;

/// Domains an Okta organisation can live under.
pub const PLATFORM_DOMAINS: [&str; 3] = ["okta.com", "oktapreview.com", "okta-emea.com"];

/// Reasons an organisation URL is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrgUrlError {
    #[error("Invalid organisation URL '{0}'")]
    Malformed(String),

    #[error("Organisation URL must use https: {0}")]
    InsecureScheme(String),

    #[error("Organisation URL must end with one of .okta.com, .oktapreview.com or .okta-emea.com: {0}")]
    UnknownDomain(String),

    #[error("Organisation URL must have a subdomain: {0}")]
    MissingSubdomain(String),

    #[error("Organisation URL points at the admin console; drop the '-admin' suffix: {0}")]
    AdminDomain(String),

    #[error("Organisation URL must not contain a path, query or credentials: {0}")]
    UnexpectedComponents(String),
}

/// Validates an organisation URL such as `https://acme.okta.com`.
///
/// Returns the URL without a trailing slash so API paths can be appended.
///
/// # Examples
///
/// ```
/// use oktactl_core::org::validate_org_url;
///
/// assert_eq!(
///     validate_org_url("https://acme.okta.com/").unwrap(),
///     "https://acme.okta.com"
/// );
/// assert!(validate_org_url("http://acme.okta.com").is_err());
/// assert!(validate_org_url("https://acme-admin.okta.com").is_err());
/// ```
pub fn validate_org_url(raw: &str) -> Result<String, OrgUrlError> {
    let url = Url::parse(raw.trim()).map_err(|_| OrgUrlError::Malformed(raw.to_string()))?;

    if url.scheme() != "https" {
        return Err(OrgUrlError::InsecureScheme(raw.to_string()));
    }

    if !url.username().is_empty()
        || url.password().is_some()
        || url.query().is_some()
        || url.fragment().is_some()
        || url.path() != "/"
    {
        return Err(OrgUrlError::UnexpectedComponents(raw.to_string()));
    }

    let host = url
        .host_str()
        .ok_or_else(|| OrgUrlError::Malformed(raw.to_string()))?
        .to_ascii_lowercase();

    let subdomain = PLATFORM_DOMAINS
        .iter()
        .find_map(|domain| {
            host.strip_suffix(domain)
                .and_then(|rest| rest.strip_suffix('.'))
                .map(str::to_string)
        })
        .or_else(|| {
            PLATFORM_DOMAINS
                .contains(&host.as_str())
                .then(String::new)
        })
        .ok_or_else(|| OrgUrlError::UnknownDomain(raw.to_string()))?;

    let label = subdomain.rsplit('.').next().unwrap_or_default();
    if label.is_empty() {
        return Err(OrgUrlError::MissingSubdomain(raw.to_string()));
    }
    if label.ends_with("-admin") {
        return Err(OrgUrlError::AdminDomain(raw.to_string()));
    }

    let port = url.port().map(|p| format!(":{p}")).unwrap_or_default();
    Ok(format!("https://{host}{port}"))
}
