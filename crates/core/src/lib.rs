//! oktactl_core - functional core for the oktactl administration CLI.
//!
//! Everything here is either pure or talks to the identity platform only
//! through the service traits, so it can be exercised against the in-memory
//! directory.

pub mod identity;
pub mod logs;
pub mod org;
