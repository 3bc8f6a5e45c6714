//! oktactl_client - command-line administration of an Okta organisation.

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod password;

pub use client::OktaClient;
pub use error::{ClientError, Result};
