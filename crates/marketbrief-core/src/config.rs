//! Process configuration.
//!
//! Settings are read from the environment once at startup into an
//! owned struct; nothing downstream touches the environment. A missing
//! or invalid value fails here, before any provider call is made.

use std::env;

use crate::error::ConfigError;

const ENV_USER: &str = "MARKETBRIEF_MAIL_USER";
const ENV_PASSWORD: &str = "MARKETBRIEF_MAIL_PASSWORD";
const ENV_HOST: &str = "MARKETBRIEF_MAIL_HOST";
const ENV_PORT: &str = "MARKETBRIEF_MAIL_PORT";
const ENV_TO: &str = "MARKETBRIEF_MAIL_TO";

/// Outbound mail identity and destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub recipient: String,
}

impl MailSettings {
    /// Loads all five required settings from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            username: required(ENV_USER)?,
            password: required(ENV_PASSWORD)?,
            host: required(ENV_HOST)?,
            port: required_port(ENV_PORT)?,
            recipient: required(ENV_TO)?,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_owned()),
        _ => Err(ConfigError::MissingVar { name }),
    }
}

fn required_port(name: &'static str) -> Result<u16, ConfigError> {
    let raw = required(name)?;
    raw.parse::<u16>()
        .ok()
        .filter(|port| *port != 0)
        .ok_or(ConfigError::InvalidValue { name, value: raw })
}
