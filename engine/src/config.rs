use std::env;

use uuid::Uuid;

use crate::domain::entities::UserId;
use crate::error::ConfigError;

/// Default tracing filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info,reviewable_engine=debug";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    /// User recorded as the creator of system-raised reviewables
    pub system_user_id: UserId,
    /// Whether new users must be approved before they can log in
    pub must_approve_users: bool,
    pub log_filter: String,
}

/// Site settings consumed by the built-in reviewable kinds
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteSettings {
    pub system_user_id: UserId,
    pub must_approve_users: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let system_user_id = match lookup("SYSTEM_USER_ID") {
            Some(raw) => Uuid::parse_str(raw.trim())
                .map(UserId)
                .map_err(|_| ConfigError::Invalid {
                    name: "SYSTEM_USER_ID",
                    value: raw,
                })?,
            None => UserId(Uuid::nil()),
        };

        let must_approve_users = match lookup("MUST_APPROVE_USERS") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid {
                name: "MUST_APPROVE_USERS",
                value: raw,
            })?,
            None => false,
        };

        Ok(Self {
            database_url,
            system_user_id,
            must_approve_users,
            log_filter: lookup("LOG_FILTER").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }

    pub fn site_settings(&self) -> SiteSettings {
        SiteSettings {
            system_user_id: self.system_user_id,
            must_approve_users: self.must_approve_users,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
