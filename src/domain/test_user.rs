use crate::configuration::TestUserSettings;
use crate::domain::{UserEmail, UserName, UserPassword};
use chrono::Utc;

/// The throwaway account a single run signs up with.
///
/// Name and email carry a millisecond timestamp so that repeated runs
/// against the same API never collide with earlier test users.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub name: UserName,
    pub email: UserEmail,
    pub password: UserPassword,
}

impl TestUser {
    pub fn generate(settings: &TestUserSettings) -> Result<Self, String> {
        Self::with_timestamp(settings, Utc::now().timestamp_millis())
    }

    pub fn with_timestamp(settings: &TestUserSettings, timestamp: i64) -> Result<Self, String> {
        let name = UserName::parse(format!("{}{}", settings.name_prefix, timestamp))?;
        let email = UserEmail::parse(format!(
            "{}{}@{}",
            settings.email_prefix, timestamp, settings.email_domain
        ))?;
        let password =
            UserPassword::parse(settings.password.clone()).map_err(|e| e.to_string())?;
        Ok(Self {
            name,
            email,
            password,
        })
    }
}
