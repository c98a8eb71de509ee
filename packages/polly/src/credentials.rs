use std::fmt;

use tracing::debug;
use unseen_moves_domain::{EpisodeError, Result};

/// Environment variable holding the Polly access key id.
pub const ACCESS_KEY_VAR: &str = "ACCESS_KEY";
/// Environment variable holding the Polly secret access key.
pub const SECRET_KEY_VAR: &str = "SECRET_KEY";

/// Static key pair used to sign Polly requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key: String,
    secret_key: String,
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Read `ACCESS_KEY` and `SECRET_KEY` from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read both keys through `lookup`, failing on the first one that is
    /// absent or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_key = required(&lookup, ACCESS_KEY_VAR)?;
        let secret_key = required(&lookup, SECRET_KEY_VAR)?;

        debug!(
            access_key_len = access_key.len(),
            "Loaded speech synthesis credentials"
        );

        Ok(Self::new(access_key, secret_key))
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

fn required<F>(lookup: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        Some(_) => Err(EpisodeError::Configuration(format!(
            "environment variable {name} is set but empty"
        ))),
        None => Err(EpisodeError::Configuration(format!(
            "environment variable {name} is not set"
        ))),
    }
}

// Keep the secret out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}
