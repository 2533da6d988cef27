//! API credentials.
//!
//! Read from an operator-provided JSON key file:
//!
//! ```json
//! {
//!   "MY_TEAM_ID": 57796,
//!   "MY_MEMBER_ID": "123456",
//!   "ACCESS_KEY": "member-access-key",
//!   "DEV_ID": "42",
//!   "DEV_KEY": "developer-key"
//! }
//! ```
//!
//! Keys are wrapped in `SecretString` so they never show up in `Debug` output
//! or logs; they are only exposed when building a request.

use std::fs;
use std::path::Path;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ClientError;

/// Member and developer credentials for the Blackout Rugby API.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    /// The operator's own team id.
    #[serde(rename = "MY_TEAM_ID", default, deserialize_with = "id_string")]
    pub my_team_id: Option<String>,
    #[serde(rename = "MY_MEMBER_ID", default, deserialize_with = "id_string")]
    pub member_id: Option<String>,
    /// Member access key (`mk`).
    #[serde(rename = "ACCESS_KEY")]
    pub access_key: SecretString,
    #[serde(rename = "DEV_ID", default, deserialize_with = "id_string")]
    pub dev_id: Option<String>,
    /// Developer key (`dk`).
    #[serde(rename = "DEV_KEY", default)]
    pub dev_key: Option<SecretString>,
}

/// Accepts ids written either as JSON numbers or strings.
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

impl Credentials {
    /// Creates member-only credentials.
    pub fn new(member_id: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            my_team_id: None,
            member_id: Some(member_id.into()),
            access_key: SecretString::new(access_key.into().into()),
            dev_id: None,
            dev_key: None,
        }
    }

    /// Adds developer credentials.
    #[must_use]
    pub fn with_developer(mut self, dev_id: impl Into<String>, dev_key: impl Into<String>) -> Self {
        self.dev_id = Some(dev_id.into());
        self.dev_key = Some(SecretString::new(dev_key.into().into()));
        self
    }

    #[must_use]
    pub fn with_team(mut self, team_id: impl Into<String>) -> Self {
        self.my_team_id = Some(team_id.into());
        self
    }

    /// Loads credentials from a JSON key file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or lacks `ACCESS_KEY`.
    pub fn load(path: &Path) -> Result<Self, ClientError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ClientError::Credentials(format!("Failed to read {}: {e}", path.display()))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            ClientError::Credentials(format!("Invalid key file {}: {e}", path.display()))
        })
    }
}
