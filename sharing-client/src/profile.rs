//! Sharing profile (`*.share`) parsing.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{ClientError, Result};

/// Highest profile format version this client understands.
pub const CURRENT_SHARE_CREDENTIALS_VERSION: u32 = 1;

/// Connection profile: where the sharing server lives and how to authenticate.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub share_credentials_version: u32,
    pub endpoint: String,
    pub bearer_token: String,
    #[serde(default)]
    pub expiration_time: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("share_credentials_version", &self.share_credentials_version)
            .field("endpoint", &self.endpoint)
            .field("bearer_token", &"<redacted>")
            .field("expiration_time", &self.expiration_time)
            .finish()
    }
}

impl Profile {
    /// Reads and validates a profile file.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_json(&content)
    }

    /// Parses and validates a profile document.
    pub fn from_json(content: &str) -> Result<Self> {
        let mut profile: Profile = serde_json::from_str(content)
            .map_err(|e| ClientError::Profile(format!("Invalid sharing profile: {}", e)))?;
        profile.validate(Utc::now())?;
        profile.endpoint = profile.endpoint.trim_end_matches('/').to_string();
        Ok(profile)
    }

    fn validate(&self, now: DateTime<Utc>) -> Result<()> {
        if self.share_credentials_version > CURRENT_SHARE_CREDENTIALS_VERSION {
            return Err(ClientError::Profile(format!(
                "'shareCredentialsVersion' in the profile is {} which is too new. \
                 The current release supports version {} and below. \
                 Please upgrade to a newer release.",
                self.share_credentials_version, CURRENT_SHARE_CREDENTIALS_VERSION
            )));
        }
        if self.endpoint.trim().is_empty() {
            return Err(ClientError::Profile(
                "Sharing profile is missing 'endpoint'".to_string(),
            ));
        }
        if self.bearer_token.trim().is_empty() {
            return Err(ClientError::Profile(
                "Sharing profile is missing 'bearerToken'".to_string(),
            ));
        }
        if let Some(expiration) = self.expiration_time {
            if expiration <= now {
                return Err(ClientError::Profile(format!(
                    "Sharing profile token expired at {}",
                    expiration.to_rfc3339()
                )));
            }
        }
        Ok(())
    }
}
