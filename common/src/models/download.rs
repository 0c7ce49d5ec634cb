//! Download request payload.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::errors::{AppError, AppResult};

/// Message returned when any download parameter is absent or empty.
pub const MISSING_PARAMETERS: &str = "Missing required parameters: config, share, schema, table";

/// Request body for `POST /download`.
///
/// Every field is optional at the serde level so that an absent field is
/// reported as a validation failure rather than a parse failure.
#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct DownloadRequest {
    /// Sharing profile document, as text.
    #[validate(required, length(min = 1))]
    pub config: Option<String>,

    /// Share name.
    #[validate(required, length(min = 1))]
    pub share: Option<String>,

    /// Schema name.
    #[validate(required, length(min = 1))]
    pub schema: Option<String>,

    /// Table name.
    #[validate(required, length(min = 1))]
    pub table: Option<String>,
}

/// A download request whose fields are all present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub config: String,
    pub share: String,
    pub schema: String,
    pub table: String,
}

impl DownloadRequest {
    /// Validates the request and unwraps its fields.
    ///
    /// # Errors
    /// Returns `AppError::Validation` if any field is missing or empty.
    pub fn into_target(self) -> AppResult<DownloadTarget> {
        self.validate()
            .map_err(|_| AppError::Validation(MISSING_PARAMETERS.to_string()))?;

        match (self.config, self.share, self.schema, self.table) {
            (Some(config), Some(share), Some(schema), Some(table)) => Ok(DownloadTarget {
                config,
                share,
                schema,
                table,
            }),
            _ => Err(AppError::Validation(MISSING_PARAMETERS.to_string())),
        }
    }
}
