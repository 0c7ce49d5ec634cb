//! Table address parsing.
//!
//! A table is addressed as `<profile-path>#<share>.<schema>.<table>`.

use crate::error::{ClientError, Result};
use crate::models::Table;

/// Builds the address of `table` relative to the profile at `profile_path`.
pub fn table_url(profile_path: &str, table: &Table) -> String {
    format!(
        "{}#{}.{}.{}",
        profile_path, table.share, table.schema, table.name
    )
}

/// Splits a table address into the profile path and the table coordinates.
pub fn parse_table_url(url: &str) -> Result<(String, Table)> {
    let invalid = || ClientError::InvalidUrl(url.to_string());

    let (profile, fragment) = url.rsplit_once('#').ok_or_else(invalid)?;
    if profile.is_empty() {
        return Err(invalid());
    }

    let parts: Vec<&str> = fragment.split('.').collect();
    match parts.as_slice() {
        [share, schema, name] if !share.is_empty() && !schema.is_empty() && !name.is_empty() => {
            Ok((profile.to_string(), Table::new(*share, *schema, *name)))
        }
        _ => Err(invalid()),
    }
}
